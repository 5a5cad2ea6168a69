use chrono::NaiveDate;
use ofxlib::model::{AccountKind, BankAccountKind, CorrectionAction, TransactionKind};
use ofxlib::OfxParser;
use rust_decimal::Decimal;

const BANK_SGML: &str = r#"OFXHEADER:100
DATA:OFXSGML
VERSION:102
SECURITY:NONE
ENCODING:USASCII
CHARSET:1252
COMPRESSION:NONE
OLDFILEUID:NONE
NEWFILEUID:NONE

<OFX>
<SIGNONMSGSRSV1>
<SONRS>
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<DTSERVER>20230105093000
<LANGUAGE>ENG
</SONRS>
</SIGNONMSGSRSV1>
<BANKMSGSRSV1>
<STMTTRNRS>
<TRNUID>1
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<STMTRS>
<CURDEF>USD
<BANKACCTFROM>
<BANKID>121000248
<BRANCHID>001
<ACCTID>987654321
<ACCTTYPE>CHECKING
</BANKACCTFROM>
<BANKTRANLIST>
<DTSTART>20230101
<DTEND>20230131
<STMTTRN>
<TRNTYPE>DEBIT
<DTPOSTED>20230101120000
<TRNAMT>-12.34
<FITID>123
<NAME>COFFEE SHOP
<MEMO>Latte with
extra shot
</STMTTRN>
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20230115080000.000[-3:BRT]
<TRNAMT>1500.00
<FITID>124
<NAME>EMPLOYER INC
</STMTTRN>
<STMTTRN>
<TRNTYPE>XFER
<DTPOSTED>20230120
<TRNAMT>-200.00
<FITID>125
<BANKACCTTO>
<BANKID>121000248
<ACCTID>111222333
<ACCTTYPE>SAVINGS
</BANKACCTTO>
</STMTTRN>
</BANKTRANLIST>
<LEDGERBAL>
<BALAMT>1287.66
<DTASOF>20230131120000
</LEDGERBAL>
<AVAILBAL>
<BALAMT>1200.00
<DTASOF>20230131120000
</AVAILBAL>
</STMTRS>
</STMTTRNRS>
</BANKMSGSRSV1>
</OFX>
"#;

#[test]
fn bank_sgml_full_statement() {
    let doc = OfxParser::parse_str(BANK_SGML).expect("parse bank sgml");

    assert_eq!(doc.kind, AccountKind::Bank);
    assert_eq!(doc.currency, "USD");

    assert_eq!(doc.sign_on.status_code, "0");
    assert_eq!(doc.sign_on.status_severity, "INFO");
    assert_eq!(doc.sign_on.language, "ENG");

    assert_eq!(doc.account.account_id, "987654321");
    assert_eq!(doc.account.bank_id, "121000248");
    assert_eq!(doc.account.branch_id, "001");
    assert_eq!(doc.account.bank_account_kind, BankAccountKind::Checking);

    assert_eq!(
        doc.statement_start,
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );

    // порядок — как в документе
    assert_eq!(doc.transactions.len(), 3);
    assert_eq!(doc.transactions[0].transaction_id, "123");
    assert_eq!(doc.transactions[1].transaction_id, "124");
    assert_eq!(doc.transactions[2].transaction_id, "125");

    assert_eq!(doc.balance.ledger_amount, Decimal::new(128766, 2));
    assert_eq!(doc.balance.available_amount, Decimal::new(120000, 2));
}

#[test]
fn debit_transaction_fields() {
    let doc = OfxParser::parse_str(BANK_SGML).expect("parse bank sgml");
    let t = &doc.transactions[0];

    assert_eq!(t.kind, TransactionKind::Debit);
    assert_eq!(
        t.posted,
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    );
    assert_eq!(t.amount, Decimal::new(-1234, 2));
    assert_eq!(t.transaction_id, "123");
    assert_eq!(t.name.as_deref(), Some("COFFEE SHOP"));
    assert_eq!(t.correction, CorrectionAction::NotApplicable);
    // без CURRENCY/ORIGCURRENCY берётся CURDEF документа
    assert_eq!(t.currency, "USD");
}

#[test]
fn wrapped_memo_is_concatenated_without_break() {
    let doc = OfxParser::parse_str(BANK_SGML).expect("parse bank sgml");
    assert_eq!(
        doc.transactions[0].memo.as_deref(),
        Some("Latte withextra shot")
    );
}

#[test]
fn timezone_and_fraction_suffixes_are_ignored() {
    let doc = OfxParser::parse_str(BANK_SGML).expect("parse bank sgml");
    assert_eq!(
        doc.transactions[1].posted,
        NaiveDate::from_ymd_opt(2023, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    );
}

#[test]
fn transfer_carries_counter_party_account() {
    let doc = OfxParser::parse_str(BANK_SGML).expect("parse bank sgml");
    let t = &doc.transactions[2];
    assert_eq!(t.kind, TransactionKind::Transfer);

    let to = t.counter_account.as_ref().expect("counter account");
    assert_eq!(to.kind, AccountKind::Bank);
    assert_eq!(to.account_id, "111222333");
    assert_eq!(to.bank_account_kind, BankAccountKind::Savings);
}

#[test]
fn parsing_twice_yields_equal_documents() {
    let a = OfxParser::parse_str(BANK_SGML).expect("first parse");
    let b = OfxParser::parse_str(BANK_SGML).expect("second parse");
    assert_eq!(a, b);
}

#[test]
fn nested_entity_in_leaf_survives_normalization() {
    // &amp;lt; — это литеральная строка "&lt;", а не вложенный "<"
    let soup = concat!(
        "<OFX><BANKMSGSRSV1><STMTTRNRS><STMTRS><BANKTRANLIST>",
        "<STMTTRN><MEMO>A &amp;lt;B&amp;gt; &amp;amp; C",
        "</STMTTRN></BANKTRANLIST></STMTRS></STMTTRNRS></BANKMSGSRSV1></OFX>",
    );
    let xml = ofxlib::sgml::normalize(soup).expect("normalize");
    assert!(xml.contains("A &amp;lt;B&amp;gt; &amp;amp; C"), "{xml}");
}

#[test]
fn reader_entry_point_decodes_windows_1252() {
    // é в Windows-1252 — один байт 0xE9
    let mut bytes = BANK_SGML.replace("COFFEE SHOP", "CAF~ NOIR").into_bytes();
    for b in bytes.iter_mut() {
        if *b == b'~' {
            *b = 0xE9;
        }
    }
    let doc = OfxParser::parse_reader(std::io::Cursor::new(bytes)).expect("parse bytes");
    assert_eq!(doc.transactions[0].name.as_deref(), Some("CAF\u{e9} NOIR"));
}
