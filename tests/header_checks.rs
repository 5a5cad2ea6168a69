use ofxlib::OfxError;

const HEADER_LINES: [&str; 9] = [
    "OFXHEADER:100",
    "DATA:OFXSGML",
    "VERSION:102",
    "SECURITY:NONE",
    "ENCODING:USASCII",
    "CHARSET:1252",
    "COMPRESSION:NONE",
    "OLDFILEUID:NONE",
    "NEWFILEUID:NONE",
];

const FIELDS: [&str; 8] = [
    "OFXHEADER",
    "DATA",
    "VERSION",
    "SECURITY",
    "ENCODING",
    "CHARSET",
    "COMPRESSION",
    "OLDFILEUID",
];

// Минимальное валидное тело банковской выписки.
const BODY: &str = r#"<OFX>
<SIGNONMSGSRSV1>
<SONRS>
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<DTSERVER>20230105
<LANGUAGE>ENG
</SONRS>
</SIGNONMSGSRSV1>
<BANKMSGSRSV1>
<STMTTRNRS>
<TRNUID>1
<STMTRS>
<CURDEF>USD
<BANKACCTFROM>
<BANKID>1
<ACCTID>2
<ACCTTYPE>CHECKING
</BANKACCTFROM>
<LEDGERBAL>
<BALAMT>0.00
<DTASOF>20230131
</LEDGERBAL>
</STMTRS>
</STMTTRNRS>
</BANKMSGSRSV1>
</OFX>
"#;

fn with_header(lines: &[&str]) -> String {
    format!("{}\r\n\r\n{}", lines.join("\r\n"), BODY)
}

#[test]
fn valid_header_is_accepted() {
    let doc = ofxlib::parse(&with_header(&HEADER_LINES)).expect("valid header");
    assert_eq!(doc.currency, "USD");
    assert!(doc.transactions.is_empty());
}

#[test]
fn every_header_field_mismatch_names_the_field() {
    for (i, field) in FIELDS.iter().enumerate() {
        let mut lines = HEADER_LINES.to_vec();
        // портим значение, сохраняя ключ
        lines[i] = match i {
            0 => "OFXHEADER:999",
            _ => "BOGUS:VALUE",
        };
        match ofxlib::parse(&with_header(&lines)) {
            Err(OfxError::Header { field: named, .. }) => assert_eq!(named, *field),
            other => panic!("field {field}: expected header error, got {other:?}"),
        }
    }
}

#[test]
fn missing_header_line_names_the_field() {
    // без последней проверяемой строки
    let lines = &HEADER_LINES[..7];
    match ofxlib::parse(&with_header(lines)) {
        Err(OfxError::Header { field, .. }) => assert_eq!(field, "OLDFILEUID"),
        other => panic!("expected header error, got {other:?}"),
    }
}

#[test]
fn undelimited_single_line_header_is_accepted() {
    let header = HEADER_LINES.join("");
    let input = format!("{header}\r\n{BODY}");
    let doc = ofxlib::parse(&input).expect("undelimited header");
    assert_eq!(doc.currency, "USD");
}
