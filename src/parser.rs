//! Сборка OfxDocument: фиксированный порядок секций, без отката.
//! Любая ошибка прерывает весь разбор — частичный документ не возвращается.

use std::io::Read;

use chrono::NaiveDateTime;
use log::debug;
use regex::Regex;
use rust_decimal::Decimal;

use crate::decode;
use crate::error::{OfxError, Result};
use crate::header;
use crate::model::{
    Account, AccountKind, Balance, BankAccountKind, CorrectionAction, OfxDocument, SignOn,
    Transaction, TransactionKind,
};
use crate::paths::{self, Section};
use crate::sgml;
use crate::tree::{self, Node};

/// Парсер без состояния: один экземпляр безопасно переиспользовать
/// между вызовами и потоками.
pub struct OfxParser;

impl OfxParser {
    /// Байтовый вход: декодирует WINDOWS-1252 (CHARSET:1252 заголовка)
    /// и делегирует parse_str.
    pub fn parse_reader<R: Read>(mut r: R) -> Result<OfxDocument> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
        Self::parse_str(&text)
    }

    pub fn parse_str(ofx: &str) -> Result<OfxDocument> {
        debug!("parsing OFX input, {} bytes", ofx.len());

        // тип счёта определяется по сырому тексту до любого разбора
        let kind = detect_kind(ofx)?;
        debug!("detected account kind: {}", kind.name());

        let normalized;
        let body = if header::is_sgml(ofx) {
            let rest = header::strip(ofx)?;
            normalized = sgml::normalize(rest)?;
            debug!("normalized SGML body to {} bytes of markup", normalized.len());
            normalized.as_str()
        } else {
            ofx
        };

        let doc = tree::parse(body)?;

        let currency = read_currency(&doc, kind)?;
        let sign_on = read_sign_on(&doc, kind)?;
        let account = read_account(&doc, kind)?;
        let (statement_start, statement_end, transactions) =
            read_transactions(&doc, kind, &currency)?;
        let balance = read_balance(&doc, kind)?;
        debug!("parsed {} transactions", transactions.len());

        Ok(OfxDocument {
            kind,
            currency,
            sign_on,
            account,
            balance,
            statement_start,
            statement_end,
            transactions,
        })
    }
}

fn detect_kind(ofx: &str) -> Result<AccountKind> {
    let re = Regex::new(r"<(CREDITCARDMSGSRSV1|BANKMSGSRSV1)>").map_err(|e| OfxError::Markup {
        detail: e.to_string(),
        pos: 0,
    })?;
    match re.find(ofx).map(|m| m.as_str()) {
        Some("<CREDITCARDMSGSRSV1>") => Ok(AccountKind::CreditCard),
        Some(_) => Ok(AccountKind::Bank),
        None => Err(OfxError::UnsupportedAccountType(
            "no bank or credit card statement marker".to_string(),
        )),
    }
}

fn opt_datetime(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(s) => decode::datetime(s),
        None => Ok(decode::epoch()),
    }
}

fn read_currency(doc: &Node, kind: AccountKind) -> Result<String> {
    let path = paths::resolve(kind, Section::Currency)?;
    doc.find(&path)
        .map(|n| n.text.clone())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| OfxError::MissingSection("Currency".to_string()))
}

fn read_sign_on(doc: &Node, kind: AccountKind) -> Result<SignOn> {
    let path = paths::resolve(kind, Section::SignOn)?;
    let node = doc
        .find(&path)
        .ok_or_else(|| OfxError::MissingSection("SignOn".to_string()))?;

    Ok(SignOn {
        status_code: node.value_of("CODE").unwrap_or_default().to_string(),
        status_severity: node.value_of("SEVERITY").unwrap_or_default().to_string(),
        server_date: opt_datetime(node.value_of("DTSERVER"))?,
        language: node.value_of("LANGUAGE").unwrap_or_default().to_string(),
        intu_bid: node.value_of("INTU.BID").map(str::to_string),
    })
}

fn read_account(doc: &Node, kind: AccountKind) -> Result<Account> {
    let path = paths::resolve(kind, Section::AccountInfo)?;
    let node = doc
        .find(&path)
        .ok_or_else(|| OfxError::MissingSection("Account".to_string()))?;
    account_from_node(node, kind)
}

/// Общее правило конструирования Account; оно же используется для
/// вложенного счёта контрагента.
fn account_from_node(node: &Node, kind: AccountKind) -> Result<Account> {
    let account_id = node.value_of("ACCTID").unwrap_or_default().to_string();
    let account_key = node.value_of("ACCTKEY").unwrap_or_default().to_string();

    let bank_account_kind = match kind {
        AccountKind::Bank => {
            let token = node
                .value_of("ACCTTYPE")
                .ok_or_else(|| OfxError::UnknownBankAccountType(String::new()))?;
            BankAccountKind::from_token(token)?
        }
        AccountKind::CreditCard => BankAccountKind::NotApplicable,
        other => return Err(OfxError::UnsupportedAccountType(other.name().to_string())),
    };

    Ok(Account::new(
        kind,
        account_id,
        account_key,
        node.value_of("BANKID").unwrap_or_default().to_string(),
        node.value_of("BRANCHID").unwrap_or_default().to_string(),
        bank_account_kind,
    ))
}

fn read_transactions(
    doc: &Node,
    kind: AccountKind,
    currency: &str,
) -> Result<(NaiveDateTime, NaiveDateTime, Vec<Transaction>)> {
    let path = paths::resolve(kind, Section::Transactions)?;
    let Some(list) = doc.find(&path) else {
        // выписка без списка операций допустима
        return Ok((decode::epoch(), decode::epoch(), Vec::new()));
    };

    let start = opt_datetime(list.value_of("DTSTART"))?;
    let end = opt_datetime(list.value_of("DTEND"))?;

    let mut transactions = Vec::new();
    for node in list.descendants("STMTTRN") {
        transactions.push(transaction_from_node(node, currency)?);
    }
    Ok((start, end, transactions))
}

fn transaction_from_node(node: &Node, default_currency: &str) -> Result<Transaction> {
    let kind = TransactionKind::from_token(node.value_of("TRNTYPE").unwrap_or_default())?;
    let amount = decode::amount(node.value_of("TRNAMT").unwrap_or_default())?;
    let transaction_id = node
        .value_of("FITID")
        .ok_or_else(|| OfxError::MissingSection("Transaction ID".to_string()))?
        .to_string();

    let correction = match node.value_of("CORRECTACTION") {
        Some(token) => CorrectionAction::from_token(token)?,
        None => CorrectionAction::NotApplicable,
    };

    // CURRENCY > ORIGCURRENCY > CURDEF документа
    let currency = node
        .value_of("CURRENCY")
        .or_else(|| node.value_of("ORIGCURRENCY"))
        .unwrap_or(default_currency)
        .to_string();

    // счёт контрагента заполняется только для переводов
    let counter_account = if let Some(to) = node.descendant("BANKACCTTO") {
        Some(account_from_node(to, AccountKind::Bank)?)
    } else if let Some(to) = node.descendant("CCACCTTO") {
        Some(account_from_node(to, AccountKind::CreditCard)?)
    } else {
        None
    };

    Ok(Transaction {
        kind,
        posted: opt_datetime(node.value_of("DTPOSTED"))?,
        user_date: opt_datetime(node.value_of("DTUSER"))?,
        available_date: opt_datetime(node.value_of("DTAVAIL"))?,
        amount,
        transaction_id,
        correct_transaction_id: node.value_of("CORRECTFITID").map(str::to_string),
        correction,
        server_transaction_id: node.value_of("SRVRTID").map(str::to_string),
        check_number: node.value_of("CHECKNUM").map(str::to_string),
        reference_number: node.value_of("REFNUM").map(str::to_string),
        sic: node.value_of("SIC").map(str::to_string),
        payee_id: node.value_of("PAYEEID").map(str::to_string),
        name: node.value_of("NAME").map(str::to_string),
        memo: node.value_of("MEMO").map(str::to_string),
        currency,
        counter_account,
    })
}

fn read_balance(doc: &Node, kind: AccountKind) -> Result<Balance> {
    let path = paths::resolve(kind, Section::Balance)?;
    let root = doc
        .find(&path)
        .ok_or_else(|| OfxError::MissingSection("Balance".to_string()))?;

    let ledger = root
        .find("LEDGERBAL")
        .ok_or_else(|| OfxError::MissingSection("Balance".to_string()))?;
    let ledger_amount = decode::amount(ledger.value_of("BALAMT").unwrap_or_default())?;
    let ledger_date = opt_datetime(ledger.value_of("DTASOF"))?;

    // у многих банков узла AVAILBAL нет; это не ошибка
    let (available_amount, available_date) = match root.find("AVAILBAL") {
        Some(avail) => (
            decode::amount(avail.value_of("BALAMT").unwrap_or_default())?,
            opt_datetime(avail.value_of("DTASOF"))?,
        ),
        None => (Decimal::ZERO, decode::epoch()),
    };

    Ok(Balance {
        ledger_amount,
        ledger_date,
        available_amount,
        available_date,
    })
}
