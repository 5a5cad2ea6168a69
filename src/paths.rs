//! Таблица путей: (тип счёта, логическая секция) -> путь в дереве.
//!
//! Все различия разбора между банковской и карточной выпиской сводятся
//! к разным корневым контейнерам; остальные пути — конкатенация.

use crate::error::{OfxError, Result};
use crate::model::AccountKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    SignOn,
    AccountInfo,
    Transactions,
    Balance,
    Currency,
}

const SIGNON_PATH: &str = "OFX/SIGNONMSGSRSV1/SONRS";
const BANK_ROOT: &str = "OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS";
const CC_ROOT: &str = "OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS";

/// Для AP/AR всегда ошибка: единственная точка отказа для этих типов.
pub fn resolve(kind: AccountKind, section: Section) -> Result<String> {
    let (root, account_info) = match kind {
        AccountKind::Bank => (BANK_ROOT, "/BANKACCTFROM"),
        AccountKind::CreditCard => (CC_ROOT, "/CCACCTFROM"),
        other => return Err(OfxError::UnsupportedAccountType(other.name().to_string())),
    };

    Ok(match section {
        Section::SignOn => SIGNON_PATH.to_string(),
        Section::AccountInfo => format!("{root}{account_info}"),
        Section::Transactions => format!("{root}/BANKTRANLIST"),
        Section::Balance => root.to_string(),
        Section::Currency => format!("{root}/CURDEF"),
    })
}
