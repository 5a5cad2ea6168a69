//! Доменные модели — типизированный OFX-документ.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{OfxError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountKind {
    Bank,
    CreditCard,
    /// Accounts payable — распознаётся, но не поддерживается.
    Ap,
    /// Accounts receivable — распознаётся, но не поддерживается.
    Ar,
}

impl AccountKind {
    pub fn name(&self) -> &'static str {
        match self {
            AccountKind::Bank => "BANK",
            AccountKind::CreditCard => "CC",
            AccountKind::Ap => "AP",
            AccountKind::Ar => "AR",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BankAccountKind {
    Checking,
    Savings,
    MoneyMarket,
    CreditLine,
    #[default]
    NotApplicable,
}

impl BankAccountKind {
    pub fn from_token(s: &str) -> Result<Self> {
        Ok(match s {
            "CHECKING" => BankAccountKind::Checking,
            "SAVINGS" => BankAccountKind::Savings,
            "MONEYMRKT" => BankAccountKind::MoneyMarket,
            "CREDITLINE" => BankAccountKind::CreditLine,
            other => return Err(OfxError::UnknownBankAccountType(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
    Interest,
    Dividend,
    Fee,
    ServiceCharge,
    Deposit,
    Atm,
    Pos,
    Transfer,
    Check,
    Payment,
    Cash,
    DirectDeposit,
    DirectDebit,
    RepeatPayment,
    Other,
}

impl TransactionKind {
    pub fn from_token(s: &str) -> Result<Self> {
        Ok(match s {
            "CREDIT" => TransactionKind::Credit,
            "DEBIT" => TransactionKind::Debit,
            "INT" => TransactionKind::Interest,
            "DIV" => TransactionKind::Dividend,
            "FEE" => TransactionKind::Fee,
            "SRVCHG" => TransactionKind::ServiceCharge,
            "DEP" => TransactionKind::Deposit,
            "ATM" => TransactionKind::Atm,
            "POS" => TransactionKind::Pos,
            "XFER" => TransactionKind::Transfer,
            "CHECK" => TransactionKind::Check,
            "PAYMENT" => TransactionKind::Payment,
            "CASH" => TransactionKind::Cash,
            "DIRECTDEP" => TransactionKind::DirectDeposit,
            "DIRECTDEBIT" => TransactionKind::DirectDebit,
            "REPEATPMT" => TransactionKind::RepeatPayment,
            "OTHER" => TransactionKind::Other,
            other => {
                return Err(OfxError::UnknownEnumValue {
                    field: "TRNTYPE",
                    value: other.to_string(),
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CorrectionAction {
    Replace,
    Delete,
    #[default]
    NotApplicable,
}

impl CorrectionAction {
    pub fn from_token(s: &str) -> Result<Self> {
        Ok(match s {
            "REPLACE" => CorrectionAction::Replace,
            "DELETE" => CorrectionAction::Delete,
            other => {
                return Err(OfxError::UnknownEnumValue {
                    field: "CORRECTACTION",
                    value: other.to_string(),
                })
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignOn {
    pub status_code: String,
    pub status_severity: String,
    pub server_date: NaiveDateTime,
    pub language: String,
    pub intu_bid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub account_id: String,
    pub account_key: String,
    pub kind: AccountKind,
    pub bank_id: String,
    pub branch_id: String,
    pub bank_account_kind: BankAccountKind,
}

impl Account {
    /// Банковские поля имеют смысл только для kind = Bank; для остальных
    /// типов они приводятся к сигнальным значениям уже при конструировании.
    pub fn new(
        kind: AccountKind,
        account_id: String,
        account_key: String,
        bank_id: String,
        branch_id: String,
        bank_account_kind: BankAccountKind,
    ) -> Self {
        let (bank_id, branch_id, bank_account_kind) = match kind {
            AccountKind::Bank => (bank_id, branch_id, bank_account_kind),
            _ => (String::new(), String::new(), BankAccountKind::NotApplicable),
        };
        Account {
            account_id,
            account_key,
            kind,
            bank_id,
            branch_id,
            bank_account_kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub ledger_amount: Decimal,
    pub ledger_date: NaiveDateTime,
    /// Если узла AVAILBAL во входе не было: 0 и сигнальная эпоха.
    pub available_amount: Decimal,
    pub available_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub posted: NaiveDateTime,
    pub user_date: NaiveDateTime,
    pub available_date: NaiveDateTime,
    pub amount: Decimal,
    /// FITID — ключ дедупликации на стороне потребителя.
    pub transaction_id: String,
    pub correct_transaction_id: Option<String>,
    pub correction: CorrectionAction,
    pub server_transaction_id: Option<String>,
    pub check_number: Option<String>,
    pub reference_number: Option<String>,
    pub sic: Option<String>,
    pub payee_id: Option<String>,
    pub name: Option<String>,
    pub memo: Option<String>,
    /// CURRENCY > ORIGCURRENCY > CURDEF документа.
    pub currency: String,
    /// Счёт контрагента для переводов (BANKACCTTO/CCACCTTO).
    pub counter_account: Option<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfxDocument {
    pub kind: AccountKind,
    pub currency: String,
    pub sign_on: SignOn,
    pub account: Account,
    pub balance: Balance,
    pub statement_start: NaiveDateTime,
    pub statement_end: NaiveDateTime,
    /// Порядок — как в документе, без пересортировки.
    pub transactions: Vec<Transaction>,
}
