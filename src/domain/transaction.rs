//! Ledger entries and entry-time validation.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::core::time::Clock;
use crate::errors::LedgerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Direction of a ledger entry. The amount is always a magnitude.
pub enum TransactionType {
    Receipt,
    Expenditure,
}

impl TransactionType {
    /// Column heading used for the counterparty of this side of the ledger.
    pub fn party_label(self) -> &'static str {
        match self {
            TransactionType::Receipt => "Received From",
            TransactionType::Expenditure => "Paid To",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Receipt => "Receipt",
            TransactionType::Expenditure => "Expenditure",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "receipt" | "in" | "credit" => Ok(TransactionType::Receipt),
            "expenditure" | "expense" | "out" | "debit" => Ok(TransactionType::Expenditure),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown transaction type `{}` (use receipt or expenditure)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub party: String,
    #[serde(default, alias = "purpose")]
    pub particulars: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub labels: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub timestamp: i64,
}

impl Transaction {
    /// Builds a validated entry with a fresh id and the clock's creation timestamp.
    pub fn create(draft: TransactionDraft, clock: &dyn Clock) -> Result<Self, LedgerError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            date: draft.date,
            kind: draft.kind,
            party: draft.party.trim().to_string(),
            particulars: draft.particulars.trim().to_string(),
            labels: draft.labels.trim().to_string(),
            amount: draft.amount,
            timestamp: clock.timestamp_millis(),
        })
    }

    /// Produces the replacement for `self` from edited form values. Identity, type and
    /// creation timestamp are carried over.
    pub fn revise(&self, draft: TransactionDraft) -> Result<Self, LedgerError> {
        if draft.kind != self.kind {
            return Err(LedgerError::InvalidInput(format!(
                "transaction type is fixed at creation ({})",
                self.kind
            )));
        }
        draft.validate()?;
        Ok(Self {
            id: self.id.clone(),
            date: draft.date,
            kind: self.kind,
            party: draft.party.trim().to_string(),
            particulars: draft.particulars.trim().to_string(),
            labels: draft.labels.trim().to_string(),
            amount: draft.amount,
            timestamp: self.timestamp,
        })
    }

    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Amount as plain decimal text, without trailing zeros.
    pub fn amount_label(&self) -> String {
        self.amount.normalize().to_string()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id == id.trim()
    }

    /// Adds (receipt) or subtracts (expenditure) the amount from `balance`.
    pub fn apply_to(&self, balance: Decimal) -> Decimal {
        match self.kind {
            TransactionType::Receipt => balance + self.amount,
            TransactionType::Expenditure => balance - self.amount,
        }
    }

    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(idx, _)| idx)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

/// Raw form values for a new or edited entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub party: String,
    pub particulars: String,
    pub labels: String,
    pub amount: Decimal,
}

impl TransactionDraft {
    pub fn new(
        date: NaiveDate,
        kind: TransactionType,
        party: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            kind,
            party: party.into(),
            particulars: String::new(),
            labels: String::new(),
            amount,
        }
    }

    pub fn with_particulars(mut self, particulars: impl Into<String>) -> Self {
        self.particulars = particulars.into();
        self
    }

    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.labels = labels.into();
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.party.trim().is_empty() {
            return Err(LedgerError::InvalidInput(format!(
                "`{}` is required",
                self.kind.party_label()
            )));
        }
        validate_amount(self.amount)
    }
}

/// Amounts are positive magnitudes.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "amount must be greater than zero (got {})",
            amount
        )));
    }
    Ok(())
}

/// Parses a user-entered decimal such as `1250`, `1,250.50` or `99.9`.
pub fn parse_decimal(input: &str) -> Result<Decimal, LedgerError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && *ch != '_')
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| LedgerError::InvalidInput(format!("`{}` is not a valid amount", input)))
}

/// Parses and validates an entry amount.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let amount = parse_decimal(input)?;
    validate_amount(amount)?;
    Ok(amount)
}

pub fn parse_date(input: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::InvalidInput(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

/// Stored ids may be strings or numbers; both are kept as their string form.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value.trim().to_string(),
        RawId::Signed(value) => value.to_string(),
        RawId::Unsigned(value) => value.to_string(),
        RawId::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::FixedClock;
    use rust_decimal::prelude::FromPrimitive;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_assigns_identity_and_timestamp() {
        let clock = FixedClock::on(date(2024, 1, 5));
        let draft = TransactionDraft::new(
            date(2024, 1, 5),
            TransactionType::Receipt,
            "  Client A ",
            Decimal::from(100),
        )
        .with_particulars("Invoice 7");
        let txn = Transaction::create(draft, &clock).expect("valid draft");
        assert!(!txn.id.is_empty());
        assert_eq!(txn.party, "Client A");
        assert_eq!(txn.timestamp, clock.timestamp_millis());
    }

    #[test]
    fn create_rejects_non_positive_amounts() {
        let clock = FixedClock::on(date(2024, 1, 5));
        let draft = TransactionDraft::new(
            date(2024, 1, 5),
            TransactionType::Expenditure,
            "Vendor",
            Decimal::ZERO,
        );
        let err = Transaction::create(draft, &clock).expect_err("zero amount");
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn create_requires_party() {
        let clock = FixedClock::on(date(2024, 1, 5));
        let draft =
            TransactionDraft::new(date(2024, 1, 5), TransactionType::Expenditure, " ", Decimal::ONE);
        let err = Transaction::create(draft, &clock).expect_err("blank party");
        assert!(err.to_string().contains("Paid To"));
    }

    #[test]
    fn revise_keeps_identity_and_rejects_type_change() {
        let clock = FixedClock::on(date(2024, 1, 5));
        let original = Transaction::create(
            TransactionDraft::new(date(2024, 1, 5), TransactionType::Receipt, "A", Decimal::TEN),
            &clock,
        )
        .unwrap();

        let revised = original
            .revise(TransactionDraft::new(
                date(2024, 1, 6),
                TransactionType::Receipt,
                "B",
                Decimal::from(12),
            ))
            .expect("same type");
        assert_eq!(revised.id, original.id);
        assert_eq!(revised.timestamp, original.timestamp);
        assert_eq!(revised.party, "B");

        let err = original
            .revise(TransactionDraft::new(
                date(2024, 1, 6),
                TransactionType::Expenditure,
                "B",
                Decimal::from(12),
            ))
            .expect_err("type is immutable");
        assert!(err.to_string().contains("fixed"));
    }

    #[test]
    fn parses_amounts_with_grouping() {
        assert_eq!(
            parse_amount("1,250.50").unwrap(),
            Decimal::from_f64(1250.5).unwrap()
        );
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-5").is_err());
        assert_eq!(parse_decimal("-5").unwrap(), Decimal::from(-5));
    }

    #[test]
    fn deserializes_legacy_records() {
        let json = r#"{
            "id": 1700000000123,
            "date": "2024-01-05",
            "type": "EXPENDITURE",
            "party": "Shop",
            "purpose": "Groceries",
            "amount": 40.5,
            "timestamp": 1700000000123
        }"#;
        let txn: Transaction = serde_json::from_str(json).expect("legacy record");
        assert_eq!(txn.id, "1700000000123");
        assert!(txn.has_id("1700000000123"));
        assert_eq!(txn.particulars, "Groceries");
        assert_eq!(txn.kind, TransactionType::Expenditure);
        assert_eq!(txn.amount_label(), "40.5");
    }

    #[test]
    fn serializes_amount_as_number() {
        let clock = FixedClock::on(date(2024, 1, 5));
        let txn = Transaction::create(
            TransactionDraft::new(
                date(2024, 1, 5),
                TransactionType::Receipt,
                "A",
                Decimal::from(100),
            ),
            &clock,
        )
        .unwrap();
        let value = serde_json::to_value(&txn).unwrap();
        assert!(value["amount"].is_number());
        assert_eq!(value["type"], "RECEIPT");
        assert_eq!(value["date"], "2024-01-05");
    }

    #[test]
    fn type_parses_from_user_input() {
        assert_eq!(
            "Receipt".parse::<TransactionType>().unwrap(),
            TransactionType::Receipt
        );
        assert_eq!(
            "out".parse::<TransactionType>().unwrap(),
            TransactionType::Expenditure
        );
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
