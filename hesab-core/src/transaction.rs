//! Transaction payloads sent to the backend.
//!
//! The date triple (`transactionDate`, `userDate`, `userTime`) is always
//! derived from one [`ParsedDateTime`], so it is consistent by construction.
//! [`TransactionPayload::validate`] re-checks it for payloads that were
//! assembled or edited elsewhere.

use chrono::{DateTime, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::{ParsedDateTime, USER_DATE_FORMAT, USER_TIME_FORMAT};
use crate::types::HesabError;

/// Expense and income share a base record; only these fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Expense {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },
    Income {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
}

impl TransactionKind {
    pub fn expense() -> Self {
        TransactionKind::Expense { location: None }
    }

    pub fn income() -> Self {
        TransactionKind::Income { source: None }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense { .. } => "expense",
            TransactionKind::Income { .. } => "income",
        }
    }

    /// Where an expense happened or where income came from.
    pub fn origin(&self) -> Option<&str> {
        match self {
            TransactionKind::Expense { location } => location.as_deref(),
            TransactionKind::Income { source } => source.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub amount: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 UTC instant.
    pub transaction_date: String,
    /// `YYYY-MM-DD`, Gregorian.
    pub user_date: String,
    /// `HH:MM:SS`, 24-hour.
    pub user_time: String,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl TransactionPayload {
    pub fn new(kind: TransactionKind, amount: Decimal, currency: impl Into<String>, stamp: &ParsedDateTime) -> Self {
        Self {
            amount,
            currency: currency.into(),
            category_id: None,
            description: None,
            transaction_date: stamp.transaction_date(),
            user_date: stamp.user_date.clone(),
            user_time: stamp.user_time.clone(),
            kind,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the amount and that the date triple names the same wall-clock
    /// moment in Gregorian form with Latin digits.
    pub fn validate(&self) -> Result<(), HesabError> {
        if self.amount <= Decimal::ZERO {
            return Err(HesabError::invalid_input("amount", "must be positive"));
        }
        if self.currency.trim().is_empty() {
            return Err(HesabError::invalid_input("currency", "is required"));
        }

        for (field, value) in [
            ("transactionDate", &self.transaction_date),
            ("userDate", &self.user_date),
            ("userTime", &self.user_time),
        ] {
            if !value.is_ascii() {
                return Err(HesabError::invalid_input(field, "must use Latin digits"));
            }
        }

        let instant = DateTime::parse_from_rfc3339(&self.transaction_date)
            .map_err(|e| HesabError::invalid_input("transactionDate", e.to_string()))?;
        if instant.offset().local_minus_utc() != 0 {
            return Err(HesabError::invalid_input("transactionDate", "must be UTC"));
        }
        let date = NaiveDate::parse_from_str(&self.user_date, USER_DATE_FORMAT)
            .map_err(|e| HesabError::invalid_input("userDate", e.to_string()))?;
        let time = NaiveTime::parse_from_str(&self.user_time, USER_TIME_FORMAT)
            .map_err(|e| HesabError::invalid_input("userTime", e.to_string()))?;

        let wall_clock = instant.naive_utc();
        if wall_clock.date() != date || wall_clock.time().format(USER_TIME_FORMAT).to_string() != self.user_time {
            return Err(HesabError::invalid_input(
                "transactionDate",
                format!("does not match userDate {date} and userTime {time}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::parse_from_input;
    use crate::types::DateSystem;
    use rust_decimal_macros::dec;

    fn stamp() -> ParsedDateTime {
        parse_from_input("۱۴۰۳/۱۰/۰۸T۱۴:۳۰", DateSystem::Persian).unwrap()
    }

    #[test]
    fn test_expense_payload_wire_shape() {
        let payload = TransactionPayload::new(
            TransactionKind::Expense { location: Some("Tehran".to_string()) },
            dec!(250000),
            "IRR",
            &stamp(),
        )
        .with_category("groceries");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["location"], "Tehran");
        assert_eq!(json["categoryId"], "groceries");
        assert_eq!(json["transactionDate"], "2024-12-28T14:30:00.000Z");
        assert_eq!(json["userDate"], "2024-12-28");
        assert_eq!(json["userTime"], "14:30:00");
        assert!(json.get("source").is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_income_payload_round_trip() {
        let payload = TransactionPayload::new(
            TransactionKind::Income { source: Some("Salary".to_string()) },
            dec!(1200.50),
            "USD",
            &stamp(),
        );
        let json = serde_json::to_string(&payload).unwrap();
        let back: TransactionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.kind.label(), "income");
        assert_eq!(back.kind.origin(), Some("Salary"));
    }

    #[test]
    fn test_validate_rejects_inconsistent_triple() {
        let mut payload = TransactionPayload::new(TransactionKind::expense(), dec!(10), "USD", &stamp());
        payload.user_time = "14:31:00".to_string();
        assert!(matches!(payload.validate(), Err(HesabError::InvalidInput { .. })));

        let mut payload = TransactionPayload::new(TransactionKind::expense(), dec!(10), "USD", &stamp());
        payload.user_date = "۲۰۲۴-۱۲-۲۸".to_string();
        assert!(payload.validate().is_err());

        let mut payload = TransactionPayload::new(TransactionKind::expense(), dec!(10), "USD", &stamp());
        payload.transaction_date = "2024-12-28T14:30:00+03:30".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let payload = TransactionPayload::new(TransactionKind::income(), dec!(0), "USD", &stamp());
        assert!(matches!(payload.validate(), Err(HesabError::InvalidInput { field, .. }) if field == "amount"));
    }
}
