use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type RunId = Uuid;

/// Canonical form of a lookup key: trimmed, transliterated to ASCII and
/// uppercased, so "Bogotá " and "BOGOTA" resolve to the same record.
pub fn normalize_key(key: &str) -> String {
    deunicode::deunicode(key.trim()).to_uppercase()
}

/// Maps a payment method (cashier code) to the ledger account it settles into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cashier {
    pub code: String,
    pub account_code: String,
}

/// A chart-of-accounts entry, reachable by its item key or by its own code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub key: String,
    pub code: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenter {
    pub name: String,
    pub code: String,
}

/// Append-only record of a payment run. The highest consecutive written so far
/// is where the next run resumes numbering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRunMarker {
    pub id: RunId,
    pub consecutive: i64,
    pub created_at: DateTime<Utc>,
    pub source_file: String,
}

impl PaymentRunMarker {
    pub fn new(consecutive: i64, source_file: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            consecutive,
            created_at: Utc::now(),
            source_file: source_file.into(),
        }
    }

    /// Marker used when no payment run has been recorded yet.
    pub fn initial() -> Self {
        Self::new(0, "")
    }
}

/// Append-only audit record of a billing run's totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRunMarker {
    pub id: RunId,
    pub source_file: String,
    pub base: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl BillingRunMarker {
    pub fn new(
        source_file: impl Into<String>,
        base: Decimal,
        debit: Decimal,
        credit: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_file: source_file.into(),
            base,
            debit,
            credit,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_strips_accents() {
        assert_eq!(normalize_key("BOGOTÁ"), "BOGOTA");
        assert_eq!(normalize_key("bogota"), "BOGOTA");
        assert_eq!(normalize_key("  Medellín "), "MEDELLIN");
        assert_eq!(normalize_key("Ñuñoa"), "NUNOA");
    }

    #[test]
    fn test_normalize_key_keeps_codes() {
        assert_eq!(normalize_key("A100"), "A100");
        assert_eq!(normalize_key(" a-200 "), "A-200");
    }

    #[test]
    fn test_initial_payment_marker() {
        let marker = PaymentRunMarker::initial();
        assert_eq!(marker.consecutive, 0);
        assert!(marker.source_file.is_empty());
    }
}
