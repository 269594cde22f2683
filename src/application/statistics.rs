use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{BillingRunMarker, LedgerEntry, PaymentBuckets, PaymentRunMarker};

use super::ReferenceLookup;

/// Totals of a payment run broken down by the account receipts settled into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentSummary {
    #[serde(rename = "archivo")]
    pub file: String,
    /// Receipt numbers used by the run, `first-last`.
    #[serde(rename = "rango_rc")]
    pub range: String,
    pub bancolombia: i64,
    pub davivienda: i64,
    pub susuerte: i64,
    pub payu: i64,
    #[serde(rename = "efectivo")]
    pub cash: i64,
    pub total: i64,
}

impl PaymentSummary {
    pub fn from_entries(
        file: &str,
        entries: &[LedgerEntry],
        prior_consecutive: i64,
        final_consecutive: i64,
        buckets: &PaymentBuckets,
    ) -> Self {
        let mut summary = Self {
            file: file.to_string(),
            range: format!("{}-{}", prior_consecutive + 1, final_consecutive),
            ..Self::default()
        };

        for entry in entries {
            let debit = entry.debit.as_whole().unwrap_or_else(|| {
                warn!(
                    "receipt {}: debit {} is not a whole amount; left out of totals",
                    entry.number, entry.debit
                );
                0
            });
            summary.total += debit;

            let code = entry.account_code.as_str();
            if code == buckets.cash {
                summary.cash += debit;
            } else if code == buckets.bancolombia {
                summary.bancolombia += debit;
            } else if code == buckets.davivienda {
                summary.davivienda += debit;
            } else if code == buckets.susuerte {
                summary.susuerte += debit;
            } else if code == buckets.payu {
                summary.payu += debit;
            }
        }

        summary
    }

    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

/// Debit, credit and base totals of a billing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillingSummary {
    pub file: String,
    #[serde(rename = "debito", with = "rust_decimal::serde::float")]
    pub debit: Decimal,
    #[serde(rename = "credito", with = "rust_decimal::serde::float")]
    pub credit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base: Decimal,
    /// Invoice items written without an income line (see `SkippedItem`).
    #[serde(rename = "items_omitidos")]
    pub skipped_items: usize,
}

impl BillingSummary {
    pub fn from_entries(file: &str, entries: &[LedgerEntry], skipped_items: usize) -> Self {
        let mut summary = Self {
            file: file.to_string(),
            skipped_items,
            ..Self::default()
        };
        for entry in entries {
            summary.debit += entry.debit.value();
            summary.credit += entry.credit.value();
            summary.base += entry.base.value();
        }
        summary
    }

    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("Failed to serialize summary: {}", e);
        String::new()
    })
}

/// Summarizes a finished run and appends its marker to the run log.
/// A failed append is logged; the summary is returned either way.
pub struct StatisticsAggregator<'a, L: ReferenceLookup> {
    lookup: &'a L,
    source_file: String,
}

impl<'a, L: ReferenceLookup> StatisticsAggregator<'a, L> {
    pub fn new(lookup: &'a L, source_file: impl Into<String>) -> Self {
        Self {
            lookup,
            source_file: source_file.into(),
        }
    }

    pub async fn summarize_payments(
        &self,
        entries: &[LedgerEntry],
        prior_consecutive: i64,
        final_consecutive: i64,
        buckets: &PaymentBuckets,
    ) -> PaymentSummary {
        let summary = PaymentSummary::from_entries(
            &self.source_file,
            entries,
            prior_consecutive,
            final_consecutive,
            buckets,
        );

        let marker = PaymentRunMarker::new(final_consecutive, &self.source_file);
        if let Err(e) = self.lookup.save_payment(&marker).await {
            warn!("Failed to record payment run {}: {}", summary.range, e);
        }

        summary
    }

    pub async fn summarize_billing(
        &self,
        entries: &[LedgerEntry],
        skipped_items: usize,
    ) -> BillingSummary {
        let summary = BillingSummary::from_entries(&self.source_file, entries, skipped_items);

        let marker = BillingRunMarker::new(
            &self.source_file,
            summary.base,
            summary.debit,
            summary.credit,
        );
        if let Err(e) = self.lookup.save_billing(&marker).await {
            warn!("Failed to record billing run for {}: {}", self.source_file, e);
        }

        summary
    }
}
