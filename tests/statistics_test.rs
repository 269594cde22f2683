mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::test_repository;
use contable::application::{ConvertError, ReferenceLookup, StatisticsAggregator};
use contable::domain::{
    Account, BillingRunMarker, Cashier, CostCenter, DocumentHeader, InvoiceTotals, LedgerEntry,
    LedgerProfile, LineBuilder, PaymentRunMarker,
};
use rust_decimal::Decimal;

fn doc(number: &str) -> DocumentHeader {
    DocumentHeader {
        number: number.into(),
        date: "2024-03-01".into(),
        third_party_id: "900123".into(),
        third_party_name: "ACME SAS".into(),
        cost_center_code: "C1".into(),
        cost_center_name: "CENTRO DE COSTOS GENERAL".into(),
    }
}

#[tokio::test]
async fn test_summaries_are_not_cumulative() -> Result<()> {
    let (repo, _temp) = test_repository().await?;
    let profile = LedgerProfile::default();
    let builder = LineBuilder::new(&profile, "01/03/2024 10:00");

    let first: Vec<LedgerEntry> = builder.receipt(&doc("1"), "11050501", 1000).into();
    let second: Vec<LedgerEntry> = builder.receipt(&doc("2"), "11200501", 400).into();

    let aggregator = StatisticsAggregator::new(&repo, "pagos.csv");
    let summary = aggregator
        .summarize_payments(&first, 0, 1, &profile.payment.buckets)
        .await;
    assert_eq!(summary.total, 1000);
    assert_eq!(summary.cash, 1000);

    let summary = aggregator
        .summarize_payments(&second, 1, 2, &profile.payment.buckets)
        .await;
    assert_eq!(summary.range, "2-2");
    assert_eq!(summary.total, 400);
    assert_eq!(summary.cash, 0);
    assert_eq!(summary.bancolombia, 400);

    let runs = repo.list_payment_runs().await?;
    assert_eq!(runs.len(), 2);
    assert_eq!(repo.get_last_payment().await?.consecutive, 2);

    Ok(())
}

#[tokio::test]
async fn test_billing_run_is_recorded() -> Result<()> {
    let (repo, _temp) = test_repository().await?;
    let profile = LedgerProfile::default();
    let builder = LineBuilder::new(&profile, "01/03/2024 10:00");
    let totals = InvoiceTotals {
        base: Decimal::from(2000),
        tax: Decimal::from(380),
        debit: Decimal::from(2380),
    };

    let mut entries = vec![builder.invoice_credit(&doc("F9"), "41450501", totals.base)];
    entries.extend(builder.invoice_totals(&doc("F9"), &totals));

    let summary = StatisticsAggregator::new(&repo, "facturas.csv")
        .summarize_billing(&entries, 0)
        .await;

    assert_eq!(summary.debit, Decimal::from(2380));
    assert_eq!(summary.credit, Decimal::from(2380));

    let runs = repo.list_billing_runs().await?;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source_file, "facturas.csv");
    assert_eq!(runs[0].base, Decimal::from(2000));
    assert_eq!(runs[0].debit, summary.debit);
    assert_eq!(runs[0].credit, summary.credit);

    Ok(())
}

/// Run log that refuses every write.
struct ReadOnlyLog;

#[async_trait]
impl ReferenceLookup for ReadOnlyLog {
    async fn get_cashier(&self, code: &str) -> Result<Cashier, ConvertError> {
        Err(ConvertError::CashierNotFound(code.to_string()))
    }

    async fn get_account(&self, key: &str) -> Result<Account, ConvertError> {
        Err(ConvertError::AccountNotFound(key.to_string()))
    }

    async fn get_cost_center(&self, name: &str) -> Result<CostCenter, ConvertError> {
        Err(ConvertError::CostCenterNotFound(name.to_string()))
    }

    async fn get_last_payment(&self) -> Result<PaymentRunMarker, ConvertError> {
        Ok(PaymentRunMarker::initial())
    }

    async fn save_payment(&self, _marker: &PaymentRunMarker) -> Result<(), ConvertError> {
        Err(ConvertError::Database(anyhow::anyhow!("read-only")))
    }

    async fn save_billing(&self, _marker: &BillingRunMarker) -> Result<(), ConvertError> {
        Err(ConvertError::Database(anyhow::anyhow!("read-only")))
    }
}

#[tokio::test]
async fn test_summary_survives_failed_record() {
    let profile = LedgerProfile::default();
    let builder = LineBuilder::new(&profile, "01/03/2024 10:00");
    let entries: Vec<LedgerEntry> = builder.receipt(&doc("1"), "13452505", 250).into();

    let summary = StatisticsAggregator::new(&ReadOnlyLog, "pagos.csv")
        .summarize_payments(&entries, 0, 1, &profile.payment.buckets)
        .await;

    assert_eq!(summary.susuerte, 250);
    assert_eq!(summary.total, 250);
    assert_eq!(summary.range, "1-1");
}
