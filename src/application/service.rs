use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use crate::domain::{
    Account, BillingRunMarker, Cashier, CostCenter, LedgerEntry, LedgerProfile, LineBuilder,
    PaymentRunMarker,
};
use crate::io::{export_entries, read_rows_from_path};
use crate::storage::{ReferenceStats, Repository};

use super::{
    BillingSummary, BillingTransformer, ConvertError, PaymentSummary, PaymentTransformer,
    StatisticsAggregator,
};

/// Format of the `generated_at` stamp on every ledger line.
pub const GENERATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Outcome of one conversion run.
#[derive(Debug, Clone)]
pub struct RunReport<S> {
    pub output: PathBuf,
    pub entries_written: usize,
    pub summary: S,
}

pub type PaymentReport = RunReport<PaymentSummary>;
pub type BillingReport = RunReport<BillingSummary>;

/// Application service converting source sheets into the ledger export.
/// This is the primary interface for any client (CLI, tests, ...).
///
/// Runs are meant to happen one at a time: a payment run reads the last
/// consecutive and only records the new one once it finishes.
pub struct ConversionService {
    repo: Repository,
    profile: LedgerProfile,
}

impl ConversionService {
    /// Create a new service with the given repository and profile.
    pub fn new(repo: Repository, profile: LedgerProfile) -> Self {
        Self { repo, profile }
    }

    /// Create (if needed) and migrate the database at the given path.
    pub async fn init(database_path: &str, profile: LedgerProfile) -> Result<Self, ConvertError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo, profile))
    }

    /// Connect to an existing database.
    pub async fn connect(
        database_path: &str,
        profile: LedgerProfile,
    ) -> Result<Self, ConvertError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, profile))
    }

    pub fn profile(&self) -> &LedgerProfile {
        &self.profile
    }

    // ========================
    // Reference data
    // ========================

    pub async fn add_cashier(&self, cashier: Cashier) -> Result<(), ConvertError> {
        Ok(self.repo.save_cashier(&cashier).await?)
    }

    pub async fn add_account(&self, account: Account) -> Result<(), ConvertError> {
        Ok(self.repo.save_account(&account).await?)
    }

    pub async fn add_cost_center(&self, cost_center: CostCenter) -> Result<(), ConvertError> {
        Ok(self.repo.save_cost_center(&cost_center).await?)
    }

    pub async fn reference_stats(&self) -> Result<ReferenceStats, ConvertError> {
        Ok(self.repo.reference_stats().await?)
    }

    pub async fn list_payment_runs(&self) -> Result<Vec<PaymentRunMarker>, ConvertError> {
        Ok(self.repo.list_payment_runs().await?)
    }

    pub async fn list_billing_runs(&self) -> Result<Vec<BillingRunMarker>, ConvertError> {
        Ok(self.repo.list_billing_runs().await?)
    }

    // ========================
    // Conversions
    // ========================

    /// Convert a payments sheet into receipts, write the export and record the run.
    /// Nothing is written or recorded when the conversion fails.
    pub async fn convert_payments(
        &self,
        source: &Path,
        output: &Path,
    ) -> Result<PaymentReport, ConvertError> {
        let rows = read_rows_from_path(source)?;
        let builder = LineBuilder::new(&self.profile, generated_at());

        let batch = PaymentTransformer::new(&self.repo, &builder)
            .transform_payments(&rows)
            .await?;

        let entries_written = write_export(&batch.entries, output)?;

        let summary = StatisticsAggregator::new(&self.repo, source.display().to_string())
            .summarize_payments(
                &batch.entries,
                batch.prior_consecutive,
                batch.final_consecutive,
                &self.profile.payment.buckets,
            )
            .await;

        info!(
            "Payments {} -> {} ({} entries, receipts {})",
            source.display(),
            output.display(),
            entries_written,
            summary.range
        );

        Ok(RunReport {
            output: output.to_path_buf(),
            entries_written,
            summary,
        })
    }

    /// Convert an invoices sheet (with its tax breakdown sheet), write the
    /// export and record the run totals.
    pub async fn convert_billing(
        &self,
        source: &Path,
        tax_breakdown: &Path,
        output: &Path,
    ) -> Result<BillingReport, ConvertError> {
        let rows = read_rows_from_path(source)?;
        let breakdown_rows = read_rows_from_path(tax_breakdown)?;
        let builder = LineBuilder::new(&self.profile, generated_at());

        let batch = BillingTransformer::new(&self.repo, &builder)
            .transform_billing(&rows, &breakdown_rows)
            .await?;

        let entries_written = write_export(&batch.entries, output)?;

        let summary = StatisticsAggregator::new(&self.repo, source.display().to_string())
            .summarize_billing(&batch.entries, batch.skipped_items.len())
            .await;

        info!(
            "Billing {} -> {} ({} entries, {} items skipped)",
            source.display(),
            output.display(),
            entries_written,
            summary.skipped_items
        );

        Ok(RunReport {
            output: output.to_path_buf(),
            entries_written,
            summary,
        })
    }
}

fn generated_at() -> String {
    Local::now().format(GENERATED_AT_FORMAT).to_string()
}

fn write_export(entries: &[LedgerEntry], output: &Path) -> Result<usize, ConvertError> {
    let export_error = |message: String| ConvertError::Export {
        path: output.display().to_string(),
        message,
    };

    let file = File::create(output).map_err(|e| export_error(e.to_string()))?;
    export_entries(entries, BufWriter::new(file)).map_err(|e| export_error(format!("{:#}", e)))
}
