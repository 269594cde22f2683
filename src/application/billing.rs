use log::{debug, warn};
use rust_decimal::Decimal;

use crate::domain::{
    imbalance, parse_amount, round_half_up_ceiling, BillingRow, DocumentHeader, InvoiceTotals,
    LedgerEntry, LineBuilder, TaxBreakdownRow,
};

use super::{ConvertError, ReferenceLookup};

/// An item of a multi-item invoice that had no row in the tax breakdown sheet
/// and therefore produced no income line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub document_number: String,
    pub document_key: String,
    pub item_code: String,
}

/// Ledger lines of one billing sheet.
#[derive(Debug, Clone)]
pub struct BillingBatch {
    pub entries: Vec<LedgerEntry>,
    pub skipped_items: Vec<SkippedItem>,
}

/// Turns electronic invoice rows into ledger lines.
pub struct BillingTransformer<'a, L: ReferenceLookup> {
    lookup: &'a L,
    builder: &'a LineBuilder<'a>,
}

impl<'a, L: ReferenceLookup> BillingTransformer<'a, L> {
    pub fn new(lookup: &'a L, builder: &'a LineBuilder<'a>) -> Self {
        Self { lookup, builder }
    }

    /// Convert invoice rows, using the tax breakdown rows to split multi-item
    /// invoices into one income line per item. Both inputs come without their
    /// header row.
    ///
    /// An unknown account or cost center aborts the run, naming the key.
    pub async fn transform_billing(
        &self,
        rows: &[Vec<String>],
        tax_breakdown_rows: &[Vec<String>],
    ) -> Result<BillingBatch, ConvertError> {
        let breakdown = tax_breakdown_rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| TaxBreakdownRow::from_cells(idx + 2, cells))
            .collect::<Result<Vec<_>, _>>()?;

        let mut batch = BillingBatch {
            entries: Vec::with_capacity(rows.len() * 3),
            skipped_items: Vec::new(),
        };

        for (idx, cells) in rows.iter().enumerate() {
            let row = BillingRow::from_cells(idx + 2, cells)?;
            let start = batch.entries.len();
            self.transform_invoice(&row, &breakdown, &mut batch).await?;
            check_balance(&row.number, &batch.entries[start..]);
        }

        debug!(
            "billing: {} rows -> {} entries, {} items skipped",
            rows.len(),
            batch.entries.len(),
            batch.skipped_items.len()
        );

        Ok(batch)
    }

    async fn transform_invoice(
        &self,
        row: &BillingRow,
        breakdown: &[TaxBreakdownRow],
        batch: &mut BillingBatch,
    ) -> Result<(), ConvertError> {
        let totals = InvoiceTotals {
            base: round_half_up_ceiling(parse_amount(&row.base)),
            tax: round_half_up_ceiling(parse_amount(&row.tax)),
            debit: round_half_up_ceiling(parse_amount(&row.debit)),
        };
        let separator = self.builder.profile().billing.item_separator;

        match row.split_items(separator) {
            None => {
                let item_code = row.item_codes.trim();
                let account = self.lookup.get_account(item_code).await?;
                let doc = self.document(row).await?;

                batch
                    .entries
                    .push(self.builder.invoice_credit(&doc, &account.code, totals.base));
                batch
                    .entries
                    .extend(self.builder.invoice_totals(&doc, &totals));
            }
            Some(items) => {
                let doc = self.document(row).await?;

                for item_code in items {
                    let matches: Vec<&TaxBreakdownRow> = breakdown
                        .iter()
                        .filter(|b| b.matches(&row.document_key, item_code))
                        .collect();

                    if matches.is_empty() {
                        warn!(
                            "invoice {}: item {} has no tax breakdown row for key {}; no income line written",
                            row.number, item_code, row.document_key
                        );
                        batch.skipped_items.push(SkippedItem {
                            document_number: row.number.clone(),
                            document_key: row.document_key.clone(),
                            item_code: item_code.to_string(),
                        });
                        continue;
                    }

                    let account = self.lookup.get_account(item_code).await?;
                    for item in matches {
                        let amount = round_half_up_ceiling(parse_amount(&item.amount));
                        batch
                            .entries
                            .push(self.builder.invoice_credit(&doc, &account.code, amount));
                    }
                }

                batch
                    .entries
                    .extend(self.builder.invoice_totals(&doc, &totals));
            }
        }

        Ok(())
    }

    async fn document(&self, row: &BillingRow) -> Result<DocumentHeader, ConvertError> {
        let cost_center = self.lookup.get_cost_center(&row.cost_center_name).await?;
        Ok(DocumentHeader {
            number: row.number.clone(),
            date: row.date.clone(),
            third_party_id: row.third_party_id.clone(),
            third_party_name: row.third_party_name.clone(),
            cost_center_code: cost_center.code,
            cost_center_name: row.cost_center_name.clone(),
        })
    }
}

/// Amounts are rounded one by one, so an invoice may be off by up to half a
/// unit per line. Anything beyond that is reported.
fn check_balance(number: &str, entries: &[LedgerEntry]) {
    let diff = imbalance(entries);
    let tolerance = Decimal::new(5, 1) * Decimal::from(entries.len());
    if diff.abs() > tolerance {
        warn!(
            "invoice {}: debits and credits differ by {} across {} lines",
            number,
            diff,
            entries.len()
        );
    }
}
