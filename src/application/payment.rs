use log::debug;

use crate::domain::{
    parse_amount, round_to_whole, DocumentHeader, LedgerEntry, LineBuilder, PaymentRow,
};

use super::{ConvertError, ReferenceLookup};

/// Ledger lines of one payments sheet with the consecutive range they used.
#[derive(Debug, Clone)]
pub struct PaymentBatch {
    pub entries: Vec<LedgerEntry>,
    /// Last consecutive before this run.
    pub prior_consecutive: i64,
    /// Last consecutive assigned by this run (equal to the prior one when the
    /// sheet had no rows).
    pub final_consecutive: i64,
}

/// Turns payment rows into cash receipts, numbering them after the last
/// recorded payment run.
pub struct PaymentTransformer<'a, L: ReferenceLookup> {
    lookup: &'a L,
    builder: &'a LineBuilder<'a>,
}

impl<'a, L: ReferenceLookup> PaymentTransformer<'a, L> {
    pub fn new(lookup: &'a L, builder: &'a LineBuilder<'a>) -> Self {
        Self { lookup, builder }
    }

    /// Convert the data rows (header already removed) of a payments sheet.
    ///
    /// Each row yields two lines numbered `prior + i`: the clearing credit and
    /// the cashier debit. A row whose payment method has no cashier aborts the
    /// whole run; nothing is returned for the rows before it.
    pub async fn transform_payments(
        &self,
        rows: &[Vec<String>],
    ) -> Result<PaymentBatch, ConvertError> {
        let prior = self.lookup.get_last_payment().await?;
        let prior_consecutive = prior.consecutive;
        let profile = self.builder.profile();

        let mut entries = Vec::with_capacity(rows.len() * 2);
        let mut consecutive = prior_consecutive;

        for (idx, cells) in rows.iter().enumerate() {
            let row = PaymentRow::from_cells(idx + 2, cells)?;
            let cashier = self.lookup.get_cashier(&row.payment_method).await?;
            consecutive = prior_consecutive + idx as i64 + 1;

            let doc = DocumentHeader {
                number: consecutive.to_string(),
                date: row.date,
                third_party_id: row.third_party_id,
                third_party_name: row.third_party_name,
                cost_center_code: profile.payment.cost_center_code.clone(),
                cost_center_name: profile.payment.cost_center_name.clone(),
            };
            let amount = round_to_whole(parse_amount(&row.amount));

            entries.extend(self.builder.receipt(&doc, &cashier.account_code, amount));
        }

        debug!(
            "payments: {} rows -> {} entries, consecutive {}..={}",
            rows.len(),
            entries.len(),
            prior_consecutive + 1,
            consecutive
        );

        Ok(PaymentBatch {
            entries,
            prior_consecutive,
            final_consecutive: consecutive,
        })
    }
}
