use rust_decimal::Decimal;

use super::{Amount, EntryType, LedgerEntry, LedgerProfile};

/// Fields shared by every line of one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub number: String,
    pub date: String,
    pub third_party_id: String,
    pub third_party_name: String,
    pub cost_center_code: String,
    pub cost_center_name: String,
}

/// Row-level invoice totals, each already rounded on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub base: Decimal,
    pub tax: Decimal,
    pub debit: Decimal,
}

/// Assembles ledger lines from resolved values. Performs no lookups and no
/// rounding: callers pass account codes and amounts ready to be written.
#[derive(Debug, Clone)]
pub struct LineBuilder<'a> {
    profile: &'a LedgerProfile,
    generated_at: String,
}

impl<'a> LineBuilder<'a> {
    pub fn new(profile: &'a LedgerProfile, generated_at: impl Into<String>) -> Self {
        Self {
            profile,
            generated_at: generated_at.into(),
        }
    }

    pub fn profile(&self) -> &LedgerProfile {
        self.profile
    }

    /// The two lines of a cash receipt: the clearing account is credited first,
    /// then the cashier's account is debited for the same amount.
    pub fn receipt(
        &self,
        doc: &DocumentHeader,
        cashier_account: &str,
        amount: i64,
    ) -> [LedgerEntry; 2] {
        let memo = &self.profile.payment.memo;
        [
            self.line(
                EntryType::Receipt,
                doc,
                &self.profile.payment.clearing_account,
                memo,
                Amount::ZERO_WHOLE,
                Amount::Whole(amount),
                Amount::ZERO_WHOLE,
            ),
            self.line(
                EntryType::Receipt,
                doc,
                cashier_account,
                memo,
                Amount::Whole(amount),
                Amount::ZERO_WHOLE,
                Amount::ZERO_WHOLE,
            ),
        ]
    }

    /// Income line crediting an item's account.
    pub fn invoice_credit(
        &self,
        doc: &DocumentHeader,
        account_code: &str,
        amount: Decimal,
    ) -> LedgerEntry {
        self.line(
            EntryType::SalesInvoice,
            doc,
            account_code,
            &self.profile.billing.memo,
            Amount::ZERO_FIXED,
            Amount::Fixed(amount),
            Amount::ZERO_FIXED,
        )
    }

    /// Closing lines of an invoice: tax payable (carrying the taxable base),
    /// then the receivable debit for the invoice total.
    pub fn invoice_totals(
        &self,
        doc: &DocumentHeader,
        totals: &InvoiceTotals,
    ) -> [LedgerEntry; 2] {
        let billing = &self.profile.billing;
        [
            self.line(
                EntryType::SalesInvoice,
                doc,
                &billing.tax_payable_account,
                &billing.memo,
                Amount::ZERO_FIXED,
                Amount::Fixed(totals.tax),
                Amount::Fixed(totals.base),
            ),
            self.line(
                EntryType::SalesInvoice,
                doc,
                &billing.receivable_account,
                &billing.memo,
                Amount::Fixed(totals.debit),
                Amount::ZERO_FIXED,
                Amount::ZERO_FIXED,
            ),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn line(
        &self,
        entry_type: EntryType,
        doc: &DocumentHeader,
        account_code: &str,
        memo: &str,
        debit: Amount,
        credit: Amount,
        base: Amount,
    ) -> LedgerEntry {
        LedgerEntry {
            entry_type,
            prefix: self.profile.prefix.clone(),
            number: doc.number.clone(),
            date: doc.date.clone(),
            account_code: account_code.to_string(),
            third_party_id: doc.third_party_id.clone(),
            cost_center_code: doc.cost_center_code.clone(),
            memo: memo.to_string(),
            debit,
            credit,
            base,
            user: self.profile.user.clone(),
            third_party_name: doc.third_party_name.clone(),
            cost_center_name: doc.cost_center_name.clone(),
            generated_at: self.generated_at.clone(),
        }
    }
}

/// Difference between debits and credits over a set of lines.
pub fn imbalance(entries: &[LedgerEntry]) -> Decimal {
    entries
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc + e.debit.value() - e.credit.value())
}
