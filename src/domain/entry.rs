use super::Amount;

/// Document type of a ledger line, fixed per source spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Cash receipt ("recibo de caja") built from the payments sheet.
    Receipt,
    /// Electronic sales invoice built from the billing sheet.
    SalesInvoice,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Receipt => "RC",
            EntryType::SalesInvoice => "FVE",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the ledger export. Every line of a source transaction shares
/// `number`; across those lines debits and credits balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub entry_type: EntryType,
    pub prefix: String,
    pub number: String,
    /// Copied verbatim from the source row.
    pub date: String,
    pub account_code: String,
    pub third_party_id: String,
    pub cost_center_code: String,
    pub memo: String,
    pub debit: Amount,
    pub credit: Amount,
    pub base: Amount,
    pub user: String,
    pub third_party_name: String,
    pub cost_center_name: String,
    /// `DD/MM/YYYY HH:MM`
    pub generated_at: String,
}

impl LedgerEntry {
    /// Field values in export column order.
    pub fn to_record(&self) -> [String; 14] {
        [
            self.entry_type.as_str().to_string(),
            self.prefix.clone(),
            self.number.clone(),
            self.date.clone(),
            self.account_code.clone(),
            self.third_party_id.clone(),
            self.cost_center_code.clone(),
            self.memo.clone(),
            self.debit.to_string(),
            self.credit.to_string(),
            self.base.to_string(),
            self.user.clone(),
            self.third_party_name.clone(),
            self.cost_center_name.clone(),
        ]
    }
}
