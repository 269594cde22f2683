use serde::{Deserialize, Serialize};

/// Fixed values stamped onto ledger lines: account roles, memo texts, user.
///
/// `Default` holds the chart of accounts the export was built for. A JSON file
/// can override any subset of fields (missing fields keep their defaults).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerProfile {
    pub prefix: String,
    pub user: String,
    pub payment: PaymentProfile,
    pub billing: BillingProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentProfile {
    pub memo: String,
    /// Account credited by every receipt before it settles into a cashier.
    pub clearing_account: String,
    pub cost_center_code: String,
    pub cost_center_name: String,
    pub buckets: PaymentBuckets,
}

/// Account codes the payment summary breaks totals down by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentBuckets {
    pub cash: String,
    pub bancolombia: String,
    pub davivienda: String,
    pub susuerte: String,
    pub payu: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingProfile {
    pub memo: String,
    pub tax_payable_account: String,
    pub receivable_account: String,
    /// Separator between item codes of a multi-item invoice.
    pub item_separator: char,
}

impl Default for LedgerProfile {
    fn default() -> Self {
        Self {
            prefix: "_".to_string(),
            user: "SUPERVISOR".to_string(),
            payment: PaymentProfile::default(),
            billing: BillingProfile::default(),
        }
    }
}

impl Default for PaymentProfile {
    fn default() -> Self {
        Self {
            memo: "RECAUDO POR VENTA SERVICIOS".to_string(),
            clearing_account: "13050501".to_string(),
            cost_center_code: "C1".to_string(),
            cost_center_name: "CENTRO DE COSTOS GENERAL".to_string(),
            buckets: PaymentBuckets::default(),
        }
    }
}

impl Default for PaymentBuckets {
    fn default() -> Self {
        Self {
            cash: "11050501".to_string(),
            bancolombia: "11200501".to_string(),
            davivienda: "11200510".to_string(),
            susuerte: "13452505".to_string(),
            payu: "13452501".to_string(),
        }
    }
}

impl Default for BillingProfile {
    fn default() -> Self {
        Self {
            memo: "FACTURA ELECTRÓNICA DE VENTA".to_string(),
            tax_payable_account: "24080505".to_string(),
            receivable_account: "13050501".to_string(),
            item_separator: ',',
        }
    }
}
