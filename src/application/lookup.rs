use async_trait::async_trait;

use crate::domain::{Account, BillingRunMarker, Cashier, CostCenter, PaymentRunMarker};
use crate::storage::Repository;

use super::ConvertError;

/// Reference data the transformers resolve row values against, plus the
/// append-only run log.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn get_cashier(&self, code: &str) -> Result<Cashier, ConvertError>;

    /// Resolve an account by item key (accent-insensitive) or by account code.
    async fn get_account(&self, key: &str) -> Result<Account, ConvertError>;

    /// Resolve a cost center by name (accent-insensitive).
    async fn get_cost_center(&self, name: &str) -> Result<CostCenter, ConvertError>;

    /// Latest payment run, or a zero marker when none has run yet.
    async fn get_last_payment(&self) -> Result<PaymentRunMarker, ConvertError>;

    async fn save_payment(&self, marker: &PaymentRunMarker) -> Result<(), ConvertError>;

    async fn save_billing(&self, marker: &BillingRunMarker) -> Result<(), ConvertError>;
}

#[async_trait]
impl ReferenceLookup for Repository {
    async fn get_cashier(&self, code: &str) -> Result<Cashier, ConvertError> {
        self.find_cashier(code)
            .await?
            .ok_or_else(|| ConvertError::CashierNotFound(code.to_string()))
    }

    async fn get_account(&self, key: &str) -> Result<Account, ConvertError> {
        self.find_account(key)
            .await?
            .ok_or_else(|| ConvertError::AccountNotFound(key.to_string()))
    }

    async fn get_cost_center(&self, name: &str) -> Result<CostCenter, ConvertError> {
        self.find_cost_center(name)
            .await?
            .ok_or_else(|| ConvertError::CostCenterNotFound(name.to_string()))
    }

    async fn get_last_payment(&self) -> Result<PaymentRunMarker, ConvertError> {
        Ok(self
            .last_payment_run()
            .await?
            .unwrap_or_else(PaymentRunMarker::initial))
    }

    async fn save_payment(&self, marker: &PaymentRunMarker) -> Result<(), ConvertError> {
        Ok(self.save_payment_run(marker).await?)
    }

    async fn save_billing(&self, marker: &BillingRunMarker) -> Result<(), ConvertError> {
        Ok(self.save_billing_run(marker).await?)
    }
}
