use thiserror::Error;

use crate::domain::RowLayoutError;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Cashier not found: {0}")]
    CashierNotFound(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Cost center not found: {0}")]
    CostCenterNotFound(String),

    #[error("Cannot read {path}: {message}")]
    SourceRead { path: String, message: String },

    #[error("Malformed source row: {0}")]
    RowLayout(#[from] RowLayoutError),

    #[error("Cannot write export {path}: {message}")]
    Export { path: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl ConvertError {
    /// True for errors raised because a reference record is missing.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ConvertError::CashierNotFound(_)
                | ConvertError::AccountNotFound(_)
                | ConvertError::CostCenterNotFound(_)
        )
    }
}
