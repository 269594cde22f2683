// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use contable::application::ConversionService;
use contable::domain::{Account, Cashier, CostCenter, LedgerProfile};
use contable::storage::Repository;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(ConversionService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service =
        ConversionService::init(db_path.to_str().unwrap(), LedgerProfile::default()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a bare repository with a temporary database
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    Ok((repo, temp_dir))
}

/// Write a CSV file into the temp dir and return its path
pub fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Build a payments sheet row: columns 1, 2, 4, 5 and 9 are the ones read.
pub fn payment_row(
    third_party: &str,
    name: &str,
    date: &str,
    amount: &str,
    method: &str,
) -> Vec<String> {
    let mut row = vec![String::new(); 10];
    row[0] = "x".into();
    row[1] = third_party.into();
    row[2] = name.into();
    row[4] = date.into();
    row[5] = amount.into();
    row[9] = method.into();
    row
}

/// Invoice fields used to build a billing sheet row.
pub struct Invoice<'a> {
    pub key: &'a str,
    pub number: &'a str,
    pub base: &'a str,
    pub tax: &'a str,
    pub debit: &'a str,
    pub cost_center: &'a str,
    pub items: &'a str,
}

impl Invoice<'_> {
    pub fn row(&self) -> Vec<String> {
        let mut row = vec![String::new(); 22];
        row[0] = self.key.into();
        row[1] = "900123".into();
        row[2] = "ACME SAS".into();
        row[8] = self.number.into();
        row[9] = "2024-03-01".into();
        row[12] = self.base.into();
        row[13] = self.tax.into();
        row[14] = self.debit.into();
        row[17] = self.cost_center.into();
        row[21] = self.items.into();
        row
    }
}

pub fn breakdown_row(key: &str, item: &str, amount: &str) -> Vec<String> {
    vec![key.into(), item.into(), amount.into()]
}

/// Render rows as a CSV sheet with a header line
pub fn to_csv(rows: &[Vec<String>]) -> String {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
    let width = rows.iter().map(Vec::len).max().unwrap_or(1);
    let header: Vec<String> = (0..width).map(|i| format!("col{}", i)).collect();
    writer.write_record(&header).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}

/// Test fixture: reference data used across tests
pub struct StandardReference;

impl StandardReference {
    /// Cashiers for cash, two banks and two payment processors
    pub async fn create_cashiers(service: &ConversionService) -> Result<()> {
        for (code, account) in [
            ("EF", "11050501"),
            ("BC", "11200501"),
            ("DV", "11200510"),
            ("SS", "13452505"),
            ("PU", "13452501"),
        ] {
            service
                .add_cashier(Cashier {
                    code: code.into(),
                    account_code: account.into(),
                })
                .await?;
        }
        Ok(())
    }

    /// Item accounts and cost centers for billing
    pub async fn create_billing(service: &ConversionService) -> Result<()> {
        for (key, code) in [("A100", "41450501"), ("A200", "41450502"), ("A300", "41450503")] {
            service
                .add_account(Account {
                    key: key.into(),
                    code: code.into(),
                    name: None,
                })
                .await?;
        }
        service
            .add_cost_center(CostCenter {
                name: "BOGOTÁ".into(),
                code: "CC01".into(),
            })
            .await?;
        service
            .add_cost_center(CostCenter {
                name: "Medellín".into(),
                code: "CC02".into(),
            })
            .await?;
        Ok(())
    }
}
