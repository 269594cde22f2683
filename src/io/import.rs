use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::{ConversionService, ConvertError};
use crate::domain::{Account, Cashier, CostCenter};

/// Read every data row of a CSV sheet. The first line is the header and is
/// skipped; rows may differ in width (layouts check the columns they need).
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let line = line_num + 2; // +2 for header and 0-indexing
        let record = result.with_context(|| format!("CSV parse error at line {}", line))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Open and read a sheet from disk. Any failure is reported as a source read
/// error naming the file; no row of a broken file is handed on.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<Vec<String>>, ConvertError> {
    let source_error = |e: anyhow::Error| ConvertError::SourceRead {
        path: path.display().to_string(),
        message: format!("{:#}", e),
    };

    let file = File::open(path)
        .context("Failed to open file")
        .map_err(source_error)?;
    read_rows(file).map_err(source_error)
}

/// Kind of reference data a CSV file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `code,account_code`
    Cashiers,
    /// `key,code[,name]`
    Accounts,
    /// `name,code`
    CostCenters,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Cashiers => "cashiers",
            ReferenceKind::Accounts => "accounts",
            ReferenceKind::CostCenters => "cost-centers",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cashiers" => Some(ReferenceKind::Cashiers),
            "accounts" => Some(ReferenceKind::Accounts),
            "cost-centers" | "cost_centers" => Some(ReferenceKind::CostCenters),
            _ => None,
        }
    }
}

/// Every reference file has at least two columns.
const REFERENCE_WIDTH: usize = 2;

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

/// Loads reference data from CSV. A bad line is reported and skipped; the
/// remaining lines are still imported.
pub struct Importer<'a> {
    service: &'a ConversionService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a ConversionService) -> Self {
        Self { service }
    }

    pub async fn import_reference_csv<R: Read>(
        &self,
        kind: ReferenceKind,
        reader: R,
    ) -> Result<ImportResult> {
        let rows = read_rows(reader)?;
        let mut imported = 0;
        let mut errors = Vec::new();

        for (idx, cells) in rows.iter().enumerate() {
            let line = idx + 2;
            if cells.len() < REFERENCE_WIDTH {
                errors.push(ImportError {
                    line,
                    error: format!(
                        "expected at least {} columns, found {}",
                        REFERENCE_WIDTH,
                        cells.len()
                    ),
                });
                continue;
            }

            let result = match kind {
                ReferenceKind::Cashiers => {
                    self.service
                        .add_cashier(Cashier {
                            code: cells[0].clone(),
                            account_code: cells[1].clone(),
                        })
                        .await
                }
                ReferenceKind::Accounts => {
                    self.service
                        .add_account(Account {
                            key: cells[0].clone(),
                            code: cells[1].clone(),
                            name: cells.get(2).filter(|s| !s.is_empty()).cloned(),
                        })
                        .await
                }
                ReferenceKind::CostCenters => {
                    self.service
                        .add_cost_center(CostCenter {
                            name: cells[0].clone(),
                            code: cells[1].clone(),
                        })
                        .await
                }
            };

            match result {
                Ok(()) => imported += 1,
                Err(e) => errors.push(ImportError {
                    line,
                    error: format!("{:#}", e),
                }),
            }
        }

        Ok(ImportResult { imported, errors })
    }
}
