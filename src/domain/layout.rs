//! Column layouts of the source spreadsheets.
//!
//! The sheets are positional: fields are found by column index, not by header
//! name. Each layout names its columns and checks the row is wide enough
//! before reading any of them.

use std::fmt;

/// A row of the payments sheet (one receipt per row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRow {
    pub third_party_id: String,
    pub third_party_name: String,
    pub date: String,
    pub amount: String,
    pub payment_method: String,
}

impl PaymentRow {
    pub const THIRD_PARTY_ID: usize = 1;
    pub const THIRD_PARTY_NAME: usize = 2;
    pub const DATE: usize = 4;
    pub const AMOUNT: usize = 5;
    pub const PAYMENT_METHOD: usize = 9;
    pub const WIDTH: usize = 10;

    pub fn from_cells(line: usize, cells: &[String]) -> Result<Self, RowLayoutError> {
        check_width("payment", line, cells, Self::WIDTH)?;
        Ok(Self {
            third_party_id: cells[Self::THIRD_PARTY_ID].clone(),
            third_party_name: cells[Self::THIRD_PARTY_NAME].clone(),
            date: cells[Self::DATE].clone(),
            amount: cells[Self::AMOUNT].clone(),
            payment_method: cells[Self::PAYMENT_METHOD].trim().to_string(),
        })
    }
}

/// A row of the electronic invoices sheet (one invoice per row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingRow {
    /// Key joining the invoice to its rows in the tax breakdown sheet.
    pub document_key: String,
    pub third_party_id: String,
    pub third_party_name: String,
    pub number: String,
    pub date: String,
    pub base: String,
    pub tax: String,
    pub debit: String,
    pub cost_center_name: String,
    pub item_codes: String,
}

impl BillingRow {
    pub const DOCUMENT_KEY: usize = 0;
    pub const THIRD_PARTY_ID: usize = 1;
    pub const THIRD_PARTY_NAME: usize = 2;
    pub const NUMBER: usize = 8;
    pub const DATE: usize = 9;
    pub const BASE: usize = 12;
    pub const TAX: usize = 13;
    pub const DEBIT: usize = 14;
    pub const COST_CENTER_NAME: usize = 17;
    pub const ITEM_CODES: usize = 21;
    pub const WIDTH: usize = 22;

    pub fn from_cells(line: usize, cells: &[String]) -> Result<Self, RowLayoutError> {
        check_width("billing", line, cells, Self::WIDTH)?;
        Ok(Self {
            document_key: cells[Self::DOCUMENT_KEY].clone(),
            third_party_id: cells[Self::THIRD_PARTY_ID].clone(),
            third_party_name: cells[Self::THIRD_PARTY_NAME].clone(),
            number: cells[Self::NUMBER].clone(),
            date: cells[Self::DATE].clone(),
            base: cells[Self::BASE].clone(),
            tax: cells[Self::TAX].clone(),
            debit: cells[Self::DEBIT].clone(),
            cost_center_name: cells[Self::COST_CENTER_NAME].clone(),
            item_codes: cells[Self::ITEM_CODES].clone(),
        })
    }

    /// Item codes of a multi-item invoice, or `None` when the column holds a
    /// single code.
    pub fn split_items(&self, separator: char) -> Option<Vec<&str>> {
        if !self.item_codes.contains(separator) {
            return None;
        }
        Some(self.item_codes.split(separator).map(str::trim).collect())
    }
}

/// A row of the tax breakdown sheet: the base amount of one item of one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdownRow {
    pub document_key: String,
    pub item_code: String,
    pub amount: String,
}

impl TaxBreakdownRow {
    pub const DOCUMENT_KEY: usize = 0;
    pub const ITEM_CODE: usize = 1;
    pub const AMOUNT: usize = 2;
    pub const WIDTH: usize = 3;

    pub fn from_cells(line: usize, cells: &[String]) -> Result<Self, RowLayoutError> {
        check_width("tax breakdown", line, cells, Self::WIDTH)?;
        Ok(Self {
            document_key: cells[Self::DOCUMENT_KEY].clone(),
            item_code: cells[Self::ITEM_CODE].clone(),
            amount: cells[Self::AMOUNT].clone(),
        })
    }

    pub fn matches(&self, document_key: &str, item_code: &str) -> bool {
        self.item_code == item_code && self.document_key == document_key
    }
}

fn check_width(
    layout: &'static str,
    line: usize,
    cells: &[String],
    width: usize,
) -> Result<(), RowLayoutError> {
    if cells.len() < width {
        return Err(RowLayoutError {
            layout,
            line,
            expected: width,
            found: cells.len(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayoutError {
    pub layout: &'static str,
    /// 1-based line in the source file, header included.
    pub line: usize,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for RowLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row at line {} has {} columns, expected at least {}",
            self.layout, self.line, self.found, self.expected
        )
    }
}

impl std::error::Error for RowLayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[(usize, &str)], width: usize) -> Vec<String> {
        let mut row = vec![String::new(); width];
        for (idx, value) in values {
            row[*idx] = value.to_string();
        }
        row
    }

    #[test]
    fn test_payment_row_positions() {
        let row = cells(
            &[(1, "900123"), (2, "ACME SAS"), (4, "2024-03-01"), (5, "50000"), (9, " EF01 ")],
            10,
        );
        let parsed = PaymentRow::from_cells(2, &row).unwrap();

        assert_eq!(parsed.third_party_id, "900123");
        assert_eq!(parsed.third_party_name, "ACME SAS");
        assert_eq!(parsed.date, "2024-03-01");
        assert_eq!(parsed.amount, "50000");
        assert_eq!(parsed.payment_method, "EF01");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let row = cells(&[(1, "900123")], 6);
        let err = PaymentRow::from_cells(7, &row).unwrap_err();

        assert_eq!(err.line, 7);
        assert_eq!(err.expected, 10);
        assert_eq!(err.found, 6);
        assert_eq!(
            err.to_string(),
            "payment row at line 7 has 6 columns, expected at least 10"
        );
    }

    #[test]
    fn test_billing_row_split_items() {
        let single = BillingRow::from_cells(2, &cells(&[(21, "A100")], 22)).unwrap();
        assert_eq!(single.split_items(','), None);

        let multi = BillingRow::from_cells(3, &cells(&[(21, "A100, A200")], 22)).unwrap();
        assert_eq!(multi.split_items(','), Some(vec!["A100", "A200"]));
    }

    #[test]
    fn test_tax_breakdown_match_needs_both_keys() {
        let row = TaxBreakdownRow::from_cells(2, &cells(&[(0, "F-1"), (1, "A100"), (2, "10")], 3))
            .unwrap();

        assert!(row.matches("F-1", "A100"));
        assert!(!row.matches("F-2", "A100"));
        assert!(!row.matches("F-1", "A200"));
    }
}
