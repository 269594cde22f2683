use std::fmt;
use std::str::FromStr;

use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// A monetary value as it appears on a ledger line.
///
/// Receipts carry whole numbers and are written as plain integers ("50000").
/// Invoices carry decimals written with six fractional digits ("50000.000000").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    Whole(i64),
    Fixed(Decimal),
}

impl Amount {
    pub const ZERO_WHOLE: Self = Amount::Whole(0);
    pub const ZERO_FIXED: Self = Amount::Fixed(Decimal::ZERO);

    /// Numeric value regardless of representation.
    pub fn value(&self) -> Decimal {
        match self {
            Amount::Whole(v) => Decimal::from(*v),
            Amount::Fixed(d) => *d,
        }
    }

    pub fn as_whole(&self) -> Option<i64> {
        match self {
            Amount::Whole(v) => Some(*v),
            Amount::Fixed(_) => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Whole(v) => write!(f, "{}", v),
            Amount::Fixed(d) => write!(f, "{:.6}", d),
        }
    }
}

/// Parse a spreadsheet cell into a decimal.
/// Surrounding whitespace is ignored; scientific notation ("1.5e3") is accepted.
pub fn try_parse_amount(text: &str) -> Result<Decimal, ParseFailure> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ParseFailure {
            input: text.to_string(),
        })
}

/// Best-effort parse: a malformed cell is logged and counts as zero.
pub fn parse_amount(text: &str) -> Decimal {
    match try_parse_amount(text) {
        Ok(amount) => amount,
        Err(failure) => {
            warn!("{}; using 0", failure);
            Decimal::ZERO
        }
    }
}

/// Round to a whole number, fractional parts of .5 and above going up.
/// Negative values round half away from zero, same as splitting the value into
/// integer and fraction and rounding on the fraction.
/// Example: 0.5 -> 1, 0.49 -> 0, 2.999 -> 3
pub fn round_half_up_ceiling(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round then narrow to an integer. Values beyond the i64 range collapse to zero
/// with a warning.
pub fn round_to_whole(amount: Decimal) -> i64 {
    let rounded = round_half_up_ceiling(amount);
    rounded.to_i64().unwrap_or_else(|| {
        warn!("amount {} does not fit a whole number; using 0", rounded);
        0
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub input: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount '{}'", self.input)
    }
}

impl std::error::Error for ParseFailure {}
