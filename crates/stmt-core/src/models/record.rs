//! Transaction records and the intermediate line/block structures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tag assigned to one raw line within a transaction block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTag {
    /// Free-text transaction description.
    Description,
    /// An amount in the debit column.
    Debit,
    /// An amount in the credit column.
    Credit,
    /// A running-balance figure.
    Balance,
    /// Dropped: decorative rows, stray fragments.
    Noise,
}

/// One raw line with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub text: String,
    pub tag: LineTag,
    /// Parsed value for amount/balance lines. Balances are signed
    /// (DR negative); debit/credit magnitudes are unsigned.
    pub value: Option<Decimal>,
    /// True when the tag came from the positional filler-run heuristic
    /// or line position rather than an explicit sign or DR/CR suffix.
    /// Provisional tags may be flipped by balance arithmetic.
    pub provisional: bool,
}

impl ClassifiedLine {
    pub fn new(text: impl Into<String>, tag: LineTag) -> Self {
        Self {
            text: text.into(),
            tag,
            value: None,
            provisional: false,
        }
    }

    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = Some(value);
        self
    }

    pub fn provisional(mut self) -> Self {
        self.provisional = true;
        self
    }
}

/// Raw lines belonging to one transaction, collected between date tokens.
#[derive(Debug, Clone)]
pub struct TransactionBlock {
    /// The date token as it appeared in the document, e.g. "09 Dec".
    pub date_token: String,
    /// The resolved calendar date.
    pub date: NaiveDate,
    pub raw_lines: Vec<String>,
}

/// A normalized transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub account_id: String,
    pub description: String,
    /// Negative encodes a debit, positive a credit. None when the
    /// amount could not be resolved.
    pub amount: Option<Decimal>,
    /// Signed balance after this transaction; negative means
    /// overdrawn/owing. None when no balance figure was observed.
    pub balance: Option<Decimal>,
}
