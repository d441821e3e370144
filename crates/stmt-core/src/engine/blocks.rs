//! Bounded collection of the raw lines belonging to one transaction.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::ParseWarning;
use crate::models::record::TransactionBlock;

/// Accumulates the lines between one date token and the next. The
/// collection is bounded: a runaway block (a missed table end, a
/// degenerate extraction) is abandoned rather than swallowing the rest
/// of the document.
#[derive(Debug)]
pub struct BlockCollector {
    date_token: String,
    date: NaiveDate,
    lines: Vec<String>,
    limit: usize,
    overflowed: bool,
}

impl BlockCollector {
    pub fn new(date_token: impl Into<String>, date: NaiveDate, limit: usize) -> Self {
        Self {
            date_token: date_token.into(),
            date,
            lines: Vec::new(),
            limit,
            overflowed: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Add one raw line. Lines beyond the bound are counted but not
    /// stored.
    pub fn push(&mut self, line: &str) {
        if self.lines.len() >= self.limit {
            if !self.overflowed {
                warn!("block at {} exceeded {} lines", self.date, self.limit);
            }
            self.overflowed = true;
            return;
        }
        self.lines.push(line.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Close the block. An overflowed block yields a warning instead of
    /// a block.
    pub fn finish(self) -> Result<TransactionBlock, ParseWarning> {
        if self.overflowed {
            return Err(ParseWarning::BlockOverflow {
                date: self.date,
                lines: self.limit,
            });
        }
        Ok(TransactionBlock {
            date_token: self.date_token,
            date: self.date,
            raw_lines: self.lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 12, 9).unwrap()
    }

    #[test]
    fn test_collects_lines_in_order() {
        let mut collector = BlockCollector::new("09 Dec", date(), 400);
        collector.push("Direct Credit 123456");
        collector.push("104.99");
        let block = collector.finish().unwrap();
        assert_eq!(block.raw_lines, vec!["Direct Credit 123456", "104.99"]);
        assert_eq!(block.date_token, "09 Dec");
    }

    #[test]
    fn test_overflow_abandons_block() {
        let mut collector = BlockCollector::new("09 Dec", date(), 3);
        for i in 0..10 {
            collector.push(&format!("line {i}"));
        }
        let warning = collector.finish().unwrap_err();
        assert_eq!(warning, ParseWarning::BlockOverflow { date: date(), lines: 3 });
    }
}
