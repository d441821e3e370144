//! Per-document statement context.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{DocumentError, ParseWarning};
use crate::models::profile::InstitutionProfile;
use crate::money::parse_signed_balance;
use crate::patterns::{
    ACCOUNT_NUMBER_AFTER_LABEL, ACCOUNT_NUMBER_BARE, AMOUNT_ANYWHERE, CARD_NUMBER, MULTI_SPACE,
    PERIOD_RANGE,
};
use crate::source::StatementDocument;

/// Mutable per-document state: created once from the header metadata,
/// threaded through the engine, discarded when the document is done.
#[derive(Debug, Clone)]
pub struct StatementContext {
    pub account_id: String,
    pub statement_start_year: i32,
    pub opening_balance: Option<Decimal>,
    pub closing_balance: Option<Decimal>,
    /// Balance after the most recently emitted record, or the latest
    /// carried-forward anchor. None until a figure is observed.
    pub running_balance: Option<Decimal>,
}

impl StatementContext {
    /// Build the context by scanning the first statement page for the
    /// account number, the statement period (which fixes the start
    /// year), and an opening balance when one is declared up front.
    ///
    /// A missing period is fatal; a missing account number only warns.
    pub fn from_document(
        doc: &StatementDocument,
        profile: &InstitutionProfile,
        warnings: &mut Vec<ParseWarning>,
    ) -> Result<Self, DocumentError> {
        if doc.is_empty() {
            return Err(DocumentError::NoPages);
        }

        let page_idx = first_statement_page(doc, profile)
            .ok_or_else(|| DocumentError::WrongStatementType(profile.name.clone()))?;
        let lines = doc.page(page_idx).unwrap_or(&[]);

        let account_id = find_account_number(lines, profile);
        if account_id.is_empty() {
            warnings.push(ParseWarning::AccountNumberMissing);
        } else {
            debug!("account number: {account_id}");
        }

        let statement_start_year = find_period_year(lines).ok_or(DocumentError::PeriodNotFound)?;
        debug!("statement start year: {statement_start_year}");

        let opening_balance = find_opening_balance(lines);
        if let Some(opening) = opening_balance {
            debug!("opening balance: {opening}");
        }

        Ok(Self {
            account_id,
            statement_start_year,
            opening_balance,
            closing_balance: None,
            running_balance: opening_balance,
        })
    }

    /// Apply a resolved record: advance the running balance, preferring
    /// the stated post-transaction balance over arithmetic.
    pub fn apply(&mut self, amount: Option<Decimal>, balance: Option<Decimal>) {
        match (balance, amount, self.running_balance) {
            (Some(stated), _, _) => self.running_balance = Some(stated),
            (None, Some(amt), Some(running)) => self.running_balance = Some(running + amt),
            _ => {}
        }
    }

    /// Compare the final running balance against the declared closing
    /// balance. A mismatch is a warning, never fatal.
    pub fn verify_closing(&self, warnings: &mut Vec<ParseWarning>) {
        if let (Some(running), Some(declared)) = (self.running_balance, self.closing_balance) {
            if (running - declared).abs() > Decimal::new(1, 2) {
                warn!("closing balance mismatch: running {running}, declared {declared}");
                warnings.push(ParseWarning::ClosingBalanceMismatch { running, declared });
            }
        }
    }
}

/// Index of the first page that is a statement page (not a notice page).
pub fn first_statement_page(
    doc: &StatementDocument,
    profile: &InstitutionProfile,
) -> Option<usize> {
    (0..doc.page_count()).find(|&i| {
        let text = doc.page_text_lower(i);
        !profile.is_notice_page(&text) && profile.is_statement_page(&text)
    })
}

fn find_account_number(lines: &[String], profile: &InstitutionProfile) -> String {
    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        for label in &profile.account_labels {
            let Some(pos) = lower.find(label.as_str()) else {
                continue;
            };
            // Digits are unchanged by lowercasing, so the capture can
            // come straight from the lowered line
            if let Some(caps) = ACCOUNT_NUMBER_AFTER_LABEL.captures(&lower[pos + label.len()..]) {
                return MULTI_SPACE.replace_all(caps[1].trim(), " ").to_string();
            }
            // Label alone on its line; the number follows on the next
            if let Some(next) = lines.get(i + 1) {
                if ACCOUNT_NUMBER_BARE.is_match(next.trim()) {
                    return MULTI_SPACE.replace_all(next.trim(), " ").to_string();
                }
            }
        }
    }
    // No labelled id anywhere: accept a bare card number
    for line in lines {
        if let Some(caps) = CARD_NUMBER.captures(line) {
            let normalized = caps[1].replace('-', " ");
            return MULTI_SPACE.replace_all(&normalized, " ").to_string();
        }
    }
    String::new()
}

fn find_period_year(lines: &[String]) -> Option<i32> {
    lines
        .iter()
        .find_map(|line| PERIOD_RANGE.captures(line))
        .and_then(|caps| caps[2].parse().ok())
}

fn find_opening_balance(lines: &[String]) -> Option<Decimal> {
    for (i, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains("opening balance") {
            continue;
        }
        // Figure on the same line, else on the following line
        for candidate in [Some(line), lines.get(i + 1)].into_iter().flatten() {
            if let Some(m) = AMOUNT_ANYWHERE.find(candidate) {
                let tail = &candidate[m.start()..];
                if let Some(balance) = parse_signed_balance(tail) {
                    return Some(balance);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn doc(lines: &[&str]) -> StatementDocument {
        StatementDocument::new(vec![lines.iter().map(|s| s.to_string()).collect()])
    }

    #[test]
    fn test_context_from_first_page() {
        let doc = doc(&[
            "Smart Access",
            "Account number: 06 2799 12930092",
            "Statement period",
            "24 Aug 2020 - 31 Dec 2020",
            "Opening balance",
            "$11,989.28 CR",
        ]);
        let profile = InstitutionProfile::everyday();
        let mut warnings = Vec::new();
        let ctx = StatementContext::from_document(&doc, &profile, &mut warnings).unwrap();

        assert_eq!(ctx.account_id, "06 2799 12930092");
        assert_eq!(ctx.statement_start_year, 2020);
        assert_eq!(ctx.opening_balance, Some(Decimal::from_str("11989.28").unwrap()));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_account_number_on_next_line() {
        let lines: Vec<String> = ["Account number", "12-345-6789"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let profile = InstitutionProfile::everyday();
        assert_eq!(find_account_number(&lines, &profile), "12-345-6789");
    }

    #[test]
    fn test_card_number_label_from_profile() {
        let lines: Vec<String> = ["Card number: 5123 4567 8901 2345"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let profile = InstitutionProfile::credit_card();
        assert_eq!(find_account_number(&lines, &profile), "5123 4567 8901 2345");
        // The everyday profile only knows the account-number label
        assert_eq!(
            find_account_number(&lines, &InstitutionProfile::everyday()),
            "5123 4567 8901 2345"
        );
    }

    #[test]
    fn test_unlabelled_card_number_accepted() {
        let lines: Vec<String> = ["Platinum Awards Credit Card", "5123-4567-8901-2345"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let profile = InstitutionProfile::credit_card();
        assert_eq!(find_account_number(&lines, &profile), "5123 4567 8901 2345");
    }

    #[test]
    fn test_missing_period_is_fatal() {
        let doc = doc(&["Smart Access", "Account number: 123456"]);
        let profile = InstitutionProfile::everyday();
        let mut warnings = Vec::new();
        let err = StatementContext::from_document(&doc, &profile, &mut warnings).unwrap_err();
        assert!(matches!(err, DocumentError::PeriodNotFound));
    }

    #[test]
    fn test_missing_account_number_warns() {
        let doc = doc(&["Smart Access", "1 Jan 2021 - 30 Jun 2021"]);
        let profile = InstitutionProfile::everyday();
        let mut warnings = Vec::new();
        let ctx = StatementContext::from_document(&doc, &profile, &mut warnings).unwrap();
        assert_eq!(ctx.account_id, "");
        assert_eq!(warnings, vec![ParseWarning::AccountNumberMissing]);
    }

    #[test]
    fn test_apply_prefers_stated_balance() {
        let mut ctx = StatementContext {
            account_id: String::new(),
            statement_start_year: 2020,
            opening_balance: None,
            closing_balance: None,
            running_balance: Some(Decimal::from_str("100.00").unwrap()),
        };
        ctx.apply(Some(Decimal::from_str("-25.00").unwrap()), None);
        assert_eq!(ctx.running_balance, Some(Decimal::from_str("75.00").unwrap()));

        ctx.apply(
            Some(Decimal::from_str("10.00").unwrap()),
            Some(Decimal::from_str("85.50").unwrap()),
        );
        assert_eq!(ctx.running_balance, Some(Decimal::from_str("85.50").unwrap()));
    }
}
