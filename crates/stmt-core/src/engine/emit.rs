//! Assembling resolved blocks into normalized transaction records.

use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;

use crate::engine::reconcile::ResolvedBlock;
use crate::models::profile::InstitutionProfile;
use crate::models::record::TransactionRecord;
use crate::patterns::{
    EMBEDDED_BALANCE, EMBEDDED_FILLER, GARBLED_PARENS, MULTI_SPACE, TRAILING_AMOUNT, TRAILING_DOTS,
};

pub struct RecordEmitter<'a> {
    profile: &'a InstitutionProfile,
    /// Noise phrases compiled as case-insensitive literal matches, so
    /// removal never mixes byte offsets between a lowercased copy and
    /// the original text (multi-byte glyphs shift them).
    noise: Vec<Regex>,
}

impl<'a> RecordEmitter<'a> {
    pub fn new(profile: &'a InstitutionProfile) -> Self {
        let noise = profile
            .description_noise
            .iter()
            .filter_map(|phrase| {
                RegexBuilder::new(&regex::escape(phrase))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .collect();
        Self { profile, noise }
    }

    /// Build the final record. `balance_after` is the running balance
    /// once this transaction is applied; it backs the balance column
    /// when the block stated no figure of its own.
    pub fn emit(
        &self,
        date: NaiveDate,
        account_id: &str,
        resolved: &ResolvedBlock,
        balance_after: Option<Decimal>,
    ) -> TransactionRecord {
        TransactionRecord {
            date,
            account_id: account_id.to_string(),
            description: self.clean_description(&resolved.description_parts),
            amount: resolved.amount,
            balance: resolved.balance.or(balance_after),
        }
    }

    /// Join the description fragments and scrub extraction artifacts:
    /// figures that leaked out of their columns, dot leaders, garbled
    /// parenthesized bytes, and profile-specific boilerplate.
    pub fn clean_description(&self, parts: &[String]) -> String {
        let mut text = parts.join(" ");

        text = EMBEDDED_BALANCE.replace_all(&text, "").into_owned();
        text = EMBEDDED_FILLER.replace_all(&text, " ").into_owned();
        text = TRAILING_AMOUNT.replace_all(&text, "").into_owned();
        text = TRAILING_DOTS.replace_all(&text, "").into_owned();
        text = GARBLED_PARENS.replace_all(&text, " ").into_owned();

        for pattern in &self.noise {
            text = pattern.replace_all(&text, " ").into_owned();
        }

        for rule in &self.profile.description_rewrites {
            let lower = text.to_lowercase();
            if rule.when_all.iter().all(|p| lower.contains(p.to_lowercase().as_str())) {
                text = rule.replacement.clone();
                break;
            }
        }

        MULTI_SPACE.replace_all(text.trim(), " ").into_owned()
    }
}
