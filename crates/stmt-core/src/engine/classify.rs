//! Line classification within a transaction block.
//!
//! Classification is per-line and deliberately shallow: it assigns the
//! strongest tag the line's own text supports. Ambiguity between debit,
//! credit, and balance readings is left to the reconciler, which has the
//! running balance to test hypotheses against.

use tracing::trace;

use crate::models::profile::InstitutionProfile;
use crate::models::record::{ClassifiedLine, LineTag};
use crate::money::{parse_amount, parse_signed_balance};
use crate::patterns::{
    AMOUNT_BARE, AMOUNT_NEGATIVE, AMOUNT_PARENS, AMOUNT_SIGNED_PREFIX, AMOUNT_TRAILING_MINUS,
    BALANCE_DR_CR, DIGIT_RUN, FILLER_AMOUNT, FILLER_ONLY,
};

/// Re-join column markers that extraction split onto their own lines: a
/// lone `$` or `(` attaches to the following line, so `(` + `300.00)`
/// reads as a parenthesized debit again.
pub fn merge_column_markers(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut pending: Option<&str> = None;
    for line in lines {
        let trimmed = line.trim();
        if matches!(trimmed, "$" | "(") {
            pending = Some(trimmed);
            continue;
        }
        match pending.take() {
            Some(marker) => out.push(format!("{marker}{trimmed}")),
            None => out.push(line.clone()),
        }
    }
    out
}

pub struct LineClassifier<'a> {
    profile: &'a InstitutionProfile,
}

impl<'a> LineClassifier<'a> {
    pub fn new(profile: &'a InstitutionProfile) -> Self {
        Self { profile }
    }

    /// Classify one raw line. Usually yields one classified line; a
    /// filler-run line carrying both text and an amount yields two (the
    /// description fragment, then the amount).
    ///
    /// Tag precedence, strongest signal first: DR/CR suffix, explicit
    /// sign or parentheses, filler-run position, bare amount, reference
    /// ID, free text.
    pub fn classify(&self, line: &str) -> Vec<ClassifiedLine> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        // Explicit DR/CR suffix is the one unambiguous balance signal
        if BALANCE_DR_CR.is_match(trimmed) {
            if let Some(value) = parse_signed_balance(trimmed) {
                trace!("balance: {trimmed}");
                return vec![ClassifiedLine::new(trimmed, LineTag::Balance).with_value(value)];
            }
        }

        // Explicit sign: "+$104.99" / "-$104.99" (signed-column layouts)
        if let Some(caps) = AMOUNT_SIGNED_PREFIX.captures(trimmed) {
            if let Some(value) = parse_amount(&caps[2]) {
                let tag = if &caps[1] == "-" { LineTag::Debit } else { LineTag::Credit };
                return vec![ClassifiedLine::new(trimmed, tag).with_value(value)];
            }
        }

        // Leading or trailing minus, or parentheses, mark a debit outright
        if let Some(caps) = AMOUNT_NEGATIVE
            .captures(trimmed)
            .or_else(|| AMOUNT_TRAILING_MINUS.captures(trimmed))
            .or_else(|| AMOUNT_PARENS.captures(trimmed))
        {
            if let Some(value) = parse_amount(&caps[1]) {
                return vec![ClassifiedLine::new(trimmed, LineTag::Debit).with_value(value)];
            }
        }

        // Dot-leader filler run: text, filler, amount. The run length is
        // a weak column-position proxy; the tag stays provisional.
        if let Some(caps) = FILLER_AMOUNT.captures(trimmed) {
            if let Some(value) = parse_amount(&caps[3]) {
                let tag = if caps[2].len() >= self.profile.filler_credit_threshold {
                    LineTag::Credit
                } else {
                    LineTag::Debit
                };
                let mut out = Vec::with_capacity(2);
                let prefix = caps[1].trim();
                if !prefix.is_empty() {
                    out.push(ClassifiedLine::new(prefix, LineTag::Description));
                }
                out.push(ClassifiedLine::new(trimmed, tag).with_value(value).provisional());
                return out;
            }
        }

        // Bare two-decimal figure: amount or balance, the reconciler
        // decides which
        if let Some(caps) = AMOUNT_BARE.captures(trimmed) {
            if let Some(value) = parse_amount(&caps[1]) {
                return vec![
                    ClassifiedLine::new(trimmed, LineTag::Credit)
                        .with_value(value)
                        .provisional(),
                ];
            }
        }

        // "Nil" placeholder in an amount column
        let lower = trimmed.to_lowercase();
        if matches!(lower.as_str(), "nil" | "nill" | "nil.") {
            return vec![
                ClassifiedLine::new(trimmed, LineTag::Credit)
                    .with_value(rust_decimal::Decimal::ZERO)
                    .provisional(),
            ];
        }

        // Decorative rows and stray column markers
        if FILLER_ONLY.is_match(trimmed) || trimmed == "$" || trimmed == "(" || trimmed == ")" {
            return vec![ClassifiedLine::new(trimmed, LineTag::Noise)];
        }

        // Pointless short digit runs are noise; long ones are reference
        // IDs worth keeping in the description
        if let Some(caps) = DIGIT_RUN.captures(trimmed) {
            let digits = caps[1].chars().filter(char::is_ascii_digit).count();
            let tag = if digits >= self.profile.reference_id_digits {
                LineTag::Description
            } else {
                LineTag::Noise
            };
            return vec![ClassifiedLine::new(trimmed, tag)];
        }

        if trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
            return vec![ClassifiedLine::new(trimmed, LineTag::Description)];
        }

        vec![ClassifiedLine::new(trimmed, LineTag::Noise)]
    }
}
