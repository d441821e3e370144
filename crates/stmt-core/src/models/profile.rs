//! Institution profiles.
//!
//! One engine handles every supported statement layout; the differences
//! between institutions (header phrasing, notice pages, filler-run
//! thresholds, keyword hints) live in an `InstitutionProfile` passed
//! into the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ProfileError;

/// A fixed description rewrite: when every phrase in `when_all` occurs
/// in the assembled description (case-insensitive), the whole
/// description is replaced by `replacement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteRule {
    pub when_all: Vec<String>,
    pub replacement: String,
}

/// Configuration for one institution's statement layout.
///
/// All phrase lists are matched as lowercase substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionProfile {
    /// Profile name, recorded in logs.
    pub name: String,

    /// Phrases identifying a statement page; the first page containing
    /// one (after notice pages are skipped) starts the scan. Empty means
    /// any non-notice page qualifies.
    pub statement_markers: Vec<String>,

    /// Phrase groups identifying notice/cover pages to skip. A page is
    /// skipped when every phrase of some group occurs on it.
    pub notice_markers: Vec<Vec<String>>,

    /// Labels ahead of the account identifier on the first page
    /// ("account number", "card number"). The digits follow the label
    /// on the same line or sit alone on the next one; when no label
    /// matches, an unlabelled four-by-four card number is accepted.
    pub account_labels: Vec<String>,

    /// Label groups that identify a one-line table header: a line
    /// containing every label of some group is the header line.
    pub header_lines: Vec<Vec<String>>,

    /// The date-column label for the stacked (multi-line) header form.
    pub header_date_label: String,

    /// Column labels that must all appear in the lines following a bare
    /// date label for the stacked header form.
    pub header_column_labels: Vec<String>,

    /// Lines to skip after a matched one-line header (the remaining
    /// column labels rendered on their own lines).
    pub header_inline_skip: usize,

    /// Lines to skip after a matched stacked header.
    pub header_stacked_skip: usize,

    /// Lines containing any of these phrases are dropped before
    /// collection (rate notices, footers, contact boilerplate).
    pub skip_phrases: Vec<String>,

    /// Phrases ending the transaction table.
    pub table_end_markers: Vec<String>,

    /// Page-boundary markers for tables continuing across pages.
    pub carry_marker: String,
    pub resume_marker: String,

    /// Filler runs at least this long place the trailing amount in the
    /// credit column; shorter runs place it in the debit column. A
    /// positional proxy only, corrected by balance arithmetic.
    pub filler_credit_threshold: usize,

    /// Digit runs of at least this many digits are treated as reference
    /// IDs and folded into the description instead of being dropped.
    pub reference_id_digits: usize,

    /// Upper bound on collected lines per block; exceeding it abandons
    /// the block.
    pub max_block_lines: usize,

    /// Keyword hints for the last-resort debit/credit tier.
    pub debit_keywords: Vec<String>,
    pub credit_keywords: Vec<String>,

    /// Phrases stripped out of assembled descriptions.
    pub description_noise: Vec<String>,

    /// Whole-description rewrites.
    pub description_rewrites: Vec<RewriteRule>,
}

impl Default for InstitutionProfile {
    fn default() -> Self {
        Self {
            name: "generic".to_string(),
            statement_markers: Vec::new(),
            notice_markers: Vec::new(),
            account_labels: vec!["account number".to_string()],
            header_lines: vec![vec!["date".to_string(), "transaction".to_string()]],
            header_date_label: "date".to_string(),
            header_column_labels: vec![
                "transaction".to_string(),
                "debit".to_string(),
                "balance".to_string(),
            ],
            header_inline_skip: 4,
            header_stacked_skip: 5,
            skip_phrases: Vec::new(),
            table_end_markers: Vec::new(),
            carry_marker: "carried forward".to_string(),
            resume_marker: "brought forward".to_string(),
            filler_credit_threshold: 100,
            reference_id_digits: 11,
            max_block_lines: 400,
            debit_keywords: Vec::new(),
            credit_keywords: Vec::new(),
            description_noise: Vec::new(),
            description_rewrites: Vec::new(),
        }
    }
}

impl InstitutionProfile {
    /// Everyday transaction account: Date/Transaction/Debit/Credit/Balance
    /// columns, DR/CR-suffixed balances, notice letters before the
    /// statement proper.
    pub fn everyday() -> Self {
        Self {
            name: "everyday".to_string(),
            statement_markers: vec![
                "everyday offset".to_string(),
                "smart access".to_string(),
                "netbank saver".to_string(),
                "your statement".to_string(),
            ],
            notice_markers: vec![
                vec!["notice of increase to repayments".to_string()],
                vec!["yours sincerely".to_string(), "the commbank team".to_string()],
            ],
            skip_phrases: vec![
                "interest rate as of".to_string(),
                "interest rate applied to".to_string(),
                "change in interest rate".to_string(),
            ],
            ..Self::default()
        }
    }

    /// Passbook-style savings account: + IN / - OUT columns with signed
    /// amount prefixes.
    pub fn passbook() -> Self {
        Self {
            name: "passbook".to_string(),
            statement_markers: vec![
                "youth saver".to_string(),
                "youthsaver".to_string(),
                "your statement".to_string(),
            ],
            notice_markers: vec![
                vec!["notice of increase to repayments".to_string()],
                vec!["yours sincerely".to_string(), "the commbank team".to_string()],
            ],
            header_lines: vec![
                vec!["date".to_string(), "transaction".to_string()],
                vec!["+ in".to_string(), "- out".to_string()],
            ],
            header_column_labels: vec![
                "transaction".to_string(),
                "out".to_string(),
                "balance".to_string(),
            ],
            header_inline_skip: 5,
            skip_phrases: vec![
                "interest rate as of".to_string(),
                "interest rate applied to".to_string(),
                "change in interest rate".to_string(),
            ],
            ..Self::default()
        }
    }

    /// Offset home-loan account: Date/Particulars/Debits/Credits/Balance
    /// columns, dot-leader filler runs, carried/brought forward page
    /// markers, keyword hints for the no-balance fallback tier.
    pub fn offset_home_loan() -> Self {
        Self {
            name: "offset-home-loan".to_string(),
            statement_markers: vec!["offset".to_string(), "transaction details".to_string()],
            header_lines: vec![vec!["date".to_string(), "particulars".to_string()]],
            header_column_labels: vec![
                "particulars".to_string(),
                "debits".to_string(),
                "balance".to_string(),
            ],
            header_inline_skip: 1,
            skip_phrases: vec![
                "if a charge is incorrect".to_string(),
                "if you have any queries".to_string(),
                "transaction details".to_string(),
                "for further information call".to_string(),
                "for personal accounts or".to_string(),
                "for business accounts".to_string(),
                "you may be entitled to a refund".to_string(),
                "you should act quickly".to_string(),
                "disputed transactions".to_string(),
                "statement number".to_string(),
            ],
            debit_keywords: vec![
                "loan repayment".to_string(),
                "repayment".to_string(),
                "transfer to".to_string(),
                "debit".to_string(),
                "payment".to_string(),
                "eftpos".to_string(),
                "purchase".to_string(),
                "withdrawal".to_string(),
                "fee".to_string(),
                "charge".to_string(),
            ],
            credit_keywords: vec![
                "direct credit".to_string(),
                "credit interest".to_string(),
                "salary".to_string(),
                "monthly pay".to_string(),
                "transfer from".to_string(),
                "transfer in".to_string(),
                "deposit".to_string(),
                "refund".to_string(),
            ],
            description_rewrites: vec![RewriteRule {
                when_all: vec![
                    "by depositing your savings in a linked".to_string(),
                    "interest charged".to_string(),
                ],
                replacement: "Interest Charged".to_string(),
            }],
            ..Self::default()
        }
    }

    /// Home loan account: Date/Transaction/Debits/Credits/Balance
    /// columns under a loan summary page, with borrower/security
    /// boilerplate between table sections.
    pub fn home_loan() -> Self {
        Self {
            name: "home-loan".to_string(),
            statement_markers: vec![
                "home loan summary".to_string(),
                "your statement".to_string(),
            ],
            notice_markers: vec![
                vec!["notice of increase to repayments".to_string()],
                vec!["yours sincerely".to_string(), "the commbank team".to_string()],
            ],
            skip_phrases: vec![
                "borrowers".to_string(),
                "security address".to_string(),
                "fixed rate investment home loan transactions".to_string(),
                "standard variable rate home loan transactions".to_string(),
                "interest rate as of".to_string(),
                "interest rate applied to".to_string(),
                "change in interest rate".to_string(),
            ],
            ..Self::default()
        }
    }

    /// Credit-card statement: the account id is a four-by-four card
    /// number (labelled or bare), the table follows a Date /
    /// Transaction details / Amount header.
    pub fn credit_card() -> Self {
        Self {
            name: "credit-card".to_string(),
            statement_markers: vec![
                "platinum awards credit card".to_string(),
                "mastercard".to_string(),
                "credit card".to_string(),
            ],
            account_labels: vec!["card number".to_string(), "account number".to_string()],
            header_lines: vec![vec![
                "date".to_string(),
                "transaction details".to_string(),
            ]],
            header_column_labels: vec!["transaction".to_string()],
            header_inline_skip: 1,
            header_stacked_skip: 3,
            ..Self::default()
        }
    }

    /// Look up a built-in profile by name.
    pub fn named(name: &str) -> Result<Self, ProfileError> {
        match name {
            "generic" => Ok(Self::default()),
            "everyday" => Ok(Self::everyday()),
            "passbook" => Ok(Self::passbook()),
            "offset-home-loan" => Ok(Self::offset_home_loan()),
            "home-loan" => Ok(Self::home_loan()),
            "credit-card" => Ok(Self::credit_card()),
            other => Err(ProfileError::Unknown(other.to_string())),
        }
    }

    /// Load a profile from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save a profile to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(ProfileError::Read)
    }

    /// True when the page text identifies a notice/cover page.
    pub fn is_notice_page(&self, page_text_lower: &str) -> bool {
        self.notice_markers
            .iter()
            .any(|group| group.iter().all(|p| page_text_lower.contains(p.as_str())))
    }

    /// True when the page text identifies a statement page.
    pub fn is_statement_page(&self, page_text_lower: &str) -> bool {
        self.statement_markers.is_empty()
            || self
                .statement_markers
                .iter()
                .any(|m| page_text_lower.contains(m.as_str()))
    }
}
