//! Core library for bank-statement text extraction.
//!
//! This crate provides:
//! - Page-text sources (PDF per-page extraction, plain text)
//! - Institution profiles describing statement layouts
//! - The statement engine: header location, date expansion, line
//!   classification, balance reconciliation
//! - TSV output of normalized transaction records

pub mod engine;
pub mod error;
pub mod models;
pub mod money;
pub mod output;
pub mod patterns;
pub mod source;

pub use engine::{ParseOutcome, StatementEngine};
pub use error::{DocumentError, ParseWarning, ProfileError, Result, SourceError, StmtError};
pub use models::{
    ClassifiedLine, InstitutionProfile, LineTag, RewriteRule, StatementContext, TransactionBlock,
    TransactionRecord,
};
pub use output::{to_tsv_string, write_tsv, write_tsv_file};
pub use source::{PageTextSource, PdfPageSource, StatementDocument, TextPageSource};
