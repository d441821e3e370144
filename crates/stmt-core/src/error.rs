//! Error types for the stmt-core library.

use thiserror::Error;

/// Main error type for the stmt library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// Document-level error; aborts processing of that document.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Institution profile error.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Page source error.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TSV serialization error.
    #[error("output error: {0}")]
    Output(#[from] csv::Error),
}

/// Fatal errors for a single document. Processing of other documents
/// in a batch continues.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document has no pages.
    #[error("document has no pages")]
    NoPages,

    /// No transaction-table header was found on any page.
    #[error("transaction table header not found")]
    TableNotFound,

    /// The document does not match the expected statement type.
    #[error("not a recognized {0} statement")]
    WrongStatementType(String),

    /// The statement period (and therefore the start year) is missing.
    #[error("statement period not found on first page")]
    PeriodNotFound,
}

/// Errors related to institution profiles.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Failed to read the profile file.
    #[error("failed to read profile: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to deserialize the profile.
    #[error("failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),

    /// No built-in profile with this name.
    #[error("unknown profile: {0}")]
    Unknown(String),
}

/// Errors from page-text collaborators.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to extract text from a PDF.
    #[error("failed to extract PDF text: {0}")]
    PdfExtraction(String),

    /// Failed to read an input file.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal conditions collected while parsing one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// An amount was resolved from the positional column heuristic or
    /// keyword lists only, without a confirming balance figure.
    BalanceUnverified { date: chrono::NaiveDate, description: String },

    /// The final running balance does not match the declared closing balance.
    ClosingBalanceMismatch {
        running: rust_decimal::Decimal,
        declared: rust_decimal::Decimal,
    },

    /// A block exceeded the collection bound and was dropped.
    BlockOverflow { date: chrono::NaiveDate, lines: usize },

    /// No account number could be found on the first statement page.
    AccountNumberMissing,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::BalanceUnverified { date, description } => {
                write!(f, "{date}: amount for \"{description}\" not verified against a balance")
            }
            ParseWarning::ClosingBalanceMismatch { running, declared } => {
                write!(f, "closing balance mismatch: running {running} vs declared {declared}")
            }
            ParseWarning::BlockOverflow { date, lines } => {
                write!(f, "{date}: block exceeded {lines} lines and was dropped")
            }
            ParseWarning::AccountNumberMissing => {
                write!(f, "account number not found on first page")
            }
        }
    }
}

/// Result type for the stmt library.
pub type Result<T> = std::result::Result<T, StmtError>;
