//! Data structures for parsed statements and institution profiles.

pub mod context;
pub mod profile;
pub mod record;

pub use context::StatementContext;
pub use profile::{InstitutionProfile, RewriteRule};
pub use record::{ClassifiedLine, LineTag, TransactionBlock, TransactionRecord};
