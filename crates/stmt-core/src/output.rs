//! TSV output.
//!
//! One row per transaction record, tab-delimited, with a fixed header
//! row. Dates render as DD/MM/YYYY; amounts and balances as plain
//! two-decimal figures, or empty when unresolved.

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::record::TransactionRecord;
use crate::money::format_fixed;

const HEADER: [&str; 5] = ["Date", "Account Number", "Transaction", "Amount", "Balance"];

/// Write records as TSV. The header row is always written, even for an
/// empty record set.
pub fn write_tsv<W: Write>(writer: W, records: &[TransactionRecord]) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    out.write_record(HEADER)?;
    for record in records {
        out.write_record([
            record.date.format("%d/%m/%Y").to_string(),
            record.account_id.clone(),
            record.description.clone(),
            record.amount.map(format_fixed).unwrap_or_default(),
            record.balance.map(format_fixed).unwrap_or_default(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Write records to a TSV file.
pub fn write_tsv_file(path: &Path, records: &[TransactionRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_tsv(file, records)
}

/// Render records to a TSV string.
pub fn to_tsv_string(records: &[TransactionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_tsv(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
