//! CLI command implementations.

pub mod batch;
pub mod convert;
pub mod profiles;

use std::path::Path;

use stmt_core::{
    InstitutionProfile, PageTextSource, PdfPageSource, StatementDocument, TextPageSource,
};

/// Resolve a profile argument: the name of a built-in profile, or a
/// path to a profile JSON file.
pub fn load_profile(arg: &str) -> anyhow::Result<InstitutionProfile> {
    let path = Path::new(arg);
    if path.extension().is_some_and(|e| e == "json") && path.exists() {
        return Ok(InstitutionProfile::from_file(path)?);
    }
    Ok(InstitutionProfile::named(arg)?)
}

/// Load a document from a statement file, picking the source by
/// extension. Text files use form-feed page separators.
pub fn load_document(path: &Path) -> anyhow::Result<StatementDocument> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let doc = match extension.as_str() {
        "pdf" => PdfPageSource::new(path).load()?,
        "txt" | "text" => TextPageSource::from_path(path)?.load()?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };
    Ok(doc)
}
