//! Page-text collaborators.
//!
//! The engine consumes ordered pages of non-empty, whitespace-trimmed
//! text lines. These sources produce them; the engine never touches the
//! underlying file format.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SourceError;

/// Ordered pages of text lines. Immutable input to the engine.
#[derive(Debug, Clone, Default)]
pub struct StatementDocument {
    pages: Vec<Vec<String>>,
}

impl StatementDocument {
    pub fn new(pages: Vec<Vec<String>>) -> Self {
        Self { pages }
    }

    /// Build from one raw text blob per page: lines are trimmed and
    /// empty lines dropped.
    pub fn from_page_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages = texts
            .into_iter()
            .map(|text| {
                text.as_ref()
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .collect();
        Self { pages }
    }

    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    pub fn page(&self, idx: usize) -> Option<&[String]> {
        self.pages.get(idx).map(Vec::as_slice)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Lowercased text of one page, used for phrase-marker matching.
    pub fn page_text_lower(&self, idx: usize) -> String {
        self.pages
            .get(idx)
            .map(|lines| lines.join(" ").to_lowercase())
            .unwrap_or_default()
    }
}

/// Yields ordered text lines per page of a paginated document.
pub trait PageTextSource {
    fn load(&self) -> Result<StatementDocument, SourceError>;
}

/// Plain-text source: pages separated by form-feed characters. Used for
/// tests and for piping pre-extracted text through the engine.
pub struct TextPageSource {
    raw: String,
}

impl TextPageSource {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        Ok(Self {
            raw: std::fs::read_to_string(path)?,
        })
    }
}

impl PageTextSource for TextPageSource {
    fn load(&self) -> Result<StatementDocument, SourceError> {
        Ok(StatementDocument::from_page_texts(self.raw.split('\u{c}')))
    }
}

/// PDF source backed by pdf-extract's per-page text extraction.
pub struct PdfPageSource {
    path: PathBuf,
}

impl PdfPageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageTextSource for PdfPageSource {
    fn load(&self) -> Result<StatementDocument, SourceError> {
        let pages = pdf_extract::extract_text_by_pages(&self.path)
            .map_err(|e| SourceError::PdfExtraction(e.to_string()))?;
        debug!("extracted {} pages from {}", pages.len(), self.path.display());
        Ok(StatementDocument::from_page_texts(pages))
    }
}
