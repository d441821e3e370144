//! Locating the start of the transaction table.

use tracing::debug;

use crate::error::DocumentError;
use crate::models::context::first_statement_page;
use crate::models::profile::InstitutionProfile;
use crate::source::StatementDocument;

/// Where the transaction table body begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStart {
    pub page: usize,
    /// Line offset within that page, just past the header lines.
    pub offset: usize,
}

/// Scan pages in order, skipping notice/cover pages, and return the
/// position just past the first table header. Statement layouts render
/// the header either as one line carrying several column labels or as a
/// stacked group (a bare date label followed by the remaining labels on
/// their own lines).
///
/// No header on any page rejects the document.
pub fn locate(
    doc: &StatementDocument,
    profile: &InstitutionProfile,
) -> Result<TableStart, DocumentError> {
    if doc.is_empty() {
        return Err(DocumentError::NoPages);
    }

    let start_page =
        first_statement_page(doc, profile).ok_or(DocumentError::TableNotFound)?;

    for page in start_page..doc.page_count() {
        let lines = doc.page(page).unwrap_or(&[]);
        for i in 0..lines.len() {
            if let Some(offset) = match_header_at(lines, i, profile) {
                debug!("table header found on page {page}, body starts at line {offset}");
                return Ok(TableStart { page, offset });
            }
        }
    }

    Err(DocumentError::TableNotFound)
}

/// If a table header starts at `lines[i]`, return the offset just past
/// it. Also used to skip repeated headers on continuation pages.
pub fn match_header_at(
    lines: &[String],
    i: usize,
    profile: &InstitutionProfile,
) -> Option<usize> {
    let line_lower = lines[i].to_lowercase();

    // One-line form: every label of some group on a single line
    for group in &profile.header_lines {
        if !group.is_empty() && group.iter().all(|l| line_lower.contains(l.as_str())) {
            return Some(i + 1 + profile.header_inline_skip);
        }
    }

    // Stacked form: bare date label, remaining labels within the next
    // four lines
    if line_lower.trim() == profile.header_date_label {
        let lookahead_end = (i + 5).min(lines.len());
        if lookahead_end > i + 1 {
            let following = lines[i + 1..lookahead_end].join(" ").to_lowercase();
            if profile
                .header_column_labels
                .iter()
                .all(|l| following.contains(l.as_str()))
            {
                return Some(i + profile.header_stacked_skip);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_line_header() {
        let doc = StatementDocument::new(vec![page(&[
            "Smart Access",
            "Account details",
            "Date Transaction",
            "Debit",
            "Credit",
            "Balance",
            "$",
            "01 Sep Opening balance",
        ])]);
        let start = locate(&doc, &InstitutionProfile::everyday()).unwrap();
        assert_eq!(start, TableStart { page: 0, offset: 7 });
    }

    #[test]
    fn test_stacked_header() {
        let doc = StatementDocument::new(vec![page(&[
            "Smart Access statement",
            "Date",
            "Transaction",
            "Debit",
            "Credit",
            "Balance",
            "01 Sep Opening balance",
        ])]);
        let start = locate(&doc, &InstitutionProfile::everyday()).unwrap();
        assert_eq!(start, TableStart { page: 0, offset: 6 });
    }

    #[test]
    fn test_notice_page_skipped() {
        let doc = StatementDocument::new(vec![
            page(&[
                "Notice of increase to repayments for your home loan",
                "Yours sincerely",
                "The CommBank Team",
            ]),
            page(&[
                "Smart Access",
                "Date Transaction",
                "Debit",
                "Credit",
                "Balance",
            ]),
        ]);
        let start = locate(&doc, &InstitutionProfile::everyday()).unwrap();
        assert_eq!(start.page, 1);
    }

    #[test]
    fn test_no_header_rejects_document() {
        let doc = StatementDocument::new(vec![page(&[
            "Smart Access",
            "This page has no transaction table at all",
        ])]);
        let err = locate(&doc, &InstitutionProfile::everyday()).unwrap_err();
        assert!(matches!(err, DocumentError::TableNotFound));
    }

    #[test]
    fn test_empty_document() {
        let doc = StatementDocument::default();
        let err = locate(&doc, &InstitutionProfile::everyday()).unwrap_err();
        assert!(matches!(err, DocumentError::NoPages));
    }
}
