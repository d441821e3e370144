//! The statement engine: header location, block collection, line
//! classification, balance reconciliation, record emission.

pub mod blocks;
pub mod classify;
pub mod dates;
pub mod emit;
pub mod header;
pub mod reconcile;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{ParseWarning, Result};
use crate::models::context::StatementContext;
use crate::models::profile::InstitutionProfile;
use crate::models::record::{ClassifiedLine, LineTag, TransactionRecord};
use crate::money::parse_signed_balance;
use crate::patterns::{AMOUNT_ANYWHERE, DATE_AT_START};
use crate::source::StatementDocument;

use blocks::BlockCollector;
use classify::LineClassifier;
use dates::DateCursor;
use emit::RecordEmitter;

/// Everything one document yields: the records, the final context, and
/// the non-fatal conditions met along the way.
#[derive(Debug)]
pub struct ParseOutcome {
    pub records: Vec<TransactionRecord>,
    pub context: StatementContext,
    pub warnings: Vec<ParseWarning>,
}

/// Converts one statement document into transaction records, driven by
/// an institution profile.
pub struct StatementEngine {
    profile: InstitutionProfile,
}

impl StatementEngine {
    pub fn new(profile: InstitutionProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &InstitutionProfile {
        &self.profile
    }

    /// Process a whole document. Document-level failures (no pages,
    /// wrong statement type, no table header, no period) are fatal and
    /// yield no records; everything below that level degrades into
    /// warnings.
    pub fn process(&self, doc: &StatementDocument) -> Result<ParseOutcome> {
        let mut warnings = Vec::new();
        let mut context = StatementContext::from_document(doc, &self.profile, &mut warnings)?;
        let table_start = header::locate(doc, &self.profile)?;

        let lines = self.flatten_table_lines(doc, table_start);
        debug!("{} table lines after flattening", lines.len());

        let records = self.walk(&lines, &mut context, &mut warnings);
        context.verify_closing(&mut warnings);

        info!(
            "parsed {} records, {} warnings (profile {})",
            records.len(),
            warnings.len(),
            self.profile.name
        );
        Ok(ParseOutcome { records, context, warnings })
    }

    /// Flatten the table body into one line stream: start just past the
    /// header, skip notice pages, repeated headers on continuation
    /// pages, and profile boilerplate.
    fn flatten_table_lines(
        &self,
        doc: &StatementDocument,
        start: header::TableStart,
    ) -> Vec<String> {
        let mut out = Vec::new();
        for page in start.page..doc.page_count() {
            if page > start.page && self.profile.is_notice_page(&doc.page_text_lower(page)) {
                continue;
            }
            let lines = doc.page(page).unwrap_or(&[]);
            let mut i = if page == start.page { start.offset } else { 0 };
            while i < lines.len() {
                if let Some(offset) = header::match_header_at(lines, i, &self.profile) {
                    i = offset;
                    continue;
                }
                let lower = lines[i].to_lowercase();
                if self.profile.skip_phrases.iter().any(|p| lower.contains(p.as_str())) {
                    i += 1;
                    continue;
                }
                out.push(lines[i].clone());
                i += 1;
            }
        }
        out
    }

    fn walk(
        &self,
        lines: &[String],
        context: &mut StatementContext,
        warnings: &mut Vec<ParseWarning>,
    ) -> Vec<TransactionRecord> {
        let classifier = LineClassifier::new(&self.profile);
        let emitter = RecordEmitter::new(&self.profile);
        let mut cursor = DateCursor::new(context.statement_start_year);
        let mut records = Vec::new();
        let mut collector: Option<BlockCollector> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let lower = line.to_lowercase();
            i += 1;

            // Page-boundary markers re-anchor the running balance and
            // never become records. The carried figure is also the
            // balance after the block it interrupts, so it can confirm
            // that block's sign.
            if lower.contains(&self.profile.carry_marker)
                || lower.contains(&self.profile.resume_marker)
            {
                let anchor = balance_on_or_after(lines, i - 1);
                if let Some(r) =
                    self.finalize(collector.take(), &classifier, &emitter, context, warnings, anchor)
                {
                    records.push(r);
                }
                if let Some(anchor) = anchor {
                    debug!("balance anchor: {anchor}");
                    context.running_balance = Some(anchor);
                }
                continue;
            }

            // Declared opening/closing rows are consumed, not emitted.
            // The figure sits on the row itself or on the next line.
            if lower.contains("opening balance") {
                if let Some(r) =
                    self.finalize(collector.take(), &classifier, &emitter, context, warnings, None)
                {
                    records.push(r);
                }
                if let Some(opening) = balance_on_or_after(lines, i - 1) {
                    context.opening_balance.get_or_insert(opening);
                    context.running_balance.get_or_insert(opening);
                    if trailing_balance(line).is_none() {
                        i += 1;
                    }
                }
                continue;
            }
            if lower.contains("closing balance") {
                // The declared closing figure doubles as the balance
                // after the final block
                let declared = balance_on_or_after(lines, i - 1);
                if let Some(r) = self.finalize(
                    collector.take(),
                    &classifier,
                    &emitter,
                    context,
                    warnings,
                    declared,
                ) {
                    records.push(r);
                }
                context.closing_balance = declared;
                break;
            }

            if self
                .profile
                .table_end_markers
                .iter()
                .any(|m| lower.contains(m.as_str()))
            {
                break;
            }

            // A date opens a new block; anything else feeds the current one
            if let Some(date) = cursor.parse(line) {
                if let Some(r) =
                    self.finalize(collector.take(), &classifier, &emitter, context, warnings, None)
                {
                    records.push(r);
                }
                collector = Some(BlockCollector::new(
                    line.trim(),
                    date,
                    self.profile.max_block_lines,
                ));
            } else if let Some((token, rest, date)) = split_dated_line(line, &mut cursor) {
                if let Some(r) =
                    self.finalize(collector.take(), &classifier, &emitter, context, warnings, None)
                {
                    records.push(r);
                }
                let mut next = BlockCollector::new(token, date, self.profile.max_block_lines);
                next.push(&rest);
                collector = Some(next);
            } else if let Some(current) = collector.as_mut() {
                current.push(line);
            }
            // Lines before the first date token are table preamble
        }

        if let Some(r) =
            self.finalize(collector.take(), &classifier, &emitter, context, warnings, None)
        {
            records.push(r);
        }
        records
    }

    /// Close a block: classify, reconcile against the running balance,
    /// advance the context, emit. Returns None for dropped blocks.
    ///
    /// `upcoming_balance` is a figure observed right after the block
    /// (a carried-forward anchor, a declared closing balance). When the
    /// block's own figures leave the amount unverified it stands in as
    /// a balance line; a block that already verifies is left alone, so
    /// a mismatched closing figure cannot overwrite a sound record.
    fn finalize(
        &self,
        collector: Option<BlockCollector>,
        classifier: &LineClassifier<'_>,
        emitter: &RecordEmitter<'_>,
        context: &mut StatementContext,
        warnings: &mut Vec<ParseWarning>,
        upcoming_balance: Option<Decimal>,
    ) -> Option<TransactionRecord> {
        let collector = collector?;
        if collector.is_empty() {
            return None;
        }
        let date = collector.date();

        let block = match collector.finish() {
            Ok(block) => block,
            Err(warning) => {
                warnings.push(warning);
                return None;
            }
        };

        let classified: Vec<_> = classify::merge_column_markers(&block.raw_lines)
            .iter()
            .flat_map(|line| classifier.classify(line))
            .collect();

        let mut resolved = reconcile::resolve(&classified, context.running_balance, &self.profile)?;
        if !resolved.verified {
            if let Some(balance) = upcoming_balance {
                let mut anchored = classified.clone();
                anchored.push(ClassifiedLine::new("", LineTag::Balance).with_value(balance));
                if let Some(confirmed) =
                    reconcile::resolve(&anchored, context.running_balance, &self.profile)
                {
                    resolved = confirmed;
                }
            }
        }
        context.apply(resolved.amount, resolved.balance);

        let record = emitter.emit(date, &context.account_id, &resolved, context.running_balance);
        if !resolved.verified && resolved.amount.is_some() {
            warnings.push(ParseWarning::BalanceUnverified {
                date,
                description: record.description.clone(),
            });
        }
        Some(record)
    }
}

/// "09 Dec Direct Credit 123456": date token at the start of a line,
/// transaction text on the same line.
fn split_dated_line(line: &str, cursor: &mut DateCursor) -> Option<(String, String, chrono::NaiveDate)> {
    let caps = DATE_AT_START.captures(line)?;
    let token = caps[1].to_string();
    let rest = caps[2].to_string();
    let date = cursor.parse(&token)?;
    Some((token, rest, date))
}

/// The last monetary figure on a line, signed by any DR/CR suffix.
/// Used for balance anchors in carried/brought-forward and declared
/// opening/closing rows.
fn trailing_balance(line: &str) -> Option<Decimal> {
    let m = AMOUNT_ANYWHERE.find_iter(line).last()?;
    parse_signed_balance(line[m.start()..].trim())
}

/// Balance figure for an anchor row at `idx`, falling back to the next
/// line when the row carries no figure of its own.
fn balance_on_or_after(lines: &[String], idx: usize) -> Option<Decimal> {
    trailing_balance(&lines[idx]).or_else(|| lines.get(idx + 1).and_then(|l| trailing_balance(l)))
}
