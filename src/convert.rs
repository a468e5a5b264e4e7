//! Document conversion.
//!
//! Runs the splitter and the extractor over a whole `.bbl` document, keeping
//! the records that could be built and counting the entries that were skipped.
//! A failing entry never stops the conversion.

use std::collections::HashSet;

use crate::extract::{collapse_whitespace, extract_fields, ExtractError, MandatoryField};
use crate::record::StructuredRecord;
use crate::splitter::{split_entries, RawEntry};

/// Counts of what happened to each chunk of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipStats {
    /// Entry chunks produced by the splitter
    pub total: usize,
    pub converted: usize,
    pub missing_key: usize,
    pub missing_author: usize,
    pub missing_title: usize,
    pub malformed: usize,
    /// Entries dropped because an earlier entry already used their key
    pub duplicate_key: usize,
    /// Text before the first `\bibitem`; not counted in `total`
    pub preamble: usize,
}

impl SkipStats {
    /// Number of entries that did not become a record.
    pub fn skipped(&self) -> usize {
        self.total - self.converted
    }

    fn record_failure(&mut self, error: &ExtractError) {
        match error {
            ExtractError::MissingField(MandatoryField::Key) => self.missing_key += 1,
            ExtractError::MissingField(MandatoryField::Author) => self.missing_author += 1,
            ExtractError::MissingField(MandatoryField::Title) => self.missing_title += 1,
            ExtractError::Malformed(_) => self.malformed += 1,
        }
    }
}

/// Result of converting a document.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Successful records, in document order
    pub records: Vec<StructuredRecord>,
    pub stats: SkipStats,
}

/// Converts a single raw entry into a record.
pub fn convert_entry(entry: &RawEntry<'_>) -> Result<StructuredRecord, ExtractError> {
    extract_fields(entry).map(StructuredRecord::from)
}

/// Converts every entry of a `.bbl` document.
///
/// Text before the first `\bibitem` is dropped and counted apart from the
/// entries. Entries that lack a key, an author span or a title are skipped
/// quietly. Malformed entries and entries reusing an already emitted key are
/// skipped with a warning.
///
/// # Examples
///
/// ```
/// use bbl2bib::convert_document;
///
/// let doc = "\\begin{thebibliography}{1}\n\n\\bibitem{a}\nA. Author.\n\\newblock Title.\n\n\\end{thebibliography}\n";
/// let conversion = convert_document(doc);
/// assert_eq!(conversion.records.len(), 1);
/// assert_eq!(conversion.stats.total, 1);
/// assert_eq!(conversion.stats.preamble, 1);
/// ```
pub fn convert_document(document: &str) -> Conversion {
    let mut conversion = Conversion::default();
    let mut seen_keys: HashSet<String> = HashSet::new();

    for entry in split_entries(document) {
        let result = convert_entry(&entry);
        if result.is_err() && !entry.has_marker() {
            tracing::debug!(offset = entry.span.0, "skipping text before the first entry");
            conversion.stats.preamble += 1;
            continue;
        }
        conversion.stats.total += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log_skipped(&entry, &e);
                conversion.stats.record_failure(&e);
                continue;
            }
        };

        if !seen_keys.insert(record.key().to_string()) {
            tracing::warn!(
                key = record.key(),
                offset = entry.span.0,
                "skipping entry with duplicate citation key"
            );
            conversion.stats.duplicate_key += 1;
            continue;
        }

        conversion.stats.converted += 1;
        conversion.records.push(record);
    }

    let stats = &conversion.stats;
    tracing::info!(
        total = stats.total,
        converted = stats.converted,
        skipped = stats.skipped(),
        "converted bibliography"
    );

    conversion
}

fn log_skipped(entry: &RawEntry<'_>, error: &ExtractError) {
    match error {
        ExtractError::MissingField(_) => {
            tracing::debug!(offset = entry.span.0, %error, "skipping entry");
        }
        ExtractError::Malformed(_) => {
            tracing::warn!(
                offset = entry.span.0,
                entry = %collapse_whitespace(entry.text),
                %error,
                "skipping entry"
            );
        }
    }
}
