//! `.bbl` entry splitter.
//!
//! Cuts a LaTeX-generated bibliography into one chunk per `\bibitem`.
//! A chunk starts at a `\bibitem` found at the beginning of a line and runs
//! up to the line break before the next one. The last entry stops at
//! `\end{thebibliography}` when the document closes the environment, and at
//! the end of the document otherwise.

use once_cell::sync::Lazy;
use regex::Regex;

/// The lexical marker opening every citation entry.
pub const ENTRY_MARKER: &str = "\\bibitem";

const ENVIRONMENT_END: &str = "\\end{thebibliography}";

/// A raw, unparsed chunk of the document.
///
/// Every chunk except possibly the first starts with [`ENTRY_MARKER`]. The
/// first chunk may be preamble (`\begin{thebibliography}` and friends); it has
/// no marker and is rejected later by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// The chunk text, borrowed from the document
    pub text: &'a str,
    /// Start and end byte positions in the original document
    pub span: (usize, usize),
}

impl<'a> RawEntry<'a> {
    fn new(document: &'a str, start: usize, end: usize) -> Self {
        Self {
            text: &document[start..end],
            span: (start, end),
        }
    }

    /// Whether the chunk opens with the entry marker.
    pub fn has_marker(&self) -> bool {
        self.text.starts_with(ENTRY_MARKER)
    }
}

/// Splits a `.bbl` document into raw entries, in document order.
///
/// Chunks that are empty or whitespace-only are never produced, so a
/// document without any text yields no entries at all.
///
/// # Examples
///
/// ```
/// use bbl2bib::split_entries;
///
/// let doc = "\\begin{thebibliography}{2}\n\\bibitem{a} A.\n\\bibitem{b} B.\n";
/// let entries = split_entries(doc);
/// assert_eq!(entries.len(), 3);
/// assert!(!entries[0].has_marker());
/// assert_eq!(entries[1].text, "\\bibitem{a} A.");
/// ```
pub fn split_entries(document: &str) -> Vec<RawEntry<'_>> {
    static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\\bibitem").unwrap());

    let mut starts: Vec<usize> = MARKER_RE.find_iter(document).map(|m| m.start()).collect();
    if starts.first() != Some(&0) {
        // Preamble before the first marker (or a document with no marker at all)
        starts.insert(0, 0);
    }

    let last = starts.last().copied().unwrap_or(0);
    let document_end = document[last..]
        .find(ENVIRONMENT_END)
        .filter(|_| document[last..].starts_with(ENTRY_MARKER))
        .map_or(document.len(), |pos| last + pos);

    let mut entries = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let next = starts.get(i + 1).copied().unwrap_or(document_end);
        let end = chunk_end(document, start, next);
        let entry = RawEntry::new(document, start, end);
        if !entry.text.trim().is_empty() {
            entries.push(entry);
        }
    }

    entries
}

/// Drops the single line break that separates a chunk from the next marker.
fn chunk_end(document: &str, start: usize, next: usize) -> usize {
    let chunk = &document[start..next];
    if let Some(stripped) = chunk.strip_suffix('\n') {
        start + stripped.strip_suffix('\r').unwrap_or(stripped).len()
    } else {
        next
    }
}
