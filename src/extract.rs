//! Field extraction for `\bibitem` entries.
//!
//! Each field is found by an independent, first-match pattern search over the
//! entry text:
//!
//! ```text
//! \bibitem[Doe, 2020]{doe2020}          key
//! J. Doe, A. Smith.                     authors, up to the first \newblock
//! \newblock A Study of Things.          title, up to \newblock or \emph
//! \newblock \emph{Journal of Examples}, 2020.
//! \newblock URL \url{https://example.org}.
//! ```
//!
//! A missing key, author span or title rejects the entry; venue, year and url
//! are optional.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::record::{EntryType, ExtractedFields};
use crate::splitter::RawEntry;

/// Block separator inside an entry.
const NEWBLOCK: &str = "\\newblock";

/// Emphasis markup carrying the venue.
const EMPH: &str = "\\emph{";

/// Mandatory fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MandatoryField {
    Key,
    Author,
    Title,
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MandatoryField::Key => "key",
            MandatoryField::Author => "author",
            MandatoryField::Title => "title",
        };
        f.write_str(name)
    }
}

/// Reasons an entry cannot be turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("missing mandatory field: {0}")]
    MissingField(MandatoryField),

    #[error("malformed entry: {0}")]
    Malformed(String),
}

/// Extracts the fields of one raw entry.
///
/// # Errors
///
/// Returns [`ExtractError::MissingField`] when the key, the author span or the
/// title cannot be found, and [`ExtractError::Malformed`] when the entry would
/// produce a broken record (unusable key, unbalanced braces in a value).
///
/// # Examples
///
/// ```
/// use bbl2bib::{extract_fields, split_entries, EntryType};
///
/// let doc = "\\bibitem[Doe, 2020]{doe2020}\nJ. Doe, A. Smith.\n\\newblock A Study of Things.\n\\emph{Journal of Examples}, 2020.";
/// let entry = split_entries(doc)[0];
/// let fields = extract_fields(&entry).unwrap();
/// assert_eq!(fields.key, "doe2020");
/// assert_eq!(fields.author, "J. Doe and A. Smith");
/// assert_eq!(fields.entry_type, EntryType::Article);
/// ```
pub fn extract_fields(entry: &RawEntry<'_>) -> Result<ExtractedFields, ExtractError> {
    let text = entry.text;

    let (key, after_key) = extract_key(text)?;
    let rest = &text[after_key..];

    // Authors run from the key's closing brace to the first block separator
    let separator = rest
        .find(NEWBLOCK)
        .ok_or(ExtractError::MissingField(MandatoryField::Author))?;
    let author = normalize_authors(&rest[..separator]);
    if author.is_empty() {
        return Err(ExtractError::MissingField(MandatoryField::Author));
    }

    let title = extract_title(&rest[separator + NEWBLOCK.len()..]);
    if title.is_empty() {
        return Err(ExtractError::MissingField(MandatoryField::Title));
    }

    let (entry_type, venue) = match extract_venue(text) {
        Some(venue) => (venue.entry_type, Some(venue.name)),
        None => (EntryType::Article, None),
    };
    let year = extract_year(text);
    let url = extract_url(text);

    let fields = ExtractedFields {
        key,
        author,
        title,
        entry_type,
        venue,
        year,
        url,
    };
    check_braces(&fields)?;

    Ok(fields)
}

/// Finds `\bibitem[label]{key}` and returns the trimmed key together with the
/// byte offset just past its closing brace.
fn extract_key(text: &str) -> Result<(String, usize), ExtractError> {
    static KEY_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\\bibitem\s*(?:\[[^\]]*\])?\s*\{([^}]*)\}").unwrap());

    let caps = KEY_RE
        .captures(text)
        .ok_or(ExtractError::MissingField(MandatoryField::Key))?;
    let whole = caps.get(0).unwrap();
    let key = caps[1].trim();

    if key.is_empty() {
        return Err(ExtractError::MissingField(MandatoryField::Key));
    }
    if key.contains(|c: char| c.is_whitespace() || matches!(c, ',' | '{')) {
        return Err(ExtractError::Malformed(format!(
            "citation key '{}' is not a valid BibTeX key",
            key
        )));
    }

    Ok((key.to_string(), whole.end()))
}

/// Normalizes a raw author span into a `" and "`-separated list.
///
/// Whitespace runs collapse to single spaces, a trailing period is dropped,
/// the span is split on commas, and each name loses surrounding whitespace,
/// trailing periods and any leading "and". Applying it to its own output
/// returns the same string.
///
/// # Examples
///
/// ```
/// use bbl2bib::normalize_authors;
///
/// assert_eq!(normalize_authors("J. Doe, A. Smith,\n and B. Jones."), "J. Doe and A. Smith and B. Jones");
/// ```
pub fn normalize_authors(raw: &str) -> String {
    static LEADING_AND_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(?:and(?:\s+|$))+").unwrap());

    let collapsed = collapse_whitespace(raw);
    let collapsed = collapsed.strip_suffix('.').unwrap_or(&collapsed);

    collapsed
        .split(',')
        .map(|name| {
            let name = name
                .trim_start()
                .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
            LEADING_AND_RE.replace(name, "").trim().to_string()
        })
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Collapses every whitespace run (line breaks included) into one space and
/// trims the result.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the title from the text following the first block separator, up to
/// the next separator, the next emphasis group, or the end of the entry.
fn extract_title(after_separator: &str) -> String {
    let end = [after_separator.find(NEWBLOCK), after_separator.find(EMPH)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(after_separator.len());
    collapse_whitespace(&after_separator[..end])
}

struct Venue {
    name: String,
    entry_type: EntryType,
}

/// Reads the first `\emph{...}` group and classifies the entry from the text
/// right before it. An unterminated group counts as no venue.
fn extract_venue(text: &str) -> Option<Venue> {
    let start = text.find(EMPH)?;

    let Some(body) = balanced_group(&text[start + EMPH.len()..]) else {
        tracing::debug!(offset = start, "ignoring unterminated \\emph group");
        return None;
    };
    let name = collapse_whitespace(body);
    if name.is_empty() {
        return None;
    }

    let entry_type = if follows_word_in(&text[..start]) {
        EntryType::InProceedings
    } else {
        EntryType::Article
    };

    Some(Venue { name, entry_type })
}

/// Whether `before` ends with the standalone word `In ` (case-sensitive).
fn follows_word_in(before: &str) -> bool {
    before
        .strip_suffix("In ")
        .is_some_and(|rest| rest.chars().next_back().map_or(true, |c| !c.is_alphanumeric()))
}

/// Finds the publication year.
///
/// `, 2020.` wins over a bare `2020.` anywhere else in the entry. The fallback
/// may pick up page or volume numbers that happen to look like a year.
fn extract_year(text: &str) -> Option<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s+([0-9]{4})\.").unwrap());
    static BARE_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([0-9]{4})\.").unwrap());

    YEAR_RE
        .captures(text)
        .or_else(|| BARE_YEAR_RE.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Reads `URL \url{...}`. An unterminated group counts as no url.
fn extract_url(text: &str) -> Option<String> {
    static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"URL\s+\\url\{").unwrap());

    let m = URL_RE.find(text)?;

    let Some(body) = balanced_group(&text[m.end()..]) else {
        tracing::debug!(offset = m.start(), "ignoring unterminated \\url group");
        return None;
    };
    let url = body.trim();

    (!url.is_empty()).then(|| url.to_string())
}

/// Returns the content of a brace group whose opening brace has already been
/// consumed, or `None` when the group is never closed.
fn balanced_group(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(&text[..i]),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn braces_balanced(value: &str) -> bool {
    let mut depth = 0i64;
    for c in value.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Rejects entries whose values would break out of their `{...}` delimiters.
fn check_braces(fields: &ExtractedFields) -> Result<(), ExtractError> {
    for (name, value) in fields.fields() {
        if !braces_balanced(value) {
            return Err(ExtractError::Malformed(format!(
                "unbalanced braces in {} field",
                name
            )));
        }
    }
    Ok(())
}
