//! bbl2bib: convert LaTeX `.bbl` bibliographies into BibTeX records.
//!
//! This library provides functionality to:
//! - Split a `.bbl` document into `\bibitem` entries
//! - Extract key, authors, title, venue, year and URL from each entry
//! - Build normalized `@article` / `@inproceedings` records
//! - Render the records as BibTeX or JSON

pub mod convert;
pub mod extract;
pub mod output;
pub mod record;
pub mod splitter;

pub use convert::{convert_document, convert_entry, Conversion, SkipStats};
pub use extract::{extract_fields, normalize_authors, ExtractError, MandatoryField};
pub use output::{derive_output_path, render, render_bibtex, render_json, OutputFormat};
pub use record::{EntryType, ExtractedFields, Field, StructuredRecord};
pub use splitter::{split_entries, RawEntry};
