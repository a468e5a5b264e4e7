//! Output generation for converted records.
//!
//! Renders records as a BibTeX document or as JSON, and picks the default
//! output path for an input file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::record::StructuredRecord;

/// Input suffix that gets replaced when deriving an output path.
const INPUT_EXTENSION: &str = "bbl";

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// BibTeX records separated by blank lines
    #[default]
    Bibtex,
    /// JSON array of records
    Json,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Bibtex => "bib",
            OutputFormat::Json => "json",
        }
    }
}

/// Joins records into a BibTeX document.
///
/// Records are separated by one blank line and a non-empty document ends with
/// a newline. No records give an empty document.
///
/// # Examples
///
/// ```
/// use bbl2bib::{convert_document, render_bibtex};
///
/// let conversion = convert_document("\\bibitem{k}\nA. One.\n\\newblock Title.");
/// assert_eq!(
///     render_bibtex(&conversion.records),
///     "@article{k,\n  author = {A. One},\n  title = {Title.}\n}\n"
/// );
/// ```
pub fn render_bibtex(records: &[StructuredRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut output = records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    output.push('\n');
    output
}

/// Serializes records as a pretty-printed JSON array.
pub fn render_json(records: &[StructuredRecord]) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(records)?;
    output.push('\n');
    Ok(output)
}

/// Renders records in the requested format.
pub fn render(records: &[StructuredRecord], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Bibtex => Ok(render_bibtex(records)),
        OutputFormat::Json => render_json(records),
    }
}

/// Derives the output path from the input path.
///
/// A `.bbl` suffix (any case) is replaced with the format's extension;
/// any other name gets the extension appended.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use bbl2bib::{derive_output_path, OutputFormat};
///
/// assert_eq!(derive_output_path(Path::new("paper.bbl"), OutputFormat::Bibtex), PathBuf::from("paper.bib"));
/// assert_eq!(derive_output_path(Path::new("refs.txt"), OutputFormat::Bibtex), PathBuf::from("refs.txt.bib"));
/// ```
pub fn derive_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let recognized = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));

    if recognized {
        input.with_extension(format.extension())
    } else {
        let mut name = OsString::from(input.as_os_str());
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}
