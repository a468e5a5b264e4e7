//! Structured BibTeX records.

use std::fmt;

use serde::Serialize;

/// BibTeX entry type of a converted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Article,
    InProceedings,
}

impl EntryType {
    /// The tag written after `@`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Article => "article",
            EntryType::InProceedings => "inproceedings",
        }
    }

    /// The field a venue is stored under for this entry type.
    pub fn venue_field(&self) -> &'static str {
        match self {
            EntryType::Article => "journal",
            EntryType::InProceedings => "booktitle",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields pulled out of one `\bibitem` entry, already cleaned.
///
/// `key`, `author` and `title` are always non-empty; the remaining fields are
/// present only when the entry carried them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    pub key: String,
    pub author: String,
    pub title: String,
    pub entry_type: EntryType,
    pub venue: Option<String>,
    pub year: Option<String>,
    pub url: Option<String>,
}

impl ExtractedFields {
    /// Field assignments in output order: author, title, venue, year, url.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("author", self.author.as_str()), ("title", self.title.as_str())];
        if let Some(venue) = &self.venue {
            fields.push((self.entry_type.venue_field(), venue.as_str()));
        }
        if let Some(year) = &self.year {
            fields.push(("year", year.as_str()));
        }
        if let Some(url) = &self.url {
            fields.push(("url", url.as_str()));
        }
        fields
    }
}

/// A single `name = {value}` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub value: String,
}

/// An immutable BibTeX record ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredRecord {
    #[serde(rename = "type")]
    entry_type: EntryType,
    key: String,
    fields: Vec<Field>,
}

impl StructuredRecord {
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

impl From<ExtractedFields> for StructuredRecord {
    fn from(extracted: ExtractedFields) -> Self {
        let fields = extracted
            .fields()
            .into_iter()
            .map(|(name, value)| Field {
                name,
                value: value.to_string(),
            })
            .collect();

        StructuredRecord {
            entry_type: extracted.entry_type,
            key: extracted.key,
            fields,
        }
    }
}

/// Renders the record as a BibTeX block, without a trailing newline.
impl fmt::Display for StructuredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}{{{},", self.entry_type, self.key)?;
        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            write!(f, "\n  {} = {{{}}}{}", field.name, field.value, sep)?;
        }
        write!(f, "\n}}")
    }
}
