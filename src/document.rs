//! Two-level sectioned document and its WIF text form
//!
//! A WIF file is an INI-style document: named sections holding `key=value`
//! lines. Order matters for byte-reproducible output, so both levels are
//! insertion-ordered maps. Re-inserting an existing key keeps its position.

use indexmap::IndexMap;
use std::io::{self, Write};

/// Ordered `key -> value` entries of one section.
pub type Section = IndexMap<String, String>;

/// A top-level document entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `[Name]` followed by its `key=value` lines
    Section(Section),
    /// A bare `key=value` line outside any section
    Scalar(String),
}

/// In-memory WIF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaveDocument {
    /// Optional comment block written before the body, one `# ` line each
    pub comment: Option<String>,
    entries: IndexMap<String, Entry>,
}

impl WeaveDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a section by name. Scalars are not sections.
    pub fn section(&self, name: &str) -> Option<&Section> {
        match self.entries.get(name) {
            Some(Entry::Section(section)) => Some(section),
            _ => None,
        }
    }

    /// Mutable access to an existing section.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        match self.entries.get_mut(name) {
            Some(Entry::Section(section)) => Some(section),
            _ => None,
        }
    }

    /// Add an empty section at the end unless one with this name exists.
    ///
    /// A scalar with the same name is replaced by the section in place.
    pub fn ensure_section(&mut self, name: &str) {
        if self.section(name).is_none() {
            self.entries.insert(name.to_string(), Entry::Section(Section::new()));
        }
    }

    /// Replace a section's contents, keeping its position if it exists.
    pub fn set_section(&mut self, name: &str, section: Section) {
        self.entries.insert(name.to_string(), Entry::Section(section));
    }

    /// Set a single value inside a section.
    ///
    /// The section is created at the end if absent; a scalar with the same
    /// name becomes a section in place.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl ToString) {
        let (key, value) = (key.into(), value.to_string());
        match self.entries.get_mut(section) {
            Some(Entry::Section(existing)) => {
                existing.insert(key, value);
            }
            Some(slot) => *slot = Entry::Section(Section::from([(key, value)])),
            None => {
                let fresh = Entry::Section(Section::from([(key, value)]));
                self.entries.insert(section.to_string(), fresh);
            }
        }
    }

    /// Value of `key` inside `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key).map(String::as_str)
    }

    /// Set a top-level scalar entry.
    pub fn set_scalar(&mut self, key: &str, value: impl ToString) {
        self.entries.insert(key.to_string(), Entry::Scalar(value.to_string()));
    }

    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Entry::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    /// Top-level entry names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write the document in WIF text form.
    pub fn write_wif<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Some(comment) = &self.comment {
            for line in comment.lines() {
                writeln!(out, "# {}", line)?;
            }
        }

        for (name, entry) in &self.entries {
            match entry {
                Entry::Section(section) => {
                    writeln!(out, "[{}]", name)?;
                    for (key, value) in section {
                        writeln!(out, "{}={}", key, value)?;
                    }
                }
                Entry::Scalar(value) => writeln!(out, "{}={}", name, value)?,
            }
        }
        Ok(())
    }

    /// Render the document to a WIF string.
    ///
    /// ```
    /// use plainweave::document::WeaveDocument;
    ///
    /// let mut doc = WeaveDocument::new();
    /// doc.set("TIEUP", "1", "1");
    /// doc.set("TIEUP", "2", "");
    /// assert_eq!(doc.to_wif_string(), "[TIEUP]\n1=1\n2=\n");
    /// ```
    pub fn to_wif_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_wif(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
