//! Declarative field rules for Argentine receipts.
//!
//! Each business field is described by a [`FieldPattern`]: plain data that the
//! parser compiles and evaluates in isolation. Adding a field means adding a
//! catalog entry in [`patterns`], not touching the parser.

pub mod cuit;
pub mod dates;
pub mod patterns;

pub use cuit::{format_cuit, validate_cuit};
pub use dates::{is_calendar_date, parse_receipt_date};
pub use patterns::{CATALOG, COPY_MARKERS, KNOWN_LABELS};

use regex::Regex;

use crate::models::comprobante::Field;

/// Post-processing applied to a captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    /// Keep the capture as-is (amounts, identifiers).
    Verbatim,
    /// Strip leading and trailing whitespace (free text).
    Trim,
}

/// How the end of a captured value is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The pattern delimits the value on its own.
    SelfContained,
    /// A lazily captured value that runs until a blank line, the next known
    /// label, a copy marker line or the end of the text.
    NextLabel,
}

/// A named extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPattern {
    /// Record field populated by this rule.
    pub field: Field,
    /// Regex source. For [`Boundary::NextLabel`] it must end with a lazy
    /// `(.*?)` group so the terminator can match right after the label.
    pub pattern: &'static str,
    /// Capture group holding the value.
    pub group: usize,
    pub post: PostProcess,
    pub boundary: Boundary,
}

impl FieldPattern {
    /// A self-contained rule reading capture group 1 verbatim.
    pub const fn new(field: Field, pattern: &'static str) -> Self {
        Self {
            field,
            pattern,
            group: 1,
            post: PostProcess::Verbatim,
            boundary: Boundary::SelfContained,
        }
    }

    /// Read a different capture group.
    pub const fn group(self, group: usize) -> Self {
        Self { group, ..self }
    }

    /// Trim the captured value.
    pub const fn trimmed(self) -> Self {
        Self {
            post: PostProcess::Trim,
            ..self
        }
    }

    /// Free-text value bounded by the next label, with trimming.
    pub const fn until_next_label(self) -> Self {
        Self {
            boundary: Boundary::NextLabel,
            post: PostProcess::Trim,
            ..self
        }
    }

    /// Full regex source including the value boundary.
    pub fn source(&self) -> String {
        match self.boundary {
            Boundary::SelfContained => self.pattern.to_string(),
            Boundary::NextLabel => format!("{}{}", self.pattern, next_label_terminator()),
        }
    }

    /// Compile the rule.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.source())
    }

    /// Apply a compiled rule to text, first match only.
    ///
    /// Returns `None` when nothing matched, the group did not participate, or
    /// the value is empty after post-processing.
    pub fn apply(&self, regex: &Regex, text: &str) -> Option<String> {
        let caps = regex.captures(text)?;
        let raw = caps.get(self.group)?.as_str();

        let value = match self.post {
            PostProcess::Verbatim => raw,
            PostProcess::Trim => raw.trim(),
        };

        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Non-capturing alternation that ends a [`Boundary::NextLabel`] value.
fn next_label_terminator() -> String {
    let markers = COPY_MARKERS.join("|");
    format!(
        r"(?:\n[ \t]*\n|\n[ \t]*(?:{markers})[ \t]*(?:\n|\z)|{labels}|\z)",
        labels = KNOWN_LABELS.join("|"),
    )
}
