//! Crate-level error types.

use std::fmt;

/// A single record that could not be parsed.
///
/// Recorded and skipped; parsing continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Zero-based index of the offending line in the input text.
    pub line: usize,
    /// Human-readable reason.
    pub message: String,
}

impl ParseError {
    /// Create a parse error for `line`.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line + 1, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Failures of the structure load pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The structure text was empty.
    EmptyInput,
    /// Parsing finished but produced no atoms.
    EmptyStructure {
        /// First recorded parse error, if any.
        first_error: Option<ParseError>,
    },
    /// Another load is still in flight; retry once it finishes.
    ConcurrentLoadRejected,
    /// The data-source collaborator failed to deliver.
    DataSource(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "structure text is empty"),
            Self::EmptyStructure {
                first_error: Some(e),
            } => write!(f, "no atoms found ({e})"),
            Self::EmptyStructure { first_error: None } => {
                write!(f, "no atoms found")
            }
            Self::ConcurrentLoadRejected => {
                write!(f, "a structure is already loading")
            }
            Self::DataSource(msg) => write!(f, "data source error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors produced by the molview crate.
#[derive(Debug)]
pub enum MolviewError {
    /// Structure load failure.
    Load(LoadError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A view dictionary could not be decoded or encoded.
    ViewDict(serde_json::Error),
    /// No saved view has this id.
    UnknownView(String),
    /// The default view cannot be deleted.
    DefaultViewUndeletable,
    /// An atom, residue, trace or structure index was out of range.
    IndexOutOfRange {
        /// What kind of entity was indexed.
        kind: &'static str,
        /// The offending index.
        index: usize,
    },
}

impl fmt::Display for MolviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ViewDict(e) => write!(f, "view dictionary error: {e}"),
            Self::UnknownView(id) => write!(f, "unknown view: {id}"),
            Self::DefaultViewUndeletable => {
                write!(f, "the default view cannot be deleted")
            }
            Self::IndexOutOfRange { kind, index } => {
                write!(f, "{kind} index {index} out of range")
            }
        }
    }
}

impl std::error::Error for MolviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::ViewDict(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for MolviewError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<std::io::Error> for MolviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MolviewError {
    fn from(e: serde_json::Error) -> Self {
        Self::ViewDict(e)
    }
}
