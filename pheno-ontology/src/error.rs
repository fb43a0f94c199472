//! Error types for pheno-ontology
//!
//! Two policies coexist here and must stay distinct:
//! - load-time and uniqueness failures are errors and abort the caller
//! - traversal over unknown or foreign ids is NOT an error; the traversal
//!   APIs return empty results instead of any variant below

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Ontology engine error type
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read or parsed
    #[error("Failed to load ontology config {path}: {detail}")]
    Config { path: PathBuf, detail: String },

    /// Config parsed but is not usable
    #[error("Invalid ontology config: {0}")]
    InvalidConfig(String),

    /// Loader handed over no term records at all
    #[error("Ontology source contained no term records")]
    EmptySource,

    /// Namespace prefix filter retained zero terms
    #[error("Namespace prefixes {prefixes:?} matched no terms")]
    EmptyNamespace { prefixes: Vec<String> },

    /// An id resolved to more than one term where exactly one is required
    #[error("Id {id} resolves to {} terms: {candidates:?}", candidates.len())]
    AmbiguousId { id: String, candidates: Vec<String> },

    /// Strict lookup of an id that is not in the catalog
    #[error("Unknown term: {0}")]
    UnknownTerm(String),
}

impl Error {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Create a config load error for `path`
    pub fn config(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Error::Config {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    /// Create an unknown term error
    pub fn unknown_term(id: impl Into<String>) -> Self {
        Error::UnknownTerm(id.into())
    }

    /// True for errors that mean the catalog could not be built at all
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::InvalidConfig(_)
                | Error::EmptySource
                | Error::EmptyNamespace { .. }
        )
    }
}
