//src/error.rs

use thiserror::Error;

/// Failures of the per-line field grammars. These carry no position; the
/// dispatcher wraps them in [`KegError::Field`] together with the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A map-mode leaf has no tab between entity and classification.
    #[error("expected a tab between entity and classification")]
    MissingTabSeparator,

    /// No `[KEY: items]` clause could be located.
    #[error("no [KEY: items] accessor clause found")]
    MissingAccessorClause,

    /// Content looks tag-wrapped (`<` and `>` present) but the closing tag is missing.
    #[error("missing closing tag </{0}>")]
    MissingMarkupTag(String),

    /// Nothing left to tokenize.
    #[error("no tokens to parse")]
    EmptyContent,
}

/// The error type for everything in this crate.
#[derive(Debug, Error)]
pub enum KegError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line 1 is not a usable `+<Letter> <columns...>` directive.
    #[error("malformed header directive {content:?}: {reason}")]
    MalformedHeader { content: String, reason: &'static str },

    /// Pop or peek on an empty hierarchy stack. Indicates a bug in the close-before-push pass.
    #[error("hierarchy stack is empty")]
    EmptyStack,

    #[error("line {line_number}: {source} (in {content:?})")]
    Field {
        line_number: usize,
        content: String,
        #[source]
        source: FieldError,
    },

    /// The input has no lines at all, so not even a header.
    #[error("input contains no lines")]
    EmptyInput,

    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

impl From<csv::Error> for KegError {
    fn from(e: csv::Error) -> Self {
        KegError::Serialize(e.to_string())
    }
}

impl From<serde_json::Error> for KegError {
    fn from(e: serde_json::Error) -> Self {
        KegError::Serialize(e.to_string())
    }
}

impl From<serde_yaml::Error> for KegError {
    fn from(e: serde_yaml::Error) -> Self {
        KegError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KegError>;
