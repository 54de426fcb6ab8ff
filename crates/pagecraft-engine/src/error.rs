//! Editor errors

use pagecraft_dom::DecodeError;

/// Editor error
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Unknown action kind: {0}")]
    UnknownAction(String),

    #[error("Invalid data source URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

pub type EditorResult<T> = Result<T, EditorError>;
