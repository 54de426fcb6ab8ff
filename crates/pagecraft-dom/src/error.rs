//! Page decoding errors

/// Result type for page decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Reconstruction failure for one node of a serialized page
///
/// `path` is a JSON path such as `$.children[2].events[0].actions[1]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{path}: unknown element kind `{kind}`")]
    UnknownElementKind { path: String, kind: String },

    #[error("{path}: unknown action kind `{kind}`")]
    UnknownActionKind { path: String, kind: String },

    #[error("{path}: missing field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("{path}: invalid `{field}`: {message}")]
    InvalidField {
        path: String,
        field: String,
        message: String,
    },

    #[error("{path}: `{kind}` elements cannot have children")]
    LeafWithChildren { path: String, kind: String },

    #[error("{path}: duplicate element id `{id}`")]
    DuplicateId { path: String, id: String },

    #[error("invalid JSON: {0}")]
    Json(String),
}

impl DecodeError {
    /// JSON path of the failing node
    pub fn path(&self) -> &str {
        match self {
            Self::UnknownElementKind { path, .. }
            | Self::UnknownActionKind { path, .. }
            | Self::MissingField { path, .. }
            | Self::InvalidField { path, .. }
            | Self::LeafWithChildren { path, .. }
            | Self::DuplicateId { path, .. } => path,
            Self::Json(_) => "$",
        }
    }

    pub(crate) fn invalid(path: &str, field: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidField {
            path: path.to_string(),
            field: field.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
