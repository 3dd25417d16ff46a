use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Could not find {kind} with UID {uid} in metadata")]
    NotFound { kind: &'static str, uid: String },

    #[error("Mapping generation error: {message}")]
    MappingGeneration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapperError {
    pub fn not_found(kind: &'static str, uid: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            uid: uid.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::MappingGeneration {
            message: message.into(),
        }
    }

    /// Whether this error is an operator-actionable data-modeling problem
    /// rather than a bug. Callers surface these verbatim and skip the row
    /// instead of crashing.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::MappingGeneration { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
