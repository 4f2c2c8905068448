use std::error::Error;

/// An error raised while asking a [SchemaOracle](crate::SchemaOracle) about the schema.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaLookupError {
    /// The schema source could not be reached.
    #[error("The schema endpoint {endpoint} could not be reached")]
    Unreachable {
        endpoint: String,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    /// The schema source answered with an unexpected status.
    #[error("The schema endpoint {endpoint} answered with status {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    /// The answer of the schema source could not be read.
    #[error("The schema answer could not be read: {0}")]
    InvalidResponse(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// The schema document could not be read.
    #[error("The schema document is invalid: {0}")]
    InvalidSchema(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// The schema source contradicts itself or the question.
    #[error("Inconsistent schema answer for {entity}: {reason}")]
    Inconsistent { entity: String, reason: String },
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl SchemaLookupError {
    /// Builds an [SchemaLookupError::Inconsistent] error.
    pub fn inconsistent(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inconsistent {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}
