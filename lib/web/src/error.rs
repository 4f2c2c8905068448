use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sparqlens::error::AnalysisError;

#[derive(thiserror::Error, Debug)]
pub enum SparqlensServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// The schema behind the analyzer could not answer.
    #[error("Bad gateway: {0}")]
    BadGateway(String),
    #[error("Internal server error: {0}")]
    Internal(anyhow::Error),
}

impl From<AnalysisError> for SparqlensServerError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::Malformed(_) | AnalysisError::Unclassifiable(_) => {
                SparqlensServerError::BadRequest(error.to_string())
            }
            AnalysisError::SchemaLookup { entity, source } => {
                SparqlensServerError::BadGateway(format!("Resolving {entity} failed: {source}"))
            }
            _ => SparqlensServerError::Internal(error.into()),
        }
    }
}

impl IntoResponse for SparqlensServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SparqlensServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            SparqlensServerError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            SparqlensServerError::Internal(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, message).into_response()
    }
}
