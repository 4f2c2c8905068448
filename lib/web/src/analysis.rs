use crate::error::SparqlensServerError;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use sparqlens::model::AnalysisResult;
use sparqlens::rules::RuleSet;

/// The body of a `POST /analysis` request.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub query: String,
}

pub async fn handle_analysis_post(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, SparqlensServerError> {
    match state.analyzer.analyze(&request.query).await {
        Ok(result) => Ok(Json(result)),
        Err(error) => {
            tracing::warn!(%error, "Analysis failed");
            Err(error.into())
        }
    }
}

pub async fn handle_rules_get(State(state): State<AppState>) -> Json<RuleSet> {
    Json(state.analyzer.rules().clone())
}
