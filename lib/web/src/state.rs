use sparqlens::QueryAnalyzer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub analyzer: QueryAnalyzer,
}
