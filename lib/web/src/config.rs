use sparqlens::QueryAnalyzer;

/// Holds the configuration for a Sparqlens web server.
pub struct ServerConfig {
    /// Analyzes the submitted queries.
    pub analyzer: QueryAnalyzer,
    /// The IP address or DNS name and the port that the socket binds to.
    pub bind: String,
    /// Whether CORS is enabled.
    pub cors: bool,
}
