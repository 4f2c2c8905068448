use sparqlens_common::error::SchemaLookupError;
use sparqlens_model::{TriplePattern, Variable};
use spargebra::SparqlSyntaxError;

/// The query text cannot be turned into a [ParsedQuery](sparqlens_model::ParsedQuery).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MalformedQueryError {
    /// The text is not valid SPARQL.
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    /// Only `SELECT` queries describe tabular results.
    #[error("Only SELECT queries can be analyzed, found a {0} query")]
    UnsupportedQueryForm(&'static str),
    /// The graph pattern uses an operator outside of conjunctive triple patterns.
    #[error("The {0} operator is not supported")]
    UnsupportedOperator(&'static str),
    #[error("The variable {0} is computed by BIND or a SELECT expression, which is not supported")]
    ComputedVariable(Variable),
    #[error("The triple pattern {0} has a variable predicate")]
    VariablePredicate(String),
    #[error("The triple pattern {0} contains a quoted triple")]
    QuotedTriple(String),
    /// A projected variable does not occur in any triple pattern.
    #[error("The projected variable {0} is not bound by any triple pattern")]
    UnboundVariable(Variable),
    #[error("Only variables can be used as ORDER BY keys, found {0}")]
    UnsupportedOrderExpression(String),
    #[error("The query does not contain any triple pattern")]
    EmptyPattern,
}

/// No role can be inferred for a projected variable.
#[derive(Debug, thiserror::Error)]
#[error(
    "The role of {variable} cannot be inferred: the schema declares neither a kind nor a datatype for the property of {pattern}"
)]
pub struct UnclassifiableVariableError {
    pub variable: Variable,
    /// The triple pattern that binds the variable.
    pub pattern: TriplePattern,
}

/// An error that aborts the analysis of a query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error(transparent)]
    Malformed(#[from] MalformedQueryError),
    /// The schema oracle failed while resolving `entity`.
    #[error("Resolving {entity} failed")]
    SchemaLookup {
        entity: String,
        #[source]
        source: SchemaLookupError,
    },
    #[error(transparent)]
    Unclassifiable(#[from] UnclassifiableVariableError),
}
