#![cfg(test)]
#![allow(clippy::panic_in_result_fn)]

use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use sparqlens_common::error::SchemaLookupError;
use sparqlens_common::SchemaOracle;
use sparqlens_model::{
    ClassMembership, NamedNode, PropertyDescription, PropertyKind, SemanticType, TriplePattern,
    Variable,
};
use sparqlens_schema::{RemoteSchemaOracle, RemoteSchemaOracleConfig, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const MONDIAL: &str = "http://www.semwebtech.org/mondial/10/meta#";
const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

#[derive(Deserialize)]
struct QueryForm {
    query: String,
}

#[derive(Clone)]
struct Endpoint {
    answers: fn(&str) -> Option<String>,
    requests: Arc<AtomicUsize>,
}

async fn sparql(State(endpoint): State<Endpoint>, Form(form): Form<QueryForm>) -> Response {
    endpoint.requests.fetch_add(1, Ordering::SeqCst);
    match (endpoint.answers)(&form.query) {
        Some(body) => (
            [(header::CONTENT_TYPE, "application/sparql-results+json")],
            body,
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Starts a SPARQL endpoint on a free port that answers with `answers`.
async fn start_endpoint(answers: fn(&str) -> Option<String>) -> (Url, Arc<AtomicUsize>) {
    let requests = Arc::new(AtomicUsize::new(0));
    let endpoint = Endpoint {
        answers,
        requests: Arc::clone(&requests),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/sparql", post(sparql))
        .with_state(endpoint);
    tokio::spawn(async move { axum::serve(listener, app).await });
    let url = Url::parse(&format!("http://{address}/sparql")).unwrap();
    (url, requests)
}

fn oracle(endpoint: Url) -> RemoteSchemaOracle {
    let config = RemoteSchemaOracleConfig {
        endpoint,
        timeout: Duration::from_secs(5),
    };
    RemoteSchemaOracle::new(config).unwrap()
}

fn uris(bindings: &[(&str, &str)]) -> String {
    let mut vars: Vec<&str> = bindings.iter().map(|(var, _)| *var).collect();
    vars.dedup();
    let rows: Vec<String> = bindings
        .iter()
        .map(|(var, iri)| format!(r#"{{"{var}": {{"type": "uri", "value": "{iri}"}}}}"#))
        .collect();
    format!(
        r#"{{"head": {{"vars": {vars:?}}}, "results": {{"bindings": [{}]}}}}"#,
        rows.join(", ")
    )
}

fn literal(var: &str, value: &str, datatype: &str) -> String {
    format!(
        r#"{{"head": {{"vars": ["{var}"]}}, "results": {{"bindings": [{{"{var}": {{"type": "literal", "value": "{value}", "datatype": "{datatype}"}}}}]}}}}"#
    )
}

fn boolean(value: bool) -> String {
    format!(r#"{{"head": {{}}, "boolean": {value}}}"#)
}

fn mondial_answers(query: &str) -> Option<String> {
    let about = |local: &str| query.contains(&format!("{MONDIAL}{local}>"));
    let border = format!("{MONDIAL}Border");

    if query.starts_with("SELECT ?type") {
        if about("length") {
            return Some(uris(&[
                ("type", OWL_DATATYPE_PROPERTY),
                ("range", XSD_DECIMAL),
            ]));
        }
        return Some(uris(&[]));
    }
    if query.starts_with("SELECT ?value") {
        if about("length") {
            return Some(literal("value", "1200.5", XSD_DECIMAL));
        }
        if about("population") {
            return Some(literal("value", "83000000", XSD_INTEGER));
        }
        return Some(uris(&[]));
    }
    if query.starts_with("ASK { ?subject") {
        // No subject has two values.
        return Some(boolean(false));
    }
    if query.starts_with("ASK { ?first") {
        // Some values are shared.
        return Some(boolean(true));
    }
    if query.starts_with("SELECT ?domain") {
        if about("length") {
            return Some(uris(&[("domain", border.as_str())]));
        }
        return Some(uris(&[]));
    }
    if query.starts_with("ASK { {") {
        return Some(boolean(about("Country") && about("gdpTotal")));
    }
    None
}

fn mondial(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{MONDIAL}{local}"))
}

fn membership(class: &str, property: &str) -> ClassMembership {
    ClassMembership::new(
        mondial(class),
        TriplePattern::new(
            Variable::new_unchecked("x"),
            mondial(property),
            Variable::new_unchecked("y"),
        ),
    )
}

#[tokio::test]
async fn test_declared_property_with_derived_characteristics() -> Result<(), SchemaLookupError> {
    let (url, _) = start_endpoint(mondial_answers).await;
    let description = oracle(url)
        .resolve_property(mondial("length").as_ref())
        .await?;
    assert_eq!(
        description,
        PropertyDescription::data(Some(SemanticType::Numeric)).with_functional(true)
    );
    Ok(())
}

#[tokio::test]
async fn test_undeclared_property_uses_sample() -> Result<(), SchemaLookupError> {
    let (url, _) = start_endpoint(mondial_answers).await;
    let description = oracle(url)
        .resolve_property(mondial("population").as_ref())
        .await?;
    assert_eq!(description.kind, PropertyKind::Data);
    assert_eq!(description.datatype, Some(SemanticType::Numeric));
    Ok(())
}

#[tokio::test]
async fn test_unused_property_is_not_derived() -> Result<(), SchemaLookupError> {
    let (url, requests) = start_endpoint(mondial_answers).await;
    let description = oracle(url)
        .resolve_property(mondial("unused").as_ref())
        .await?;
    assert_eq!(description, PropertyDescription::unknown());
    // Declarations and sample only.
    assert_eq!(requests.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_membership() -> Result<(), SchemaLookupError> {
    let (url, requests) = start_endpoint(mondial_answers).await;
    let oracle = oracle(url);

    assert!(oracle.resolve_class_membership(&membership("Border", "length")).await?);
    assert_eq!(requests.load(Ordering::SeqCst), 1);

    assert!(oracle.resolve_class_membership(&membership("Country", "gdpTotal")).await?);
    assert!(!oracle.resolve_class_membership(&membership("Continent", "length")).await?);
    Ok(())
}

#[tokio::test]
async fn test_unexpected_status() {
    let (url, _) = start_endpoint(|_| None).await;
    let result = oracle(url)
        .resolve_property(mondial("length").as_ref())
        .await;
    assert!(matches!(
        result,
        Err(SchemaLookupError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{address}/sparql")).unwrap();
    let result = oracle(url)
        .resolve_property(mondial("length").as_ref())
        .await;
    assert!(matches!(result, Err(SchemaLookupError::Unreachable { .. })));
}
