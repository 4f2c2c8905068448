use crate::declarations::Declarations;
use crate::queries;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use sparesults::{
    QueryResultsFormat, QueryResultsParser, QuerySolution, ReaderQueryResultsParserOutput,
};
use sparqlens_common::error::SchemaLookupError;
use sparqlens_common::SchemaOracle;
use sparqlens_model::{
    ClassMembership, NamedNode, NamedNodeRef, PropertyDescription, PropertyKind, SemanticType,
    Term,
};
use std::time::Duration;

/// The time after which a request to the endpoint is abandoned, unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Holds the configuration of a [RemoteSchemaOracle].
#[derive(Clone, Debug)]
pub struct RemoteSchemaOracleConfig {
    /// The SPARQL query endpoint.
    pub endpoint: Url,
    /// The timeout of a single request.
    pub timeout: Duration,
}

impl RemoteSchemaOracleConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Answers schema questions by querying a SPARQL endpoint.
///
/// Properties are described by their declarations (`rdf:type` and `rdfs:range`). If a property
/// declares neither a kind nor a datatype, a sample value decides them. If it declares neither
/// `owl:FunctionalProperty` nor `owl:InverseFunctionalProperty`, its characteristics are derived
/// from the data.
///
/// Requests are not retried.
#[derive(Clone, Debug)]
pub struct RemoteSchemaOracle {
    client: Client,
    config: RemoteSchemaOracleConfig,
}

impl RemoteSchemaOracle {
    /// Creates a new [RemoteSchemaOracle].
    pub fn new(config: RemoteSchemaOracleConfig) -> Result<Self, SchemaLookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| SchemaLookupError::Other(Box::new(error)))?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }

    async fn select(&self, query: &str) -> Result<Vec<QuerySolution>, SchemaLookupError> {
        match self.send(query).await? {
            QueryAnswer::Solutions(solutions) => Ok(solutions),
            QueryAnswer::Boolean(_) => Err(SchemaLookupError::inconsistent(
                self.config.endpoint.as_str(),
                "expected solutions but got a boolean",
            )),
        }
    }

    async fn ask(&self, query: &str) -> Result<bool, SchemaLookupError> {
        match self.send(query).await? {
            QueryAnswer::Boolean(value) => Ok(value),
            QueryAnswer::Solutions(_) => Err(SchemaLookupError::inconsistent(
                self.config.endpoint.as_str(),
                "expected a boolean but got solutions",
            )),
        }
    }

    async fn send(&self, query: &str) -> Result<QueryAnswer, SchemaLookupError> {
        tracing::trace!(endpoint = %self.config.endpoint, query, "Sending schema query");
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|error| SchemaLookupError::Unreachable {
                endpoint: self.config.endpoint.to_string(),
                source: Box::new(error),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SchemaLookupError::UnexpectedStatus {
                endpoint: self.config.endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| SchemaLookupError::InvalidResponse(Box::new(error)))?;
        parse_answer(&body)
    }

    async fn declarations(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<Declarations, SchemaLookupError> {
        let solutions = self.select(&queries::declarations(property)).await?;
        Ok(Declarations {
            types: named_nodes(&solutions, "type"),
            ranges: named_nodes(&solutions, "range"),
            datatypes: named_nodes(&solutions, "datatype"),
        })
    }
}

#[async_trait]
impl SchemaOracle for RemoteSchemaOracle {
    fn name(&self) -> &str {
        self.config.endpoint.as_str()
    }

    async fn resolve_property(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<PropertyDescription, SchemaLookupError> {
        let declarations = self.declarations(property).await?;
        let mut description = declarations.describe(property)?;

        let sample = self
            .select(&queries::sample_value(property))
            .await?
            .into_iter()
            .find_map(|solution| solution.get("value").cloned());
        let Some(sample) = sample else {
            // Without data there is nothing to derive.
            return Ok(description);
        };

        if description.datatype.is_none() && description.kind != PropertyKind::Object {
            description = apply_sample(description, &sample);
        }
        if !declarations.declares_characteristic() {
            description.functional = !self.ask(&queries::has_multiple_values(property)).await?;
            description.inverse_functional =
                !self.ask(&queries::has_shared_values(property)).await?;
        }

        tracing::debug!(%property, ?description, "Described property");
        Ok(description)
    }

    async fn resolve_class_membership(
        &self,
        membership: &ClassMembership,
    ) -> Result<bool, SchemaLookupError> {
        let property = membership.property().as_ref();
        let domains = self.select(&queries::domains(property)).await?;
        if named_nodes(&domains, "domain").contains(&membership.class) {
            return Ok(true);
        }
        self.ask(&queries::is_involved(membership.class.as_ref(), property))
            .await
    }
}

/// A parsed SPARQL query results document.
#[derive(Debug)]
enum QueryAnswer {
    Solutions(Vec<QuerySolution>),
    Boolean(bool),
}

fn parse_answer(body: &[u8]) -> Result<QueryAnswer, SchemaLookupError> {
    let parser = QueryResultsParser::from_format(QueryResultsFormat::Json);
    let output = parser
        .for_reader(body)
        .map_err(|error| SchemaLookupError::InvalidResponse(Box::new(error)))?;
    match output {
        ReaderQueryResultsParserOutput::Solutions(solutions) => {
            let solutions = solutions
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| SchemaLookupError::InvalidResponse(Box::new(error)))?;
            Ok(QueryAnswer::Solutions(solutions))
        }
        ReaderQueryResultsParserOutput::Boolean(value) => Ok(QueryAnswer::Boolean(value)),
    }
}

/// Returns the distinct IRIs bound to `variable`, in solution order.
fn named_nodes(solutions: &[QuerySolution], variable: &str) -> Vec<NamedNode> {
    let mut result = Vec::new();
    for solution in solutions {
        if let Some(Term::NamedNode(node)) = solution.get(variable) {
            if !result.contains(node) {
                result.push(node.clone());
            }
        }
    }
    result
}

/// Completes `description` with the kind and datatype of a sample value.
fn apply_sample(description: PropertyDescription, sample: &Term) -> PropertyDescription {
    match sample {
        Term::Literal(literal) => PropertyDescription {
            kind: PropertyKind::Data,
            datatype: Some(SemanticType::from_datatype(literal.datatype())),
            ..description
        },
        Term::NamedNode(_) | Term::BlankNode(_) if description.kind == PropertyKind::Unknown => {
            PropertyDescription {
                kind: PropertyKind::Object,
                ..description
            }
        }
        _ => description,
    }
}
