use crate::error::SchemaLookupError;
use async_trait::async_trait;
use sparqlens_model::{ClassMembership, NamedNodeRef, PropertyDescription};

/// Read-only access to the facts of an RDF schema.
///
/// The analysis of a query resolves every property it uses through the oracle. Answering may
/// require a network round trip, which is the only suspension point of an analysis. The analysis
/// does not retry failed lookups; retries and back-off are the responsibility of the
/// implementation.
///
/// # Concurrency
///
/// Multiple analyses may share an oracle and call it concurrently. Implementations must not rely
/// on the order of the calls.
#[async_trait]
pub trait SchemaOracle: Send + Sync {
    /// Returns a short name of the schema source, used in log messages.
    fn name(&self) -> &str;

    /// Returns the kind, the cardinality characteristics and the datatype of `property`.
    ///
    /// Properties the schema knows nothing about are described with
    /// [PropertyDescription::unknown] instead of being reported as an error.
    async fn resolve_property(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<PropertyDescription, SchemaLookupError>;

    /// Returns whether instances of the class of `membership` can occupy the subject of its
    /// triple pattern.
    async fn resolve_class_membership(
        &self,
        membership: &ClassMembership,
    ) -> Result<bool, SchemaLookupError>;
}
