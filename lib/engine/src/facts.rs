use crate::error::AnalysisError;
use crate::topology::ClassBindings;
use rustc_hash::FxHashMap;
use sparqlens_common::SchemaOracle;
use sparqlens_model::{ClassMembership, NamedNode, ParsedQuery, PropertyDescription};

/// The schema answers needed to analyze a single query.
///
/// Collecting the facts is the only part of an analysis that talks to the [SchemaOracle]. Each
/// distinct property and each distinct (class, property) membership is resolved once, in the
/// order of the triple patterns. The facts are dropped at the end of the analysis.
#[derive(Clone, Debug, Default)]
pub struct SchemaFacts {
    properties: FxHashMap<NamedNode, PropertyDescription>,
    memberships: FxHashMap<(NamedNode, NamedNode), bool>,
}

impl SchemaFacts {
    /// Creates empty facts. Every property is unknown and no membership is known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the properties and class memberships used in `query`.
    ///
    /// The lookups run sequentially. The first failing lookup aborts the collection and is
    /// reported together with the property or class that was being resolved.
    pub async fn collect(
        query: &ParsedQuery,
        oracle: &dyn SchemaOracle,
    ) -> Result<Self, AnalysisError> {
        let mut facts = Self::new();

        for property in query.properties() {
            let description = oracle
                .resolve_property(property.as_ref())
                .await
                .map_err(|source| AnalysisError::SchemaLookup {
                    entity: property.to_string(),
                    source,
                })?;
            tracing::debug!(%property, ?description, "Resolved property");
            facts.properties.insert(property.clone(), description);
        }

        let bindings = ClassBindings::from_patterns(query.patterns());
        for pattern in query.patterns().iter().filter(|p| !p.is_type_assertion()) {
            let Some(class) = bindings.class_of(&pattern.subject) else {
                continue;
            };
            let key = (class.clone(), pattern.predicate.clone());
            if facts.memberships.contains_key(&key) {
                continue;
            }

            let membership = ClassMembership::new(class.clone(), pattern.clone());
            let involved = oracle
                .resolve_class_membership(&membership)
                .await
                .map_err(|source| AnalysisError::SchemaLookup {
                    entity: class.to_string(),
                    source,
                })?;
            tracing::debug!(
                %class,
                property = %pattern.predicate,
                involved,
                "Resolved class membership"
            );
            facts.memberships.insert(key, involved);
        }

        Ok(facts)
    }

    /// Adds the description of `property`.
    #[must_use]
    pub fn with_property(
        mut self,
        property: NamedNode,
        description: PropertyDescription,
    ) -> Self {
        self.properties.insert(property, description);
        self
    }

    /// Adds whether `class` is involved in `property`.
    #[must_use]
    pub fn with_membership(
        mut self,
        class: NamedNode,
        property: NamedNode,
        involved: bool,
    ) -> Self {
        self.memberships.insert((class, property), involved);
        self
    }

    /// Returns the description of `property`. Properties that were not resolved are unknown.
    pub fn property(&self, property: &NamedNode) -> PropertyDescription {
        self.properties
            .get(property)
            .copied()
            .unwrap_or_default()
    }

    /// Returns whether `class` is involved in `property`, if this was resolved.
    pub fn membership(&self, class: &NamedNode, property: &NamedNode) -> Option<bool> {
        self.memberships
            .get(&(class.clone(), property.clone()))
            .copied()
    }
}
