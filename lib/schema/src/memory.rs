use crate::declarations::Declarations;
use async_trait::async_trait;
use oxttl::TurtleParser;
use rustc_hash::FxHashSet;
use sparqlens_common::error::SchemaLookupError;
use sparqlens_common::SchemaOracle;
use sparqlens_model::vocab::{rdf, rdfs};
use sparqlens_model::{
    ClassMembership, Graph, NamedNode, NamedNodeRef, PropertyDescription, TermRef, TripleRef,
};
use std::io::Read;

/// Answers schema questions from an RDF schema held in memory.
///
/// Only declarations are considered. Properties are described by their `rdf:type`s, their
/// `rdfs:range`s and the `rdfs:Datatype` declarations of those ranges. Class memberships follow
/// `rdfs:domain` together with the `rdfs:subClassOf` hierarchy. A property without a declared domain involves every class.
#[derive(Clone, Debug, Default)]
pub struct MemSchemaOracle {
    graph: Graph,
}

impl MemSchemaOracle {
    /// Creates an oracle for an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an oracle for the schema in `graph`.
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }

    /// Reads the schema from a Turtle document.
    pub fn from_turtle_reader(reader: impl Read) -> Result<Self, SchemaLookupError> {
        let mut graph = Graph::new();
        for triple in TurtleParser::new().for_reader(reader) {
            let triple =
                triple.map_err(|error| SchemaLookupError::InvalidSchema(Box::new(error)))?;
            graph.insert(&triple);
        }
        tracing::debug!(triples = graph.len(), "Loaded schema");
        Ok(Self::from_graph(graph))
    }

    /// Returns the number of triples of the schema.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    fn declarations(&self, property: NamedNodeRef<'_>) -> Declarations {
        let ranges = self.named_objects(property, rdfs::RANGE);
        let datatypes = ranges
            .iter()
            .filter(|range| {
                self.graph
                    .contains(TripleRef::new(range.as_ref(), rdf::TYPE, rdfs::DATATYPE))
            })
            .cloned()
            .collect();
        Declarations {
            types: self.named_objects(property, rdf::TYPE),
            ranges,
            datatypes,
        }
    }

    fn named_objects(
        &self,
        subject: NamedNodeRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Vec<NamedNode> {
        self.graph
            .objects_for_subject_predicate(subject, predicate)
            .filter_map(|object| match object {
                TermRef::NamedNode(node) => Some(node.into_owned()),
                _ => None,
            })
            .collect()
    }

    /// Returns `class` and all of its superclasses.
    fn superclasses(&self, class: NamedNodeRef<'_>) -> FxHashSet<NamedNode> {
        let mut visited = FxHashSet::default();
        let mut pending = vec![class.into_owned()];
        while let Some(next) = pending.pop() {
            if !visited.insert(next.clone()) {
                continue;
            }
            pending.extend(self.named_objects(next.as_ref(), rdfs::SUB_CLASS_OF));
        }
        visited
    }
}

#[async_trait]
impl SchemaOracle for MemSchemaOracle {
    fn name(&self) -> &str {
        "memory"
    }

    async fn resolve_property(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<PropertyDescription, SchemaLookupError> {
        self.declarations(property).describe(property)
    }

    async fn resolve_class_membership(
        &self,
        membership: &ClassMembership,
    ) -> Result<bool, SchemaLookupError> {
        let domains = self.named_objects(membership.property().as_ref(), rdfs::DOMAIN);
        if domains.is_empty() {
            return Ok(true);
        }
        let superclasses = self.superclasses(membership.class.as_ref());
        Ok(domains.iter().any(|domain| superclasses.contains(domain)))
    }
}
