use crate::SchemaFacts;
use async_trait::async_trait;
use sparqlens_common::error::SchemaLookupError;
use sparqlens_common::SchemaOracle;
use sparqlens_model::{
    ClassMembership, NamedNode, NamedNodeRef, PropertyDescription, SemanticType, Variable,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const BORDER_QUERY: &str = "
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX : <http://www.semwebtech.org/mondial/10/meta#>

SELECT ?country1 ?country2 ?length
WHERE {
  ?b rdf:type :Border ;
     :isBorderOf ?c1 ;
     :isBorderOf ?c2 ;
     :length ?length .

  ?c1 rdf:type :Country ;
      :name ?country1 ;
      :encompassedByInfo ?en .

  ?c2 rdf:type :Country ;
      :name ?country2 ;
      :encompassedByInfo ?en2 .
}";

pub const GDP_QUERY: &str = "
PREFIX : <http://www.semwebtech.org/mondial/10/meta#>

SELECT ?country ?gdpTotal
WHERE {
  ?c a :Country ;
     :name ?country ;
     :gdpTotal ?gdpTotal .
}
ORDER BY DESC(?gdpTotal)
LIMIT 10";

pub fn mondial(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://www.semwebtech.org/mondial/10/meta#{local}"))
}

pub fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn mondial_properties() -> Vec<(NamedNode, PropertyDescription)> {
    vec![
        (
            mondial("name"),
            PropertyDescription::data(Some(SemanticType::Textual)).with_functional(true),
        ),
        (
            mondial("gdpTotal"),
            PropertyDescription::data(Some(SemanticType::Numeric)),
        ),
        (
            mondial("population"),
            PropertyDescription::data(Some(SemanticType::Numeric)),
        ),
        (
            mondial("length"),
            PropertyDescription::data(Some(SemanticType::Numeric)),
        ),
        (
            mondial("independenceDate"),
            PropertyDescription::data(Some(SemanticType::Temporal)),
        ),
        (
            mondial("carCode"),
            PropertyDescription::data(None).with_inverse_functional(true),
        ),
        (mondial("isBorderOf"), PropertyDescription::object()),
        (
            mondial("encompassedByInfo"),
            PropertyDescription::object().with_functional(true),
        ),
    ]
}

pub fn mondial_facts() -> SchemaFacts {
    mondial_properties()
        .into_iter()
        .fold(SchemaFacts::new(), |facts, (property, description)| {
            facts.with_property(property, description)
        })
}

/// An oracle answering from a fixed table and counting the questions it gets.
pub struct FakeOracle {
    properties: Vec<(NamedNode, PropertyDescription)>,
    outside: Vec<(NamedNode, NamedNode)>,
    failing: Option<NamedNode>,
    property_calls: Mutex<Vec<NamedNode>>,
    membership_calls: AtomicUsize,
}

impl FakeOracle {
    pub fn new(properties: Vec<(NamedNode, PropertyDescription)>) -> Self {
        Self {
            properties,
            outside: Vec::new(),
            failing: None,
            property_calls: Mutex::default(),
            membership_calls: AtomicUsize::new(0),
        }
    }

    pub fn mondial() -> Self {
        Self::new(mondial_properties())
    }

    /// Answers that `class` is not involved in `property`.
    #[must_use]
    pub fn with_outside(mut self, class: NamedNode, property: NamedNode) -> Self {
        self.outside.push((class, property));
        self
    }

    /// Fails when asked about `property`.
    #[must_use]
    pub fn failing_on(mut self, property: NamedNode) -> Self {
        self.failing = Some(property);
        self
    }

    pub fn property_lookups(&self) -> usize {
        self.property_calls.lock().map_or(0, |calls| calls.len())
    }

    pub fn property_lookups_of(&self, property: &NamedNode) -> usize {
        self.property_calls.lock().map_or(0, |calls| {
            calls.iter().filter(|called| *called == property).count()
        })
    }

    pub fn membership_lookups(&self) -> usize {
        self.membership_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaOracle for FakeOracle {
    fn name(&self) -> &str {
        "fake"
    }

    async fn resolve_property(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<PropertyDescription, SchemaLookupError> {
        if let Ok(mut calls) = self.property_calls.lock() {
            calls.push(property.into_owned());
        }
        if self.failing.as_ref().is_some_and(|failing| failing.as_ref() == property) {
            return Err(SchemaLookupError::Other("the fake oracle is down".into()));
        }
        Ok(self
            .properties
            .iter()
            .find(|(known, _)| known.as_ref() == property)
            .map(|(_, description)| *description)
            .unwrap_or_default())
    }

    async fn resolve_class_membership(
        &self,
        membership: &ClassMembership,
    ) -> Result<bool, SchemaLookupError> {
        self.membership_calls.fetch_add(1, Ordering::SeqCst);
        Ok(!self
            .outside
            .iter()
            .any(|(class, property)| *class == membership.class && property == membership.property()))
    }
}
