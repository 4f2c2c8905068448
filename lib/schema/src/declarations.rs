use sparqlens_common::error::SchemaLookupError;
use sparqlens_model::vocab::owl;
use sparqlens_model::{
    is_datatype_iri, NamedNode, NamedNodeRef, PropertyDescription, PropertyKind, SemanticType,
};

/// What a schema declares about a property: its `rdf:type`s and its `rdfs:range`s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    pub types: Vec<NamedNode>,
    pub ranges: Vec<NamedNode>,
    /// The ranges that are declared as `rdfs:Datatype`.
    pub datatypes: Vec<NamedNode>,
}

impl Declarations {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.ranges.is_empty()
    }

    /// Returns whether the property is declared functional or inverse-functional.
    pub fn declares_characteristic(&self) -> bool {
        self.has_type(owl::FUNCTIONAL_PROPERTY) || self.has_type(owl::INVERSE_FUNCTIONAL_PROPERTY)
    }

    /// Derives the description of `property` from the declarations.
    ///
    /// Every range of a datatype property is a datatype, unknown ones map to
    /// [SemanticType::Other]. Otherwise ranges are datatypes if they are well-known or declared
    /// as `rdfs:Datatype`. Undeclared kinds are taken from the range: datatypes make a data
    /// property, classes an object property. Contradicting declarations are reported as
    /// [SchemaLookupError::Inconsistent].
    pub fn describe(
        &self,
        property: NamedNodeRef<'_>,
    ) -> Result<PropertyDescription, SchemaLookupError> {
        let object = self.has_type(owl::OBJECT_PROPERTY);
        let data = self.has_type(owl::DATATYPE_PROPERTY);
        if object && data {
            return Err(SchemaLookupError::inconsistent(
                property.as_str(),
                "declared as object property and as datatype property",
            ));
        }

        let is_datatype = |range: &NamedNode| data || self.is_datatype(range);
        let datatype_range = self.ranges.iter().find(|r| is_datatype(r));
        let class_range = self.ranges.iter().find(|r| !is_datatype(r));
        if let (true, Some(range)) = (object, datatype_range) {
            return Err(SchemaLookupError::inconsistent(
                property.as_str(),
                format!("object property with the datatype range {range}"),
            ));
        }

        let kind = if object || (class_range.is_some() && datatype_range.is_none()) {
            PropertyKind::Object
        } else if data || datatype_range.is_some() {
            PropertyKind::Data
        } else {
            PropertyKind::Unknown
        };
        Ok(PropertyDescription {
            kind,
            functional: self.has_type(owl::FUNCTIONAL_PROPERTY),
            inverse_functional: self.has_type(owl::INVERSE_FUNCTIONAL_PROPERTY),
            datatype: datatype_range.map(|range| SemanticType::from_datatype(range.as_ref())),
        })
    }

    fn is_datatype(&self, range: &NamedNode) -> bool {
        is_datatype_iri(range.as_ref()) || self.datatypes.contains(range)
    }

    fn has_type(&self, expected: NamedNodeRef<'_>) -> bool {
        self.types.iter().any(|t| t.as_ref() == expected)
    }
}
