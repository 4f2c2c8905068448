use crate::query::TriplePattern;
use crate::vocab::{owl, rdf, rdfs, xsd};
use oxrdf::{NamedNode, NamedNodeRef};

/// How a property relates its subject to its values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// The values are resources (instances of classes).
    Object,
    /// The values are literals.
    Data,
    /// The schema does not say.
    #[default]
    Unknown,
}

/// The meaning of a literal datatype for presentation purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Numeric,
    Temporal,
    Textual,
    Boolean,
    Other,
}

const NUMERIC_DATATYPES: [NamedNodeRef<'static>; 16] = [
    xsd::INTEGER,
    xsd::DECIMAL,
    xsd::DOUBLE,
    xsd::FLOAT,
    xsd::INT,
    xsd::LONG,
    xsd::SHORT,
    xsd::BYTE,
    xsd::NON_NEGATIVE_INTEGER,
    xsd::NON_POSITIVE_INTEGER,
    xsd::POSITIVE_INTEGER,
    xsd::NEGATIVE_INTEGER,
    xsd::UNSIGNED_LONG,
    xsd::UNSIGNED_INT,
    xsd::UNSIGNED_SHORT,
    xsd::UNSIGNED_BYTE,
];

const TEMPORAL_DATATYPES: [NamedNodeRef<'static>; 12] = [
    xsd::DATE,
    xsd::DATE_TIME,
    xsd::DATE_TIME_STAMP,
    xsd::TIME,
    xsd::G_YEAR,
    xsd::G_YEAR_MONTH,
    xsd::G_MONTH,
    xsd::G_MONTH_DAY,
    xsd::G_DAY,
    xsd::DURATION,
    xsd::DAY_TIME_DURATION,
    xsd::YEAR_MONTH_DURATION,
];

const TEXTUAL_DATATYPES: [NamedNodeRef<'static>; 9] = [
    xsd::STRING,
    xsd::NORMALIZED_STRING,
    xsd::TOKEN,
    xsd::LANGUAGE,
    xsd::NAME,
    xsd::NC_NAME,
    xsd::ANY_URI,
    rdf::LANG_STRING,
    rdfs::LITERAL,
];

impl SemanticType {
    /// Maps a datatype IRI to its semantic type.
    pub fn from_datatype(datatype: NamedNodeRef<'_>) -> Self {
        if NUMERIC_DATATYPES.contains(&datatype) {
            SemanticType::Numeric
        } else if TEMPORAL_DATATYPES.contains(&datatype) {
            SemanticType::Temporal
        } else if TEXTUAL_DATATYPES.contains(&datatype) {
            SemanticType::Textual
        } else if datatype == xsd::BOOLEAN {
            SemanticType::Boolean
        } else {
            SemanticType::Other
        }
    }

    /// Returns whether values of this type are quantitative or ordinal.
    pub fn is_scalar(self) -> bool {
        matches!(self, SemanticType::Numeric | SemanticType::Temporal)
    }
}

/// Well-known datatypes outside of the XML Schema namespace.
const NON_XSD_DATATYPES: [NamedNodeRef<'static>; 7] = [
    rdf::LANG_STRING,
    rdfs::LITERAL,
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral"),
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML"),
    NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON"),
    owl::REAL,
    owl::RATIONAL,
];

/// Returns whether `iri` is a well-known literal datatype.
///
/// Schemas may declare further datatypes with `rdfs:Datatype`; those are not recognized here.
pub fn is_datatype_iri(iri: NamedNodeRef<'_>) -> bool {
    iri.as_str().starts_with("http://www.w3.org/2001/XMLSchema#")
        || NON_XSD_DATATYPES.contains(&iri)
}

/// The cardinality characteristic of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyCharacteristic {
    Functional,
    InverseFunctional,
    Neither,
}

/// What the schema knows about a property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyDescription {
    pub kind: PropertyKind,
    /// Every subject has at most one value.
    pub functional: bool,
    /// Every value has at most one subject.
    pub inverse_functional: bool,
    /// The semantic type of the values, if they are literals of a known datatype.
    pub datatype: Option<SemanticType>,
}

impl PropertyDescription {
    /// A property the schema knows nothing about.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// An object property without cardinality restrictions.
    pub fn object() -> Self {
        Self {
            kind: PropertyKind::Object,
            ..Self::default()
        }
    }

    /// A data property with the given datatype.
    pub fn data(datatype: Option<SemanticType>) -> Self {
        Self {
            kind: PropertyKind::Data,
            datatype,
            ..Self::default()
        }
    }

    /// Marks the property as functional.
    #[must_use]
    pub fn with_functional(mut self, functional: bool) -> Self {
        self.functional = functional;
        self
    }

    /// Marks the property as inverse-functional.
    #[must_use]
    pub fn with_inverse_functional(mut self, inverse_functional: bool) -> Self {
        self.inverse_functional = inverse_functional;
        self
    }

    /// Returns the characteristic of the property. Functional takes precedence if the property
    /// is both.
    pub fn characteristic(&self) -> PropertyCharacteristic {
        if self.functional {
            PropertyCharacteristic::Functional
        } else if self.inverse_functional {
            PropertyCharacteristic::InverseFunctional
        } else {
            PropertyCharacteristic::Neither
        }
    }

    /// Returns whether the property is functional in either direction.
    pub fn is_functional(&self) -> bool {
        self.characteristic() != PropertyCharacteristic::Neither
    }

    /// Returns whether the values of the property are literals.
    pub fn is_data(&self) -> bool {
        match self.kind {
            PropertyKind::Data => true,
            PropertyKind::Object => false,
            PropertyKind::Unknown => self.datatype.is_some(),
        }
    }
}

/// Asks whether instances of `class` can occupy the subject of `pattern`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassMembership {
    pub class: NamedNode,
    pub pattern: TriplePattern,
}

impl ClassMembership {
    pub fn new(class: NamedNode, pattern: TriplePattern) -> Self {
        Self { class, pattern }
    }

    /// The property of the asked pattern.
    pub fn property(&self) -> &NamedNode {
        &self.pattern.predicate
    }
}
