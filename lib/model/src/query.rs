use crate::vocab::rdf;
use oxrdf::{BlankNode, Literal, NamedNode, Term, Variable};
use std::fmt::{Display, Formatter};

/// A single slot of a [TriplePattern].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    /// A variable that is bound by the query evaluation.
    Variable(Variable),
    /// An anonymous node (e.g., `[]` or `_:b0`).
    BlankNode(BlankNode),
    /// A fixed IRI or literal.
    Constant(Term),
}

impl PatternTerm {
    /// Returns the variable of this slot, if it is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            PatternTerm::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Returns the IRI of this slot, if it is a constant IRI.
    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            PatternTerm::Constant(Term::NamedNode(node)) => Some(node),
            _ => None,
        }
    }

    /// Returns whether this slot is a constant literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, PatternTerm::Constant(Term::Literal(_)))
    }

    /// Returns whether this slot can take different values in different solutions.
    pub fn is_node(&self) -> bool {
        matches!(self, PatternTerm::Variable(_) | PatternTerm::BlankNode(_))
    }
}

impl Display for PatternTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternTerm::Variable(variable) => variable.fmt(f),
            PatternTerm::BlankNode(node) => node.fmt(f),
            PatternTerm::Constant(term) => term.fmt(f),
        }
    }
}

impl From<Variable> for PatternTerm {
    fn from(value: Variable) -> Self {
        PatternTerm::Variable(value)
    }
}

impl From<BlankNode> for PatternTerm {
    fn from(value: BlankNode) -> Self {
        PatternTerm::BlankNode(value)
    }
}

impl From<NamedNode> for PatternTerm {
    fn from(value: NamedNode) -> Self {
        PatternTerm::Constant(value.into())
    }
}

impl From<Literal> for PatternTerm {
    fn from(value: Literal) -> Self {
        PatternTerm::Constant(value.into())
    }
}

/// A triple pattern of a basic graph pattern.
///
/// The predicate is always a named property. Patterns with variable predicates cannot be mapped
/// to schema properties and are rejected while parsing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: NamedNode,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<NamedNode>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Returns whether this pattern is an `rdf:type` assertion.
    pub fn is_type_assertion(&self) -> bool {
        self.predicate.as_ref() == rdf::TYPE
    }

    /// Returns whether `variable` occurs in the subject or the object of this pattern.
    pub fn mentions(&self, variable: &Variable) -> bool {
        self.subject.as_variable() == Some(variable) || self.object.as_variable() == Some(variable)
    }
}

impl Display for TriplePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// The direction of an `ORDER BY` key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A single `ORDER BY` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub variable: Variable,
    pub direction: SortDirection,
}

/// Solution modifiers of a query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryModifiers {
    /// The sort keys in the order of the `ORDER BY` clause.
    pub order_by: Vec<OrderKey>,
    /// The value of the `LIMIT` clause.
    pub limit: Option<usize>,
    /// The value of the `OFFSET` clause. Zero if absent.
    pub offset: usize,
    /// Whether duplicate solutions are eliminated (`DISTINCT` or `REDUCED`).
    pub distinct: bool,
}

/// A query reduced to the parts that determine its shape.
///
/// The triple patterns keep the order of the query text. Their order is irrelevant for the
/// semantics but is used for diagnostics and to break ties deterministically. The projection
/// defines the column order of the results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedQuery {
    patterns: Vec<TriplePattern>,
    projection: Vec<Variable>,
    modifiers: QueryModifiers,
}

impl ParsedQuery {
    /// Creates a new [ParsedQuery].
    ///
    /// The caller is responsible for checking that every projected variable is bound (see
    /// [Self::first_unbound_projection]).
    pub fn new(
        patterns: Vec<TriplePattern>,
        projection: Vec<Variable>,
        modifiers: QueryModifiers,
    ) -> Self {
        Self {
            patterns,
            projection,
            modifiers,
        }
    }

    pub fn patterns(&self) -> &[TriplePattern] {
        &self.patterns
    }

    pub fn projection(&self) -> &[Variable] {
        &self.projection
    }

    pub fn modifiers(&self) -> &QueryModifiers {
        &self.modifiers
    }

    /// Returns whether `variable` occurs in at least one triple pattern.
    pub fn is_bound(&self, variable: &Variable) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.mentions(variable))
    }

    /// Returns the first projected variable that no triple pattern binds.
    pub fn first_unbound_projection(&self) -> Option<&Variable> {
        self.projection
            .iter()
            .find(|variable| !self.is_bound(variable))
    }

    /// Returns the distinct predicates other than `rdf:type`, in order of first appearance.
    pub fn properties(&self) -> Vec<&NamedNode> {
        let mut result: Vec<&NamedNode> = Vec::new();
        for pattern in self.patterns.iter().filter(|p| !p.is_type_assertion()) {
            if !result.contains(&&pattern.predicate) {
                result.push(&pattern.predicate);
            }
        }
        result
    }
}
