//! The class graph of a query.
//!
//! Nodes of the graph are the [ClassBinding]s of a query. Two class nodes are linked if a
//! [PropertyEdge] connects them directly or if they are attached to the same auxiliary node.
//! Connected classes are also linked through the same functional property. The [Signature] of the graph is what the shape rules
//! are matched against.

use crate::facts::SchemaFacts;
use rustc_hash::FxHashMap;
use sparqlens_model::{
    BlankNode, NamedNode, PatternTerm, PropertyCharacteristic, Term, TriplePattern, Variable,
};

/// A node of a query that can be bound to a class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Variable(Variable),
    Blank(BlankNode),
    Iri(NamedNode),
}

impl NodeKey {
    /// Returns the key of `term`, or [None] for literals.
    pub fn from_term(term: &PatternTerm) -> Option<Self> {
        match term {
            PatternTerm::Variable(variable) => Some(NodeKey::Variable(variable.clone())),
            PatternTerm::BlankNode(node) => Some(NodeKey::Blank(node.clone())),
            PatternTerm::Constant(Term::NamedNode(node)) => Some(NodeKey::Iri(node.clone())),
            PatternTerm::Constant(_) => None,
        }
    }
}

/// A node that an `rdf:type` pattern proves to range over a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassBinding {
    pub node: NodeKey,
    pub class: NamedNode,
}

/// The class bindings of a query, in the order of their `rdf:type` patterns.
///
/// Only variables and blank nodes are bound, and the first type of a node wins.
#[derive(Clone, Debug, Default)]
pub struct ClassBindings {
    bindings: Vec<ClassBinding>,
    index: FxHashMap<NodeKey, usize>,
}

impl ClassBindings {
    pub fn from_patterns(patterns: &[TriplePattern]) -> Self {
        let mut result = Self::default();
        for pattern in patterns.iter().filter(|p| p.is_type_assertion()) {
            if !pattern.subject.is_node() {
                continue;
            }
            let (Some(node), Some(class)) = (
                NodeKey::from_term(&pattern.subject),
                pattern.object.as_named_node(),
            ) else {
                continue;
            };
            if result.index.contains_key(&node) {
                continue;
            }
            result.index.insert(node.clone(), result.bindings.len());
            result.bindings.push(ClassBinding {
                node,
                class: class.clone(),
            });
        }
        result
    }

    /// Returns the position of the binding of `term`.
    pub fn index_of(&self, term: &PatternTerm) -> Option<usize> {
        let key = NodeKey::from_term(term)?;
        self.index.get(&key).copied()
    }

    /// Returns the class that `term` is bound to.
    pub fn class_of(&self, term: &PatternTerm) -> Option<&NamedNode> {
        self.index_of(term).map(|index| &self.bindings[index].class)
    }

    pub fn is_bound(&self, variable: &Variable) -> bool {
        self.index
            .contains_key(&NodeKey::Variable(variable.clone()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Whether a [PropertyEdge] ends in another class node or in a literal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Object,
    Data,
}

/// A triple pattern connecting a class node to another class node or to a literal variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEdge {
    pub kind: EdgeKind,
    /// The class node of the subject.
    pub subject: usize,
    /// The class node of the object. [None] for data edges.
    pub object: Option<usize>,
    pub property: NamedNode,
    pub characteristic: PropertyCharacteristic,
}

/// A triple pattern connecting a class node to a node that is not bound to a class.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Attachment {
    class: usize,
    node: NodeKey,
    property: NamedNode,
    functional: bool,
    /// The class node is the subject of the pattern.
    outgoing: bool,
}

/// A pair of class nodes that are connected somehow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassLink {
    pub first: usize,
    pub second: usize,
    /// At least one of the connections goes through a functional or inverse-functional property.
    pub functional: bool,
}

/// The class graph of a query.
#[derive(Clone, Debug)]
pub struct Topology {
    bindings: ClassBindings,
    edges: Vec<PropertyEdge>,
    links: Vec<ClassLink>,
}

impl Topology {
    /// Builds the class graph of `patterns` using the schema answers in `facts`.
    ///
    /// Triples whose subject class the schema does not involve in the property are left out.
    /// Literal constants only restrict solutions and are left out as well.
    pub fn build(patterns: &[TriplePattern], facts: &SchemaFacts) -> Self {
        let bindings = ClassBindings::from_patterns(patterns);
        let mut edges = Vec::new();
        let mut attachments = Vec::new();

        for pattern in patterns.iter().filter(|p| !p.is_type_assertion()) {
            let subject = bindings.index_of(&pattern.subject);
            let object = bindings.index_of(&pattern.object);

            if let Some(class) = bindings.class_of(&pattern.subject) {
                if facts.membership(class, &pattern.predicate) == Some(false) {
                    tracing::warn!(
                        %pattern,
                        %class,
                        "The schema does not involve the class in the pattern, ignoring it"
                    );
                    continue;
                }
            }

            let description = facts.property(&pattern.predicate);
            let characteristic = description.characteristic();
            match (subject, object) {
                (Some(subject), Some(object)) => edges.push(PropertyEdge {
                    kind: EdgeKind::Object,
                    subject,
                    object: Some(object),
                    property: pattern.predicate.clone(),
                    characteristic,
                }),
                (Some(subject), None) => {
                    let Some(node) = NodeKey::from_term(&pattern.object) else {
                        continue;
                    };
                    if pattern.object.is_node() && description.is_data() {
                        edges.push(PropertyEdge {
                            kind: EdgeKind::Data,
                            subject,
                            object: None,
                            property: pattern.predicate.clone(),
                            characteristic,
                        });
                    } else {
                        attachments.push(Attachment {
                            class: subject,
                            node,
                            property: pattern.predicate.clone(),
                            functional: description.is_functional(),
                            outgoing: true,
                        });
                    }
                }
                (None, Some(object)) => {
                    if let Some(node) = NodeKey::from_term(&pattern.subject) {
                        attachments.push(Attachment {
                            class: object,
                            node,
                            property: pattern.predicate.clone(),
                            functional: description.is_functional(),
                            outgoing: false,
                        });
                    }
                }
                (None, None) => {}
            }
        }

        let links = find_links(bindings.len(), &edges, &attachments);
        Self {
            bindings,
            edges,
            links,
        }
    }

    pub fn bindings(&self) -> &ClassBindings {
        &self.bindings
    }

    pub fn edges(&self) -> &[PropertyEdge] {
        &self.edges
    }

    /// The linked pairs of class nodes, ordered by their first and second node.
    pub fn links(&self) -> &[ClassLink] {
        &self.links
    }

    pub fn signature(&self) -> Signature {
        let classes = self.bindings.len();
        let class_links = self.links.len();
        let pairs = classes * classes.saturating_sub(1) / 2;
        Signature {
            classes,
            class_links,
            object_edges: self.count_edges(EdgeKind::Object),
            data_edges: self.count_edges(EdgeKind::Data),
            functional_links: self.links.iter().filter(|link| link.functional).count(),
            fully_linked: classes >= 2 && class_links == pairs,
        }
    }

    fn count_edges(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|edge| edge.kind == kind).count()
    }
}

/// Links the pairs of class nodes.
///
/// A direct edge or a shared auxiliary node always links two classes. The same functional
/// property leaving both classes only links classes that are already connected otherwise.
fn find_links(
    classes: usize,
    edges: &[PropertyEdge],
    attachments: &[Attachment],
) -> Vec<ClassLink> {
    let mut direct = Vec::new();
    let mut same_property = Vec::new();
    for first in 0..classes {
        for second in first + 1..classes {
            let mut linked = false;
            let mut functional = false;

            for edge in edges {
                let Some(object) = edge.object else {
                    continue;
                };
                if (edge.subject, object) == (first, second)
                    || (edge.subject, object) == (second, first)
                {
                    linked = true;
                    functional |= edge.characteristic != PropertyCharacteristic::Neither;
                }
            }

            let mut shares_property = false;
            let of_first = attachments.iter().filter(|a| a.class == first);
            for a in of_first {
                for b in attachments.iter().filter(|b| b.class == second) {
                    if a.node == b.node {
                        linked = true;
                        functional |= a.functional && b.functional;
                    } else if a.property == b.property && a.outgoing && b.outgoing && a.functional
                    {
                        shares_property = true;
                    }
                }
            }

            if linked {
                direct.push(ClassLink {
                    first,
                    second,
                    functional,
                });
            }
            if shares_property {
                same_property.push((first, second));
            }
        }
    }

    let components = Components::new(classes, &direct);
    let mut links = direct;
    for (first, second) in same_property {
        if let Some(link) = links
            .iter_mut()
            .find(|link| (link.first, link.second) == (first, second))
        {
            link.functional = true;
        } else if components.connected(first, second) {
            links.push(ClassLink {
                first,
                second,
                functional: true,
            });
        }
    }
    links.sort_unstable_by_key(|link| (link.first, link.second));
    links
}

/// The connected components of the class nodes.
struct Components {
    parents: Vec<usize>,
}

impl Components {
    fn new(classes: usize, links: &[ClassLink]) -> Self {
        let mut components = Self {
            parents: (0..classes).collect(),
        };
        for link in links {
            let (first, second) = (components.root(link.first), components.root(link.second));
            components.parents[second] = first;
        }
        components
    }

    fn root(&self, mut node: usize) -> usize {
        while self.parents[node] != node {
            node = self.parents[node];
        }
        node
    }

    fn connected(&self, first: usize, second: usize) -> bool {
        self.root(first) == self.root(second)
    }
}

/// The structural summary of a [Topology] that shape rules are matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    /// The number of class nodes.
    pub classes: usize,
    /// The number of linked pairs of class nodes.
    pub class_links: usize,
    pub object_edges: usize,
    pub data_edges: usize,
    /// The number of linked pairs with at least one functional connection.
    pub functional_links: usize,
    /// There are at least two class nodes and every pair of them is linked.
    pub fully_linked: bool,
}
