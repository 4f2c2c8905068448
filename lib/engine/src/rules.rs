//! The declarative rules that drive classification and recommendation.
//!
//! A [RuleSet] holds an ordered list of [ShapeRule]s, matched against the [Signature] of a query,
//! and a table of [ChartRule]s, matched against the pattern label and the role counts. The
//! built-in rules are available through [RuleSet::default]. Alternative rule sets can be loaded
//! from JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "shapes": [
//!     {
//!       "label": "Class with data properties",
//!       "classes": {"exactly": 1},
//!       "object_edges": {"exactly": 0},
//!       "data_edges": {"at_least": 1}
//!     }
//!   ],
//!   "charts": [
//!     {
//!       "pattern": "Class with data properties",
//!       "scalar": {"at_least": 1},
//!       "lexical": {"exactly": 1},
//!       "charts": ["Bar", "Pie"]
//!     }
//!   ]
//! }
//! ```

use crate::topology::Signature;
use serde::{Deserialize, Serialize};
use sparqlens_model::{ChartType, PatternLabel};
use std::collections::BTreeSet;
use std::io::Read;

/// The only rule set version that is understood.
pub const RULE_SET_VERSION: u32 = 1;

/// A constraint on a count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Count {
    #[default]
    Any,
    Exactly(usize),
    AtLeast(usize),
}

impl Count {
    pub fn matches(self, count: usize) -> bool {
        match self {
            Count::Any => true,
            Count::Exactly(expected) => count == expected,
            Count::AtLeast(minimum) => count >= minimum,
        }
    }
}

/// Assigns `label` to queries whose signature satisfies every constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRule {
    pub label: PatternLabel,
    #[serde(default)]
    pub classes: Count,
    #[serde(default)]
    pub class_links: Count,
    #[serde(default)]
    pub object_edges: Count,
    #[serde(default)]
    pub data_edges: Count,
    #[serde(default)]
    pub functional_links: Count,
    /// Requires every pair of class nodes to be linked.
    #[serde(default)]
    pub fully_linked: bool,
}

impl ShapeRule {
    pub fn matches(&self, signature: &Signature) -> bool {
        self.classes.matches(signature.classes)
            && self.class_links.matches(signature.class_links)
            && self.object_edges.matches(signature.object_edges)
            && self.data_edges.matches(signature.data_edges)
            && self.functional_links.matches(signature.functional_links)
            && (!self.fully_linked || signature.fully_linked)
    }
}

/// Recommends `charts` for queries of `pattern` whose role counts satisfy both constraints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRule {
    pub pattern: PatternLabel,
    #[serde(default)]
    pub scalar: Count,
    #[serde(default)]
    pub lexical: Count,
    pub charts: Vec<ChartType>,
}

impl ChartRule {
    pub fn matches(&self, pattern: PatternLabel, scalar: usize, lexical: usize) -> bool {
        self.pattern == pattern && self.scalar.matches(scalar) && self.lexical.matches(lexical)
    }
}

/// An error while loading a [RuleSet].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleSetError {
    #[error("The rule set is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rule set version {0} is not supported, expected version {RULE_SET_VERSION}")]
    UnsupportedVersion(u32),
    /// Unmatched queries are labelled `unrecognized` implicitly.
    #[error("Shape rule {0} assigns the unrecognized label")]
    UnrecognizedShape(usize),
    /// Unrecognized queries never get recommendations.
    #[error("Chart rule {0} targets the unrecognized pattern")]
    UnrecognizedChartTarget(usize),
}

/// A versioned set of shape rules and chart rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: u32,
    pub shapes: Vec<ShapeRule>,
    pub charts: Vec<ChartRule>,
}

impl RuleSet {
    /// Reads and validates a rule set from JSON.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, RuleSetError> {
        let rules: RuleSet = serde_json::from_reader(reader)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RuleSetError> {
        if self.version != RULE_SET_VERSION {
            return Err(RuleSetError::UnsupportedVersion(self.version));
        }
        if let Some(index) = self
            .shapes
            .iter()
            .position(|rule| !rule.label.is_recognized())
        {
            return Err(RuleSetError::UnrecognizedShape(index));
        }
        if let Some(index) = self
            .charts
            .iter()
            .position(|rule| !rule.pattern.is_recognized())
        {
            return Err(RuleSetError::UnrecognizedChartTarget(index));
        }
        Ok(())
    }

    /// Returns the label of the first shape rule that matches `signature`.
    pub fn label_for(&self, signature: &Signature) -> PatternLabel {
        self.shapes
            .iter()
            .find(|rule| rule.matches(signature))
            .map_or(PatternLabel::Unrecognized, |rule| rule.label)
    }

    /// Returns the union of the charts of all matching chart rules.
    pub fn charts_for(
        &self,
        pattern: PatternLabel,
        scalar: usize,
        lexical: usize,
    ) -> BTreeSet<ChartType> {
        self.charts
            .iter()
            .filter(|rule| rule.matches(pattern, scalar, lexical))
            .flat_map(|rule| rule.charts.iter().copied())
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        use PatternLabel::{ClassWithDataProperties, ThreeClassesLinkedByFunctionalProperties};

        Self {
            version: RULE_SET_VERSION,
            shapes: vec![
                ShapeRule {
                    label: ClassWithDataProperties,
                    classes: Count::Exactly(1),
                    class_links: Count::Any,
                    object_edges: Count::Exactly(0),
                    data_edges: Count::AtLeast(1),
                    functional_links: Count::Any,
                    fully_linked: false,
                },
                ShapeRule {
                    label: ThreeClassesLinkedByFunctionalProperties,
                    classes: Count::Exactly(3),
                    class_links: Count::Any,
                    object_edges: Count::Any,
                    data_edges: Count::Any,
                    functional_links: Count::AtLeast(1),
                    fully_linked: true,
                },
            ],
            charts: vec![
                ChartRule {
                    pattern: ClassWithDataProperties,
                    scalar: Count::AtLeast(1),
                    lexical: Count::Exactly(1),
                    charts: vec![ChartType::Bar, ChartType::Pie],
                },
                ChartRule {
                    pattern: ClassWithDataProperties,
                    scalar: Count::Exactly(1),
                    lexical: Count::Exactly(1),
                    charts: vec![ChartType::WordCloud],
                },
                ChartRule {
                    pattern: ClassWithDataProperties,
                    scalar: Count::AtLeast(2),
                    lexical: Count::Any,
                    charts: vec![ChartType::Scatter],
                },
                ChartRule {
                    pattern: ClassWithDataProperties,
                    scalar: Count::AtLeast(3),
                    lexical: Count::Any,
                    charts: vec![ChartType::Bubble],
                },
                ChartRule {
                    pattern: ThreeClassesLinkedByFunctionalProperties,
                    scalar: Count::Any,
                    lexical: Count::AtLeast(2),
                    charts: vec![ChartType::Network],
                },
                ChartRule {
                    pattern: ThreeClassesLinkedByFunctionalProperties,
                    scalar: Count::AtLeast(1),
                    lexical: Count::AtLeast(2),
                    charts: vec![ChartType::Sankey, ChartType::ChordDiagram, ChartType::HeatMap],
                },
            ],
        }
    }
}
