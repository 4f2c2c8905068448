use crate::error::{UnknownChartTypeError, UnknownPatternLabelError};
use oxrdf::Variable;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The semantic role of a projected variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableRole {
    /// Quantitative or ordinal values that typically feed axes or sizes.
    Scalar,
    /// Identifying or categorical values that typically feed labels.
    Lexical,
}

impl Display for VariableRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableRole::Scalar => f.write_str("scalar"),
            VariableRole::Lexical => f.write_str("lexical"),
        }
    }
}

/// The roles of the projected variables, in projection order.
///
/// Each variable has exactly one role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableRoles {
    roles: Vec<(Variable, VariableRole)>,
}

impl VariableRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `role` to `variable`. Returns the previous role if the variable already had one,
    /// in which case the new role replaces it.
    pub fn insert(&mut self, variable: Variable, role: VariableRole) -> Option<VariableRole> {
        if let Some((_, existing)) = self.roles.iter_mut().find(|(v, _)| *v == variable) {
            return Some(std::mem::replace(existing, role));
        }
        self.roles.push((variable, role));
        None
    }

    pub fn get(&self, variable: &Variable) -> Option<VariableRole> {
        self.roles
            .iter()
            .find(|(v, _)| v == variable)
            .map(|(_, role)| *role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, VariableRole)> {
        self.roles.iter().map(|(variable, role)| (variable, *role))
    }

    /// Returns the variables that have `role`, in projection order.
    pub fn variables_with(&self, role: VariableRole) -> impl Iterator<Item = &Variable> {
        self.roles
            .iter()
            .filter(move |(_, r)| *r == role)
            .map(|(variable, _)| variable)
    }

    /// Returns how many variables have `role`.
    pub fn count(&self, role: VariableRole) -> usize {
        self.variables_with(role).count()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<(Variable, VariableRole)> for VariableRoles {
    fn from_iter<T: IntoIterator<Item = (Variable, VariableRole)>>(iter: T) -> Self {
        let mut roles = Self::new();
        for (variable, role) in iter {
            roles.insert(variable, role);
        }
        roles
    }
}

/// The structural shape of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternLabel {
    /// A single class whose data properties are selected.
    ClassWithDataProperties,
    /// Three classes that are pairwise linked, at least one link being functional.
    ThreeClassesLinkedByFunctionalProperties,
    /// No shape rule matched.
    Unrecognized,
}

impl PatternLabel {
    pub const ALL: [PatternLabel; 3] = [
        PatternLabel::ClassWithDataProperties,
        PatternLabel::ThreeClassesLinkedByFunctionalProperties,
        PatternLabel::Unrecognized,
    ];

    /// The human-readable name that is also used for serialization.
    pub fn name(self) -> &'static str {
        match self {
            PatternLabel::ClassWithDataProperties => "Class with data properties",
            PatternLabel::ThreeClassesLinkedByFunctionalProperties => {
                "Three classes linked by functional properties"
            }
            PatternLabel::Unrecognized => "unrecognized",
        }
    }

    pub fn is_recognized(self) -> bool {
        self != PatternLabel::Unrecognized
    }
}

impl Display for PatternLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternLabel {
    type Err = UnknownPatternLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.name() == s)
            .ok_or_else(|| UnknownPatternLabelError(s.to_owned()))
    }
}

impl Serialize for PatternLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for PatternLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// A kind of chart that can present query results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartType {
    Bar,
    Pie,
    Line,
    Area,
    TreeMap,
    CirclePacking,
    Sunburst,
    Spider,
    StackedBar,
    GroupedBar,
    Sankey,
    Scatter,
    Bubble,
    ChordDiagram,
    HeatMap,
    WordCloud,
    Calendar,
    HierarchyTree,
    Network,
    ChoroplethMap,
    /// A node-link rendering of the result triples.
    Graph,
}

impl ChartType {
    pub const ALL: [ChartType; 21] = [
        ChartType::Bar,
        ChartType::Pie,
        ChartType::Line,
        ChartType::Area,
        ChartType::TreeMap,
        ChartType::CirclePacking,
        ChartType::Sunburst,
        ChartType::Spider,
        ChartType::StackedBar,
        ChartType::GroupedBar,
        ChartType::Sankey,
        ChartType::Scatter,
        ChartType::Bubble,
        ChartType::ChordDiagram,
        ChartType::HeatMap,
        ChartType::WordCloud,
        ChartType::Calendar,
        ChartType::HierarchyTree,
        ChartType::Network,
        ChartType::ChoroplethMap,
        ChartType::Graph,
    ];

    /// The human-readable name that is also used for serialization.
    pub fn name(self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Pie => "Pie",
            ChartType::Line => "Line",
            ChartType::Area => "Area",
            ChartType::TreeMap => "Tree Map",
            ChartType::CirclePacking => "Circle Packing",
            ChartType::Sunburst => "Sunburst",
            ChartType::Spider => "Spider",
            ChartType::StackedBar => "Stacked Bar",
            ChartType::GroupedBar => "Grouped Bar",
            ChartType::Sankey => "Sankey",
            ChartType::Scatter => "Scatter",
            ChartType::Bubble => "Bubble",
            ChartType::ChordDiagram => "Chord Diagram",
            ChartType::HeatMap => "Heat Map",
            ChartType::WordCloud => "Word Cloud",
            ChartType::Calendar => "Calendar",
            ChartType::HierarchyTree => "Hierarchy Tree",
            ChartType::Network => "Network",
            ChartType::ChoroplethMap => "Choropleth Map",
            ChartType::Graph => "Graph",
        }
    }
}

impl Display for ChartType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = UnknownChartTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|chart| chart.name() == s)
            .ok_or_else(|| UnknownChartTypeError(s.to_owned()))
    }
}

impl Serialize for ChartType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ChartType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// The projected variable names grouped by role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub scalar: Vec<String>,
    pub lexical: Vec<String>,
}

impl From<&VariableRoles> for RoleSummary {
    fn from(roles: &VariableRoles) -> Self {
        let names = |role| {
            roles
                .variables_with(role)
                .map(|variable| variable.as_str().to_owned())
                .collect()
        };
        Self {
            scalar: names(VariableRole::Scalar),
            lexical: names(VariableRole::Lexical),
        }
    }
}

/// The outcome of analyzing a single query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pattern: PatternLabel,
    variables: RoleSummary,
    visualisations: BTreeSet<ChartType>,
}

impl AnalysisResult {
    pub fn new(
        pattern: PatternLabel,
        roles: &VariableRoles,
        visualisations: BTreeSet<ChartType>,
    ) -> Self {
        Self {
            pattern,
            variables: roles.into(),
            visualisations,
        }
    }

    pub fn pattern(&self) -> PatternLabel {
        self.pattern
    }

    pub fn variables(&self) -> &RoleSummary {
        &self.variables
    }

    pub fn visualisations(&self) -> &BTreeSet<ChartType> {
        &self.visualisations
    }
}
