use crate::rules::RuleSet;
use sparqlens_model::{ChartType, PatternLabel, VariableRole, VariableRoles};
use std::collections::BTreeSet;

/// Recommends charts for a query of `pattern` with the given `roles`, using the built-in rules.
///
/// Only the number of scalar and lexical variables matters, not their names or their order.
/// Unrecognized queries get no recommendation.
pub fn recommend(pattern: PatternLabel, roles: &VariableRoles) -> BTreeSet<ChartType> {
    recommend_with(&RuleSet::default(), pattern, roles)
}

/// Recommends charts for a query of `pattern` with the given `roles`, using `rules`.
pub fn recommend_with(
    rules: &RuleSet,
    pattern: PatternLabel,
    roles: &VariableRoles,
) -> BTreeSet<ChartType> {
    if !pattern.is_recognized() {
        return BTreeSet::new();
    }

    let scalar = roles.count(VariableRole::Scalar);
    let lexical = roles.count(VariableRole::Lexical);
    let charts = rules.charts_for(pattern, scalar, lexical);
    tracing::debug!(%pattern, scalar, lexical, ?charts, "Recommended charts");
    charts
}
