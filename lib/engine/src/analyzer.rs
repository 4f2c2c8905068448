use crate::error::AnalysisError;
use crate::facts::SchemaFacts;
use crate::rules::RuleSet;
use crate::{classify_with, infer_roles_with, parse, recommend_with};
use sparqlens_common::SchemaOracle;
use sparqlens_model::AnalysisResult;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Analyzes `query_text` against the schema behind `oracle`, using the built-in rules.
pub async fn analyze(
    query_text: &str,
    oracle: &dyn SchemaOracle,
) -> Result<AnalysisResult, AnalysisError> {
    analyze_with(query_text, oracle, &RuleSet::default()).await
}

/// Analyzes queries against a single schema.
///
/// The analyzer holds no mutable state. It can be cloned cheaply and shared between tasks that
/// analyze queries concurrently.
#[derive(Clone)]
pub struct QueryAnalyzer {
    /// Answers the schema questions of every analysis.
    oracle: Arc<dyn SchemaOracle>,
    /// The shape and chart rules.
    rules: Arc<RuleSet>,
}

impl QueryAnalyzer {
    /// Creates a new [QueryAnalyzer] with the built-in rules.
    pub fn new(oracle: Arc<dyn SchemaOracle>) -> Self {
        Self::with_rules(oracle, Arc::new(RuleSet::default()))
    }

    /// Creates a new [QueryAnalyzer] with custom `rules`.
    pub fn with_rules(oracle: Arc<dyn SchemaOracle>, rules: Arc<RuleSet>) -> Self {
        Self { oracle, rules }
    }

    pub fn oracle(&self) -> &dyn SchemaOracle {
        self.oracle.as_ref()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Parses and classifies `query_text`, infers the roles of its projected variables and
    /// recommends charts for it.
    pub async fn analyze(&self, query_text: &str) -> Result<AnalysisResult, AnalysisError> {
        analyze_with(query_text, self.oracle.as_ref(), &self.rules).await
    }
}

impl Debug for QueryAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAnalyzer")
            .field("oracle", &self.oracle.name())
            .field("rules", &self.rules)
            .finish()
    }
}

async fn analyze_with(
    query_text: &str,
    oracle: &dyn SchemaOracle,
    rules: &RuleSet,
) -> Result<AnalysisResult, AnalysisError> {
    let query = parse(query_text)?;
    tracing::debug!(
        patterns = query.patterns().len(),
        projection = query.projection().len(),
        "Parsed query"
    );

    let facts = SchemaFacts::collect(&query, oracle).await?;
    let pattern = classify_with(&query, &facts, rules);
    let roles = infer_roles_with(&query, &facts)?;
    let visualisations = recommend_with(rules, pattern, &roles);

    let result = AnalysisResult::new(pattern, &roles, visualisations);
    tracing::info!(
        oracle = oracle.name(),
        %pattern,
        charts = result.visualisations().len(),
        "Analyzed query"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedQueryError;
    use crate::rules::{ChartRule, Count};
    use crate::test_util::{mondial, var, FakeOracle, BORDER_QUERY, GDP_QUERY};
    use sparqlens_model::{ChartType, PatternLabel};
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn border_scenario() -> Result<(), AnalysisError> {
        let result = analyze(BORDER_QUERY, &FakeOracle::mondial()).await?;
        assert_eq!(
            result.pattern(),
            PatternLabel::ThreeClassesLinkedByFunctionalProperties
        );
        assert_eq!(result.variables().scalar, vec!["length"]);
        assert_eq!(result.variables().lexical, vec!["country1", "country2"]);
        assert_eq!(
            result.visualisations(),
            &BTreeSet::from([
                ChartType::Sankey,
                ChartType::Network,
                ChartType::ChordDiagram,
                ChartType::HeatMap,
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn gdp_scenario() -> Result<(), AnalysisError> {
        let result = analyze(GDP_QUERY, &FakeOracle::mondial()).await?;
        assert_eq!(result.pattern(), PatternLabel::ClassWithDataProperties);
        assert_eq!(result.variables().scalar, vec!["gdpTotal"]);
        assert_eq!(result.variables().lexical, vec!["country"]);
        assert_eq!(
            result.visualisations(),
            &BTreeSet::from([ChartType::Bar, ChartType::Pie, ChartType::WordCloud])
        );
        Ok(())
    }

    #[tokio::test]
    async fn unbound_variable_fails_before_any_lookup() {
        let oracle = FakeOracle::mondial();
        let result = analyze(
            "PREFIX : <http://www.semwebtech.org/mondial/10/meta#>
            SELECT ?country ?population WHERE { ?c a :Country ; :name ?country }",
            &oracle,
        )
        .await;
        let Err(AnalysisError::Malformed(MalformedQueryError::UnboundVariable(variable))) = result
        else {
            panic!("expected an unbound variable error");
        };
        assert_eq!(variable, var("population"));
        assert_eq!(oracle.property_lookups(), 0);
    }

    #[tokio::test]
    async fn undeclared_property_makes_variable_unclassifiable() {
        let result = analyze(
            "PREFIX : <http://www.semwebtech.org/mondial/10/meta#>
            SELECT ?country ?motto WHERE { ?c a :Country ; :name ?country ; :motto ?motto }",
            &FakeOracle::mondial(),
        )
        .await;
        let Err(AnalysisError::Unclassifiable(error)) = result else {
            panic!("expected an unclassifiable variable error");
        };
        assert_eq!(error.variable, var("motto"));
        assert_eq!(error.pattern.predicate, mondial("motto"));
    }

    #[tokio::test]
    async fn oracle_failures_abort_the_analysis() {
        let oracle = FakeOracle::mondial().failing_on(mondial("length"));
        let result = analyze(BORDER_QUERY, &oracle).await;
        assert!(matches!(result, Err(AnalysisError::SchemaLookup { .. })));
    }

    #[tokio::test]
    async fn unrecognized_queries_get_no_charts() -> Result<(), AnalysisError> {
        let result = analyze(
            "PREFIX : <http://www.semwebtech.org/mondial/10/meta#>
            SELECT ?n WHERE { ?c :name ?n }",
            &FakeOracle::mondial(),
        )
        .await?;
        assert_eq!(result.pattern(), PatternLabel::Unrecognized);
        assert!(result.visualisations().is_empty());
        assert_eq!(result.variables().lexical, vec!["n"]);
        Ok(())
    }

    #[tokio::test]
    async fn outside_patterns_do_not_shape_the_query() -> Result<(), AnalysisError> {
        let oracle = FakeOracle::mondial().with_outside(mondial("Country"), mondial("gdpTotal"));
        let result = analyze(GDP_QUERY, &oracle).await?;
        // `:name` still makes it a class with data properties.
        assert_eq!(result.pattern(), PatternLabel::ClassWithDataProperties);
        Ok(())
    }

    #[tokio::test]
    async fn custom_rules_are_used() -> Result<(), AnalysisError> {
        let mut rules = RuleSet::default();
        rules.charts.push(ChartRule {
            pattern: PatternLabel::ClassWithDataProperties,
            scalar: Count::Exactly(1),
            lexical: Count::Any,
            charts: vec![ChartType::Line],
        });
        let analyzer = QueryAnalyzer::with_rules(Arc::new(FakeOracle::mondial()), Arc::new(rules));
        let result = analyzer.analyze(GDP_QUERY).await?;
        assert!(result.visualisations().contains(&ChartType::Line));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_analyses_agree() -> Result<(), AnalysisError> {
        let analyzer = QueryAnalyzer::new(Arc::new(FakeOracle::mondial()));
        let expected = analyzer.analyze(BORDER_QUERY).await?;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let analyzer = analyzer.clone();
                tokio::spawn(async move { analyzer.analyze(BORDER_QUERY).await })
            })
            .collect();
        for task in tasks {
            let Ok(result) = task.await else {
                panic!("analysis task panicked");
            };
            assert_eq!(result?, expected);
        }
        Ok(())
    }
}
