use crate::error::AnalysisError;
use crate::facts::SchemaFacts;
use crate::rules::RuleSet;
use crate::topology::Topology;
use sparqlens_common::SchemaOracle;
use sparqlens_model::{ParsedQuery, PatternLabel};

/// Classifies the shape of `query` with the built-in rules.
///
/// The oracle is only used to resolve the properties of the query. Classification itself cannot
/// fail, queries that match no shape rule are [PatternLabel::Unrecognized].
pub async fn classify(
    query: &ParsedQuery,
    oracle: &dyn SchemaOracle,
) -> Result<PatternLabel, AnalysisError> {
    let facts = SchemaFacts::collect(query, oracle).await?;
    Ok(classify_with(query, &facts, &RuleSet::default()))
}

/// Classifies the shape of `query` using already resolved `facts` and the given `rules`.
pub fn classify_with(query: &ParsedQuery, facts: &SchemaFacts, rules: &RuleSet) -> PatternLabel {
    let topology = Topology::build(query.patterns(), facts);
    let signature = topology.signature();
    let label = rules.label_for(&signature);
    tracing::debug!(?signature, %label, "Classified query");
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::test_util::{mondial_facts, FakeOracle, BORDER_QUERY, GDP_QUERY};

    const PREFIXES: &str = "PREFIX : <http://www.semwebtech.org/mondial/10/meta#>\n";

    fn classify_text(body: &str) -> Result<PatternLabel, AnalysisError> {
        let query = parse(&format!("{PREFIXES}{body}"))?;
        Ok(classify_with(&query, &mondial_facts(), &RuleSet::default()))
    }

    #[tokio::test]
    async fn border_query_is_three_linked_classes() -> Result<(), AnalysisError> {
        let query = parse(BORDER_QUERY)?;
        assert_eq!(
            classify(&query, &FakeOracle::mondial()).await?,
            PatternLabel::ThreeClassesLinkedByFunctionalProperties
        );
        Ok(())
    }

    #[tokio::test]
    async fn gdp_query_is_class_with_data_properties() -> Result<(), AnalysisError> {
        let query = parse(GDP_QUERY)?;
        assert_eq!(
            classify(&query, &FakeOracle::mondial()).await?,
            PatternLabel::ClassWithDataProperties
        );
        Ok(())
    }

    #[test]
    fn single_class_with_many_data_properties() -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT * WHERE { ?c a :Country ; :name ?n ; :population ?p ; :gdpTotal ?g ; :carCode ?code }",
        )?;
        assert_eq!(label, PatternLabel::ClassWithDataProperties);
        Ok(())
    }

    #[test]
    fn blank_class_nodes_are_bound() -> Result<(), AnalysisError> {
        let label = classify_text("SELECT ?n WHERE { [] a :Country ; :name ?n }")?;
        assert_eq!(label, PatternLabel::ClassWithDataProperties);
        Ok(())
    }

    #[test]
    fn triangle_through_shared_node_is_recognized() -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT ?n1 ?n2 ?l WHERE {
                ?b a :Border ; :isBorderOf ?c1, ?c2 ; :length ?l .
                ?c1 a :Country ; :name ?n1 ; :encompassedByInfo ?e .
                ?c2 a :Country ; :name ?n2 ; :encompassedByInfo ?e .
            }",
        )?;
        assert_eq!(label, PatternLabel::ThreeClassesLinkedByFunctionalProperties);
        Ok(())
    }

    #[test]
    fn triangle_without_functional_link_is_unrecognized() -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT ?n1 ?n2 ?l WHERE {
                ?b a :Border ; :isBorderOf ?c1, ?c2 ; :length ?l .
                ?c1 a :Country ; :name ?n1 ; :isBorderOf ?x .
                ?c2 a :Country ; :name ?n2 ; :isBorderOf ?x .
            }",
        )?;
        assert_eq!(label, PatternLabel::Unrecognized);
        Ok(())
    }

    #[test]
    fn cartesian_product_sharing_a_functional_property_is_unrecognized(
    ) -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT ?n1 ?n2 ?n3 WHERE {
                ?c1 a :Country ; :name ?n1 ; :encompassedByInfo ?e1 .
                ?c2 a :Country ; :name ?n2 ; :encompassedByInfo ?e2 .
                ?c3 a :Country ; :name ?n3 ; :encompassedByInfo ?e3 .
            }",
        )?;
        assert_eq!(label, PatternLabel::Unrecognized);
        Ok(())
    }

    #[test]
    fn open_chain_of_three_classes_is_unrecognized() -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT ?n1 ?n2 WHERE {
                ?b a :Border ; :isBorderOf ?c1, ?c2 .
                ?c1 a :Country ; :name ?n1 .
                ?c2 a :Country ; :name ?n2 .
            }",
        )?;
        assert_eq!(label, PatternLabel::Unrecognized);
        Ok(())
    }

    #[test]
    fn two_classes_are_unrecognized() -> Result<(), AnalysisError> {
        let label = classify_text(
            "SELECT ?n ?l WHERE { ?b a :Border ; :isBorderOf ?c ; :length ?l . ?c a :Country ; :name ?n }",
        )?;
        assert_eq!(label, PatternLabel::Unrecognized);
        Ok(())
    }

    #[test]
    fn untyped_query_is_unrecognized() -> Result<(), AnalysisError> {
        let label = classify_text("SELECT ?n WHERE { ?c :name ?n }")?;
        assert_eq!(label, PatternLabel::Unrecognized);
        Ok(())
    }

    #[test]
    fn classification_is_deterministic() -> Result<(), AnalysisError> {
        let query = parse(BORDER_QUERY)?;
        let facts = mondial_facts();
        let rules = RuleSet::default();
        let first = classify_with(&query, &facts, &rules);
        for _ in 0..10 {
            assert_eq!(classify_with(&query, &facts, &rules), first);
        }
        Ok(())
    }
}
