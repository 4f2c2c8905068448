use crate::error::MalformedQueryError;
use sparqlens_model::{
    OrderKey, ParsedQuery, PatternTerm, QueryModifiers, SortDirection, TriplePattern, Variable,
};
use spargebra::algebra::{Expression, GraphPattern, OrderExpression};
use spargebra::term::{NamedNodePattern, TermPattern};
use spargebra::Query;

/// Parses `query_text` into a [ParsedQuery].
///
/// Prefixes and the `a`, `;` and `,` abbreviations are resolved by the SPARQL parser. Only
/// `SELECT` queries over conjunctions of triple patterns are accepted. `FILTER` restricts the
/// solutions but not the shape of a query, so filter expressions are skipped.
pub fn parse(query_text: &str) -> Result<ParsedQuery, MalformedQueryError> {
    let query = Query::parse(query_text, None)?;
    let pattern = match &query {
        Query::Select { pattern, .. } => pattern,
        Query::Construct { .. } => {
            return Err(MalformedQueryError::UnsupportedQueryForm("CONSTRUCT"))
        }
        Query::Describe { .. } => {
            return Err(MalformedQueryError::UnsupportedQueryForm("DESCRIBE"))
        }
        Query::Ask { .. } => {
            return Err(MalformedQueryError::UnsupportedQueryForm("ASK"))
        }
    };

    let mut normalizer = Normalizer::default();
    normalizer.visit(pattern)?;
    normalizer.finish()
}

/// Flattens the algebra produced by `spargebra` into triple patterns and solution modifiers.
#[derive(Default)]
struct Normalizer {
    patterns: Vec<TriplePattern>,
    projection: Option<Vec<Variable>>,
    modifiers: QueryModifiers,
}

impl Normalizer {
    fn visit(&mut self, pattern: &GraphPattern) -> Result<(), MalformedQueryError> {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                for triple in patterns {
                    self.patterns.push(convert_triple(triple)?);
                }
                Ok(())
            }
            GraphPattern::Join { left, right } => {
                self.visit(left)?;
                self.visit(right)
            }
            GraphPattern::Filter { inner, .. } => self.visit(inner),
            GraphPattern::Project { inner, variables } => {
                if self.projection.is_some() {
                    return Err(MalformedQueryError::UnsupportedOperator("sub-select"));
                }
                self.projection = Some(variables.clone());
                self.visit(inner)
            }
            GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner } => {
                self.modifiers.distinct = true;
                self.visit(inner)
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => {
                self.modifiers.offset = *start;
                self.modifiers.limit = *length;
                self.visit(inner)
            }
            GraphPattern::OrderBy { inner, expression } => {
                for expression in expression {
                    self.modifiers.order_by.push(convert_order_key(expression)?);
                }
                self.visit(inner)
            }
            GraphPattern::LeftJoin { .. } => {
                Err(MalformedQueryError::UnsupportedOperator("OPTIONAL"))
            }
            GraphPattern::Union { .. } => Err(MalformedQueryError::UnsupportedOperator("UNION")),
            GraphPattern::Minus { .. } => Err(MalformedQueryError::UnsupportedOperator("MINUS")),
            GraphPattern::Graph { .. } => Err(MalformedQueryError::UnsupportedOperator("GRAPH")),
            GraphPattern::Service { .. } => {
                Err(MalformedQueryError::UnsupportedOperator("SERVICE"))
            }
            GraphPattern::Values { .. } => Err(MalformedQueryError::UnsupportedOperator("VALUES")),
            GraphPattern::Extend { variable, .. } => {
                Err(MalformedQueryError::ComputedVariable(variable.clone()))
            }
            GraphPattern::Group { .. } => {
                Err(MalformedQueryError::UnsupportedOperator("GROUP BY"))
            }
            GraphPattern::Path { .. } => {
                Err(MalformedQueryError::UnsupportedOperator("property path"))
            }
            GraphPattern::Lateral { .. } => {
                Err(MalformedQueryError::UnsupportedOperator("LATERAL"))
            }
        }
    }

    fn finish(self) -> Result<ParsedQuery, MalformedQueryError> {
        if self.patterns.is_empty() {
            return Err(MalformedQueryError::EmptyPattern);
        }

        let query = ParsedQuery::new(
            self.patterns,
            self.projection.unwrap_or_default(),
            self.modifiers,
        );
        if let Some(variable) = query.first_unbound_projection() {
            return Err(MalformedQueryError::UnboundVariable(variable.clone()));
        }
        Ok(query)
    }
}

fn convert_triple(
    triple: &spargebra::term::TriplePattern,
) -> Result<TriplePattern, MalformedQueryError> {
    let NamedNodePattern::NamedNode(predicate) = &triple.predicate else {
        return Err(MalformedQueryError::VariablePredicate(triple.to_string()));
    };
    let subject = convert_term(&triple.subject)
        .ok_or_else(|| MalformedQueryError::QuotedTriple(triple.to_string()))?;
    let object = convert_term(&triple.object)
        .ok_or_else(|| MalformedQueryError::QuotedTriple(triple.to_string()))?;
    Ok(TriplePattern {
        subject,
        predicate: predicate.clone(),
        object,
    })
}

/// Returns [None] for quoted triples.
fn convert_term(term: &TermPattern) -> Option<PatternTerm> {
    match term {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::BlankNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::Variable(variable) => Some(variable.clone().into()),
        TermPattern::Triple(_) => None,
    }
}

fn convert_order_key(expression: &OrderExpression) -> Result<OrderKey, MalformedQueryError> {
    let (expression, direction) = match expression {
        OrderExpression::Asc(expression) => (expression, SortDirection::Ascending),
        OrderExpression::Desc(expression) => (expression, SortDirection::Descending),
    };
    match expression {
        Expression::Variable(variable) => Ok(OrderKey {
            variable: variable.clone(),
            direction,
        }),
        other => Err(MalformedQueryError::UnsupportedOrderExpression(
            other.to_string(),
        )),
    }
}
