use crate::error::{AnalysisError, UnclassifiableVariableError};
use crate::facts::SchemaFacts;
use crate::topology::ClassBindings;
use sparqlens_common::SchemaOracle;
use sparqlens_model::vocab::{dc, foaf, rdfs, schema, skos};
use sparqlens_model::{
    NamedNode, NamedNodeRef, ParsedQuery, PropertyKind, TriplePattern, Variable, VariableRole,
    VariableRoles,
};

/// Properties whose values name their subject.
const NAMING_PROPERTIES: [NamedNodeRef<'static>; 7] = [
    rdfs::LABEL,
    skos::PREF_LABEL,
    skos::ALT_LABEL,
    foaf::NAME,
    schema::NAME,
    dc::TITLE,
    dc::TERMS_TITLE,
];

/// Local names that mark a naming property in schemas that do not reuse a naming vocabulary.
const NAMING_LOCAL_NAMES: [&str; 3] = ["name", "label", "title"];

/// Infers the role of every projected variable of `query`.
pub async fn infer_roles(
    query: &ParsedQuery,
    oracle: &dyn SchemaOracle,
) -> Result<VariableRoles, AnalysisError> {
    let facts = SchemaFacts::collect(query, oracle).await?;
    Ok(infer_roles_with(query, &facts)?)
}

/// Infers the role of every projected variable of `query` using already resolved `facts`.
///
/// Variables bound to a class are lexical. Other variables take the role suggested by the first
/// triple pattern that has them as object: naming properties and object properties give lexical
/// values, numeric and temporal datatypes give scalar values and every other datatype gives
/// lexical values. Variables that only occur as subjects or as classes are lexical.
pub fn infer_roles_with(
    query: &ParsedQuery,
    facts: &SchemaFacts,
) -> Result<VariableRoles, UnclassifiableVariableError> {
    let bindings = ClassBindings::from_patterns(query.patterns());
    let mut roles = VariableRoles::new();
    for variable in query.projection() {
        let role = infer_role(query, facts, &bindings, variable)?;
        tracing::debug!(%variable, %role, "Inferred role");
        roles.insert(variable.clone(), role);
    }
    Ok(roles)
}

fn infer_role(
    query: &ParsedQuery,
    facts: &SchemaFacts,
    bindings: &ClassBindings,
    variable: &Variable,
) -> Result<VariableRole, UnclassifiableVariableError> {
    if bindings.is_bound(variable) {
        return Ok(VariableRole::Lexical);
    }

    let binding = query
        .patterns()
        .iter()
        .filter(|pattern| !pattern.is_type_assertion())
        .find(|pattern| pattern.object.as_variable() == Some(variable));
    let Some(binding) = binding else {
        // Only used as a subject or as the class of an `rdf:type` pattern.
        return Ok(VariableRole::Lexical);
    };

    if is_naming_property(&binding.predicate) {
        return Ok(VariableRole::Lexical);
    }

    let description = facts.property(&binding.predicate);
    if let Some(datatype) = description.datatype {
        return Ok(if datatype.is_scalar() {
            VariableRole::Scalar
        } else {
            VariableRole::Lexical
        });
    }
    match description.kind {
        PropertyKind::Object | PropertyKind::Data => Ok(VariableRole::Lexical),
        PropertyKind::Unknown if is_used_as_subject(query, variable) => Ok(VariableRole::Lexical),
        PropertyKind::Unknown => Err(unclassifiable(variable, binding)),
    }
}

fn is_naming_property(property: &NamedNode) -> bool {
    if NAMING_PROPERTIES.contains(&property.as_ref()) {
        return true;
    }
    let iri = property.as_str();
    let local_name = iri
        .rfind(|c| c == '#' || c == '/')
        .map_or(iri, |position| &iri[position + 1..]);
    NAMING_LOCAL_NAMES.contains(&local_name)
}

fn is_used_as_subject(query: &ParsedQuery, variable: &Variable) -> bool {
    query
        .patterns()
        .iter()
        .any(|pattern| pattern.subject.as_variable() == Some(variable))
}

fn unclassifiable(variable: &Variable, pattern: &TriplePattern) -> UnclassifiableVariableError {
    UnclassifiableVariableError {
        variable: variable.clone(),
        pattern: pattern.clone(),
    }
}
