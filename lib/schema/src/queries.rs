//! The SPARQL queries that [RemoteSchemaOracle](crate::RemoteSchemaOracle) sends.

use sparqlens_model::vocab::{rdf, rdfs};
use sparqlens_model::NamedNodeRef;

/// Selects the declared types (`?type`) and ranges (`?range`) of `property`, and the ranges that
/// are declared as `rdfs:Datatype` (`?datatype`).
pub fn declarations(property: NamedNodeRef<'_>) -> String {
    let (rdf_type, range, datatype) = (rdf::TYPE, rdfs::RANGE, rdfs::DATATYPE);
    format!(
        "SELECT ?type ?range ?datatype WHERE {{ {{ {property} {rdf_type} ?type }} UNION {{ {property} {range} ?range }} UNION {{ {property} {range} ?datatype . ?datatype {rdf_type} {datatype} }} }}"
    )
}

/// Selects a single value (`?value`) of `property`.
pub fn sample_value(property: NamedNodeRef<'_>) -> String {
    format!("SELECT ?value WHERE {{ ?subject {property} ?value }} LIMIT 1")
}

/// Asks whether some subject has two distinct values for `property`.
pub fn has_multiple_values(property: NamedNodeRef<'_>) -> String {
    format!(
        "ASK {{ ?subject {property} ?first, ?second . FILTER(!sameTerm(?first, ?second)) }}"
    )
}

/// Asks whether some value is shared by two distinct subjects of `property`.
pub fn has_shared_values(property: NamedNodeRef<'_>) -> String {
    format!(
        "ASK {{ ?first {property} ?value . ?second {property} ?value . FILTER(!sameTerm(?first, ?second)) }}"
    )
}

/// Selects the declared domains (`?domain`) of `property`.
pub fn domains(property: NamedNodeRef<'_>) -> String {
    let domain = rdfs::DOMAIN;
    format!("SELECT ?domain WHERE {{ {property} {domain} ?domain }}")
}

/// Asks whether a superclass of `class` is a domain of `property` or whether an instance of
/// `class` uses `property`.
pub fn is_involved(class: NamedNodeRef<'_>, property: NamedNodeRef<'_>) -> String {
    let (rdf_type, domain, sub_class_of) = (rdf::TYPE, rdfs::DOMAIN, rdfs::SUB_CLASS_OF);
    format!(
        "ASK {{ {{ {class} {sub_class_of}+ ?domain . {property} {domain} ?domain }} UNION {{ ?instance {rdf_type} {class} ; {property} ?value }} }}"
    )
}
