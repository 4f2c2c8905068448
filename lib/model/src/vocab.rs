//! Vocabularies used while reasoning about query shapes.
//!
//! `rdf`, `rdfs` and `xsd` come from oxrdf, the remaining ones only contain the terms this crate
//! needs.

pub use oxrdf::vocab::{rdf, rdfs, xsd};

pub mod owl {
    //! [OWL](https://www.w3.org/TR/owl2-overview/) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
    pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
    pub const REAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#real");
    pub const RATIONAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#rational");
}

pub mod skos {
    use oxrdf::NamedNodeRef;

    pub const PREF_LABEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");
    pub const ALT_LABEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#altLabel");
}

pub mod foaf {
    use oxrdf::NamedNodeRef;

    pub const NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");
}

pub mod schema {
    use oxrdf::NamedNodeRef;

    pub const NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://schema.org/name");
}

pub mod dc {
    use oxrdf::NamedNodeRef;

    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title");
    pub const TERMS_TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
}
