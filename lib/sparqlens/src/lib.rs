#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use sparqlens_engine::{analyze, QueryAnalyzer};

pub mod model {
    pub use sparqlens_model::*;
}

pub mod error {
    pub use sparqlens_common::error::*;
    pub use sparqlens_engine::error::*;
    pub use sparqlens_engine::rules::RuleSetError;
}

/// The steps of an analysis, for callers that want to run them one by one.
pub mod analysis {
    pub use sparqlens_engine::topology::*;
    pub use sparqlens_engine::{
        classify, classify_with, infer_roles, infer_roles_with, parse, recommend, recommend_with,
        SchemaFacts,
    };
}

pub mod rules {
    pub use sparqlens_engine::rules::*;
}

pub mod schema {
    pub use sparqlens_common::SchemaOracle;
    pub use sparqlens_schema::*;
}
