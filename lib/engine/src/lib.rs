mod analyzer;
mod classifier;
pub mod error;
mod facts;
mod parser;
mod recommender;
mod roles;
pub mod rules;
pub mod topology;

#[cfg(test)]
mod test_util;

pub use analyzer::{analyze, QueryAnalyzer};
pub use classifier::{classify, classify_with};
pub use facts::SchemaFacts;
pub use parser::parse;
pub use recommender::{recommend, recommend_with};
pub use roles::{infer_roles, infer_roles_with};
pub use rules::RuleSet;
