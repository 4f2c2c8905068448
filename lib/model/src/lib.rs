mod analysis;
mod error;
mod query;
mod schema;
pub mod vocab;

pub use analysis::*;
pub use error::*;
pub use query::*;
pub use schema::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Graph, Literal, LiteralRef, NamedNode, NamedNodeRef, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef, Variable, VariableRef,
};
