//! Implementations of the [SchemaOracle](sparqlens_common::SchemaOracle) capability.
//!
//! - [RemoteSchemaOracle] asks a SPARQL endpoint about the schema and, where the schema is
//!   silent, about the data.
//! - [MemSchemaOracle] answers from the declarations of an RDF schema that is held in memory.

mod declarations;
mod memory;
mod queries;
mod remote;

pub use declarations::Declarations;
pub use memory::MemSchemaOracle;
pub use remote::{RemoteSchemaOracle, RemoteSchemaOracleConfig, DEFAULT_TIMEOUT};
pub use reqwest::Url;
