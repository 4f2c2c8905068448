pub mod error;
mod schema_oracle;

pub use schema_oracle::SchemaOracle;
