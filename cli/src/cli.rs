use clap::{Parser, Subcommand, ValueHint};
use sparqlens::schema::Url;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparqlens")]
/// Sparqlens recommends charts for SPARQL queries
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a SELECT query and print the recommended charts as JSON
    Analyze {
        /// File to read the query from
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        query: Option<PathBuf>,
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
    /// Start the Sparqlens HTTP server
    Serve {
        /// Host and port to listen to
        #[arg(short, long, default_value = "localhost:7879", value_hint = ValueHint::Hostname)]
        bind: String,
        /// Allows cross-origin requests
        #[arg(long)]
        cors: bool,
        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
    /// Print the rule set as JSON
    Rules {
        /// File to read and validate the rule set from
        ///
        /// By default the built-in rule set is printed.
        #[arg(long, value_hint = ValueHint::FilePath)]
        rules: Option<PathBuf>,
    },
}

/// Where the schema comes from and which rules apply.
#[derive(clap::Args)]
pub struct AnalyzerArgs {
    /// SPARQL endpoint that is asked about the schema
    #[arg(long, env = "SPARQLENS_ENDPOINT", required_unless_present = "schema", value_hint = ValueHint::Url)]
    pub endpoint: Option<Url>,
    /// Turtle file holding the schema
    ///
    /// Takes precedence over the endpoint.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub schema: Option<PathBuf>,
    /// JSON file holding the shape and chart rules
    ///
    /// By default the built-in rules are used.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub rules: Option<PathBuf>,
    /// Timeout of a request to the endpoint, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}
