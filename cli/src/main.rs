use crate::cli::{AnalyzerArgs, Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use sparqlens::rules::RuleSet;
use sparqlens::schema::{
    MemSchemaOracle, RemoteSchemaOracle, RemoteSchemaOracleConfig, SchemaOracle,
};
use sparqlens::QueryAnalyzer;
use sparqlens_web::ServerConfig;
use std::fs::File;
use std::io::{stdin, stdout, BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    init_tracing();
    match matches.command {
        Command::Analyze { query, analyzer } => {
            let analyzer = create_analyzer(&analyzer)?;
            let query = read_query(query.as_deref())?;
            let result = analyzer
                .analyze(&query)
                .await
                .context("The query could not be analyzed")?;
            print_json(&result)
        }
        Command::Serve {
            bind,
            cors,
            analyzer,
        } => {
            let server_config = ServerConfig {
                analyzer: create_analyzer(&analyzer)?,
                bind,
                cors,
            };
            sparqlens_web::serve(server_config).await
        }
        Command::Rules { rules } => {
            let rules = match rules {
                Some(path) => load_rules(&path)?,
                None => RuleSet::default(),
            };
            print_json(&rules)
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_analyzer(args: &AnalyzerArgs) -> anyhow::Result<QueryAnalyzer> {
    let oracle: Arc<dyn SchemaOracle> = match (&args.schema, &args.endpoint) {
        (Some(schema), _) => {
            let file = File::open(schema)
                .with_context(|| format!("Failed to open the schema {}", schema.display()))?;
            let oracle = MemSchemaOracle::from_turtle_reader(BufReader::new(file))
                .with_context(|| format!("Failed to load the schema {}", schema.display()))?;
            Arc::new(oracle)
        }
        (None, Some(endpoint)) => {
            let config = RemoteSchemaOracleConfig {
                endpoint: endpoint.clone(),
                timeout: Duration::from_secs(args.timeout),
            };
            Arc::new(RemoteSchemaOracle::new(config)?)
        }
        (None, None) => bail!("Either --endpoint or --schema must be set"),
    };
    tracing::debug!(oracle = oracle.name(), "Created schema oracle");

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RuleSet::default(),
    };
    Ok(QueryAnalyzer::with_rules(oracle, Arc::new(rules)))
}

fn load_rules(path: &Path) -> anyhow::Result<RuleSet> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open the rule set {}", path.display()))?;
    RuleSet::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Invalid rule set {}", path.display()))
}

fn read_query(path: Option<&Path>) -> anyhow::Result<String> {
    let mut query = String::new();
    if let Some(path) = path {
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut query))
            .with_context(|| format!("Failed to read the query {}", path.display()))?;
    } else {
        stdin()
            .read_to_string(&mut query)
            .context("Failed to read the query from stdin")?;
    }
    Ok(query)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
