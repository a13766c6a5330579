//! ApplicationSet Analyzer - a diagnostic CLI for Argo CD ApplicationSets
//!
//! Lists every ApplicationSet in the cluster, evaluates condition, generator
//! and generated-application rules and prints the findings.

mod analyzer;
mod kube;
mod models;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use analyzer::report::RunResult;
use analyzer::Analyzer;
use crate::kube::store::KubeDocumentStore;

/// Output format for the analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Diagnostic analyzer for Argo CD ApplicationSet resources
#[derive(Parser, Debug)]
#[command(name = "appset-analyzer")]
#[command(about = "Analyzes Argo CD ApplicationSets and reports misconfigured or unhealthy state", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Number of ApplicationSets analyzed in parallel
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

/// Initialize logging based on debug flag
///
/// Logs go to stderr so piped output stays machine-readable.
fn init_logging(debug: bool) {
    if !debug {
        // No logging by default (silent operation)
        return;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.debug);
    if args.debug {
        tracing::debug!("Debug logging enabled");
    }

    tracing::debug!("Initializing Kubernetes client");
    let client = kube::create_client().await?;
    let store = KubeDocumentStore::new(client);

    let result = Analyzer::new(store)
        .with_concurrency(args.concurrency)
        .run()
        .await?;

    match args.output {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&result)?),
    }

    Ok(())
}

/// Render the result for terminal consumption
fn print_text(result: &RunResult) {
    println!("{}", result.details);

    if result.findings.is_empty() {
        println!("\nNo issues found");
    } else {
        println!("\nFindings ({}):", result.findings.len());
        for finding in &result.findings {
            println!("  - {}", finding.text);
        }
    }

    if !result.diagnostics.is_empty() {
        eprintln!("\nWarnings:");
        for diagnostic in &result.diagnostics {
            eprintln!("  - {}", diagnostic);
        }
    }
    if !result.complete {
        eprintln!("Report is partial: some Application lists could not be fetched");
    }
}
