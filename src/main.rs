use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dirindex::{Input, RewritePolicy};

#[derive(Parser, Debug)]
#[command(name = "dirindex")]
#[command(about = "Rewrites directory-style request URIs to their index document", long_about = None)]
struct Args {
    /// Path to configuration file (optional; defaults apply when missing)
    #[arg(short, long, default_value = "dirindex.config.yml")]
    config: PathBuf,

    /// Rewrite policy, overriding the configuration (directory-index or allowlist)
    #[arg(long)]
    policy: Option<RewritePolicy>,

    /// Rewrite a bare URI instead of reading an event; may be repeated
    #[arg(long = "uri", conflicts_with = "event")]
    uris: Vec<String>,

    /// Path to a JSON event (if not provided, the event is read from stdin)
    #[arg(long)]
    event: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber; stdout is reserved for results
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
        .init();

    let input = if !args.uris.is_empty() {
        Input::Uris(args.uris)
    } else if let Some(path) = args.event {
        Input::EventFile(path)
    } else {
        Input::Stdin
    };

    dirindex::run(args.config, args.policy, input)
}
