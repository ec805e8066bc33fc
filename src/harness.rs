use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use tracing::info;

use crate::config::RewriteConfig;
use crate::event::{Event, Request, handle};
use crate::rewrite::{RewritePolicy, Rewriter};

/// Where the harness takes its requests from
#[derive(Debug, Clone)]
pub enum Input {
    /// Bare URIs, one result printed per line
    Uris(Vec<String>),
    /// A JSON event read from this file
    EventFile(PathBuf),
    /// A JSON event read from stdin
    Stdin,
}

/// Runs the rewriter locally the way the edge runtime would, printing results to stdout
pub fn run(config_path: PathBuf, policy: Option<RewritePolicy>, input: Input) -> Result<()> {
    let config = load_config(&config_path, policy)?;

    info!(
        "Loaded config from {} (policy: {}, index document: {})",
        config_path.display(),
        config.policy,
        config.index_document
    );
    if config.policy == RewritePolicy::Allowlist {
        info!("  allowlist: {}", config.allowlist.join(", "));
    }

    let rewriter = Rewriter::new(&config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match input {
        Input::Uris(uris) => write_uris(&rewriter, &uris, &mut out)?,
        Input::EventFile(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read event from: {}", path.display()))?;
            write_event(&rewriter, &raw, &mut out)?;
        }
        Input::Stdin => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read event from stdin")?;
            write_event(&rewriter, &raw, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Loads the config file and environment, then applies the command-line policy on top
fn load_config(config_path: &Path, policy: Option<RewritePolicy>) -> Result<RewriteConfig> {
    let mut config = RewriteConfig::load(config_path)?;
    if let Some(policy) = policy {
        config.policy = policy;
    }
    Ok(config)
}

fn write_uris(rewriter: &Rewriter, uris: &[String], out: &mut impl Write) -> Result<()> {
    // Nothing is written unless every uri is usable
    for uri in uris {
        ensure!(uri.starts_with('/'), "uri must start with '/', got {:?}", uri);
    }

    for uri in uris {
        let request = rewriter.rewrite(Request::new(uri.as_str()));
        writeln!(out, "{}", request.uri)?;
    }
    Ok(())
}

fn write_event(rewriter: &Rewriter, raw: &str, out: &mut impl Write) -> Result<()> {
    let event: Event = serde_json::from_str(raw).context("Failed to parse event")?;
    ensure!(
        event.request.uri.starts_with('/'),
        "request uri must start with '/', got {:?}",
        event.request.uri
    );
    let request = handle(event, rewriter);

    serde_json::to_writer_pretty(&mut *out, &request).context("Failed to write request")?;
    writeln!(out)?;
    Ok(())
}
