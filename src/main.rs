use anyhow::{bail, Context, Result};
use clap::Parser;
use openssl::x509::X509;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod bundle;
mod cert;
mod cli;
mod error;
mod fetch;
mod flatten;
mod pipeline;
mod print;
mod registry;
mod resolve;
mod util;
mod verify;

use crate::cert::Certificate;
use crate::cli::{Cli, Config};
use crate::fetch::HttpFetcher;
use crate::pipeline::Pipeline;
use crate::print::{print_errors, print_report};
use crate::verify::SystemVerifier;

/// Entry point wiring CLI, logging, the flattening pipeline and the exit policy.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let config = Config::from(&cli);

    let anchors = match &config.roots {
        Some(path) => load_anchors(path)?,
        None => Vec::new(),
    };
    let verifier = SystemVerifier::new(&anchors).context("failed to load the system trust store")?;
    let fetcher = HttpFetcher::new(config.timeout).context("failed to build HTTP client")?;
    let pipeline = Pipeline::new(fetcher, verifier, config.ca_only);

    match pipeline.run(&config.input, &config.output) {
        Ok(report) => {
            if !cli.quiet {
                print_report(&report, &config.output)?;
            }
            print_errors(&report.errors)?;
            if !report.errors.is_empty() {
                if config.allow_partial {
                    tracing::warn!(errors = report.errors.len(), "partial bundle accepted");
                } else {
                    bail!(
                        "{} error(s) while flattening {}",
                        report.errors.len(),
                        config.input.display()
                    );
                }
            }
        }
        Err(errors) => {
            print_errors(&errors)?;
            bail!("aborted after {} error(s)", errors.len());
        }
    }

    Ok(())
}

// RUST_LOG wins over --log-level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn load_anchors(path: &Path) -> Result<Vec<Certificate>> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read trust anchors from {}", path.display()))?;
    let stack = X509::stack_from_pem(&data)
        .with_context(|| format!("failed to parse PEM certificates from {}", path.display()))?;
    if stack.is_empty() {
        bail!("no certificates found in {}", path.display());
    }
    let origin = path.display().to_string();
    stack
        .into_iter()
        .map(|x509| Certificate::from_x509(x509, &origin).map_err(anyhow::Error::from))
        .collect()
}
