use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Resolve missing intermediates of a PEM bundle and write the flattened,
/// verified chains.
#[derive(Parser, Debug)]
#[command(name = "chainflat", version, about = "Complete and flatten certificate chains via AIA issuer URLs")]
pub struct Cli {
    /// Input PEM bundle
    #[arg(long = "in", default_value = "in.pem")]
    pub input: PathBuf,

    /// Output PEM bundle; will be created/overwritten
    #[arg(long = "out", default_value = "out.pem")]
    pub output: PathBuf,

    /// Only write CA certificates
    #[arg(long = "ca")]
    pub ca_only: bool,

    /// Per-request timeout in seconds for issuer downloads
    #[arg(long, default_value_t = 15)]
    pub timeout: u64,

    /// Extra trust anchors (PEM) used in addition to the system store
    #[arg(long)]
    pub roots: Option<PathBuf>,

    /// Exit successfully when the bundle was written despite per-certificate errors
    #[arg(long)]
    pub allow_partial: bool,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Do not print the summary of written certificates
    #[arg(short, long)]
    pub quiet: bool,
}

/// Settings consumed by the run, detached from argument parsing.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ca_only: bool,
    pub timeout: Duration,
    pub roots: Option<PathBuf>,
    pub allow_partial: bool,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Config {
            input: cli.input.clone(),
            output: cli.output.clone(),
            ca_only: cli.ca_only,
            timeout: Duration::from_secs(cli.timeout),
            roots: cli.roots.clone(),
            allow_partial: cli.allow_partial,
        }
    }
}
