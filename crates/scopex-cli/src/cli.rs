//! CLI argument parsing using clap.

use clap::ArgGroup;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scopex")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("rules")
        .required(true)
        .multiple(true)
        .args(["domain_suffix", "resource_prefix"])
))]
pub struct Cli {
    /// Export tarball, zip archive, or exploded export directory
    #[arg(long, value_name = "PATH")]
    pub source: PathBuf,

    /// Destination root (created if missing)
    #[arg(long, value_name = "PATH")]
    pub destination: PathBuf,

    /// Admit identity scopes ending with this suffix (can be repeated)
    #[arg(long = "domain-suffix", value_name = "SUFFIX")]
    pub domain_suffix: Vec<String>,

    /// Admit resource scopes starting with this prefix (can be repeated)
    #[arg(long = "resource-prefix", value_name = "PREFIX")]
    pub resource_prefix: Vec<String>,

    /// 1-based path segment holding the scope (default: 2 for archives, 1 for directories)
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub scope_depth: Option<usize>,

    /// File name suffix marking a secondary archive (can be repeated)
    #[arg(long = "archive-suffix", value_name = "SUFFIX", default_value = ".zip")]
    pub archive_suffix: Vec<String>,

    /// Number of per-scope workers for directory sources
    #[arg(short, long, value_name = "N", default_value = "1", value_parser = parse_positive)]
    pub jobs: usize,

    /// Delete the source tarball or zip after a successful run
    #[arg(long)]
    pub remove_source: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parses an integer that must be at least 1.
fn parse_positive(s: &str) -> Result<usize, String> {
    let value = s
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid number: {s}"))?;
    if value == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(value)
}
