//! Extract command implementation.

use crate::cli::Cli;
use crate::error::add_source_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use scopex_core::DestDir;
use scopex_core::ExtractionConfig;
use scopex_core::NoopProgress;
use scopex_core::ScopeRule;
use scopex_core::extract_export_with_progress;
use std::fs;
use tracing::debug;

/// Builds the core configuration from the command line.
fn build_config(cli: &Cli) -> ExtractionConfig {
    let rules = cli
        .domain_suffix
        .iter()
        .map(ScopeRule::domain_suffix)
        .chain(cli.resource_prefix.iter().map(ScopeRule::resource_prefix))
        .collect();

    let mut config = ExtractionConfig::with_rules(rules)
        .with_archive_suffixes(cli.archive_suffix.clone())
        .with_jobs(cli.jobs);
    if let Some(depth) = cli.scope_depth {
        config = config.with_scope_depth(depth);
    }
    config
}

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    if !cli.source.exists() {
        bail!(
            "Source '{}' does not exist\n\
             HINT: Pass the export tarball, zip, or exploded directory with --source.",
            cli.source.display()
        );
    }

    let config = build_config(cli);
    let dest = add_source_context(DestDir::create(&cli.destination), &cli.source)?;
    if cli.source.is_dir() {
        let source_root = cli
            .source
            .canonicalize()
            .with_context(|| format!("failed to resolve source '{}'", cli.source.display()))?;
        if dest.as_path().starts_with(&source_root) {
            bail!(
                "Destination '{}' is inside the source directory '{}'\n\
                 HINT: Choose a destination outside the exploded export; files would be \
                 overwritten while they are read.",
                cli.destination.display(),
                cli.source.display()
            );
        }
    }
    debug!(source = %cli.source.display(), dest = %dest.as_path().display(), "starting extraction");

    // Use progress spinner if TTY is detected (not quiet, not JSON, is terminal)
    let report = if CliProgress::should_show() && !cli.quiet && !cli.json {
        let mut progress = CliProgress::new("Extracting");
        add_source_context(
            extract_export_with_progress(&cli.source, dest.as_path(), &config, &mut progress),
            &cli.source,
        )?
    } else {
        let mut noop = NoopProgress;
        add_source_context(
            extract_export_with_progress(&cli.source, dest.as_path(), &config, &mut noop),
            &cli.source,
        )?
    };

    if cli.remove_source {
        if cli.source.is_file() {
            fs::remove_file(&cli.source).with_context(|| {
                format!("failed to remove source '{}'", cli.source.display())
            })?;
            debug!(source = %cli.source.display(), "removed source");
        } else {
            formatter.format_warning(&format!(
                "--remove-source ignored: '{}' is a directory",
                cli.source.display()
            ));
        }
    }

    formatter.format_extraction_result(&report)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_config_collects_rules() {
        let cli = Cli::try_parse_from([
            "scopex",
            "--source",
            "export.tar.xz",
            "--destination",
            "out",
            "--domain-suffix",
            "@org.co.uk",
            "--resource-prefix",
            "Resource:",
            "--scope-depth",
            "3",
            "--archive-suffix",
            ".zip",
            "--archive-suffix",
            ".ZIP",
            "-j",
            "4",
        ])
        .unwrap();

        let config = build_config(&cli);
        assert_eq!(
            config.rules,
            vec![
                ScopeRule::domain_suffix("@org.co.uk"),
                ScopeRule::resource_prefix("Resource:"),
            ]
        );
        assert_eq!(config.scope_depth, Some(3));
        assert_eq!(config.archive_suffixes, vec![".zip", ".ZIP"]);
        assert_eq!(config.jobs, 4);
        assert!(config.validate().is_ok());
    }
}
