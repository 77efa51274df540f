pub mod inspect;
pub mod leads;
pub mod metrics;

use anyhow::{Context, Result, bail};
use colored::*;
use std::path::Path;

use leadsheet::config::{Config, ENV_SOURCE_URL};
use leadsheet::pipeline::{HttpFetcher, IngestionState};

/// What a command should do with the configured source
pub(crate) enum SourceCheck {
    Ready,
    Disabled,
}

/// Fail early with a hint when nothing is configured
pub(crate) fn check_source(config: &Config) -> Result<SourceCheck> {
    if !config.enabled {
        return Ok(SourceCheck::Disabled);
    }
    let configured = config
        .source_url
        .as_deref()
        .is_some_and(|source| !source.trim().is_empty());
    if !configured {
        bail!(
            "No spreadsheet configured. Pass --source, set {} or add source_url to the config file",
            ENV_SOURCE_URL
        );
    }
    Ok(SourceCheck::Ready)
}

pub(crate) fn print_disabled() {
    println!("{}", "Ingestion is disabled (enabled = false)".yellow());
}

pub(crate) fn http_fetcher(config: &Config) -> Result<HttpFetcher> {
    HttpFetcher::new(config.request_timeout()).context("Failed to create HTTP client")
}

/// Turn a published error into a command failure
pub(crate) fn ensure_ok<T>(state: &IngestionState<T>) -> Result<()> {
    match &state.error {
        Some(error) => Err(anyhow::Error::new(error.clone())),
        None => Ok(()),
    }
}

pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    println!("Wrote {}", path.display().to_string().cyan());
    Ok(())
}
