//! Command line interface

pub mod commands;
pub mod table;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use leadsheet::config::Config;

#[derive(Parser, Debug)]
#[command(name = "leadsheet", version)]
#[command(about = "Pull leads and metrics out of a published spreadsheet", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/leadsheet/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Spreadsheet link, overrides the configured source
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest leads from the sheet
    Leads(LeadsArgs),
    /// Ingest performance and follower metrics from the sheet
    Metrics(MetricsArgs),
    /// Show which column each role was bound to, and why
    Inspect(InspectArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub struct LeadsArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write to a file instead of stdout (json and csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Number of most recent rows, overrides metrics_window
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Write to a file instead of stdout (json and csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Inspect a local delimited file instead of fetching the sheet
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Load configuration, apply global flags and dispatch
pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source_url = Some(source);
    }

    match cli.command {
        Commands::Leads(args) => commands::leads::handle_leads_command(&config, args).await,
        Commands::Metrics(args) => commands::metrics::handle_metrics_command(&config, args).await,
        Commands::Inspect(args) => commands::inspect::handle_inspect_command(&config, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "leadsheet",
            "metrics",
            "--window",
            "3",
            "--format",
            "json",
            "--source",
            "https://docs.google.com/spreadsheets/d/abc",
        ])
        .unwrap();

        assert_eq!(cli.source.as_deref(), Some("https://docs.google.com/spreadsheets/d/abc"));
        match cli.command {
            Commands::Metrics(args) => {
                assert_eq!(args.window, Some(3));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_leads_defaults_to_table() {
        let cli = Cli::try_parse_from(["leadsheet", "leads"]).unwrap();
        match cli.command {
            Commands::Leads(args) => {
                assert_eq!(args.format, OutputFormat::Table);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
