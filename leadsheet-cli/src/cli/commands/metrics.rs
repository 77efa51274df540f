//! `leadsheet metrics`

use anyhow::{Context, Result, bail};
use colored::*;

use super::{SourceCheck, check_source, ensure_ok, http_fetcher, print_disabled, write_output};
use crate::cli::table::print_table;
use crate::cli::{MetricsArgs, OutputFormat};
use leadsheet::config::Config;
use leadsheet::export::{export_metrics_to_csv, write_metrics};
use leadsheet::pipeline::Ingestion;
use leadsheet::records::{MetricsBuilder, MetricsReport};

pub async fn handle_metrics_command(config: &Config, args: MetricsArgs) -> Result<()> {
    let window = args.window.unwrap_or(config.metrics_window);
    if window == 0 {
        bail!("--window must be at least 1");
    }

    if let SourceCheck::Disabled = check_source(config)? {
        print_disabled();
        return Ok(());
    }

    let ingestion = Ingestion::new(
        config.settings(),
        MetricsBuilder::new(config.metrics_profile(), window),
        http_fetcher(config)?,
    );
    let state = ingestion.refresh().await;
    ensure_ok(&state)?;
    let report: &MetricsReport = &state.data;

    match (args.format, args.output) {
        (OutputFormat::Csv, Some(path)) => export_metrics_to_csv(report, &path)?,
        (OutputFormat::Csv, None) => write_metrics(std::io::stdout().lock(), report)?,
        (OutputFormat::Json, output) => {
            let json =
                serde_json::to_string_pretty(report).context("Failed to serialize metrics")?;
            match output {
                Some(path) => write_output(&path, &json)?,
                None => println!("{}", json),
            }
        }
        (OutputFormat::Table, _) => print_report(report),
    }

    Ok(())
}

fn print_report(report: &MetricsReport) {
    if report.is_empty() {
        println!("{}", "No metric rows found".yellow());
        return;
    }

    let rows: Vec<Vec<String>> = report
        .performance
        .iter()
        .zip(&report.followers)
        .map(|(performance, followers)| {
            vec![
                performance.date.clone(),
                performance.reach.to_string(),
                performance.engagement.to_string(),
                format!("{:.2}%", performance.engagement_rate),
                followers.followers.to_string(),
                format!("{:+}", followers.gained),
            ]
        })
        .collect();
    print_table(
        &["Date", "Reach", "Engagement", "Rate", "Followers", "Gained"],
        &rows,
    );

    let summary = &report.summary;
    println!();
    println!("{}", "Latest vs previous".bold());
    println!("  Reach:      {}", change(summary.reach_change));
    println!("  Engagement: {}", change(summary.engagement_change));
    println!("  Followers:  {}", change(summary.followers_change));
    println!("  Rate:       {:.2}%", summary.latest_engagement_rate);
}

fn change(value: f64) -> ColoredString {
    let text = format!("{:+.1}%", value);
    if value > 0.0 {
        text.green()
    } else if value < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}
