//! `leadsheet inspect`: column bindings and content scores for both profiles

use anyhow::{Context, Result};
use colored::*;

use super::{SourceCheck, check_source, http_fetcher, print_disabled};
use crate::cli::InspectArgs;
use crate::cli::table::print_table;
use leadsheet::config::Config;
use leadsheet::ingest::{RawGrid, tokenize_with};
use leadsheet::pipeline::{RawTextFetcher, SheetSource};
use leadsheet::services::inference::{RoleProfile, resolve, score_table};

pub async fn handle_inspect_command(config: &Config, args: InspectArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            if let SourceCheck::Disabled = check_source(config)? {
                print_disabled();
                return Ok(());
            }
            let url = config.source_url.as_deref().unwrap_or_default();
            let source = SheetSource::parse(url)?;
            println!("Fetching {}", source.export_url().dimmed());
            http_fetcher(config)?
                .fetch_raw_text(&source)
                .await
                .context("Failed to fetch sheet")?
        }
    };

    let grid = tokenize_with(&text, config.dialect);
    println!(
        "{} rows, {} columns ({} data rows)",
        grid.len(),
        grid.column_count(),
        grid.data_rows().len()
    );

    for profile in [config.lead_profile(), config.metrics_profile()] {
        println!();
        print_profile(&grid, &profile);
    }

    Ok(())
}

fn print_profile(grid: &RawGrid, profile: &RoleProfile) {
    println!("{}", format!("[{}]", profile.name).bold().cyan());

    let roles = resolve(grid, profile);
    let rows: Vec<Vec<String>> = roles
        .iter()
        .map(|(role, binding)| match binding {
            Some(binding) => vec![
                role.to_string(),
                binding.column.to_string(),
                header_label(grid, binding.column),
                binding.method.label().to_string(),
            ],
            None => vec![
                role.to_string(),
                "-".to_string(),
                String::new(),
                "unresolved".to_string(),
            ],
        })
        .collect();
    print_table(&["Role", "Column", "Header", "Method"], &rows);

    let scores = score_table(grid, profile);
    if scores.is_empty() || grid.column_count() == 0 {
        return;
    }

    println!();
    println!("Content matches in the first {} data rows:", profile.sample_size);
    let headers: Vec<String> = (0..grid.column_count())
        .map(|column| format!("{}:{}", column, header_label(grid, column)))
        .collect();
    let mut columns: Vec<&str> = vec!["Role"];
    columns.extend(headers.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = scores
        .iter()
        .map(|row| {
            std::iter::once(row.role.to_string())
                .chain((0..grid.column_count()).map(|column| {
                    row.scores
                        .get(column)
                        .copied()
                        .unwrap_or(0)
                        .to_string()
                }))
                .collect()
        })
        .collect();
    print_table(&columns, &rows);
}

fn header_label(grid: &RawGrid, column: usize) -> String {
    grid.header()
        .and_then(|header| header.get(column))
        .cloned()
        .unwrap_or_default()
}
