//! `leadsheet leads`

use anyhow::{Context, Result};
use colored::*;

use super::{SourceCheck, check_source, ensure_ok, http_fetcher, print_disabled, write_output};
use crate::cli::table::print_table;
use crate::cli::{LeadsArgs, OutputFormat};
use leadsheet::config::Config;
use leadsheet::export::{export_leads_to_csv, write_leads};
use leadsheet::pipeline::Ingestion;
use leadsheet::records::{Lead, LeadBuilder};

pub async fn handle_leads_command(config: &Config, args: LeadsArgs) -> Result<()> {
    if let SourceCheck::Disabled = check_source(config)? {
        print_disabled();
        return Ok(());
    }

    let ingestion = Ingestion::new(
        config.settings(),
        LeadBuilder::new(config.lead_profile()),
        http_fetcher(config)?,
    );
    let state = ingestion.refresh().await;
    ensure_ok(&state)?;
    let leads: &[Lead] = &state.data;

    match (args.format, args.output) {
        (OutputFormat::Csv, Some(path)) => export_leads_to_csv(leads, &path)?,
        (OutputFormat::Csv, None) => write_leads(std::io::stdout().lock(), leads)?,
        (OutputFormat::Json, output) => {
            let json = serde_json::to_string_pretty(leads).context("Failed to serialize leads")?;
            match output {
                Some(path) => write_output(&path, &json)?,
                None => println!("{}", json),
            }
        }
        (OutputFormat::Table, _) => print_leads(leads),
    }

    Ok(())
}

fn print_leads(leads: &[Lead]) {
    if leads.is_empty() {
        println!("{}", "No leads found".yellow());
        return;
    }

    let rows: Vec<Vec<String>> = leads
        .iter()
        .map(|lead| {
            vec![
                lead.name.clone(),
                lead.email.clone(),
                lead.phone.clone(),
                lead.product.clone(),
            ]
        })
        .collect();
    print_table(&["Name", "Email", "Phone", "Product"], &rows);
    println!();
    println!("{} leads", leads.len().to_string().bright_green().bold());
}
