//! CSV export for leads and metrics

use anyhow::{Context, Result};
use csv::Writer;
use std::io;
use std::path::Path;

use crate::records::{Lead, MetricsReport};

const LEAD_HEADER: [&str; 9] = [
    "id",
    "name",
    "email",
    "phone",
    "product",
    "source",
    "status",
    "created_at",
    "assigned_to",
];

const METRICS_HEADER: [&str; 6] = [
    "date",
    "reach",
    "engagement",
    "engagement_rate",
    "followers",
    "gained",
];

/// Write leads as CSV to any writer
pub fn write_leads<W: io::Write>(writer: W, leads: &[Lead]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(LEAD_HEADER)
        .context("Failed to write CSV header")?;

    for lead in leads {
        let id = lead.id.to_string();
        let created_at = lead.created_at.to_rfc3339();
        wtr.write_record([
            id.as_str(),
            lead.name.as_str(),
            lead.email.as_str(),
            lead.phone.as_str(),
            lead.product.as_str(),
            lead.source.as_str(),
            lead.status.as_str(),
            created_at.as_str(),
            lead.assigned_to.as_deref().unwrap_or_default(),
        ])
        .with_context(|| format!("Failed to write lead: {}", lead.name))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Export leads to a CSV file
pub fn export_leads_to_csv(leads: &[Lead], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_leads(file, leads)?;
    log::info!("Exported {} leads to: {}", leads.len(), path.display());
    Ok(())
}

/// Write one CSV row per date, joining performance and follower series
pub fn write_metrics<W: io::Write>(writer: W, report: &MetricsReport) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(METRICS_HEADER)
        .context("Failed to write CSV header")?;

    for (performance, followers) in report.performance.iter().zip(&report.followers) {
        wtr.write_record([
            performance.date.clone(),
            performance.reach.to_string(),
            performance.engagement.to_string(),
            format!("{:.2}", performance.engagement_rate),
            followers.followers.to_string(),
            followers.gained.to_string(),
        ])
        .with_context(|| format!("Failed to write metrics for {}", performance.date))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Export a metrics report to a CSV file
pub fn export_metrics_to_csv(report: &MetricsReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_metrics(file, report)?;
    log::info!(
        "Exported {} metric rows to: {}",
        report.performance.len(),
        path.display()
    );
    Ok(())
}
