//! File export for built records

pub mod csv_exporter;

pub use csv_exporter::{export_leads_to_csv, export_metrics_to_csv, write_leads, write_metrics};
