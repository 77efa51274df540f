//! Schema-less ingestion of published spreadsheets
//!
//! Delimited text is tokenized into a [`ingest::RawGrid`], each semantic role
//! (name, email, reach, ...) is bound to a column by header keywords and
//! content heuristics, and the bound columns are turned into typed records.
//! Nothing here requires a fixed column layout, and malformed input degrades
//! to empty output instead of failing.

pub mod config;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod records;
pub mod services;
