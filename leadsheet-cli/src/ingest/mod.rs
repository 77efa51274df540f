//! Raw tabular input
//!
//! Turns the delimited-text export of a sheet into a [`RawGrid`] of string
//! cells. Nothing here knows what the columns mean; that is decided later by
//! the inference service.

pub mod grid;
pub mod tokenizer;

pub use grid::{RawGrid, cell_at};
pub use tokenizer::{Dialect, split_row, tokenize, tokenize_with};
