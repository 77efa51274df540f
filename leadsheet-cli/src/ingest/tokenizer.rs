//! Delimited-text tokenizer
//!
//! A forgiving splitter for sheet exports. It handles the quoting that
//! spreadsheet tools actually emit:
//! - Quoted fields may contain the delimiter: `"Doe, Jane"`
//! - Doubled quotes inside a quoted field are one literal quote: `"say ""hi"""`
//! - Cells are trimmed after unescaping
//!
//! Each physical line is one row. A quoted field is never continued onto the
//! next line; an unterminated quote simply swallows the rest of its line.
//! The tokenizer has no error path.

use super::grid::RawGrid;
use serde::Deserialize;

/// Delimiter and quote characters of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub delimiter: char,
    pub quote: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl Dialect {
    /// Tab-separated exports
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            ..Self::default()
        }
    }
}

/// Tokenize comma-separated text
pub fn tokenize(text: &str) -> RawGrid {
    tokenize_with(text, Dialect::default())
}

/// Tokenize text using the given dialect
///
/// Blank lines (empty or whitespace only) are dropped; `\n`, `\r\n` and lone
/// `\r` all end a row.
pub fn tokenize_with(text: &str, dialect: Dialect) -> RawGrid {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rows: Vec<Vec<String>> = text
        .split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_row(line, dialect))
        .collect();

    log::trace!("Tokenized {} rows", rows.len());
    RawGrid::new(rows)
}

/// Split one physical line into trimmed cells
pub fn split_row(line: &str, dialect: Dialect) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == dialect.quote {
                if chars.peek() == Some(&dialect.quote) {
                    // Escaped quote
                    current.push(ch);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == dialect.quote {
            in_quotes = true;
        } else if ch == dialect.delimiter {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    cells.push(current.trim().to_string());
    cells
}
