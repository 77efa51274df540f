//! Published spreadsheet identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

const SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

static SHEET_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://docs\.google\.com/spreadsheets/d/(e/)?([A-Za-z0-9_-]+)")
        .expect("sheet url pattern is valid")
});

static GID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#?&]gid=(\d+)").expect("gid pattern is valid"));

/// Error validating a source identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing was configured
    Empty,
    /// Not a `https://docs.google.com/spreadsheets/d/<id>` link
    NotASpreadsheet(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Empty => write!(f, "No spreadsheet URL configured"),
            SourceError::NotASpreadsheet(url) => write!(
                f,
                "'{}' is not a spreadsheet link (expected {}/<id>)",
                url, SHEETS_BASE
            ),
        }
    }
}

impl std::error::Error for SourceError {}

/// A validated spreadsheet link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSource {
    url: String,
    document_id: String,
    published: bool,
    gid: Option<String>,
}

impl SheetSource {
    /// Validate a spreadsheet link and pull out its document and tab ids
    ///
    /// Accepts both editor links (`/d/<id>/edit#gid=0`) and "publish to the
    /// web" links (`/d/e/<id>/pubhtml`).
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let url = input.trim();
        if url.is_empty() {
            return Err(SourceError::Empty);
        }

        let captures = SHEET_URL
            .captures(url)
            .ok_or_else(|| SourceError::NotASpreadsheet(url.to_string()))?;
        let published = captures.get(1).is_some();
        let document_id = captures[2].to_string();
        let gid = GID.captures(url).map(|c| c[1].to_string());

        log::debug!(
            "Parsed sheet source: id={}, published={}, gid={:?}",
            document_id,
            published,
            gid
        );

        Ok(Self {
            url: url.to_string(),
            document_id,
            published,
            gid,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn gid(&self) -> Option<&str> {
        self.gid.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// URL that serves the selected tab as CSV
    pub fn export_url(&self) -> String {
        let mut url = if self.published {
            format!("{}/e/{}/pub?output=csv", SHEETS_BASE, self.document_id)
        } else {
            format!("{}/{}/export?format=csv", SHEETS_BASE, self.document_id)
        };
        if let Some(gid) = &self.gid {
            url.push_str("&gid=");
            url.push_str(gid);
        }
        url
    }
}

impl FromStr for SheetSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SheetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_link_with_gid() {
        let link = "https://docs.google.com/spreadsheets/d/1AbC_d-9/edit#gid=42";
        let source = SheetSource::parse(link).unwrap();

        assert_eq!(source.document_id(), "1AbC_d-9");
        assert_eq!(source.gid(), Some("42"));
        assert!(!source.is_published());
        assert_eq!(
            source.export_url(),
            "https://docs.google.com/spreadsheets/d/1AbC_d-9/export?format=csv&gid=42"
        );
    }

    #[test]
    fn test_bare_link_without_gid() {
        let source = SheetSource::parse("  https://docs.google.com/spreadsheets/d/xyz  ").unwrap();

        assert_eq!(source.url(), "https://docs.google.com/spreadsheets/d/xyz");
        assert_eq!(source.gid(), None);
        assert_eq!(
            source.export_url(),
            "https://docs.google.com/spreadsheets/d/xyz/export?format=csv"
        );
    }

    #[test]
    fn test_published_link() {
        let link = "https://docs.google.com/spreadsheets/d/e/2PACX-1v/pubhtml?gid=7&single=true";
        let source: SheetSource = link.parse().unwrap();

        assert!(source.is_published());
        assert_eq!(source.document_id(), "2PACX-1v");
        assert_eq!(
            source.export_url(),
            "https://docs.google.com/spreadsheets/d/e/2PACX-1v/pub?output=csv&gid=7"
        );
    }

    #[test]
    fn test_rejects_other_urls() {
        assert_eq!(SheetSource::parse(""), Err(SourceError::Empty));
        assert_eq!(SheetSource::parse("   "), Err(SourceError::Empty));
        for bad in [
            "not a url",
            "http://docs.google.com/spreadsheets/d/abc",
            "https://example.com/spreadsheets/d/abc",
            "https://docs.google.com/document/d/abc",
            "https://docs.google.com/spreadsheets/d/",
            "https://evil.com/?u=https://docs.google.com/spreadsheets/d/abc",
        ] {
            assert!(
                matches!(SheetSource::parse(bad), Err(SourceError::NotASpreadsheet(_))),
                "accepted {bad}"
            );
        }
    }
}
