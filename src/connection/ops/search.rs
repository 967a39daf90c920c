//! Ad-hoc single-field search.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::{Bson, Document, doc};

use crate::connection::source::CollectionSource;
use crate::error::{Error, Result};

/// Maximum number of documents a search returns.
pub const SEARCH_RESULT_LIMIT: i64 = 100;

/// How the search value is matched against the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    ExactMatch,
    Contains,
    Regex,
    GreaterThan,
    LessThan,
}

impl SearchKind {
    pub const ALL: [SearchKind; 5] = [
        SearchKind::ExactMatch,
        SearchKind::Contains,
        SearchKind::Regex,
        SearchKind::GreaterThan,
        SearchKind::LessThan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchKind::ExactMatch => "Exact match",
            SearchKind::Contains => "Contains",
            SearchKind::Regex => "Regex",
            SearchKind::GreaterThan => "Greater than",
            SearchKind::LessThan => "Less than",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" | "eq" => Ok(SearchKind::ExactMatch),
            "contains" => Ok(SearchKind::Contains),
            "regex" => Ok(SearchKind::Regex),
            "gt" | "greater" => Ok(SearchKind::GreaterThan),
            "lt" | "less" => Ok(SearchKind::LessThan),
            other => Err(format!(
                "unknown search kind '{other}' (expected exact, contains, regex, gt or lt)"
            )),
        }
    }
}

/// Digits with at most one decimal point, e.g. `42` or `3.14`.
fn looks_numeric(value: &str) -> bool {
    let stripped = value.replacen('.', "", 1);
    !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit())
}

fn comparison_operand(value: &str) -> Bson {
    if looks_numeric(value) {
        match value.parse::<f64>() {
            Ok(number) => return Bson::Double(number),
            Err(_) => log::warn!("Could not parse '{value}' as a number, comparing as string"),
        }
    }
    Bson::String(value.to_string())
}

/// Build the query filter for one search.
pub fn build_search_filter(field: &str, kind: SearchKind, value: &str) -> Result<Document> {
    if value.is_empty() {
        return Err(Error::InvalidInput("Please enter a search value".to_string()));
    }

    let condition = match kind {
        SearchKind::ExactMatch => Bson::String(value.to_string()),
        SearchKind::Contains => Bson::Document(doc! { "$regex": value, "$options": "i" }),
        SearchKind::Regex => {
            regex::Regex::new(value)
                .map_err(|e| Error::InvalidInput(format!("Invalid regex pattern: {e}")))?;
            Bson::Document(doc! { "$regex": value })
        }
        SearchKind::GreaterThan => Bson::Document(doc! { "$gt": comparison_operand(value) }),
        SearchKind::LessThan => Bson::Document(doc! { "$lt": comparison_operand(value) }),
    };

    let mut filter = Document::new();
    filter.insert(field, condition);
    Ok(filter)
}

/// Run a search, returning at most `SEARCH_RESULT_LIMIT` documents.
pub fn search(
    source: &dyn CollectionSource,
    field: &str,
    kind: SearchKind,
    value: &str,
) -> Result<Vec<Document>> {
    let filter = build_search_filter(field, kind, value)?;
    log::debug!("Searching {}.{} with {}", source.database(), source.name(), filter);
    source.find(filter, None, 0, SEARCH_RESULT_LIMIT)
}

/// Fields offered in the search picker: the keys of the first document.
pub fn searchable_fields(source: &dyn CollectionSource) -> Result<Vec<String>> {
    let first = source.find(doc! {}, None, 0, 1)?;
    Ok(first.first().map(|d| d.keys().cloned().collect()).unwrap_or_default())
}
