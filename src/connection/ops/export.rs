//! JSON export of whole collections, pages and field selections.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use mongodb::bson::{Document, doc};

use crate::bson::document_to_relaxed_extjson;
use crate::connection::source::CollectionSource;
use crate::error::{Error, Result};
use crate::state::Pagination;

/// Number of field names that go into a custom-selection filename before `_etc`.
const FILENAME_FIELD_LIMIT: usize = 3;

/// Which documents, and which parts of them, to export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportSelection {
    AllDocuments,
    CurrentView(Pagination),
    /// Projection on the given fields; `_id` comes along.
    SelectedFields(Vec<String>),
    /// Every value of one field, one `{field: value}` object per document that has it.
    SingleFieldValues(String),
    /// Distinct values of one field, one `{field: value}` object per value.
    SingleFieldUnique(String),
    CustomFields { fields: Vec<String>, include_id: bool },
}

impl ExportSelection {
    pub fn label(&self) -> String {
        match self {
            ExportSelection::AllDocuments => "all documents".to_string(),
            ExportSelection::CurrentView(_) => "current view".to_string(),
            ExportSelection::SelectedFields(_) => "selected fields".to_string(),
            ExportSelection::SingleFieldValues(field) => {
                format!("single field '{field}' (all values)")
            }
            ExportSelection::SingleFieldUnique(field) => format!("unique values of field '{field}'"),
            ExportSelection::CustomFields { .. } => "custom selected fields".to_string(),
        }
    }

    /// Download filename for this selection.
    pub fn filename(&self, database: &str, collection: &str) -> String {
        match self {
            ExportSelection::SingleFieldValues(field) => {
                format!("{database}_{collection}_{field}.json")
            }
            ExportSelection::SingleFieldUnique(field) => {
                format!("{database}_{collection}_{field}_unique.json")
            }
            ExportSelection::CustomFields { fields, include_id } => {
                let fields = custom_field_list(fields, *include_id);
                let mut joined = fields
                    .iter()
                    .take(FILENAME_FIELD_LIMIT)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("_");
                if fields.len() > FILENAME_FIELD_LIMIT {
                    joined.push_str("_etc");
                }
                format!("{database}_{collection}_{joined}.json")
            }
            _ => format!("{database}_{collection}.json"),
        }
    }
}

/// Custom selections drop an explicitly picked `_id` unless ids were asked for.
fn custom_field_list(fields: &[String], include_id: bool) -> Vec<String> {
    fields.iter().filter(|f| include_id || f.as_str() != "_id").cloned().collect()
}

fn require_fields(fields: &[String]) -> Result<()> {
    if fields.is_empty() {
        return Err(Error::InvalidInput(
            "Please select at least one field to export.".to_string(),
        ));
    }
    Ok(())
}

fn require_field(field: &str) -> Result<()> {
    if field.is_empty() {
        return Err(Error::InvalidInput("Please select a field to export.".to_string()));
    }
    Ok(())
}

fn inclusion_projection<'a>(fields: impl IntoIterator<Item = &'a String>) -> Document {
    let mut projection = Document::new();
    for field in fields {
        projection.insert(field.clone(), 1);
    }
    projection
}

/// A generated export, ready to be written or offered for download.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub filename: String,
    /// Pretty printed JSON array of relaxed Extended JSON documents.
    pub json: String,
    pub document_count: usize,
}

impl ExportPayload {
    /// `data:` URI carrying the JSON, for a browser download link.
    pub fn data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(self.json.as_bytes());
        format!("data:file/json;base64,{encoded}")
    }

    /// Write the export into `dir` under its filename, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.json.as_bytes())?;
        Ok(path)
    }
}

/// Fetch the documents for `selection` and render them as a JSON export.
pub fn export_documents(
    source: &dyn CollectionSource,
    selection: &ExportSelection,
) -> Result<ExportPayload> {
    let documents = match selection {
        ExportSelection::AllDocuments => source.find(doc! {}, None, 0, 0)?,
        ExportSelection::CurrentView(pagination) => {
            source.find(doc! {}, None, pagination.skip(), pagination.items_per_page() as i64)?
        }
        ExportSelection::SelectedFields(fields) => {
            require_fields(fields)?;
            source.find(doc! {}, Some(inclusion_projection(fields)), 0, 0)?
        }
        ExportSelection::SingleFieldValues(field) => {
            require_field(field)?;
            let mut projection = doc! { "_id": 0 };
            projection.insert(field.clone(), 1);
            source
                .find(doc! {}, Some(projection), 0, 0)?
                .into_iter()
                .filter_map(|document| {
                    document.get(field).map(|value| {
                        let mut single = Document::new();
                        single.insert(field.clone(), value.clone());
                        single
                    })
                })
                .collect()
        }
        ExportSelection::SingleFieldUnique(field) => {
            require_field(field)?;
            source
                .distinct(field, None)?
                .into_iter()
                .map(|value| {
                    let mut single = Document::new();
                    single.insert(field.clone(), value);
                    single
                })
                .collect()
        }
        ExportSelection::CustomFields { fields, include_id } => {
            let fields = custom_field_list(fields, *include_id);
            require_fields(&fields)?;
            let mut projection = inclusion_projection(&fields);
            projection.insert("_id", if *include_id { 1 } else { 0 });
            source.find(doc! {}, Some(projection), 0, 0)?
        }
    };

    let values: Vec<serde_json::Value> = documents.iter().map(document_to_relaxed_extjson).collect();
    let json = serde_json::to_string_pretty(&values)?;

    log::info!(
        "Exported {} documents ({}) from {}.{}",
        documents.len(),
        selection.label(),
        source.database(),
        source.name()
    );

    Ok(ExportPayload {
        filename: selection.filename(source.database(), source.name()),
        json,
        document_count: documents.len(),
    })
}
