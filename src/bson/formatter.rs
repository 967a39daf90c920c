//! BSON value formatting utilities for statistics and display.

use mongodb::bson::{Bson, Document};

/// Canonical string form of a value, used as the bucket key of value-frequency tables.
///
/// Values of different types that print identically share a form: `1` (int),
/// `1.0` (double) and `"1"` (string) all render as `1`.
pub fn bson_canonical_string(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::Int32(n) => n.to_string(),
        Bson::Int64(n) => n.to_string(),
        Bson::Double(n) => format!("{n}"),
        Bson::Decimal128(d) => d.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null | Bson::Undefined => "null".to_string(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::DateTime(dt) => (*dt).try_to_rfc3339_string().unwrap_or_else(|_| format!("{dt}")),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

/// Convert a BSON document to a relaxed Extended JSON value.
pub fn document_to_relaxed_extjson(doc: &Document) -> serde_json::Value {
    Bson::Document(doc.clone()).into_relaxed_extjson()
}

/// Convert a BSON document to a single-line relaxed Extended JSON string.
pub fn document_to_relaxed_extjson_string(doc: &Document) -> String {
    document_to_relaxed_extjson(doc).to_string()
}
