//! Closed classification of BSON values used by the statistics report.

use std::fmt;

use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

/// Runtime type category of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
    Mapping,
    Sequence,
    Other,
}

impl ValueKind {
    /// Classify a value. Never fails: anything outside the named categories is `Other`.
    pub fn of(value: &Bson) -> Self {
        match value {
            Bson::String(_) => ValueKind::String,
            Bson::Int32(_) | Bson::Int64(_) => ValueKind::Integer,
            Bson::Double(_) | Bson::Decimal128(_) => ValueKind::Float,
            Bson::Boolean(_) => ValueKind::Boolean,
            Bson::Null | Bson::Undefined => ValueKind::Null,
            Bson::Document(_) => ValueKind::Mapping,
            Bson::Array(_) => ValueKind::Sequence,
            _ => ValueKind::Other,
        }
    }

    /// Nested documents and arrays.
    pub fn is_composite(self) -> bool {
        matches!(self, ValueKind::Mapping | ValueKind::Sequence)
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Mapping => "mapping",
            ValueKind::Sequence => "sequence",
            ValueKind::Other => "other",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
