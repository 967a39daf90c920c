//! Report types produced by the sampler.

use serde::{Deserialize, Serialize};

use crate::bson::ValueKind;
use crate::connection::types::CollectionStats;

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Size metrics converted for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeMetrics {
    pub size_mb: f64,
    pub avg_doc_size_kb: f64,
    pub storage_size_mb: f64,
    pub index_size_mb: f64,
    pub index_count: usize,
}

impl SizeMetrics {
    pub fn from_stats(stats: &CollectionStats) -> Self {
        Self {
            size_mb: round2(stats.size / BYTES_PER_MB),
            avg_doc_size_kb: if stats.avg_obj_size > 0.0 {
                round2(stats.avg_obj_size / BYTES_PER_KB)
            } else {
                0.0
            },
            storage_size_mb: round2(stats.storage_size / BYTES_PER_MB),
            index_size_mb: round2(stats.total_index_size / BYTES_PER_MB),
            index_count: stats.index_sizes.len(),
        }
    }
}

/// How many sampled values of a field fell into one type category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub kind: ValueKind,
    pub count: u64,
}

/// One row of a value-frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: String,
    pub count: u64,
}

/// Sample statistics for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub name: String,
    /// Sampled documents containing the key, null values included.
    pub presence_count: u64,
    pub coverage_pct: f64,
    /// Type histogram in first-encountered order.
    pub types: Vec<TypeCount>,
    /// `None` when any sampled value is a nested document or array.
    pub value_frequencies: Option<Vec<ValueFrequency>>,
    pub distinct_count: u64,
}

impl FieldReport {
    /// Most frequent type; ties go to the type encountered first.
    pub fn primary_type(&self) -> Option<ValueKind> {
        let mut best: Option<&TypeCount> = None;
        for entry in &self.types {
            if best.is_none_or(|b| entry.count > b.count) {
                best = Some(entry);
            }
        }
        best.map(|entry| entry.kind)
    }

    /// `"integer (3), string (1)"`, most frequent first.
    pub fn types_summary(&self) -> String {
        let mut types: Vec<&TypeCount> = self.types.iter().collect();
        types.sort_by(|a, b| b.count.cmp(&a.count));
        types.iter().map(|t| format!("{} ({})", t.kind, t.count)).collect::<Vec<_>>().join(", ")
    }
}

/// Statistics for one collection, computed from a bounded sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    pub collection: String,
    /// Exact count from the server, not an estimate.
    pub document_count: u64,
    pub sample_size: usize,
    pub stats: CollectionStats,
    pub size: SizeMetrics,
    /// Distinct field names seen in the sample, `_id` included.
    pub field_count: usize,
    /// Per-field statistics in first-seen order, `_id` excluded.
    pub fields: Vec<FieldReport>,
}

impl CollectionReport {
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields ordered by coverage, highest first.
    pub fn fields_by_coverage(&self) -> Vec<&FieldReport> {
        let mut fields: Vec<&FieldReport> = self.fields.iter().collect();
        fields.sort_by(|a, b| b.coverage_pct.total_cmp(&a.coverage_pct));
        fields
    }

    /// Fields ordered by sampled distinct count, highest first.
    pub fn cardinality_ranking(&self) -> Vec<(&str, u64)> {
        let mut ranking: Vec<(&str, u64)> =
            self.fields.iter().map(|field| (field.name.as_str(), field.distinct_count)).collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking
    }
}
