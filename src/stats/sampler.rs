//! Sample-based collection report.

use std::collections::{HashMap, HashSet};

use mongodb::bson::{Bson, Document, doc};

use crate::bson::{ValueKind, bson_canonical_string};
use crate::connection::source::CollectionSource;
use crate::connection::types::CollectionStats;
use crate::error::Result;
use crate::stats::report::{CollectionReport, FieldReport, SizeMetrics, TypeCount, ValueFrequency};

/// Default number of documents sampled for a report.
pub const DEFAULT_SAMPLE_LIMIT: usize = 100;

/// Rows kept in each value-frequency table.
pub const TOP_VALUE_LIMIT: usize = 10;

const ID_FIELD: &str = "_id";

/// Count, size metrics and sample come from the source; everything else is
/// computed in memory. Any source failure aborts the report.
pub fn compute_report(
    source: &dyn CollectionSource,
    sample_limit: usize,
) -> Result<CollectionReport> {
    let sample_limit = sample_limit.max(1);

    let document_count = source.count_documents(doc! {})?;
    let stats = source.collection_stats()?;
    let sample = source.find(doc! {}, None, 0, sample_limit as i64)?;

    log::debug!(
        "Sampled {} of {} documents from {}.{}",
        sample.len(),
        document_count,
        source.database(),
        source.name()
    );

    Ok(build_report(source.name(), document_count, stats, &sample))
}

/// Identity of a sampled value for the distinct count.
///
/// Numbers compare by value across int32, int64 and double, the way the
/// server's `distinct` does. Everything else compares by type and string form.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DistinctKey {
    Integer(i64),
    Float(u64),
    Other(ValueKind, String),
}

impl DistinctKey {
    fn of(kind: ValueKind, value: &Bson, display: &str) -> Self {
        match value {
            Bson::Int32(n) => DistinctKey::Integer(i64::from(*n)),
            Bson::Int64(n) => DistinctKey::Integer(*n),
            Bson::Double(n) => Self::of_double(*n),
            _ => DistinctKey::Other(kind, display.to_string()),
        }
    }

    fn of_double(n: f64) -> Self {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            DistinctKey::Integer(n as i64)
        } else {
            DistinctKey::Float(n.to_bits())
        }
    }
}

/// Per-field accumulator during analysis.
#[derive(Default)]
struct FieldAccum {
    name: String,
    presence: u64,
    types: Vec<TypeCount>,
    has_composite: bool,
    frequencies: Vec<ValueFrequency>,
    frequency_slots: HashMap<String, usize>,
    distinct_values: HashSet<DistinctKey>,
}

impl FieldAccum {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    fn observe(&mut self, kind: ValueKind, value: &Bson) {
        self.presence += 1;

        match self.types.iter_mut().find(|entry| entry.kind == kind) {
            Some(entry) => entry.count += 1,
            None => self.types.push(TypeCount { kind, count: 1 }),
        }

        if kind.is_composite() {
            self.has_composite = true;
            return;
        }

        // Buckets are keyed by string form, so 1, 1.0 and "1" share one row.
        // The distinct count still tells the number 1 apart from the string "1".
        let display = bson_canonical_string(value);
        match self.frequency_slots.get(&display) {
            Some(&slot) => self.frequencies[slot].count += 1,
            None => {
                self.frequency_slots.insert(display.clone(), self.frequencies.len());
                self.frequencies.push(ValueFrequency { value: display.clone(), count: 1 });
            }
        }
        self.distinct_values.insert(DistinctKey::of(kind, value, &display));
    }

    fn finish(self, sampled: usize) -> FieldReport {
        let coverage_pct =
            if sampled == 0 { 0.0 } else { self.presence as f64 / sampled as f64 * 100.0 };

        // One composite value disqualifies the whole field from value statistics.
        // Composite values are never compared structurally.
        let (value_frequencies, distinct_count) = if self.has_composite {
            (None, 0)
        } else {
            let mut frequencies = self.frequencies;
            frequencies.sort_by(|a, b| b.count.cmp(&a.count));
            frequencies.truncate(TOP_VALUE_LIMIT);
            (Some(frequencies), self.distinct_values.len() as u64)
        };

        FieldReport {
            name: self.name,
            presence_count: self.presence,
            coverage_pct,
            types: self.types,
            value_frequencies,
            distinct_count,
        }
    }
}

/// Build a report from an already fetched sample.
pub fn build_report(
    collection: &str,
    document_count: u64,
    stats: CollectionStats,
    sample: &[Document],
) -> CollectionReport {
    let size = SizeMetrics::from_stats(&stats);
    let mut seen_fields: HashSet<&str> = HashSet::new();
    let mut accums: Vec<FieldAccum> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for document in sample {
        for (key, value) in document {
            seen_fields.insert(key.as_str());
            if key == ID_FIELD {
                continue;
            }
            let slot = *slots.entry(key.as_str()).or_insert_with(|| {
                accums.push(FieldAccum::new(key));
                accums.len() - 1
            });
            accums[slot].observe(ValueKind::of(value), value);
        }
    }

    let fields = accums.into_iter().map(|accum| accum.finish(sample.len())).collect();

    CollectionReport {
        collection: collection.to_string(),
        document_count,
        sample_size: sample.len(),
        stats,
        size,
        field_count: seen_fields.len(),
        fields,
    }
}
