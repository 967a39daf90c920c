//! Collection statistics: the sample-based report and exact single-field analysis.

mod exact;
mod report;
mod sampler;

pub use exact::{FieldAnalysis, SAMPLE_VALUE_LIMIT, analyze_field_exact};
pub use report::{CollectionReport, FieldReport, SizeMetrics, TypeCount, ValueFrequency};
pub use sampler::{DEFAULT_SAMPLE_LIMIT, TOP_VALUE_LIMIT, build_report, compute_report};
