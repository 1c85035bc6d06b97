// SLCSP Calculator - Core Library
// Second-lowest-cost silver plan per ZIP code, from zips.csv + plans.csv

pub mod error;
pub mod diagnostics;
pub mod records;
pub mod rate_area;
pub mod registry;   // ZIP → rate area mapping
pub mod aggregator; // Top-2 silver rates per rate area
pub mod resolver;
pub mod report;
pub mod run;

// Re-export commonly used types
pub use error::SlcspError;
pub use diagnostics::{Diagnostics, MemoryDiagnostics, TracingDiagnostics};
pub use records::{PlanRecord, ZipRecord, PLAN_LABELS, ZIP_LABELS};
pub use rate_area::{format_rate, parse_rate, Rank, RateArea, RateAreaKey};
pub use registry::{MappingOutcome, RateAreaRegistry, SealedRegistry};
pub use aggregator::{PlanOutcome, SilverPlanAggregator, SlcspIndex, SILVER_LEVEL};
pub use resolver::{Resolution, SlcspResolver};
pub use report::{ReportEmitter, RunSummary};
pub use run::{
    load_plans, load_registry, run, write_report,
    RunPaths, OUTPUT_FILE, PLANS_FILE, TEMPLATE_FILE, ZIPS_FILE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
