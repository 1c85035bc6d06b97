// 🚀 Run - the three sequential phases, wired to the fixed file names
//
//   1. zips.csv   → RateAreaRegistry → SealedRegistry
//   2. plans.csv  → SilverPlanAggregator → SlcspIndex
//   3. slcsp.csv  → ReportEmitter → slcsp-modified.csv
//
// Any I/O or header failure aborts the run. The output file is created only
// after both inputs loaded and the template opened.

use crate::aggregator::{PlanOutcome, SilverPlanAggregator, SlcspIndex};
use crate::diagnostics::Diagnostics;
use crate::records::{for_each_record, open_csv, PlanRecord, ZipRecord, PLAN_LABELS, ZIP_LABELS};
use crate::registry::{MappingOutcome, RateAreaRegistry, SealedRegistry};
use crate::report::{ReportEmitter, RunSummary};
use crate::resolver::SlcspResolver;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};

pub const ZIPS_FILE: &str = "zips.csv";
pub const PLANS_FILE: &str = "plans.csv";
pub const TEMPLATE_FILE: &str = "slcsp.csv";
pub const OUTPUT_FILE: &str = "slcsp-modified.csv";

// ============================================================================
// PATHS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub zips: PathBuf,
    pub plans: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    /// The fixed file names, resolved against `dir`
    pub fn in_dir(dir: &Path) -> Self {
        RunPaths {
            zips: dir.join(ZIPS_FILE),
            plans: dir.join(PLANS_FILE),
            template: dir.join(TEMPLATE_FILE),
            output: dir.join(OUTPUT_FILE),
        }
    }
}

impl Default for RunPaths {
    fn default() -> Self {
        RunPaths {
            zips: PathBuf::from(ZIPS_FILE),
            plans: PathBuf::from(PLANS_FILE),
            template: PathBuf::from(TEMPLATE_FILE),
            output: PathBuf::from(OUTPUT_FILE),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.csv")
        .to_string()
}

// ============================================================================
// PHASES
// ============================================================================

/// Phase 1: build and seal the ZIP → rate area registry.
pub fn load_registry(path: &Path, diagnostics: &dyn Diagnostics) -> Result<SealedRegistry> {
    let name = display_name(path);
    let mut reader = open_csv(path)?;
    let mut registry = RateAreaRegistry::new();

    let records = for_each_record(&mut reader, &name, &ZIP_LABELS, |record: ZipRecord| {
        if let MappingOutcome::Ambiguous { kept, rejected } = registry.register_record(&record) {
            diagnostics.trace(&format!(
                "Ambiguous zip code {}: mapping to {} failed as a mapping to {} is already defined",
                record.zipcode, rejected, kept
            ));
        }
        Ok(())
    })?;

    diagnostics.info(&format!(
        "Parsed {} records from {} to {} zip codes and {} rate areas",
        records,
        name,
        registry.zip_count(),
        registry.area_count()
    ));
    if registry.ambiguous_count() > 0 {
        diagnostics.warn(&format!(
            "Note: {} contained {} ambiguous zip codes",
            name,
            registry.ambiguous_count()
        ));
    }

    Ok(registry.seal())
}

/// Phase 2: fold every plan into the top-2 silver rates of its area.
pub fn load_plans<'r>(
    path: &Path,
    registry: &'r SealedRegistry,
    diagnostics: &dyn Diagnostics,
) -> Result<SlcspIndex<'r>> {
    let name = display_name(path);
    let mut reader = open_csv(path)?;
    let mut aggregator = SilverPlanAggregator::new(registry);

    let records = for_each_record(&mut reader, &name, &PLAN_LABELS, |plan: PlanRecord| {
        match aggregator.observe_record(&plan)? {
            PlanOutcome::Unmapped(key) => {
                diagnostics.trace(&format!("Plan applies to unmapped rate area: {}", key));
            }
            PlanOutcome::Ranked { key, rank, rate } => {
                diagnostics.trace(&format!(
                    "Plan {} at rate {} ranked {:?} in {}",
                    plan.plan_id, rate, rank, key
                ));
            }
            PlanOutcome::NotSilver | PlanOutcome::NotRanked { .. } => {}
        }
        Ok(())
    })?;

    let index = aggregator.finish();
    diagnostics.info(&format!(
        "Parsed {} records from {} to {} silver plans",
        records,
        name,
        index.silver_plan_count()
    ));
    if !index.unmapped_areas().is_empty() {
        diagnostics.warn(&format!(
            "Note: {} contained {} unmapped areas",
            name,
            index.unmapped_areas().len()
        ));
    }

    Ok(index)
}

/// Phase 3: resolve every template ZIP code and write the report.
pub fn write_report(
    template: &Path,
    output: &Path,
    index: &SlcspIndex,
    diagnostics: &dyn Diagnostics,
) -> Result<RunSummary> {
    let template_name = display_name(template);
    let output_name = display_name(output);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(template)
        .with_context(|| format!("Failed to open file: {}", template.display()))?;
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .with_context(|| format!("Cannot create file {}", output.display()))?;

    let emitter = ReportEmitter::new(SlcspResolver::new(index), diagnostics);
    emitter.emit(&mut reader, &template_name, &mut writer, &output_name)
}

/// All three phases, in order.
pub fn run(paths: &RunPaths, diagnostics: &dyn Diagnostics) -> Result<RunSummary> {
    let registry = load_registry(&paths.zips, diagnostics)?;
    let index = load_plans(&paths.plans, &registry, diagnostics)?;
    let summary = write_report(&paths.template, &paths.output, &index, diagnostics)?;

    diagnostics.debug(&summary.to_json()?);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::error::SlcspError;
    use std::fs;
    use tempfile::TempDir;
    use tracing::Level;

    const ZIPS: &str = "zipcode,state,county_code,name,rate_area\n\
                        64148,MO,29095,Jackson,3\n\
                        67118,KS,20095,Kingman,6\n\
                        40813,KY,21013,Bell,8\n\
                        54923,WI,55139,Winnebago,15\n\
                        54923,WI,55047,Green Lake,11\n\
                        36749,AL,01001,Autauga,11\n\
                        36749,AL,01021,Chilton,11\n";

    const PLANS: &str = "plan_id,state,metal_level,rate,rate_area\n\
                         74449NR9870320,MO,Silver,245.2,3\n\
                         26325VH2723968,MO,Silver,290.05,3\n\
                         92239NX5268096,MO,Gold,200.3,3\n\
                         65356FA0485214,MO,Silver,234.6,3\n\
                         48418ST6271045,KS,Silver,212.35,6\n\
                         16778BJ3424124,KY,Bronze,150,8\n\
                         63498VB5847215,AL,Silver,300,11\n\
                         21358DY7893231,AL,Silver,301.5,11\n\
                         11111AA1111111,TX,Silver,250,1\n\
                         22222BB2222222,WI,Silver,280,15\n\
                         33333CC3333333,WI,Silver,285,15\n";

    const TEMPLATE: &str = "zipcode,rate\n\
                            64148,\n\
                            67118,\n\
                            40813,\n\
                            54923,\n\
                            36749,\n\
                            99999,\n\
                            64148,\n";

    fn stage(zips: &str, plans: &str, template: &str) -> (TempDir, RunPaths) {
        let dir = TempDir::new().unwrap();
        let paths = RunPaths::in_dir(dir.path());
        fs::write(&paths.zips, zips).unwrap();
        fs::write(&paths.plans, plans).unwrap();
        fs::write(&paths.template, template).unwrap();
        (dir, paths)
    }

    #[test]
    fn test_default_paths_use_fixed_names() {
        let paths = RunPaths::default();
        assert_eq!(paths.zips, PathBuf::from("zips.csv"));
        assert_eq!(paths.plans, PathBuf::from("plans.csv"));
        assert_eq!(paths.template, PathBuf::from("slcsp.csv"));
        assert_eq!(paths.output, PathBuf::from("slcsp-modified.csv"));
    }

    #[test]
    fn test_full_run_writes_augmented_report() {
        let (_dir, paths) = stage(ZIPS, PLANS, TEMPLATE);
        let sink = MemoryDiagnostics::new();

        let summary = run(&paths, &sink).unwrap();
        let output = fs::read_to_string(&paths.output).unwrap();

        assert_eq!(
            output,
            "zipcode,rate\n\
             64148,245.2\n\
             67118,\n\
             40813,\n\
             54923,\n\
             36749,301.5\n\
             99999,\n\
             64148,245.2\n"
        );
        assert_eq!(summary.records_processed, 7);
        assert_eq!(summary.ambiguous_zips, 1);
        assert_eq!(summary.unmapped_areas, 1);
        assert_eq!(summary.insufficient_plan_zips, 2);
        assert_eq!(summary.zip_codes, 5);
        assert_eq!(summary.rate_areas, 6);
    }

    #[test]
    fn test_full_run_diagnostics() {
        let (_dir, paths) = stage(ZIPS, PLANS, TEMPLATE);
        let sink = MemoryDiagnostics::new();
        run(&paths, &sink).unwrap();

        assert!(sink.contains(
            Level::INFO,
            "Parsed 7 records from zips.csv to 5 zip codes and 6 rate areas"
        ));
        assert!(sink.contains(Level::WARN, "zips.csv contained 1 ambiguous zip codes"));
        assert!(sink.contains(Level::INFO, "Parsed 11 records from plans.csv"));
        assert!(sink.contains(Level::WARN, "plans.csv contained 1 unmapped areas"));
        assert!(sink.contains(Level::TRACE, "unmapped rate area: TX 1"));
        assert!(sink.contains(Level::INFO, "Wrote 7 records to slcsp-modified.csv"));
        assert!(sink.contains(Level::DEBUG, "\"records_processed\": 7"));
    }

    #[test]
    fn test_zip_header_mismatch_writes_nothing() {
        let zips = "zip,state,county_code,name,rate_area\n64148,MO,29095,Jackson,3\n";
        let (_dir, paths) = stage(zips, PLANS, TEMPLATE);
        let sink = MemoryDiagnostics::new();

        let err = run(&paths, &sink).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SlcspError>(),
            Some(SlcspError::HeaderMismatch { .. })
        ));
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_plan_header_mismatch_writes_nothing() {
        let plans = "plan_id,state,metal_level,rate\nA,MO,Silver,100\n";
        let (_dir, paths) = stage(ZIPS, plans, TEMPLATE);
        let sink = MemoryDiagnostics::new();

        assert!(run(&paths, &sink).is_err());
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_invalid_silver_rate_aborts() {
        let plans = "plan_id,state,metal_level,rate,rate_area\nA,MO,Silver,cheap,3\n";
        let (_dir, paths) = stage(ZIPS, plans, TEMPLATE);
        let sink = MemoryDiagnostics::new();

        let err = run(&paths, &sink).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SlcspError>(),
            Some(&SlcspError::InvalidRate {
                plan_id: "A".to_string(),
                rate: "cheap".to_string()
            })
        );
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let (_dir, paths) = stage(ZIPS, PLANS, TEMPLATE);
        fs::remove_file(&paths.plans).unwrap();
        let sink = MemoryDiagnostics::new();

        let err = run(&paths, &sink).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open file"));
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_missing_template_creates_no_output() {
        let (_dir, paths) = stage(ZIPS, PLANS, TEMPLATE);
        fs::remove_file(&paths.template).unwrap();
        let sink = MemoryDiagnostics::new();

        assert!(run(&paths, &sink).is_err());
        assert!(!paths.output.exists());
    }

    #[test]
    fn test_plan_for_undeclared_area_is_skipped() {
        let zips = "zipcode,state,county_code,name,rate_area\n10001,NY,36061,New York,1\n";
        let plans = "plan_id,state,metal_level,rate,rate_area\n\
                     A,NY,Silver,400,1\n\
                     B,NY,Silver,410,1\n\
                     C,NY,Silver,100,2\n";
        let (_dir, paths) = stage(zips, plans, "zipcode,rate\n10001,\n");
        let sink = MemoryDiagnostics::new();

        let summary = run(&paths, &sink).unwrap();
        assert_eq!(summary.unmapped_areas, 1);
        assert_eq!(
            fs::read_to_string(&paths.output).unwrap(),
            "zipcode,rate\n10001,410\n"
        );
    }
}
