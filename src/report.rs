// 📝 Report Emitter - augmented slcsp.csv + run summary
//
// Template rows are copied in file order, duplicates included, with the
// rate column replaced by the resolved SLCSP (or left empty).

use crate::diagnostics::Diagnostics;
use crate::error::SlcspError;
use crate::resolver::{Resolution, SlcspResolver};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, StringRecord, Writer};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Template rows written to the report
    pub records_processed: usize,
    pub ambiguous_zips: usize,
    pub unmapped_areas: usize,
    pub insufficient_plan_zips: usize,

    /// Mapping and plan statistics, for context
    pub zip_codes: usize,
    pub rate_areas: usize,
    pub silver_plans: usize,

    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} records written | {} ambiguous zip codes, {} unmapped rate areas, {} zip codes with insufficient plans",
            self.records_processed,
            self.ambiguous_zips,
            self.unmapped_areas,
            self.insufficient_plan_zips
        )
    }

    pub fn has_anomalies(&self) -> bool {
        self.ambiguous_zips > 0 || self.unmapped_areas > 0 || self.insufficient_plan_zips > 0
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }
}

// ============================================================================
// REPORT EMITTER
// ============================================================================

pub struct ReportEmitter<'a, 'i, 'r> {
    resolver: SlcspResolver<'i, 'r>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, 'i, 'r> ReportEmitter<'a, 'i, 'r> {
    pub fn new(resolver: SlcspResolver<'i, 'r>, diagnostics: &'a dyn Diagnostics) -> Self {
        ReportEmitter {
            resolver,
            diagnostics,
        }
    }

    /// Copy the template header, then write one `(zip, rate)` row per
    /// template row. The template header is not validated.
    pub fn emit<R: Read, W: Write>(
        mut self,
        template: &mut Reader<R>,
        template_name: &str,
        output: &mut Writer<W>,
        output_name: &str,
    ) -> Result<RunSummary> {
        let headers = template
            .headers()
            .with_context(|| format!("Failed to read header row of {}", template_name))?
            .clone();
        output
            .write_record(&headers)
            .with_context(|| format!("Cannot write to file {}", output_name))?;

        let mut records_processed = 0;
        let mut row = StringRecord::new();
        while template
            .read_record(&mut row)
            .with_context(|| {
                format!("Failed to parse CSV line {} in {}", records_processed + 2, template_name)
            })?
        {
            let zip = row.get(0).ok_or_else(|| SlcspError::MissingZipCode {
                resource: template_name.to_string(),
                line: records_processed + 2,
            })?;

            let resolution = self.resolver.resolve(zip);
            self.trace_resolution(zip, &resolution);

            output
                .write_record([zip, resolution.formatted().as_str()])
                .with_context(|| format!("Cannot write to file {}", output_name))?;
            records_processed += 1;
        }

        output
            .flush()
            .with_context(|| format!("Cannot write to file {}", output_name))?;

        let summary = self.summarize(records_processed);
        self.diagnostics
            .info(&format!("Wrote {} records to {}", records_processed, output_name));
        if summary.insufficient_plan_zips > 0 {
            self.diagnostics.warn(&format!(
                "Note: {} zip codes had insufficient plan info, i.e. less than two plans",
                summary.insufficient_plan_zips
            ));
        }

        Ok(summary)
    }

    fn trace_resolution(&self, zip: &str, resolution: &Resolution) {
        match resolution {
            Resolution::Rate(_) => {}
            Resolution::Ambiguous => self
                .diagnostics
                .trace(&format!("Ambiguous zip code {}, leaving rate empty", zip)),
            Resolution::NoRateArea => self
                .diagnostics
                .trace(&format!("No rate area known for zip code {}", zip)),
            Resolution::InsufficientPlans => self.diagnostics.trace(&format!(
                "Insufficient plans info, i.e. less than two plans for zip code: {}",
                zip
            )),
        }
    }

    fn summarize(&self, records_processed: usize) -> RunSummary {
        let index = self.resolver.index();
        let registry = index.registry();

        RunSummary {
            records_processed,
            ambiguous_zips: registry.ambiguous_zips().len(),
            unmapped_areas: index.unmapped_areas().len(),
            insufficient_plan_zips: self.resolver.insufficient_zips().len(),
            zip_codes: registry.zip_count(),
            rate_areas: registry.area_count(),
            silver_plans: index.silver_plan_count(),
            generated_at: Utc::now(),
        }
    }
}
