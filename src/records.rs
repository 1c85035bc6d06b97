// 📄 Input Records - CSV shapes for zips.csv and plans.csv
// Header rows are validated exactly before any record is read.

use crate::error::SlcspError;
use anyhow::{Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Expected header of the ZIP mapping source
pub const ZIP_LABELS: [&str; 5] = ["zipcode", "state", "county_code", "name", "rate_area"];

/// Expected header of the plan source
pub const PLAN_LABELS: [&str; 5] = ["plan_id", "state", "metal_level", "rate", "rate_area"];

// ============================================================================
// RECORD TYPES
// ============================================================================

/// One row of zips.csv. `county_code` and `name` are carried but unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipRecord {
    pub zipcode: String,
    pub state: String,
    pub county_code: String,
    pub name: String,
    pub rate_area: String,
}

/// One row of plans.csv. The rate stays textual until a silver plan needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub plan_id: String,
    pub state: String,
    pub metal_level: String,
    pub rate: String,
    pub rate_area: String,
}

// ============================================================================
// READING
// ============================================================================

/// Open a CSV file whose first row is a header.
pub fn open_csv(path: &Path) -> Result<Reader<File>> {
    ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))
}

/// Compare a header row against the expected labels, column by column.
pub fn validate_headers(
    resource: &str,
    expected: &[&str],
    actual: &StringRecord,
) -> Result<(), SlcspError> {
    let matches = actual.len() == expected.len()
        && actual.iter().zip(expected.iter()).all(|(a, e)| a == *e);

    if matches {
        Ok(())
    } else {
        Err(SlcspError::HeaderMismatch {
            resource: resource.to_string(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual: actual.iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// Validate the header, then hand every deserialized record to `handler`
/// in file order. Returns the number of records processed.
pub fn for_each_record<R, T, F>(
    reader: &mut Reader<R>,
    resource: &str,
    expected: &[&str],
    mut handler: F,
) -> Result<usize>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", resource))?
        .clone();
    validate_headers(resource, expected, &headers)?;

    let mut count = 0;
    for (line_num, result) in reader.deserialize::<T>().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, resource)
        })?;
        handler(record)?;
        count += 1;
    }

    Ok(count)
}
