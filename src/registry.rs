// 📍 Rate Area Registry - ZIP code → rate area mapping
//
// Built from zips.csv, then sealed. The relationship is many-to-one: a ZIP
// code seen with two different rate areas is ambiguous, and only its first
// mapping is kept.

use crate::rate_area::RateAreaKey;
use crate::records::ZipRecord;
use std::collections::{BTreeSet, HashMap, HashSet};

// ============================================================================
// MAPPING OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingOutcome {
    /// First mapping for this ZIP code
    Mapped,

    /// Same ZIP code, same rate area again (multi-county ZIPs)
    AlreadyMapped,

    /// Same ZIP code, different rate area: flagged, first mapping kept
    Ambiguous {
        kept: RateAreaKey,
        rejected: RateAreaKey,
    },
}

// ============================================================================
// REGISTRY (loading phase)
// ============================================================================

#[derive(Debug, Default)]
pub struct RateAreaRegistry {
    zip_to_area: HashMap<String, RateAreaKey>,
    areas: HashSet<RateAreaKey>,
    ambiguous_zips: BTreeSet<String>,
}

impl RateAreaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one ZIP → (state, area number) mapping.
    ///
    /// The rate area is created on first reference even when the mapping
    /// itself is rejected as ambiguous.
    pub fn register(&mut self, zip: &str, state: &str, area_number: &str) -> MappingOutcome {
        let key = RateAreaKey::new(state, area_number);
        self.areas.insert(key.clone());

        match self.zip_to_area.get(zip) {
            None => {
                self.zip_to_area.insert(zip.to_string(), key);
                MappingOutcome::Mapped
            }
            Some(existing) if *existing == key => MappingOutcome::AlreadyMapped,
            Some(existing) => {
                self.ambiguous_zips.insert(zip.to_string());
                MappingOutcome::Ambiguous {
                    kept: existing.clone(),
                    rejected: key,
                }
            }
        }
    }

    pub fn register_record(&mut self, record: &ZipRecord) -> MappingOutcome {
        self.register(&record.zipcode, &record.state, &record.rate_area)
    }

    pub fn zip_count(&self) -> usize {
        self.zip_to_area.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn ambiguous_count(&self) -> usize {
        self.ambiguous_zips.len()
    }

    /// Freeze the mapping. Plans can only be observed against a sealed registry.
    pub fn seal(self) -> SealedRegistry {
        SealedRegistry {
            zip_to_area: self.zip_to_area,
            areas: self.areas,
            ambiguous_zips: self.ambiguous_zips,
        }
    }
}

// ============================================================================
// SEALED REGISTRY (read-only)
// ============================================================================

#[derive(Debug)]
pub struct SealedRegistry {
    zip_to_area: HashMap<String, RateAreaKey>,
    areas: HashSet<RateAreaKey>,
    ambiguous_zips: BTreeSet<String>,
}

impl SealedRegistry {
    /// The retained (first-seen) rate area for a ZIP code, ambiguous or not
    pub fn rate_area_for(&self, zip: &str) -> Option<&RateAreaKey> {
        self.zip_to_area.get(zip)
    }

    pub fn contains_area(&self, key: &RateAreaKey) -> bool {
        self.areas.contains(key)
    }

    pub fn is_ambiguous(&self, zip: &str) -> bool {
        self.ambiguous_zips.contains(zip)
    }

    pub fn ambiguous_zips(&self) -> &BTreeSet<String> {
        &self.ambiguous_zips
    }

    pub fn zip_count(&self) -> usize {
        self.zip_to_area.len()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }
}
