// 🔎 SLCSP Resolver - ZIP code → second-lowest silver rate

use crate::aggregator::SlcspIndex;
use crate::rate_area::format_rate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Rate(f64),

    /// ZIP code maps to more than one rate area
    Ambiguous,

    /// ZIP code is not in the mapping source
    NoRateArea,

    /// Fewer than two silver plans in the ZIP code's rate area
    InsufficientPlans,
}

impl Resolution {
    pub fn rate(&self) -> Option<f64> {
        match self {
            Resolution::Rate(rate) => Some(*rate),
            _ => None,
        }
    }

    /// Value for the report's `rate` column; empty when disqualified
    pub fn formatted(&self) -> String {
        self.rate().map(format_rate).unwrap_or_default()
    }
}

pub struct SlcspResolver<'i, 'r> {
    index: &'i SlcspIndex<'r>,
    insufficient_zips: BTreeSet<String>,
}

impl<'i, 'r> SlcspResolver<'i, 'r> {
    pub fn new(index: &'i SlcspIndex<'r>) -> Self {
        SlcspResolver {
            index,
            insufficient_zips: BTreeSet::new(),
        }
    }

    pub fn resolve(&mut self, zip: &str) -> Resolution {
        let registry = self.index.registry();
        if registry.is_ambiguous(zip) {
            return Resolution::Ambiguous;
        }

        let Some(key) = registry.rate_area_for(zip) else {
            return Resolution::NoRateArea;
        };

        match self.index.rate_area(key).and_then(|area| area.slcsp()) {
            Some(rate) => Resolution::Rate(rate),
            None => {
                self.insufficient_zips.insert(zip.to_string());
                Resolution::InsufficientPlans
            }
        }
    }

    pub fn insufficient_zips(&self) -> &BTreeSet<String> {
        &self.insufficient_zips
    }

    pub fn index(&self) -> &'i SlcspIndex<'r> {
        self.index
    }
}
