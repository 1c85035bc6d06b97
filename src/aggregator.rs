// 🥈 Silver Plan Aggregator - top-2 silver rates per rate area
//
// Works against a SealedRegistry only, so plans cannot be observed while
// ZIP mappings are still loading. Areas unknown to the registry stay
// unknown: there is no later fix-up.

use crate::error::SlcspError;
use crate::rate_area::{parse_rate, Rank, RateArea, RateAreaKey};
use crate::records::PlanRecord;
use crate::registry::SealedRegistry;
use std::collections::{BTreeSet, HashMap};

/// Metal level designation that feeds the SLCSP (exact, case-sensitive)
pub const SILVER_LEVEL: &str = "Silver";

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Not a silver plan, ignored
    NotSilver,

    /// Silver plan for an area the registry never declared
    Unmapped(RateAreaKey),

    /// Silver plan that entered the area's top two
    Ranked { key: RateAreaKey, rank: Rank, rate: f64 },

    /// Silver plan that did not beat the current top two
    NotRanked { key: RateAreaKey, rate: f64 },
}

pub struct SilverPlanAggregator<'r> {
    registry: &'r SealedRegistry,
    areas: HashMap<RateAreaKey, RateArea>,
    unmapped_areas: BTreeSet<RateAreaKey>,
    silver_plans: usize,
}

impl<'r> SilverPlanAggregator<'r> {
    pub fn new(registry: &'r SealedRegistry) -> Self {
        SilverPlanAggregator {
            registry,
            areas: HashMap::new(),
            unmapped_areas: BTreeSet::new(),
            silver_plans: 0,
        }
    }

    /// Observe one plan. Only a malformed silver rate is an error.
    pub fn observe(
        &mut self,
        state: &str,
        area_number: &str,
        plan_id: &str,
        metal_level: &str,
        rate: &str,
    ) -> Result<PlanOutcome, SlcspError> {
        if metal_level != SILVER_LEVEL {
            return Ok(PlanOutcome::NotSilver);
        }

        let rate = parse_rate(plan_id, rate)?;
        self.silver_plans += 1;

        let key = RateAreaKey::new(state, area_number);
        if !self.registry.contains_area(&key) {
            self.unmapped_areas.insert(key.clone());
            return Ok(PlanOutcome::Unmapped(key));
        }

        let area = self
            .areas
            .entry(key.clone())
            .or_insert_with(|| RateArea::new(key.clone()));

        Ok(match area.observe_rate(rate) {
            Some(rank) => PlanOutcome::Ranked { key, rank, rate },
            None => PlanOutcome::NotRanked { key, rate },
        })
    }

    pub fn observe_record(&mut self, plan: &PlanRecord) -> Result<PlanOutcome, SlcspError> {
        self.observe(
            &plan.state,
            &plan.rate_area,
            &plan.plan_id,
            &plan.metal_level,
            &plan.rate,
        )
    }

    pub fn unmapped_count(&self) -> usize {
        self.unmapped_areas.len()
    }

    pub fn finish(self) -> SlcspIndex<'r> {
        SlcspIndex {
            registry: self.registry,
            areas: self.areas,
            unmapped_areas: self.unmapped_areas,
            silver_plans: self.silver_plans,
        }
    }
}

// ============================================================================
// SLCSP INDEX (read-only result of both loading phases)
// ============================================================================

#[derive(Debug)]
pub struct SlcspIndex<'r> {
    registry: &'r SealedRegistry,
    areas: HashMap<RateAreaKey, RateArea>,
    unmapped_areas: BTreeSet<RateAreaKey>,
    silver_plans: usize,
}

impl<'r> SlcspIndex<'r> {
    pub fn registry(&self) -> &'r SealedRegistry {
        self.registry
    }

    /// Silver-plan state for an area; None when no silver plan was seen
    pub fn rate_area(&self, key: &RateAreaKey) -> Option<&RateArea> {
        self.areas.get(key)
    }

    pub fn unmapped_areas(&self) -> &BTreeSet<RateAreaKey> {
        &self.unmapped_areas
    }

    /// Silver plans observed, mapped or not
    pub fn silver_plan_count(&self) -> usize {
        self.silver_plans
    }
}
