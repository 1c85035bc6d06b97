// 🗺️ Rate Area - geographic pricing region + running top-2 silver rates
//
// Identity is the (state, area number) tuple, e.g. NY 1 or IL 14.
// The two lowest silver rates start unset; a $0.00 plan is a real rate.

use crate::error::SlcspError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RATE AREA KEY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RateAreaKey {
    /// Two-letter state postal abbreviation
    pub state: String,
    /// Area number within the state, kept textual as in the source files
    pub number: String,
}

impl RateAreaKey {
    pub fn new(state: impl Into<String>, number: impl Into<String>) -> Self {
        RateAreaKey {
            state: state.into(),
            number: number.into(),
        }
    }
}

impl fmt::Display for RateAreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.number)
    }
}

// ============================================================================
// RATE AREA
// ============================================================================

/// Which slot a newly observed rate landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Lowest,
    SecondLowest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateArea {
    pub key: RateAreaKey,
    lowest: Option<f64>,
    second_lowest: Option<f64>,
}

impl RateArea {
    pub fn new(key: RateAreaKey) -> Self {
        RateArea {
            key,
            lowest: None,
            second_lowest: None,
        }
    }

    pub fn lowest(&self) -> Option<f64> {
        self.lowest
    }

    pub fn second_lowest(&self) -> Option<f64> {
        self.second_lowest
    }

    /// Feed one silver rate into the running top-2.
    ///
    /// Strictly-lower rates displace; equal rates never do, so on ties the
    /// earlier-seen value stays in place.
    pub fn observe_rate(&mut self, rate: f64) -> Option<Rank> {
        match (self.lowest, self.second_lowest) {
            (None, _) => {
                self.lowest = Some(rate);
                Some(Rank::Lowest)
            }
            (Some(lowest), _) if rate < lowest => {
                self.second_lowest = Some(lowest);
                self.lowest = Some(rate);
                Some(Rank::Lowest)
            }
            (Some(_), None) => {
                self.second_lowest = Some(rate);
                Some(Rank::SecondLowest)
            }
            (Some(_), Some(second)) if rate < second => {
                self.second_lowest = Some(rate);
                Some(Rank::SecondLowest)
            }
            _ => None,
        }
    }

    /// The SLCSP, once at least two silver plans were observed
    pub fn slcsp(&self) -> Option<f64> {
        self.second_lowest
    }
}

// ============================================================================
// RATE VALUES
// ============================================================================

/// Parse a plan rate. Anything but a finite, non-negative number is fatal.
pub fn parse_rate(plan_id: &str, rate: &str) -> Result<f64, SlcspError> {
    let invalid = || SlcspError::InvalidRate {
        plan_id: plan_id.to_string(),
        rate: rate.to_string(),
    };

    let value: f64 = rate.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Shortest decimal that round-trips, no trailing zeros, no exponent:
/// 150.0 → "150", 150.5 → "150.5", 150.25 → "150.25".
pub fn format_rate(rate: f64) -> String {
    // f64's Display already emits the shortest round-trip digits and never
    // switches to scientific notation. Normalise -0 so it prints as "0".
    if rate == 0.0 {
        return "0".to_string();
    }
    format!("{}", rate)
}
