//! Grid-condition overrides on the requested shed fraction.
//!
//! Rules are evaluated in [`OVERRIDE_PRECEDENCE`] order. A rule either leaves
//! the fraction alone, raises it to a floor, or forces an absolute value.
//! Floors compose by `max` so their relative order does not change the
//! result; a forced value stops evaluation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::SimulationInput;

/// Grid condition that can override the operator's shed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GridCondition {
    /// Over-voltage: facility disconnects entirely
    VoltageSurge,
    /// Under-voltage
    Brownout,
    /// Under-frequency emergency
    FrequencyEmergency,
    /// Carbon intensity above the dirty-grid threshold
    DirtyGrid,
}

/// Highest precedence first.
pub const OVERRIDE_PRECEDENCE: [GridCondition; 4] = [
    GridCondition::VoltageSurge,
    GridCondition::Brownout,
    GridCondition::FrequencyEmergency,
    GridCondition::DirtyGrid,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShedOverride {
    /// Raise the fraction to at least this value
    Floor(f64),
    /// Replace the fraction and skip lower-precedence rules
    Force(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridThresholds {
    pub surge_voltage_v: f64,
    pub brownout_voltage_v: f64,
    pub brownout_shed_floor: f64,
    pub min_frequency_hz: f64,
    pub frequency_shed_floor: f64,
    pub dirty_carbon_intensity: f64,
    pub dirty_grid_shed_floor: f64,
}

impl Default for GridThresholds {
    fn default() -> Self {
        Self {
            surge_voltage_v: 255.0,
            brownout_voltage_v: 200.0,
            brownout_shed_floor: 0.5,
            min_frequency_hz: 49.8,
            frequency_shed_floor: 0.5,
            dirty_carbon_intensity: 0.9,
            dirty_grid_shed_floor: 0.2,
        }
    }
}

impl GridCondition {
    pub fn evaluate(
        self,
        input: &SimulationInput,
        thresholds: &GridThresholds,
    ) -> Option<ShedOverride> {
        match self {
            GridCondition::VoltageSurge => input
                .grid_voltage
                .filter(|v| *v > thresholds.surge_voltage_v)
                .map(|_| ShedOverride::Force(1.0)),
            GridCondition::Brownout => input
                .grid_voltage
                .filter(|v| *v < thresholds.brownout_voltage_v)
                .map(|_| ShedOverride::Floor(thresholds.brownout_shed_floor)),
            GridCondition::FrequencyEmergency => input
                .grid_frequency
                .filter(|hz| *hz < thresholds.min_frequency_hz)
                .map(|_| ShedOverride::Floor(thresholds.frequency_shed_floor)),
            GridCondition::DirtyGrid => input
                .grid_carbon_intensity
                .filter(|ci| *ci > thresholds.dirty_carbon_intensity)
                .map(|_| ShedOverride::Floor(thresholds.dirty_grid_shed_floor)),
        }
    }
}

/// Effective shed fraction and the conditions that shaped it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShedDecision {
    pub requested: f64,
    pub fraction: f64,
    /// Condition that forced an absolute value, if any
    pub forced_by: Option<GridCondition>,
    /// Every condition that fired, in precedence order
    pub triggered: Vec<GridCondition>,
}

impl ShedDecision {
    /// True when a forced override disconnected the facility.
    pub fn is_shutdown(&self) -> bool {
        self.forced_by.is_some() && self.fraction >= 1.0
    }
}

pub fn resolve_shed(input: &SimulationInput, thresholds: &GridThresholds) -> ShedDecision {
    let requested = input.reduction_factor.clamp(0.0, 1.0);
    let mut decision = ShedDecision {
        requested,
        fraction: requested,
        forced_by: None,
        triggered: Vec::new(),
    };

    for condition in OVERRIDE_PRECEDENCE {
        let Some(action) = condition.evaluate(input, thresholds) else {
            continue;
        };
        decision.triggered.push(condition);
        match action {
            ShedOverride::Force(value) => {
                decision.fraction = value.clamp(0.0, 1.0);
                decision.forced_by = Some(condition);
                break;
            }
            ShedOverride::Floor(floor) => {
                decision.fraction = decision.fraction.max(floor.clamp(0.0, 1.0));
            }
        }
    }

    if !decision.triggered.is_empty() {
        debug!(
            requested = decision.requested,
            effective = decision.fraction,
            triggered = ?decision.triggered,
            "grid overrides applied to shed fraction"
        );
    }

    decision
}
