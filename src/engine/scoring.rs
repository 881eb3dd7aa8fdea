use serde::{Deserialize, Serialize};

/// Occupant comfort (1.0 = ideal). Simplified ASHRAE 55 style penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortModel {
    pub setpoint_threshold_c: f64,
    pub setpoint_exponent: f64,
    pub setpoint_coefficient: f64,
    pub shed_threshold: f64,
    pub shed_coefficient: f64,
    /// Occupancy below this softens the shedding penalty
    pub low_occupancy_below: u32,
    pub low_occupancy_shed_factor: f64,
    /// Occupancy above this sharpens the setpoint penalty
    pub high_occupancy_above: u32,
    pub high_occupancy_setpoint_factor: f64,
    pub floor: f64,
}

impl Default for ComfortModel {
    fn default() -> Self {
        Self {
            setpoint_threshold_c: 24.0,
            setpoint_exponent: 1.5,
            setpoint_coefficient: 0.08,
            shed_threshold: 0.15,
            shed_coefficient: 2.5,
            low_occupancy_below: 10,
            low_occupancy_shed_factor: 0.5,
            high_occupancy_above: 50,
            high_occupancy_setpoint_factor: 1.5,
            floor: 0.1,
        }
    }
}

impl ComfortModel {
    pub fn setpoint_penalty(&self, setpoint_c: f64, occupancy: u32) -> f64 {
        if setpoint_c <= self.setpoint_threshold_c {
            return 0.0;
        }
        let penalty = (setpoint_c - self.setpoint_threshold_c).powf(self.setpoint_exponent)
            * self.setpoint_coefficient;
        if occupancy > self.high_occupancy_above {
            penalty * self.high_occupancy_setpoint_factor
        } else {
            penalty
        }
    }

    pub fn shedding_penalty(&self, shed_fraction: f64, occupancy: u32) -> f64 {
        if shed_fraction <= self.shed_threshold {
            return 0.0;
        }
        let penalty = (shed_fraction - self.shed_threshold) * self.shed_coefficient;
        if occupancy < self.low_occupancy_below {
            penalty * self.low_occupancy_shed_factor
        } else {
            penalty
        }
    }

    pub fn score(&self, setpoint_c: f64, shed_fraction: f64, occupancy: u32) -> f64 {
        let penalty = self.setpoint_penalty(setpoint_c, occupancy)
            + self.shedding_penalty(shed_fraction, occupancy);
        (1.0 - penalty).clamp(self.floor, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityModel {
    pub baseline: f64,
    /// Score gained per unit of shed fraction
    pub shed_bonus: f64,
    /// Power factors at or below this cap the score
    pub low_power_factor: f64,
    pub low_power_factor_cap: f64,
}

impl Default for StabilityModel {
    fn default() -> Self {
        Self {
            baseline: 0.85,
            shed_bonus: 0.15,
            low_power_factor: 0.7,
            low_power_factor_cap: 0.6,
        }
    }
}

impl StabilityModel {
    pub fn score(&self, shed_fraction: f64, power_factor: f64, disconnected: bool) -> f64 {
        if disconnected {
            return 0.0;
        }
        let mut score = self.baseline + shed_fraction * self.shed_bonus;
        if power_factor <= self.low_power_factor {
            score = score.min(self.low_power_factor_cap);
        }
        score.clamp(0.0, 1.0)
    }
}
