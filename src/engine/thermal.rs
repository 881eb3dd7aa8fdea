use serde::{Deserialize, Serialize};

/// Setpoint-driven HVAC savings with environmental derating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalModel {
    /// Setpoint at which the baseline load is measured (°C)
    pub baseline_setpoint_c: f64,
    /// Savings per degree above baseline before saturation (~8.5%/°C)
    pub savings_coefficient: f64,
    /// Relative humidity above which latent load erodes savings (%)
    pub humidity_threshold_pct: f64,
    /// Fraction of savings lost per humidity point above the threshold
    pub humidity_derate_per_pct: f64,
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self {
            baseline_setpoint_c: 22.0,
            savings_coefficient: 0.085,
            humidity_threshold_pct: 60.0,
            humidity_derate_per_pct: 0.01,
        }
    }
}

impl ThermalModel {
    pub fn setpoint_delta(&self, setpoint_c: f64) -> f64 {
        (setpoint_c - self.baseline_setpoint_c).max(0.0)
    }

    /// Saturating savings curve; returns diminishing gains past ~26°C.
    pub fn base_savings(&self, setpoint_c: f64) -> f64 {
        (self.setpoint_delta(setpoint_c) * self.savings_coefficient).tanh()
    }

    pub fn humidity_factor(&self, relative_humidity_pct: f64) -> f64 {
        if relative_humidity_pct <= self.humidity_threshold_pct {
            return 1.0;
        }
        let excess = relative_humidity_pct - self.humidity_threshold_pct;
        (1.0 - excess * self.humidity_derate_per_pct).clamp(0.0, 1.0)
    }

    /// Fraction of baseline load saved by the setpoint after humidity and
    /// compressor wear.
    pub fn savings_fraction(
        &self,
        setpoint_c: f64,
        relative_humidity_pct: f64,
        compressor_health: f64,
    ) -> f64 {
        self.base_savings(setpoint_c)
            * self.humidity_factor(relative_humidity_pct)
            * compressor_health.clamp(0.0, 1.0)
    }
}
