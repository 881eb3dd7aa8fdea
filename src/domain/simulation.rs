use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Power factor assumed when the request does not report one.
pub const DEFAULT_POWER_FACTOR: f64 = 0.90;
/// Relative humidity (%) assumed when the request does not report one.
pub const DEFAULT_RELATIVE_HUMIDITY_PCT: f64 = 60.0;
/// Head count assumed when the request does not report occupancy.
pub const DEFAULT_OCCUPANCY: u32 = 20;
/// Compressor health assumed when the request does not report one.
pub const DEFAULT_COMPRESSOR_HEALTH: f64 = 1.0;

/// Facility and grid snapshot for a single impact calculation.
///
/// Optional fields fall back to the defaults above through the accessor
/// methods; the calculator never reads the raw options for those.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[validate(schema(function = "validate_battery_charge"))]
pub struct SimulationInput {
    /// Target HVAC temperature in Celsius
    #[validate(range(min = 16.0, max = 32.0))]
    pub ac_setpoint: f64,
    /// Requested load shedding fraction (0-1)
    #[validate(range(min = 0.0, max = 1.0))]
    pub reduction_factor: f64,
    /// Apply demand response rebates
    #[serde(default)]
    pub enable_incentives: bool,
    /// Wall-clock instant used for time-of-use tariff resolution
    #[cfg_attr(feature = "swagger", schema(value_type = Option<String>, example = "2024-06-15T16:00:00"))]
    #[serde(default, deserialize_with = "wall_clock::deserialize")]
    pub timestamp: Option<NaiveDateTime>,
    /// kgCO2/kWh
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub grid_carbon_intensity: Option<f64>,
    /// Hz
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub grid_frequency: Option<f64>,
    /// Volts
    #[validate(range(min = 0.0, max = 1000.0))]
    #[serde(default)]
    pub grid_voltage: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub power_factor: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub relative_humidity: Option<f64>,
    /// Head count; fractional values are truncated
    #[cfg_attr(feature = "swagger", schema(value_type = Option<f64>))]
    #[serde(default, deserialize_with = "head_count::deserialize")]
    pub occupancy_count: Option<u32>,
    /// Battery capacity in kWh; zero or absent disables arbitrage
    #[validate(range(min = 0.0, max = 1.0e6))]
    #[serde(default)]
    pub battery_capacity: Option<f64>,
    /// Stored energy in kWh
    #[validate(range(min = 0.0, max = 1.0e6))]
    #[serde(default)]
    pub current_charge: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0e6))]
    #[serde(default)]
    pub solar_generation_kw: Option<f64>,
    #[serde(default)]
    pub maintenance_mode: Option<bool>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub compressor_health: Option<f64>,
}

impl SimulationInput {
    pub fn new(ac_setpoint: f64, reduction_factor: f64) -> Self {
        Self {
            ac_setpoint,
            reduction_factor,
            ..Default::default()
        }
    }

    pub fn power_factor(&self) -> f64 {
        self.power_factor.unwrap_or(DEFAULT_POWER_FACTOR)
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity.unwrap_or(DEFAULT_RELATIVE_HUMIDITY_PCT)
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy_count.unwrap_or(DEFAULT_OCCUPANCY)
    }

    pub fn compressor_health(&self) -> f64 {
        self.compressor_health.unwrap_or(DEFAULT_COMPRESSOR_HEALTH)
    }

    pub fn solar_generation_kw(&self) -> f64 {
        self.solar_generation_kw.unwrap_or(0.0)
    }

    pub fn in_maintenance(&self) -> bool {
        self.maintenance_mode.unwrap_or(false)
    }
}

fn validate_battery_charge(input: &SimulationInput) -> Result<(), ValidationError> {
    if let Some(charge) = input.current_charge {
        let capacity = input.battery_capacity.unwrap_or(0.0);
        if capacity > 0.0 && charge > capacity {
            let mut err = ValidationError::new("current_charge_exceeds_capacity");
            err.message = Some(Cow::from(format!(
                "current_charge {charge} kWh exceeds battery_capacity {capacity} kWh"
            )));
            return Err(err);
        }
    }
    Ok(())
}

/// Result of an impact calculation, rounded for the wire.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub projected_kwh: f64,
    pub cost_estimate: f64,
    pub carbon_footprint: f64,
    pub comfort_index: f64,
    pub grid_stability_score: f64,
}

/// Request body used by the operator dashboard: percentages instead of
/// fractions and camelCase keys.
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRunRequest {
    #[validate(range(min = 16.0, max = 32.0))]
    pub ac_temp: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub reduction_percent: f64,
    #[serde(default)]
    pub incentives: Option<bool>,
}

impl From<DashboardRunRequest> for SimulationInput {
    fn from(req: DashboardRunRequest) -> Self {
        Self {
            enable_incentives: req.incentives.unwrap_or(false),
            ..Self::new(req.ac_temp, req.reduction_percent / 100.0)
        }
    }
}

/// Accepts ISO-8601 timestamps with or without a UTC offset. An offset is not
/// converted: the local wall clock of the given value is what tariffs see.
mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
    ];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(raw.trim())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {raw}")))
    }

    fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}

/// Occupancy arrives as a JSON number; `20` and `20.0` both mean twenty people.
mod head_count {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Whole(u32),
        Fractional(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Whole(n)) => Ok(Some(n)),
            Some(Raw::Fractional(x)) if x.is_finite() && (0.0..=u32::MAX as f64).contains(&x) => {
                Ok(Some(x.trunc() as u32))
            }
            Some(Raw::Fractional(x)) => Err(de::Error::custom(format!(
                "occupancy_count must be a non-negative head count, got {x}"
            ))),
        }
    }
}
