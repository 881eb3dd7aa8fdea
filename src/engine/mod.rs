//! # Impact Engine
//!
//! Pure, stateless estimator of the energy, cost, carbon, comfort and grid
//! stability impact of an HVAC setpoint and load-shedding decision.
//!
//! ## Pipeline
//!
//! 1. **Tariff**: time-of-use band from the optional timestamp
//! 2. **Thermal**: setpoint savings derated by humidity and compressor health
//! 3. **Shedding**: operator request, then grid overrides in precedence order
//! 4. **Battery**: tariff-driven charge/discharge
//! 5. **Maintenance**: forces the plant off
//! 6. **Solar**: net grid exchange, negative on export
//! 7. **Cost / carbon**: billing terms and emissions of imported energy
//! 8. **Comfort / stability**: occupant and grid scores
//!
//! ## Usage
//!
//! ```rust
//! use gridops_optimizer::domain::SimulationInput;
//! use gridops_optimizer::engine::{ImpactCalculator, ImpactModel};
//!
//! let calculator = ImpactCalculator::new(ImpactModel::default());
//! let output = calculator.compute(&SimulationInput::new(24.0, 0.1)).unwrap();
//! assert!(output.projected_kwh < 28_500.0);
//! ```

pub mod battery;
pub mod scoring;
pub mod settlement;
pub mod shedding;
pub mod tariff;
pub mod thermal;

pub use battery::{ArbitragePolicy, BatteryAction};
pub use scoring::{ComfortModel, StabilityModel};
pub use settlement::{carbon_footprint, BillingModel};
pub use shedding::{resolve_shed, GridCondition, GridThresholds, ShedDecision, ShedOverride};
pub use tariff::{ResolvedTariff, TariffBand, TariffSchedule};
pub use thermal::ThermalModel;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::{SimulationInput, SimulationOutput};

#[derive(Debug, Error, PartialEq)]
pub enum CalculationError {
    #[error("non-finite {quantity} produced by impact calculation")]
    NonFinite { quantity: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityModel {
    /// Daily baseline consumption at the baseline setpoint (kWh).
    /// Default is a 50,000 sqft commercial facility.
    pub base_load_kwh: f64,
    /// Grid emission factor (kgCO2/kWh)
    pub carbon_intensity_kg_per_kwh: f64,
}

impl Default for FacilityModel {
    fn default() -> Self {
        Self {
            base_load_kwh: 28_500.0,
            carbon_intensity_kg_per_kwh: 0.82,
        }
    }
}

/// Every rate, threshold and coefficient the calculator uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactModel {
    pub facility: FacilityModel,
    pub tariff: TariffSchedule,
    pub thermal: ThermalModel,
    pub grid: GridThresholds,
    pub battery: ArbitragePolicy,
    pub billing: BillingModel,
    pub comfort: ComfortModel,
    pub stability: StabilityModel,
}

/// Unrounded result of every pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactBreakdown {
    pub tariff: ResolvedTariff,
    pub savings_fraction: f64,
    pub shed: ShedDecision,
    pub battery: BatteryAction,
    pub maintenance: bool,
    /// Facility demand after thermal savings, shedding and battery (kWh)
    pub site_load_kwh: f64,
    /// Grid exchange after solar; negative is export (kWh)
    pub net_load_kwh: f64,
    pub cost: f64,
    pub carbon_kg: f64,
    pub comfort: f64,
    pub stability: f64,
}

impl ImpactBreakdown {
    pub fn is_offline(&self) -> bool {
        self.maintenance || self.shed.is_shutdown()
    }

    pub fn imported_kwh(&self) -> f64 {
        self.net_load_kwh.max(0.0)
    }

    pub fn exported_kwh(&self) -> f64 {
        (-self.net_load_kwh).max(0.0)
    }

    pub fn to_output(&self) -> SimulationOutput {
        SimulationOutput {
            projected_kwh: round_to(self.imported_kwh(), 2),
            cost_estimate: round_to(self.cost, 2),
            carbon_footprint: round_to(self.carbon_kg, 2),
            comfort_index: round_to(self.comfort, 3),
            grid_stability_score: round_to(self.stability, 3),
        }
    }

    fn ensure_finite(&self) -> Result<(), CalculationError> {
        let quantities = [
            ("savings fraction", self.savings_fraction),
            ("shed fraction", self.shed.fraction),
            ("site load", self.site_load_kwh),
            ("net load", self.net_load_kwh),
            ("cost", self.cost),
            ("carbon footprint", self.carbon_kg),
            ("comfort index", self.comfort),
            ("stability score", self.stability),
        ];
        match quantities.iter().find(|(_, v)| !v.is_finite()) {
            Some((quantity, _)) => Err(CalculationError::NonFinite {
                quantity: *quantity,
            }),
            None => Ok(()),
        }
    }
}

/// Stateless calculator over an immutable [`ImpactModel`]. Cheap to share
/// behind an `Arc` across request handlers.
#[derive(Debug, Clone, Default)]
pub struct ImpactCalculator {
    model: ImpactModel,
}

impl ImpactCalculator {
    pub fn new(model: ImpactModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ImpactModel {
        &self.model
    }

    pub fn compute(&self, input: &SimulationInput) -> Result<SimulationOutput, CalculationError> {
        self.evaluate(input).map(|breakdown| breakdown.to_output())
    }

    /// Run every stage and keep the intermediate values.
    pub fn evaluate(&self, input: &SimulationInput) -> Result<ImpactBreakdown, CalculationError> {
        let m = &self.model;
        let power_factor = input.power_factor();

        let tariff = m.tariff.resolve(input.timestamp);

        let savings_fraction = m.thermal.savings_fraction(
            input.ac_setpoint,
            input.relative_humidity(),
            input.compressor_health(),
        );

        let shed = resolve_shed(input, &m.grid);
        let base = m.facility.base_load_kwh;
        let demand = (base * (1.0 - savings_fraction - shed.fraction)).max(0.0);

        let maintenance = input.in_maintenance();
        if let Some(condition) = shed.forced_by {
            warn!(%condition, voltage = ?input.grid_voltage, "facility disconnected by grid override");
        }
        if maintenance {
            warn!("maintenance mode active: plant forced off");
        }

        // An offline plant neither runs the battery nor nets solar.
        let (battery, site_load_kwh, net_load_kwh) = if maintenance || shed.is_shutdown() {
            (BatteryAction::Idle, 0.0, 0.0)
        } else {
            let action = m
                .battery
                .decide(input.battery_capacity, input.current_charge, tariff.rate);
            let site = (demand + action.load_delta_kwh()).max(0.0);
            (action, site, site - input.solar_generation_kw())
        };

        let cost = m.billing.settle(
            net_load_kwh,
            tariff.rate,
            power_factor,
            input.enable_incentives,
        );
        let carbon_kg = carbon_footprint(net_load_kwh, m.facility.carbon_intensity_kg_per_kwh);

        let comfort = if maintenance {
            0.0
        } else {
            m.comfort.score(input.ac_setpoint, shed.fraction, input.occupancy())
        };
        let stability = m.stability.score(shed.fraction, power_factor, shed.is_shutdown());

        let breakdown = ImpactBreakdown {
            tariff,
            savings_fraction,
            shed,
            battery,
            maintenance,
            site_load_kwh,
            net_load_kwh,
            cost,
            carbon_kg,
            comfort,
            stability,
        };
        breakdown.ensure_finite()?;
        Ok(breakdown)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn calculator() -> ImpactCalculator {
        ImpactCalculator::new(ImpactModel::default())
    }

    fn at(hour: u32) -> Option<chrono::NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 6, 15).and_then(|d| d.and_hms_opt(hour, 0, 0))
    }

    #[test]
    fn test_baseline_matches_base_load() {
        let out = calculator().compute(&SimulationInput::new(22.0, 0.0)).unwrap();
        assert_eq!(out.projected_kwh, 28_500.0);
        assert_eq!(out.cost_estimate, 285_000.0);
        assert_eq!(out.carbon_footprint, 23_370.0);
        assert_eq!(out.comfort_index, 1.0);
        assert_eq!(out.grid_stability_score, 0.85);
    }

    #[test]
    fn test_peak_and_off_peak_cost() {
        let calc = calculator();
        let mut input = SimulationInput::new(22.0, 0.0);
        input.timestamp = at(16);
        assert_eq!(calc.compute(&input).unwrap().cost_estimate, 413_250.0);
        input.timestamp = at(4);
        assert_eq!(calc.compute(&input).unwrap().cost_estimate, 185_250.0);
    }

    #[test]
    fn test_thermal_and_shed_compose_additively() {
        let b = calculator().evaluate(&SimulationInput::new(24.0, 0.5)).unwrap();
        let expected = 28_500.0 * (1.0 - (2.0f64 * 0.085).tanh() - 0.5);
        assert!((b.site_load_kwh - expected).abs() < 1e-6);
    }

    #[test]
    fn test_surge_shuts_everything_down() {
        let mut input = SimulationInput::new(26.0, 0.2);
        input.grid_voltage = Some(260.0);
        input.battery_capacity = Some(100.0);
        input.timestamp = at(4);
        input.enable_incentives = true;
        let b = calculator().evaluate(&input).unwrap();
        assert!(b.is_offline());
        assert_eq!(b.battery, BatteryAction::Idle);
        let out = b.to_output();
        assert_eq!(out.projected_kwh, 0.0);
        assert_eq!(out.cost_estimate, 0.0);
        assert_eq!(out.carbon_footprint, 0.0);
        assert_eq!(out.grid_stability_score, 0.0);
        assert_eq!(out.comfort_index, 0.1);
    }

    #[test]
    fn test_maintenance_zeroes_load_and_comfort() {
        let mut input = SimulationInput::new(22.0, 0.0);
        input.maintenance_mode = Some(true);
        input.solar_generation_kw = Some(1000.0);
        let out = calculator().compute(&input).unwrap();
        assert_eq!(out.projected_kwh, 0.0);
        assert_eq!(out.comfort_index, 0.0);
        assert_eq!(out.cost_estimate, 0.0);
        assert_eq!(out.carbon_footprint, 0.0);
        // stability still scored normally
        assert_eq!(out.grid_stability_score, 0.85);
    }

    #[test]
    fn test_battery_applied_before_solar() {
        let mut input = SimulationInput::new(22.0, 0.0);
        input.timestamp = at(4);
        input.battery_capacity = Some(50.0);
        input.current_charge = Some(50.0);
        input.solar_generation_kw = Some(1000.0);
        let b = calculator().evaluate(&input).unwrap();
        assert_eq!(b.site_load_kwh, 28_525.0);
        assert_eq!(b.net_load_kwh, 27_525.0);
    }

    #[test]
    fn test_export_is_credited() {
        let mut input = SimulationInput::new(22.0, 0.0);
        input.solar_generation_kw = Some(30_000.0);
        let b = calculator().evaluate(&input).unwrap();
        assert_eq!(b.exported_kwh(), 1_500.0);
        let out = b.to_output();
        assert_eq!(out.projected_kwh, 0.0);
        assert_eq!(out.cost_estimate, 0.0);
        assert_eq!(out.carbon_footprint, 0.0);
    }

    #[test]
    fn test_custom_model_is_honoured() {
        let mut model = ImpactModel::default();
        model.tariff.standard_rate = 20.0;
        model.facility.base_load_kwh = 1_000.0;
        let calculator = ImpactCalculator::new(model.clone());
        assert_eq!(calculator.model(), &model);
        let out = calculator.compute(&SimulationInput::new(22.0, 0.0)).unwrap();
        assert_eq!(out.cost_estimate, 20_000.0);
    }

    #[test]
    fn test_non_finite_model_is_reported() {
        let mut model = ImpactModel::default();
        model.facility.base_load_kwh = f64::INFINITY;
        let err = ImpactCalculator::new(model)
            .compute(&SimulationInput::new(22.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, CalculationError::NonFinite { .. }));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(0.8765, 3), 0.877);
    }
}
