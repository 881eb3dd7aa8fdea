//! Invariants that must hold for every validated input.

use proptest::prelude::*;
use validator::Validate;

use gridops_optimizer::domain::SimulationInput;
use gridops_optimizer::engine::{ImpactCalculator, ImpactModel};

fn calculator() -> ImpactCalculator {
    ImpactCalculator::new(ImpactModel::default())
}

prop_compose! {
    fn arb_input()(
        ac_setpoint in 16.0f64..=32.0,
        reduction_factor in 0.0f64..=1.0,
        enable_incentives in any::<bool>(),
        hour in proptest::option::of(0u32..24),
        (grid_carbon_intensity, grid_frequency, grid_voltage) in (
            proptest::option::of(0.0f64..1.5),
            proptest::option::of(49.0f64..51.0),
            proptest::option::of(150.0f64..300.0),
        ),
        power_factor in proptest::option::of(0.0f64..=1.0),
        relative_humidity in proptest::option::of(0.0f64..=100.0),
        occupancy_count in proptest::option::of(0u32..200),
        battery in proptest::option::of((0.0f64..500.0, 0.0f64..=1.0)),
        solar_generation_kw in proptest::option::of(0.0f64..50_000.0),
        (maintenance_mode, compressor_health) in (
            proptest::option::of(any::<bool>()),
            proptest::option::of(0.0f64..=1.0),
        ),
    ) -> SimulationInput {
        SimulationInput {
            ac_setpoint,
            reduction_factor,
            enable_incentives,
            timestamp: hour.and_then(|h| {
                chrono::NaiveDate::from_ymd_opt(2024, 6, 15).and_then(|d| d.and_hms_opt(h, 0, 0))
            }),
            grid_carbon_intensity,
            grid_frequency,
            grid_voltage,
            power_factor,
            relative_humidity,
            occupancy_count,
            battery_capacity: battery.map(|(capacity, _)| capacity),
            current_charge: battery.map(|(capacity, soc)| capacity * soc),
            solar_generation_kw,
            maintenance_mode,
            compressor_health,
        }
    }
}

proptest! {
    #[test]
    fn test_outputs_are_finite_and_bounded(input in arb_input()) {
        prop_assert!(input.validate().is_ok());
        let out = calculator().compute(&input).unwrap();
        prop_assert!(out.projected_kwh >= 0.0);
        prop_assert!(out.cost_estimate >= 0.0);
        prop_assert!(out.carbon_footprint >= 0.0);
        prop_assert!((0.0..=1.0).contains(&out.comfort_index));
        prop_assert!((0.0..=1.0).contains(&out.grid_stability_score));
    }

    #[test]
    fn test_maintenance_zeroes_load_and_comfort(input in arb_input()) {
        let mut input = input;
        input.maintenance_mode = Some(true);
        let out = calculator().compute(&input).unwrap();
        prop_assert_eq!(out.projected_kwh, 0.0);
        prop_assert_eq!(out.comfort_index, 0.0);
    }

    #[test]
    fn test_comfort_floor_outside_maintenance(input in arb_input()) {
        let mut input = input;
        input.maintenance_mode = Some(false);
        let out = calculator().compute(&input).unwrap();
        prop_assert!(out.comfort_index >= 0.1);
    }

    #[test]
    fn test_surge_forces_shutdown(input in arb_input(), voltage in 255.01f64..400.0) {
        let mut input = input;
        input.grid_voltage = Some(voltage);
        let out = calculator().compute(&input).unwrap();
        prop_assert_eq!(out.projected_kwh, 0.0);
        prop_assert_eq!(out.grid_stability_score, 0.0);
    }

    #[test]
    fn test_frequency_emergency_floors_shed(input in arb_input(), hz in 40.0f64..49.79) {
        let mut input = input;
        input.grid_frequency = Some(hz);
        let breakdown = calculator().evaluate(&input).unwrap();
        prop_assert!(breakdown.shed.fraction >= 0.5);
    }

    #[test]
    fn test_shed_never_below_request(input in arb_input()) {
        let breakdown = calculator().evaluate(&input).unwrap();
        prop_assert!(breakdown.shed.fraction >= input.reduction_factor);
    }

    #[test]
    fn test_worse_compressor_never_saves_energy(
        input in arb_input(),
        worse in 0.0f64..=1.0,
        better in 0.0f64..=1.0,
    ) {
        prop_assume!(worse <= better);
        let mut low = input.clone();
        low.compressor_health = Some(worse);
        let mut high = input;
        high.compressor_health = Some(better);
        let calc = calculator();
        prop_assert!(
            calc.compute(&low).unwrap().projected_kwh
                >= calc.compute(&high).unwrap().projected_kwh
        );
    }

    #[test]
    fn test_humidity_at_or_below_threshold_matches_baseline(input in arb_input(), rh in 0.0f64..=60.0) {
        let mut dry = input.clone();
        dry.relative_humidity = Some(rh);
        let mut baseline = input;
        baseline.relative_humidity = Some(60.0);
        let calc = calculator();
        prop_assert_eq!(calc.compute(&dry).unwrap(), calc.compute(&baseline).unwrap());
    }

    #[test]
    fn test_humidity_above_threshold_raises_load(setpoint in 23.0f64..=32.0, rh in 61.0f64..=100.0) {
        let mut humid = SimulationInput::new(setpoint, 0.0);
        humid.relative_humidity = Some(rh);
        let mut baseline = SimulationInput::new(setpoint, 0.0);
        baseline.relative_humidity = Some(60.0);
        let calc = calculator();
        prop_assert!(
            calc.compute(&humid).unwrap().projected_kwh
                > calc.compute(&baseline).unwrap().projected_kwh
        );
    }

    #[test]
    fn test_deterministic(input in arb_input()) {
        let calc = calculator();
        prop_assert_eq!(calc.compute(&input).unwrap(), calc.compute(&input).unwrap());
    }
}
