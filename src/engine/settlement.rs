use serde::{Deserialize, Serialize};

/// Billing terms applied to the net grid exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingModel {
    /// Credit per exported kWh
    pub export_credit_rate: f64,
    /// Flat demand response rebate
    pub demand_response_rebate: f64,
    /// Power factors below this are surcharged linearly in the shortfall
    pub pf_penalty_below: f64,
    /// Power factors above this earn a rebate
    pub pf_rebate_above: f64,
    /// Share of the power-factor gain returned as a discount
    pub pf_rebate_share: f64,
}

impl Default for BillingModel {
    fn default() -> Self {
        Self {
            export_credit_rate: 4.50,
            demand_response_rebate: 5000.0,
            pf_penalty_below: 0.90,
            pf_rebate_above: 0.95,
            pf_rebate_share: 0.5,
        }
    }
}

impl BillingModel {
    /// PF 0.80 -> 1.10, PF 1.00 -> 0.975, anything in the dead band -> 1.0.
    pub fn power_factor_multiplier(&self, power_factor: f64) -> f64 {
        if power_factor < self.pf_penalty_below {
            1.0 + (self.pf_penalty_below - power_factor)
        } else if power_factor > self.pf_rebate_above {
            1.0 - (power_factor - self.pf_rebate_above) * self.pf_rebate_share
        } else {
            1.0
        }
    }

    /// Energy charge for an import, or credit for an export (negative).
    pub fn energy_charge(&self, net_load_kwh: f64, rate: f64, power_factor: f64) -> f64 {
        if net_load_kwh >= 0.0 {
            net_load_kwh * rate * self.power_factor_multiplier(power_factor)
        } else {
            net_load_kwh * self.export_credit_rate
        }
    }

    /// Final bill, never below zero.
    pub fn settle(
        &self,
        net_load_kwh: f64,
        rate: f64,
        power_factor: f64,
        incentives: bool,
    ) -> f64 {
        let rebate = if incentives {
            self.demand_response_rebate
        } else {
            0.0
        };
        (self.energy_charge(net_load_kwh, rate, power_factor) - rebate).max(0.0)
    }
}

/// Emissions of the imported energy only; exports never go negative.
pub fn carbon_footprint(net_load_kwh: f64, intensity_kg_per_kwh: f64) -> f64 {
    net_load_kwh.max(0.0) * intensity_kg_per_kwh
}
