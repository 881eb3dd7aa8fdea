use serde::{Deserialize, Serialize};

/// Tariff-driven battery arbitrage: charge when energy is cheap, discharge
/// when it is expensive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitragePolicy {
    /// Charge/discharge power as a fraction of capacity per hour
    pub c_rate: f64,
    /// Charge when the resolved rate is below this
    pub charge_below_rate: f64,
    /// Discharge when the resolved rate is above this
    pub discharge_above_rate: f64,
}

impl Default for ArbitragePolicy {
    fn default() -> Self {
        Self {
            c_rate: 0.5,
            charge_below_rate: 9.0,
            discharge_above_rate: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatteryAction {
    Idle,
    Charge { kwh: f64 },
    Discharge { kwh: f64 },
}

impl BatteryAction {
    /// Change to facility load caused by this action (kWh).
    pub fn load_delta_kwh(&self) -> f64 {
        match *self {
            BatteryAction::Idle => 0.0,
            BatteryAction::Charge { kwh } => kwh,
            BatteryAction::Discharge { kwh } => -kwh,
        }
    }
}

impl ArbitragePolicy {
    pub fn decide(
        &self,
        capacity_kwh: Option<f64>,
        current_charge_kwh: Option<f64>,
        rate: f64,
    ) -> BatteryAction {
        let capacity = match capacity_kwh {
            Some(c) if c > 0.0 => c,
            _ => return BatteryAction::Idle,
        };
        let power = capacity * self.c_rate;

        if rate < self.charge_below_rate {
            BatteryAction::Charge { kwh: power }
        } else if rate > self.discharge_above_rate {
            // can't release more than is stored
            let stored = current_charge_kwh.unwrap_or(capacity);
            let kwh = power.min(stored.max(0.0));
            if kwh > 0.0 {
                BatteryAction::Discharge { kwh }
            } else {
                BatteryAction::Idle
            }
        } else {
            BatteryAction::Idle
        }
    }
}
