use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Tariff band a calculation was billed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TariffBand {
    Peak,
    OffPeak,
    Standard,
    /// Weighted peak/off-peak mix, only used without a timestamp
    Blended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTariff {
    pub band: TariffBand,
    /// Currency per kWh
    pub rate: f64,
}

/// Time-of-use schedule. Windows are `[start, end)` in wall-clock hours and
/// may wrap past midnight (`start > end`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffSchedule {
    pub peak_rate: f64,
    pub off_peak_rate: f64,
    pub standard_rate: f64,
    pub peak_start_hour: u32,
    pub peak_end_hour: u32,
    pub off_peak_start_hour: u32,
    pub off_peak_end_hour: u32,
    /// Peak share of the blended fallback rate. `None` keeps the standard
    /// rate for requests without a timestamp.
    pub blended_peak_share: Option<f64>,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self {
            peak_rate: 14.50,
            off_peak_rate: 6.50,
            standard_rate: 10.00,
            peak_start_hour: 16,
            peak_end_hour: 22,
            off_peak_start_hour: 0,
            off_peak_end_hour: 9,
            blended_peak_share: None,
        }
    }
}

impl TariffSchedule {
    /// Resolve the band for an optional wall-clock instant. Peak wins if the
    /// windows are configured to overlap.
    pub fn resolve(&self, timestamp: Option<NaiveDateTime>) -> ResolvedTariff {
        let Some(ts) = timestamp else {
            return self.fallback();
        };

        let hour = ts.hour();
        if in_window(hour, self.peak_start_hour, self.peak_end_hour) {
            ResolvedTariff {
                band: TariffBand::Peak,
                rate: self.peak_rate,
            }
        } else if in_window(hour, self.off_peak_start_hour, self.off_peak_end_hour) {
            ResolvedTariff {
                band: TariffBand::OffPeak,
                rate: self.off_peak_rate,
            }
        } else {
            self.standard()
        }
    }

    pub fn blended_rate(&self, peak_share: f64) -> f64 {
        let share = peak_share.clamp(0.0, 1.0);
        self.peak_rate * share + self.off_peak_rate * (1.0 - share)
    }

    fn fallback(&self) -> ResolvedTariff {
        match self.blended_peak_share {
            Some(share) => ResolvedTariff {
                band: TariffBand::Blended,
                rate: self.blended_rate(share),
            },
            None => self.standard(),
        }
    }

    fn standard(&self) -> ResolvedTariff {
        ResolvedTariff {
            band: TariffBand::Standard,
            rate: self.standard_rate,
        }
    }
}

fn in_window(hour: u32, start: u32, end: u32) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}
