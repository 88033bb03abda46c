use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationMode {
    Accumulation,
    Decumulation,
}

/// Monte Carlo inputs. Rates are fractions (0.07 for 7%).
#[derive(Debug, Clone)]
pub struct MonteCarloInputs {
    pub capital: f64,
    pub return_mean: f64,
    pub return_vol: f64,
    pub horizon_years: u32,
    pub paths: u32,
    pub mode: SimulationMode,
    pub annual_contribution: f64,
    pub annual_withdrawal: f64,
    pub inflation: f64,
    pub target_value: Option<f64>,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileBand {
    pub year: u32,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

impl PercentileBand {
    pub fn values(&self) -> [f64; 7] {
        [
            self.p5, self.p10, self.p25, self.p50, self.p75, self.p90, self.p95,
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub mode: SimulationMode,
    pub paths: u32,
    pub bands: Vec<PercentileBand>,
    /// Share of paths not yet depleted at the end of each year.
    pub survival: Vec<f64>,
    pub depleted_paths: u32,
    pub median_depletion_year: Option<u32>,
    pub target_probability: Option<f64>,
    pub mean_final_value: f64,
}

impl SimulationResult {
    pub fn final_survival(&self) -> f64 {
        self.survival.last().copied().unwrap_or(1.0)
    }

    pub fn survival_at_year(&self, year: u32) -> Option<f64> {
        self.survival.get(year as usize).copied()
    }

    pub fn survival_to_age(&self, current_age: u32, age: u32) -> Option<f64> {
        let year = age.checked_sub(current_age)?;
        self.survival_at_year(year)
    }
}
