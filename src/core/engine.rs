use super::sampler::{BoxMuller, NormalSampler, derive_seed};
use super::types::{MonteCarloInputs, PercentileBand, SimulationMode, SimulationResult};

const BAND_PERCENTILES: [f64; 7] = [0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95];

#[derive(Debug, Clone, Copy)]
struct PathOutcome {
    final_value: f64,
    depletion_year: Option<u32>,
}

/// Year-major matrix of simulated values: `values[year][path]`.
struct YearlyAccumulator {
    values: Vec<Vec<f64>>,
}

impl YearlyAccumulator {
    fn new(horizon_years: u32, expected_paths: usize) -> Self {
        let values = (0..=horizon_years)
            .map(|_| Vec::with_capacity(expected_paths))
            .collect();
        Self { values }
    }

    fn push(&mut self, year: usize, value: f64) {
        self.values[year].push(value);
    }

    fn into_bands(self) -> Vec<PercentileBand> {
        self.values
            .into_iter()
            .enumerate()
            .map(|(year, mut column)| {
                column.sort_by(|a, b| a.total_cmp(b));
                let [p5, p10, p25, p50, p75, p90, p95] =
                    BAND_PERCENTILES.map(|p| percentile_sorted(&column, p));
                PercentileBand {
                    year: year as u32,
                    p5,
                    p10,
                    p25,
                    p50,
                    p75,
                    p90,
                    p95,
                }
            })
            .collect()
    }
}

/// Runs the simulation with a sampler seeded from `inputs.seed`.
pub fn run_monte_carlo(inputs: &MonteCarloInputs) -> SimulationResult {
    let mut sampler = BoxMuller::seeded(derive_seed(inputs.seed, 0, 0));
    simulate(inputs, &mut sampler)
}

/// Draws `inputs.paths` independent paths and aggregates per-year bands.
///
/// Every path consumes exactly `horizon_years` normals, depleted or not, so
/// two runs sharing a sampler seed see the same market sequence per path.
pub fn simulate<S: NormalSampler>(inputs: &MonteCarloInputs, sampler: &mut S) -> SimulationResult {
    let paths = inputs.paths as usize;
    let mut acc = YearlyAccumulator::new(inputs.horizon_years, paths);
    let mut depleted_by_year = vec![0_u32; inputs.horizon_years as usize + 1];
    let mut depletion_years = Vec::new();
    let mut final_values = Vec::with_capacity(paths);

    for _ in 0..inputs.paths {
        let outcome = simulate_path(inputs, sampler, &mut acc);
        if let Some(year) = outcome.depletion_year {
            depleted_by_year[year as usize] += 1;
            depletion_years.push(year);
        }
        final_values.push(outcome.final_value);
    }

    let survival = survival_curve(&depleted_by_year, inputs.paths);
    let target_probability = inputs
        .target_value
        .map(|target| share_at_or_above(&final_values, target));
    let mean_final_value = if final_values.is_empty() {
        0.0
    } else {
        final_values.iter().sum::<f64>() / final_values.len() as f64
    };

    depletion_years.sort_unstable();
    let median_depletion_year = depletion_years.get(depletion_years.len() / 2).copied();

    SimulationResult {
        mode: inputs.mode,
        paths: inputs.paths,
        bands: acc.into_bands(),
        survival,
        depleted_paths: depletion_years.len() as u32,
        median_depletion_year,
        target_probability,
        mean_final_value,
    }
}

fn simulate_path<S: NormalSampler>(
    inputs: &MonteCarloInputs,
    sampler: &mut S,
    acc: &mut YearlyAccumulator,
) -> PathOutcome {
    let mut value = inputs.capital;
    let mut depletion_year = None;
    acc.push(0, value);

    for year in 1..=inputs.horizon_years {
        let z = sampler.standard_normal();
        let annual_return = inputs.return_mean + inputs.return_vol * z;

        if depletion_year.is_none() {
            value = match inputs.mode {
                SimulationMode::Accumulation => {
                    value * (1.0 + annual_return) + inputs.annual_contribution
                }
                SimulationMode::Decumulation => {
                    let withdrawal = inflation_adjusted_withdrawal(inputs, year);
                    let next = value * (1.0 + annual_return) - withdrawal;
                    if next <= 0.0 {
                        depletion_year = Some(year);
                        0.0
                    } else {
                        next
                    }
                }
            };
        }
        acc.push(year as usize, value);
    }

    PathOutcome {
        final_value: value,
        depletion_year,
    }
}

fn inflation_adjusted_withdrawal(inputs: &MonteCarloInputs, year: u32) -> f64 {
    inputs.annual_withdrawal * (1.0 + inputs.inflation).powi(year as i32 - 1)
}

fn survival_curve(depleted_by_year: &[u32], paths: u32) -> Vec<f64> {
    if paths == 0 {
        return vec![1.0; depleted_by_year.len()];
    }
    let mut depleted = 0_u32;
    depleted_by_year
        .iter()
        .map(|count| {
            depleted += count;
            (paths - depleted) as f64 / paths as f64
        })
        .collect()
}

fn share_at_or_above(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let hits = values.iter().filter(|v| **v >= threshold).count();
    hits as f64 / values.len() as f64
}

/// Reads the `p` quantile at index `floor(n * p)` of an ascending slice.
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * p).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
