use super::engine::simulate;
use super::sampler::{BoxMuller, derive_seed};
use super::types::{MonteCarloInputs, SimulationMode};

const SWR_STREAM: u32 = 0x5752;

#[derive(Debug, Clone, Copy)]
pub struct SwrSearchConfig {
    pub horizon_years: u32,
    pub target_survival: f64,
    pub min_rate: f64,
    pub max_rate: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub paths_per_iteration: u32,
    pub final_paths: u32,
}

impl Default for SwrSearchConfig {
    fn default() -> Self {
        Self {
            horizon_years: 30,
            target_survival: 0.95,
            min_rate: 0.01,
            max_rate: 0.10,
            tolerance: 0.000_5,
            max_iterations: 24,
            paths_per_iteration: 1_000,
            final_paths: 5_000,
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwrIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_rate: f64,
    pub survival: f64,
    pub survival_ci_half_width: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwrResult {
    pub target_survival: f64,
    pub horizon_years: u32,
    pub solved_rate: Option<f64>,
    pub annual_withdrawal: Option<f64>,
    pub achieved_survival: Option<f64>,
    pub achieved_survival_ci_half_width: Option<f64>,
    pub iterations: Vec<SwrIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

/// Searches for the highest withdrawal rate whose survival over
/// `config.horizon_years` still meets `config.target_survival`.
///
/// Every candidate is simulated from the same seed, so survival is
/// non-increasing in the rate and bisection is well defined. The result is
/// still a sampled estimate; its CI half-width is reported alongside.
pub fn solve_safe_withdrawal_rate(
    inputs: &MonteCarloInputs,
    config: SwrSearchConfig,
) -> Result<SwrResult, String> {
    validate_config(inputs, config)?;

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let low_eval = evaluate_candidate(inputs, config, config.min_rate, config.paths_per_iteration);
    let high_eval = evaluate_candidate(inputs, config, config.max_rate, config.paths_per_iteration);

    let mut solved_rate = None;
    let mut converged = false;
    let feasible;
    let message;

    if low_eval.survival + 1e-12 < config.target_survival {
        feasible = false;
        message = "No withdrawal rate within the search bounds meets the survival target.".to_string();
    } else if high_eval.survival + 1e-12 >= config.target_survival {
        solved_rate = Some(config.max_rate);
        converged = true;
        feasible = true;
        message =
            "Upper rate bound still meets the target; increase the search max for a higher rate."
                .to_string();
    } else {
        let mut lo = config.min_rate;
        let mut hi = config.max_rate;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let eval = evaluate_candidate(inputs, config, mid, config.paths_per_iteration);
            iterations.push(SwrIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_rate: mid,
                survival: eval.survival,
                survival_ci_half_width: eval.ci_half_width,
            });

            if eval.survival + 1e-12 >= config.target_survival {
                lo = mid;
            } else {
                hi = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                break;
            }
        }
        solved_rate = Some(lo);
        feasible = true;
        message = if converged {
            "Solved safe withdrawal rate.".to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate.".to_string()
        };
    }

    let mut achieved_survival = None;
    let mut achieved_survival_ci_half_width = None;
    if let Some(rate) = solved_rate {
        let final_eval = evaluate_candidate(inputs, config, rate, config.final_paths);
        achieved_survival = Some(final_eval.survival);
        achieved_survival_ci_half_width = Some(final_eval.ci_half_width);
    }

    Ok(SwrResult {
        target_survival: config.target_survival,
        horizon_years: config.horizon_years,
        solved_rate,
        annual_withdrawal: solved_rate.map(|rate| rate * inputs.capital),
        achieved_survival,
        achieved_survival_ci_half_width,
        iterations,
        converged,
        feasible,
        message,
    })
}

#[derive(Debug, Clone, Copy)]
struct CandidateEval {
    survival: f64,
    ci_half_width: f64,
}

fn evaluate_candidate(
    base_inputs: &MonteCarloInputs,
    config: SwrSearchConfig,
    rate: f64,
    paths: u32,
) -> CandidateEval {
    let mut inputs = base_inputs.clone();
    inputs.mode = SimulationMode::Decumulation;
    inputs.horizon_years = config.horizon_years;
    inputs.paths = paths.max(1);
    inputs.annual_withdrawal = base_inputs.capital * rate.max(0.0);
    inputs.target_value = None;

    let mut sampler = BoxMuller::seeded(derive_seed(inputs.seed, SWR_STREAM, 0));
    let result = simulate(&inputs, &mut sampler);
    let survival = result.final_survival();
    CandidateEval {
        survival,
        ci_half_width: binomial_ci_half_width(survival, inputs.paths),
    }
}

pub(crate) fn binomial_ci_half_width(p: f64, n: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    1.96 * (p * (1.0 - p) / n as f64).sqrt()
}

fn validate_config(inputs: &MonteCarloInputs, config: SwrSearchConfig) -> Result<(), String> {
    if !inputs.capital.is_finite() || inputs.capital <= 0.0 {
        return Err("capital must be > 0 to search for a withdrawal rate".to_string());
    }
    if config.horizon_years == 0 {
        return Err("horizon_years must be > 0".to_string());
    }
    if !(0.0..=1.0).contains(&config.target_survival) {
        return Err("target_survival must be between 0 and 1".to_string());
    }
    if !config.min_rate.is_finite() || !config.max_rate.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.min_rate < 0.0 {
        return Err("min_rate must be >= 0".to_string());
    }
    if config.max_rate <= config.min_rate {
        return Err("max_rate must be greater than min_rate".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 {
        return Err("max_iterations must be > 0".to_string());
    }
    if config.paths_per_iteration == 0 || config.final_paths == 0 {
        return Err("path counts must be > 0".to_string());
    }
    Ok(())
}
