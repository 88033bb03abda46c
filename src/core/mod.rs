pub mod capital_loss;
pub mod compound;
mod engine;
pub mod exit_strategy;
pub mod export;
pub mod fund_cost;
pub mod net_worth;
pub mod portfolio;
pub mod re_portfolio;
pub mod real_estate;
pub mod sampler;
mod solver;
mod types;

pub use engine::{run_monte_carlo, simulate};
pub use solver::{SwrIteration, SwrResult, SwrSearchConfig, solve_safe_withdrawal_rate};
pub use types::{MonteCarloInputs, PercentileBand, SimulationMode, SimulationResult};
