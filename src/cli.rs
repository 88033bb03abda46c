//! Command-line interface.
//!
//! Rates are given as percentages, like the HTTP API. Omitted values take
//! the same defaults as the matching endpoint.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::{FundCostPayload, MonteCarloPayload, SwrPayload};
use crate::core::SimulationMode;

#[derive(Parser, Debug)]
#[command(name = "fincalc")]
#[command(about = "Personal-finance calculators: Monte Carlo, tax-loss matching, fund costs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "fincalc.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Overrides `server.port` from the config file
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a Monte Carlo simulation and print the result as JSON
    MonteCarlo(MonteCarloArgs),
    /// Search for the safe withdrawal rate and print the result as JSON
    Swr(SwrArgs),
    /// Compare fund growth with and without costs
    FundCost(FundCostArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliMode {
    Accumulation,
    Decumulation,
}

impl From<CliMode> for SimulationMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Accumulation => SimulationMode::Accumulation,
            CliMode::Decumulation => SimulationMode::Decumulation,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MonteCarloArgs {
    #[arg(long)]
    pub capital: Option<f64>,
    /// Expected annual return, percent
    #[arg(long)]
    pub return_mean: Option<f64>,
    /// Annual volatility, percent
    #[arg(long)]
    pub return_vol: Option<f64>,
    #[arg(long)]
    pub years: Option<u32>,
    #[arg(long)]
    pub paths: Option<u32>,
    #[arg(long, value_enum)]
    pub mode: Option<CliMode>,
    #[arg(long)]
    pub contribution: Option<f64>,
    #[arg(long)]
    pub withdrawal: Option<f64>,
    /// Annual inflation, percent
    #[arg(long)]
    pub inflation: Option<f64>,
    #[arg(long)]
    pub target: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub current_age: Option<u32>,
}

impl From<MonteCarloArgs> for MonteCarloPayload {
    fn from(args: MonteCarloArgs) -> Self {
        MonteCarloPayload {
            capital: args.capital,
            return_mean: args.return_mean,
            return_vol: args.return_vol,
            horizon_years: args.years,
            paths: args.paths,
            mode: args.mode.map(Into::into),
            annual_contribution: args.contribution,
            annual_withdrawal: args.withdrawal,
            inflation: args.inflation,
            target_value: args.target,
            seed: args.seed,
            current_age: args.current_age,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SwrArgs {
    #[command(flatten)]
    pub simulation: MonteCarloArgs,
    /// Years the withdrawals must last
    #[arg(long)]
    pub swr_years: Option<u32>,
    /// Required survival probability, percent
    #[arg(long)]
    pub target_survival: Option<f64>,
    #[arg(long)]
    pub min_rate: Option<f64>,
    #[arg(long)]
    pub max_rate: Option<f64>,
}

impl From<SwrArgs> for SwrPayload {
    fn from(args: SwrArgs) -> Self {
        SwrPayload {
            simulation: args.simulation.into(),
            swr_horizon_years: args.swr_years,
            target_survival: args.target_survival,
            min_rate: args.min_rate,
            max_rate: args.max_rate,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FundCostArgs {
    #[arg(long)]
    pub capital: Option<f64>,
    #[arg(long)]
    pub contribution: Option<f64>,
    /// Gross annual return, percent
    #[arg(long)]
    pub gross_return: Option<f64>,
    /// Total expense ratio, percent
    #[arg(long)]
    pub ter: Option<f64>,
    /// Entry fee on each deposit, percent
    #[arg(long)]
    pub entry_fee: Option<f64>,
    #[arg(long)]
    pub years: Option<u32>,
}

impl From<FundCostArgs> for FundCostPayload {
    fn from(args: FundCostArgs) -> Self {
        FundCostPayload {
            capital: args.capital,
            annual_contribution: args.contribution,
            gross_return: args.gross_return,
            ter: args.ter,
            entry_fee: args.entry_fee,
            horizon_years: args.years,
        }
    }
}
