use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use fincalc::api::{
    self, AppState, build_fund_cost_inputs, build_monte_carlo_inputs, build_swr_request,
};
use fincalc::cli::{Cli, Commands};
use fincalc::config::Config;
use fincalc::core::fund_cost::run_fund_cost;
use fincalc::core::{run_monte_carlo, solve_safe_withdrawal_rate};
use fincalc::store::open_store;
use fincalc::telemetry::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;
    init_logging(&config.logging.level)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let store = open_store(&config.storage).context("failed to open store")?;
            info!(
                backend = ?config.storage.backend,
                directory = %config.storage.directory.display(),
                "store opened"
            );
            let state = AppState::new(store, config.simulation.clone());
            api::run_http_server(&config.server, state).await?;
        }
        Commands::MonteCarlo(args) => {
            let payload: api::MonteCarloPayload = args.into();
            let inputs = build_monte_carlo_inputs(&payload, &config.simulation)
                .map_err(anyhow::Error::msg)?;
            let result = run_monte_carlo(&inputs);
            print_json(&api::build_monte_carlo_response(result, payload.current_age))?;
        }
        Commands::Swr(args) => {
            let (inputs, search) =
                build_swr_request(&args.into(), &config.simulation).map_err(anyhow::Error::msg)?;
            let result = solve_safe_withdrawal_rate(&inputs, search).map_err(anyhow::Error::msg)?;
            print_json(&result)?;
        }
        Commands::FundCost(args) => {
            let inputs = build_fund_cost_inputs(&args.into()).map_err(anyhow::Error::msg)?;
            print_json(&run_fund_cost(&inputs))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
