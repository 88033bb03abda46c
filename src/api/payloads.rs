use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::SimulationConfig;
use crate::core::capital_loss::{DEFAULT_CAPITAL_GAINS_TAX_RATE, GainPool, IncomeCategory, LossRecord};
use crate::core::compound::{CompoundInputs, CompoundingFrequency};
use crate::core::exit_strategy::ExitStrategyInputs;
use crate::core::fund_cost::FundCostInputs;
use crate::core::net_worth::{DEFAULT_STAMP_DUTY, NetWorthInputs};
use crate::core::portfolio::Position;
use crate::core::re_portfolio::Property;
use crate::core::real_estate::RealEstateVsStocksInputs;
use crate::core::{MonteCarloInputs, SimulationMode, SwrSearchConfig};

pub const MIN_HORIZON_YEARS: u32 = 5;
pub const MAX_HORIZON_YEARS: u32 = 50;
pub const MIN_PATHS: u32 = 1_000;
pub const MAX_PATHS: u32 = 10_000;
pub const MAX_AGE: u32 = 120;
const MAX_PROJECTION_YEARS: u32 = 100;

/// Monte Carlo request. Rates are percentages (7 for 7%).
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonteCarloPayload {
    pub capital: Option<f64>,
    #[serde(alias = "expectedReturn")]
    pub return_mean: Option<f64>,
    #[serde(alias = "volatility")]
    pub return_vol: Option<f64>,
    #[serde(alias = "years")]
    pub horizon_years: Option<u32>,
    #[serde(alias = "simulations")]
    pub paths: Option<u32>,
    pub mode: Option<SimulationMode>,
    #[serde(alias = "contribution")]
    pub annual_contribution: Option<f64>,
    #[serde(alias = "withdrawal")]
    pub annual_withdrawal: Option<f64>,
    pub inflation: Option<f64>,
    #[serde(alias = "target")]
    pub target_value: Option<f64>,
    pub seed: Option<u64>,
    pub current_age: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwrPayload {
    #[serde(flatten)]
    pub simulation: MonteCarloPayload,
    pub swr_horizon_years: Option<u32>,
    pub target_survival: Option<f64>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundCostPayload {
    pub capital: Option<f64>,
    #[serde(alias = "contribution")]
    pub annual_contribution: Option<f64>,
    pub gross_return: Option<f64>,
    pub ter: Option<f64>,
    pub entry_fee: Option<f64>,
    #[serde(alias = "years")]
    pub horizon_years: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompoundPayload {
    pub principal: Option<f64>,
    pub monthly_contribution: Option<f64>,
    #[serde(alias = "rate")]
    pub annual_rate: Option<f64>,
    pub years: Option<u32>,
    pub frequency: Option<CompoundingFrequency>,
    pub inflation: Option<f64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExitStrategyPayload {
    pub current_value: Option<f64>,
    pub cost_basis: Option<f64>,
    pub annual_return: Option<f64>,
    pub years_to_exit: Option<u32>,
    pub exit_years: Option<u32>,
    pub capital_gains_tax_rate: Option<f64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RealEstatePayload {
    pub property_price: Option<f64>,
    pub down_payment: Option<f64>,
    pub purchase_costs: Option<f64>,
    pub mortgage_rate: Option<f64>,
    pub mortgage_years: Option<u32>,
    pub appreciation: Option<f64>,
    pub rent_yield: Option<f64>,
    pub running_costs: Option<f64>,
    pub vacancy: Option<f64>,
    pub stock_return: Option<f64>,
    #[serde(alias = "years")]
    pub horizon_years: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetWorthPayload {
    pub financial_assets: Option<f64>,
    pub cost_basis: Option<f64>,
    pub annual_savings: Option<f64>,
    pub annual_return: Option<f64>,
    pub years: Option<u32>,
    pub stamp_duty: Option<f64>,
    pub capital_gains_tax_rate: Option<f64>,
    pub inflation: Option<f64>,
}

/// Capital-loss request. Omitting `losses` uses the stored rows.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapitalLossPayload {
    pub losses: Option<Vec<LossRecord>>,
    pub gains: GainPool,
    pub today: Option<NaiveDate>,
    pub tax_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub realized_on: NaiveDate,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub category: Option<IncomeCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertiesPayload {
    pub properties: Vec<Property>,
}

/// Portfolio request. Omitting `positions` uses the stored rows.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortfolioPayload {
    pub positions: Option<Vec<Position>>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: Option<String>,
}

fn pct(value: f64) -> f64 {
    value / 100.0
}

fn finite(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{name} must be a finite number"))
    }
}

fn non_negative(name: &str, value: f64) -> Result<f64, String> {
    let value = finite(name, value)?;
    if value < 0.0 {
        return Err(format!("{name} must be >= 0"));
    }
    Ok(value)
}

fn percent_in(name: &str, value: f64, min: f64, max: f64) -> Result<f64, String> {
    let value = finite(name, value)?;
    if !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}"));
    }
    Ok(pct(value))
}

fn projection_years(name: &str, value: u32) -> Result<u32, String> {
    if value > MAX_PROJECTION_YEARS {
        return Err(format!("{name} must be <= {MAX_PROJECTION_YEARS}"));
    }
    Ok(value)
}

pub fn build_monte_carlo_inputs(
    payload: &MonteCarloPayload,
    defaults: &SimulationConfig,
) -> Result<MonteCarloInputs, String> {
    let horizon_years = payload.horizon_years.unwrap_or(30);
    if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&horizon_years) {
        return Err(format!(
            "horizonYears must be between {MIN_HORIZON_YEARS} and {MAX_HORIZON_YEARS}"
        ));
    }
    let paths = payload.paths.unwrap_or(defaults.default_paths);
    if !(MIN_PATHS..=MAX_PATHS).contains(&paths) {
        return Err(format!("paths must be between {MIN_PATHS} and {MAX_PATHS}"));
    }

    if let Some(age) = payload.current_age {
        if age > MAX_AGE {
            return Err(format!("currentAge must be <= {MAX_AGE}"));
        }
    }

    let target_value = match payload.target_value {
        Some(v) => Some(non_negative("targetValue", v)?),
        None => None,
    };

    Ok(MonteCarloInputs {
        capital: non_negative("capital", payload.capital.unwrap_or(100_000.0))?,
        return_mean: percent_in("returnMean", payload.return_mean.unwrap_or(6.0), -100.0, 100.0)?,
        return_vol: percent_in("returnVol", payload.return_vol.unwrap_or(15.0), 0.0, 100.0)?,
        horizon_years,
        paths,
        mode: payload.mode.unwrap_or(SimulationMode::Accumulation),
        annual_contribution: non_negative(
            "annualContribution",
            payload.annual_contribution.unwrap_or(0.0),
        )?,
        annual_withdrawal: non_negative(
            "annualWithdrawal",
            payload.annual_withdrawal.unwrap_or(0.0),
        )?,
        inflation: percent_in("inflation", payload.inflation.unwrap_or(2.0), -10.0, 50.0)?,
        target_value,
        seed: payload.seed.unwrap_or(defaults.default_seed),
    })
}

pub fn build_swr_request(
    payload: &SwrPayload,
    defaults: &SimulationConfig,
) -> Result<(MonteCarloInputs, SwrSearchConfig), String> {
    let inputs = build_monte_carlo_inputs(&payload.simulation, defaults)?;
    let base = SwrSearchConfig::default();
    let horizon_years = payload.swr_horizon_years.unwrap_or(base.horizon_years);
    if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&horizon_years) {
        return Err(format!(
            "swrHorizonYears must be between {MIN_HORIZON_YEARS} and {MAX_HORIZON_YEARS}"
        ));
    }
    let config = SwrSearchConfig {
        horizon_years,
        target_survival: percent_in(
            "targetSurvival",
            payload.target_survival.unwrap_or(95.0),
            0.0,
            100.0,
        )?,
        min_rate: percent_in("minRate", payload.min_rate.unwrap_or(1.0), 0.0, 100.0)?,
        max_rate: percent_in("maxRate", payload.max_rate.unwrap_or(10.0), 0.0, 100.0)?,
        paths_per_iteration: defaults.swr_paths_per_iteration,
        final_paths: defaults.swr_final_paths,
        ..base
    };
    Ok((inputs, config))
}

pub fn build_fund_cost_inputs(payload: &FundCostPayload) -> Result<FundCostInputs, String> {
    Ok(FundCostInputs {
        capital: non_negative("capital", payload.capital.unwrap_or(100_000.0))?,
        annual_contribution: non_negative(
            "annualContribution",
            payload.annual_contribution.unwrap_or(0.0),
        )?,
        gross_return: percent_in("grossReturn", payload.gross_return.unwrap_or(7.0), -100.0, 100.0)?,
        ter: percent_in("ter", payload.ter.unwrap_or(1.5), 0.0, 100.0)?,
        entry_fee: percent_in("entryFee", payload.entry_fee.unwrap_or(0.0), 0.0, 100.0)?,
        horizon_years: projection_years("horizonYears", payload.horizon_years.unwrap_or(20))?,
    })
}

pub fn build_compound_inputs(payload: &CompoundPayload) -> Result<CompoundInputs, String> {
    Ok(CompoundInputs {
        principal: non_negative("principal", payload.principal.unwrap_or(10_000.0))?,
        monthly_contribution: non_negative(
            "monthlyContribution",
            payload.monthly_contribution.unwrap_or(200.0),
        )?,
        annual_rate: percent_in("annualRate", payload.annual_rate.unwrap_or(5.0), -100.0, 100.0)?,
        years: projection_years("years", payload.years.unwrap_or(20))?,
        frequency: payload.frequency.unwrap_or(CompoundingFrequency::Monthly),
        inflation: percent_in("inflation", payload.inflation.unwrap_or(2.0), -10.0, 50.0)?,
    })
}

pub fn build_exit_strategy_inputs(payload: &ExitStrategyPayload) -> Result<ExitStrategyInputs, String> {
    let exit_years = payload.exit_years.unwrap_or(5);
    if exit_years == 0 {
        return Err("exitYears must be > 0".to_string());
    }
    let current_value = non_negative("currentValue", payload.current_value.unwrap_or(300_000.0))?;
    Ok(ExitStrategyInputs {
        current_value,
        cost_basis: non_negative("costBasis", payload.cost_basis.unwrap_or(current_value))?,
        annual_return: percent_in("annualReturn", payload.annual_return.unwrap_or(5.0), -100.0, 100.0)?,
        years_to_exit: projection_years("yearsToExit", payload.years_to_exit.unwrap_or(10))?,
        exit_years: projection_years("exitYears", exit_years)?,
        capital_gains_tax_rate: percent_in(
            "capitalGainsTaxRate",
            payload
                .capital_gains_tax_rate
                .unwrap_or(DEFAULT_CAPITAL_GAINS_TAX_RATE * 100.0),
            0.0,
            100.0,
        )?,
    })
}

pub fn build_real_estate_inputs(payload: &RealEstatePayload) -> Result<RealEstateVsStocksInputs, String> {
    Ok(RealEstateVsStocksInputs {
        property_price: non_negative("propertyPrice", payload.property_price.unwrap_or(250_000.0))?,
        down_payment_share: percent_in("downPayment", payload.down_payment.unwrap_or(20.0), 0.0, 100.0)?,
        purchase_costs_share: percent_in(
            "purchaseCosts",
            payload.purchase_costs.unwrap_or(8.0),
            0.0,
            100.0,
        )?,
        mortgage_rate: percent_in("mortgageRate", payload.mortgage_rate.unwrap_or(3.5), 0.0, 100.0)?,
        mortgage_years: projection_years("mortgageYears", payload.mortgage_years.unwrap_or(25))?,
        appreciation: percent_in("appreciation", payload.appreciation.unwrap_or(2.0), -100.0, 100.0)?,
        gross_rent_yield: percent_in("rentYield", payload.rent_yield.unwrap_or(5.0), 0.0, 100.0)?,
        running_costs_share: percent_in("runningCosts", payload.running_costs.unwrap_or(1.0), 0.0, 100.0)?,
        vacancy: percent_in("vacancy", payload.vacancy.unwrap_or(8.0), 0.0, 100.0)?,
        stock_return: percent_in("stockReturn", payload.stock_return.unwrap_or(6.0), -100.0, 100.0)?,
        horizon_years: projection_years("horizonYears", payload.horizon_years.unwrap_or(25))?,
    })
}

pub fn build_net_worth_inputs(payload: &NetWorthPayload) -> Result<NetWorthInputs, String> {
    let financial_assets = non_negative("financialAssets", payload.financial_assets.unwrap_or(100_000.0))?;
    Ok(NetWorthInputs {
        financial_assets,
        cost_basis: non_negative("costBasis", payload.cost_basis.unwrap_or(financial_assets))?,
        annual_savings: non_negative("annualSavings", payload.annual_savings.unwrap_or(10_000.0))?,
        annual_return: percent_in("annualReturn", payload.annual_return.unwrap_or(5.0), -100.0, 100.0)?,
        years: projection_years("years", payload.years.unwrap_or(20))?,
        stamp_duty: percent_in(
            "stampDuty",
            payload.stamp_duty.unwrap_or(DEFAULT_STAMP_DUTY * 100.0),
            0.0,
            100.0,
        )?,
        capital_gains_tax_rate: percent_in(
            "capitalGainsTaxRate",
            payload
                .capital_gains_tax_rate
                .unwrap_or(DEFAULT_CAPITAL_GAINS_TAX_RATE * 100.0),
            0.0,
            100.0,
        )?,
        inflation: percent_in("inflation", payload.inflation.unwrap_or(2.0), -10.0, 50.0)?,
    })
}

pub fn capital_loss_tax_rate(payload: &CapitalLossPayload) -> Result<f64, String> {
    match payload.tax_rate {
        Some(v) => percent_in("taxRate", v, 0.0, 100.0),
        None => Ok(DEFAULT_CAPITAL_GAINS_TAX_RATE),
    }
}
