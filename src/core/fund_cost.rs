use serde::Serialize;

/// Rates are fractions (0.015 for a 1.5% TER).
#[derive(Debug, Clone)]
pub struct FundCostInputs {
    pub capital: f64,
    pub annual_contribution: f64,
    pub gross_return: f64,
    pub ter: f64,
    pub entry_fee: f64,
    pub horizon_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCostYear {
    pub year: u32,
    pub without_costs: f64,
    pub with_costs: f64,
    pub cost_impact: f64,
    pub fees_paid: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundCostResult {
    pub years: Vec<FundCostYear>,
    pub final_without_costs: f64,
    pub final_with_costs: f64,
    pub cost_impact: f64,
    pub cost_impact_share: f64,
    pub total_fees_paid: f64,
    pub total_invested: f64,
}

pub fn run_fund_cost(inputs: &FundCostInputs) -> FundCostResult {
    let mut years = Vec::with_capacity(inputs.horizon_years as usize + 1);
    let mut without_costs = inputs.capital;
    let mut with_costs = inputs.capital * (1.0 - inputs.entry_fee);
    let mut fees_paid = inputs.capital * inputs.entry_fee;
    years.push(FundCostYear {
        year: 0,
        without_costs,
        with_costs,
        cost_impact: without_costs - with_costs,
        fees_paid,
    });

    for year in 1..=inputs.horizon_years {
        let running_fee = with_costs * inputs.ter;
        let entry_fee = inputs.annual_contribution * inputs.entry_fee;
        fees_paid += running_fee + entry_fee;

        without_costs = without_costs * (1.0 + inputs.gross_return) + inputs.annual_contribution;
        with_costs = with_costs * (1.0 + inputs.gross_return - inputs.ter)
            + inputs.annual_contribution * (1.0 - inputs.entry_fee);

        years.push(FundCostYear {
            year,
            without_costs,
            with_costs,
            cost_impact: without_costs - with_costs,
            fees_paid,
        });
    }

    let cost_impact = without_costs - with_costs;
    FundCostResult {
        years,
        final_without_costs: without_costs,
        final_with_costs: with_costs,
        cost_impact,
        cost_impact_share: if without_costs.abs() > 1e-12 {
            cost_impact / without_costs
        } else {
            0.0
        },
        total_fees_paid: fees_paid,
        total_invested: inputs.capital + inputs.annual_contribution * inputs.horizon_years as f64,
    }
}
