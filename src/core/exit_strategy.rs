use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ExitStrategyInputs {
    pub current_value: f64,
    pub cost_basis: f64,
    pub annual_return: f64,
    /// Years of growth before the first sale.
    pub years_to_exit: u32,
    /// Number of yearly sales in the staggered plan (1 = lump sum).
    pub exit_years: u32,
    pub capital_gains_tax_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitYear {
    pub year: u32,
    pub value_before_sale: f64,
    pub sold: f64,
    pub realized_gain: f64,
    pub tax: f64,
    pub net_proceeds: f64,
    pub remaining_value: f64,
    pub remaining_basis: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitPlan {
    pub years: Vec<ExitYear>,
    pub gross_proceeds: f64,
    pub total_tax: f64,
    pub net_proceeds: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitStrategyResult {
    pub value_at_exit: f64,
    pub lump_sum: ExitPlan,
    pub staggered: ExitPlan,
    /// Staggered net proceeds minus lump-sum net proceeds.
    pub staggered_advantage: f64,
}

pub fn run_exit_strategy(inputs: &ExitStrategyInputs) -> ExitStrategyResult {
    let growth = (1.0 + inputs.annual_return).powi(inputs.years_to_exit as i32);
    let value_at_exit = inputs.current_value * growth;
    let lump_sum = plan_sales(inputs, 1);
    let staggered = plan_sales(inputs, inputs.exit_years.max(1));
    ExitStrategyResult {
        value_at_exit,
        staggered_advantage: staggered.net_proceeds - lump_sum.net_proceeds,
        lump_sum,
        staggered,
    }
}

/// Sells `1 / remaining_sales` of the holding each year starting at
/// `years_to_exit`; the unsold part keeps compounding. Basis is consumed
/// proportionally and losses are never taxed.
fn plan_sales(inputs: &ExitStrategyInputs, sales: u32) -> ExitPlan {
    let mut value = inputs.current_value * (1.0 + inputs.annual_return).powi(inputs.years_to_exit as i32);
    let mut basis = inputs.cost_basis.max(0.0);
    let mut years = Vec::with_capacity(sales as usize);

    for idx in 0..sales {
        if idx > 0 {
            value *= 1.0 + inputs.annual_return;
        }
        let remaining_sales = sales - idx;
        let share = 1.0 / remaining_sales as f64;
        let sold = value * share;
        let basis_sold = basis * share;
        let realized_gain = sold - basis_sold;
        let tax = realized_gain.max(0.0) * inputs.capital_gains_tax_rate;
        let value_before_sale = value;
        value -= sold;
        basis -= basis_sold;
        years.push(ExitYear {
            year: inputs.years_to_exit + idx,
            value_before_sale,
            sold,
            realized_gain,
            tax,
            net_proceeds: sold - tax,
            remaining_value: value,
            remaining_basis: basis,
        });
    }

    let gross_proceeds = years.iter().map(|y| y.sold).sum::<f64>();
    let total_tax = years.iter().map(|y| y.tax).sum::<f64>();
    ExitPlan {
        years,
        gross_proceeds,
        total_tax,
        net_proceeds: gross_proceeds - total_tax,
    }
}
