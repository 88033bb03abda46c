use serde::Serialize;

pub const DEFAULT_STAMP_DUTY: f64 = 0.002;

#[derive(Debug, Clone)]
pub struct NetWorthInputs {
    pub financial_assets: f64,
    /// Cost basis of the starting assets; gains above it are taxed on exit.
    pub cost_basis: f64,
    pub annual_savings: f64,
    pub annual_return: f64,
    pub years: u32,
    /// Yearly wealth tax on the end-of-year value of financial assets.
    pub stamp_duty: f64,
    pub capital_gains_tax_rate: f64,
    pub inflation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthYear {
    pub year: u32,
    pub gross_value: f64,
    pub cost_basis: f64,
    pub stamp_duty_paid: f64,
    pub cumulative_stamp_duty: f64,
    pub latent_tax: f64,
    pub net_liquidation_value: f64,
    pub real_net_liquidation_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthResult {
    pub years: Vec<NetWorthYear>,
    pub final_gross_value: f64,
    pub final_net_liquidation_value: f64,
    pub total_stamp_duty: f64,
    pub final_latent_tax: f64,
    /// Share of the gross final value lost to stamp duty and exit tax combined.
    pub tax_drag: f64,
}

pub fn run_net_worth_projection(inputs: &NetWorthInputs) -> NetWorthResult {
    let mut value = inputs.financial_assets;
    let mut basis = inputs.cost_basis;
    let mut cumulative_stamp_duty = 0.0;
    let mut years = Vec::with_capacity(inputs.years as usize + 1);
    years.push(row(inputs, 0, value, basis, 0.0, 0.0));

    for year in 1..=inputs.years {
        value = value * (1.0 + inputs.annual_return) + inputs.annual_savings;
        basis += inputs.annual_savings;
        let stamp_duty = value.max(0.0) * inputs.stamp_duty;
        value -= stamp_duty;
        cumulative_stamp_duty += stamp_duty;
        years.push(row(inputs, year, value, basis, stamp_duty, cumulative_stamp_duty));
    }

    let last = years[years.len() - 1];
    let untaxed = {
        let mut untaxed = inputs.financial_assets;
        for _ in 0..inputs.years {
            untaxed = untaxed * (1.0 + inputs.annual_return) + inputs.annual_savings;
        }
        untaxed
    };

    NetWorthResult {
        final_gross_value: last.gross_value,
        final_net_liquidation_value: last.net_liquidation_value,
        total_stamp_duty: cumulative_stamp_duty,
        final_latent_tax: last.latent_tax,
        tax_drag: if untaxed.abs() > 1e-12 {
            1.0 - last.net_liquidation_value / untaxed
        } else {
            0.0
        },
        years,
    }
}

fn row(
    inputs: &NetWorthInputs,
    year: u32,
    value: f64,
    basis: f64,
    stamp_duty_paid: f64,
    cumulative_stamp_duty: f64,
) -> NetWorthYear {
    let latent_tax = (value - basis).max(0.0) * inputs.capital_gains_tax_rate;
    let net = value - latent_tax;
    NetWorthYear {
        year,
        gross_value: value,
        cost_basis: basis,
        stamp_duty_paid,
        cumulative_stamp_duty,
        latent_tax,
        net_liquidation_value: net,
        real_net_liquidation_value: net / (1.0 + inputs.inflation).powi(year as i32),
    }
}
