use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompoundingFrequency {
    Annual,
    Semiannual,
    Quarterly,
    Monthly,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Annual => 1,
            CompoundingFrequency::Semiannual => 2,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Monthly => 12,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompoundInputs {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_rate: f64,
    pub years: u32,
    pub frequency: CompoundingFrequency,
    pub inflation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundYear {
    pub year: u32,
    pub balance: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub real_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundResult {
    pub years: Vec<CompoundYear>,
    pub final_balance: f64,
    pub total_contributed: f64,
    pub total_interest: f64,
    pub final_real_balance: f64,
    pub effective_annual_rate: f64,
}

/// Simulates month by month. Contributions land at month end; interest is
/// credited at the end of each compounding period on the balance held at
/// its start plus contributions already made within it, pro rata by month.
pub fn run_compound(inputs: &CompoundInputs) -> CompoundResult {
    let periods = inputs.frequency.periods_per_year();
    let months_per_period = 12 / periods;
    let period_rate = inputs.annual_rate / periods as f64;

    let mut balance = inputs.principal;
    let mut contributed = inputs.principal;
    let mut accrued = 0.0;
    let mut years = Vec::with_capacity(inputs.years as usize + 1);
    years.push(snapshot(0, balance, contributed, inputs.inflation));

    for year in 1..=inputs.years {
        for month in 1..=12 {
            accrued += balance * period_rate / months_per_period as f64;
            balance += inputs.monthly_contribution;
            contributed += inputs.monthly_contribution;
            if month % months_per_period == 0 {
                balance += accrued;
                accrued = 0.0;
            }
        }
        years.push(snapshot(year, balance, contributed, inputs.inflation));
    }

    let last = years[years.len() - 1];
    CompoundResult {
        final_balance: last.balance,
        total_contributed: last.total_contributed,
        total_interest: last.total_interest,
        final_real_balance: last.real_balance,
        effective_annual_rate: (1.0 + period_rate).powi(periods as i32) - 1.0,
        years,
    }
}

fn snapshot(year: u32, balance: f64, contributed: f64, inflation: f64) -> CompoundYear {
    CompoundYear {
        year,
        balance,
        total_contributed: contributed,
        total_interest: balance - contributed,
        real_balance: balance / (1.0 + inflation).powi(year as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn base_inputs() -> CompoundInputs {
        CompoundInputs {
            principal: 10_000.0,
            monthly_contribution: 0.0,
            annual_rate: 0.05,
            years: 10,
            frequency: CompoundingFrequency::Annual,
            inflation: 0.0,
        }
    }

    #[test]
    fn lump_sum_matches_closed_form_for_each_frequency() {
        for frequency in [
            CompoundingFrequency::Annual,
            CompoundingFrequency::Semiannual,
            CompoundingFrequency::Quarterly,
            CompoundingFrequency::Monthly,
        ] {
            let inputs = CompoundInputs {
                frequency,
                ..base_inputs()
            };
            let n = frequency.periods_per_year() as i32;
            let expected = 10_000.0 * (1.0 + 0.05 / n as f64).powi(n * 10);
            let result = run_compound(&inputs);
            assert_approx(result.final_balance, expected, 1e-6);
            assert_eq!(result.years.len(), 11);
        }
    }

    #[test]
    fn zero_rate_is_principal_plus_contributions() {
        let inputs = CompoundInputs {
            annual_rate: 0.0,
            monthly_contribution: 250.0,
            ..base_inputs()
        };
        let result = run_compound(&inputs);
        assert_approx(result.final_balance, 10_000.0 + 250.0 * 120.0, 1e-9);
        assert_approx(result.total_interest, 0.0, 1e-9);
    }

    #[test]
    fn monthly_contributions_match_ordinary_annuity() {
        let inputs = CompoundInputs {
            principal: 0.0,
            monthly_contribution: 100.0,
            annual_rate: 0.06,
            years: 5,
            frequency: CompoundingFrequency::Monthly,
            inflation: 0.0,
        };
        let i: f64 = 0.005;
        let expected = 100.0 * ((1.0 + i).powi(60) - 1.0) / i;
        let result = run_compound(&inputs);
        assert_approx(result.final_balance, expected, 1e-6);
    }

    #[test]
    fn real_balance_discounts_inflation() {
        let inputs = CompoundInputs {
            inflation: 0.02,
            ..base_inputs()
        };
        let result = run_compound(&inputs);
        let expected = result.final_balance / 1.02_f64.powi(10);
        assert_approx(result.final_real_balance, expected, 1e-9);
        assert_approx(result.effective_annual_rate, 0.05, 1e-12);
    }
}
