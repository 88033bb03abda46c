use serde::Serialize;

/// Rates and shares are fractions of the property price unless noted.
#[derive(Debug, Clone)]
pub struct RealEstateVsStocksInputs {
    pub property_price: f64,
    pub down_payment_share: f64,
    pub purchase_costs_share: f64,
    pub mortgage_rate: f64,
    pub mortgage_years: u32,
    pub appreciation: f64,
    pub gross_rent_yield: f64,
    /// Maintenance, insurance and property tax, as a share of current value.
    pub running_costs_share: f64,
    /// Share of the year the property earns no rent.
    pub vacancy: f64,
    pub stock_return: f64,
    pub horizon_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonYear {
    pub year: u32,
    pub property_value: f64,
    pub mortgage_balance: f64,
    pub property_cash_flow: f64,
    pub property_cash: f64,
    pub property_net_worth: f64,
    pub stocks_value: f64,
    pub stocks_contributed: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Winner {
    RealEstate,
    Stocks,
    Tie,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealEstateVsStocksResult {
    pub initial_outlay: f64,
    pub annual_mortgage_payment: f64,
    pub years: Vec<ComparisonYear>,
    pub winner: Winner,
    pub final_difference: f64,
    /// First year in which the stock strategy's net worth exceeds the property's.
    pub stocks_overtake_year: Option<u32>,
}

/// Monthly annuity payment for a fully amortising loan.
pub fn monthly_mortgage_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let months = f64::from(years) * 12.0;
    if months == 0.0 || principal <= 0.0 {
        return 0.0;
    }
    let i = annual_rate / 12.0;
    if i.abs() < 1e-12 {
        return principal / months;
    }
    principal * i / (1.0 - (1.0 + i).powf(-months))
}

pub fn run_real_estate_vs_stocks(inputs: &RealEstateVsStocksInputs) -> RealEstateVsStocksResult {
    let down_payment = inputs.property_price * inputs.down_payment_share;
    let purchase_costs = inputs.property_price * inputs.purchase_costs_share;
    let initial_outlay = down_payment + purchase_costs;
    let loan = (inputs.property_price - down_payment).max(0.0);
    let monthly_payment = monthly_mortgage_payment(loan, inputs.mortgage_rate, inputs.mortgage_years);
    let monthly_rate = inputs.mortgage_rate / 12.0;

    let mut property_value = inputs.property_price;
    let mut balance = loan;
    let mut property_cash = 0.0;
    let mut stocks_value = initial_outlay;
    let mut stocks_contributed = initial_outlay;

    let mut years = Vec::with_capacity(inputs.horizon_years as usize + 1);
    years.push(ComparisonYear {
        year: 0,
        property_value,
        mortgage_balance: balance,
        property_cash_flow: 0.0,
        property_cash,
        property_net_worth: property_value - balance,
        stocks_value,
        stocks_contributed,
    });

    for year in 1..=inputs.horizon_years {
        let rent = property_value * inputs.gross_rent_yield * (1.0 - inputs.vacancy);
        let running_costs = property_value * inputs.running_costs_share;

        let mut debt_service = 0.0;
        for _ in 0..12 {
            if balance <= 0.0 {
                break;
            }
            let interest = balance * monthly_rate;
            let payment = monthly_payment.min(balance + interest);
            balance -= payment - interest;
            debt_service += payment;
        }
        balance = balance.max(0.0);

        let cash_flow = rent - running_costs - debt_service;
        stocks_value *= 1.0 + inputs.stock_return;
        if cash_flow >= 0.0 {
            property_cash += cash_flow;
        } else {
            stocks_value += -cash_flow;
            stocks_contributed += -cash_flow;
        }
        property_value *= 1.0 + inputs.appreciation;

        years.push(ComparisonYear {
            year,
            property_value,
            mortgage_balance: balance,
            property_cash_flow: cash_flow,
            property_cash,
            property_net_worth: property_value - balance + property_cash,
            stocks_value,
            stocks_contributed,
        });
    }

    let last = years[years.len() - 1];
    let final_difference = last.property_net_worth - last.stocks_value;
    let winner = if final_difference.abs() < 0.005 {
        Winner::Tie
    } else if final_difference > 0.0 {
        Winner::RealEstate
    } else {
        Winner::Stocks
    };
    let stocks_overtake_year = years
        .iter()
        .skip(1)
        .find(|y| y.stocks_value > y.property_net_worth)
        .map(|y| y.year);

    RealEstateVsStocksResult {
        initial_outlay,
        annual_mortgage_payment: monthly_payment * 12.0,
        years,
        winner,
        final_difference,
        stocks_overtake_year,
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

    fn sample_inputs() -> RealEstateVsStocksInputs {
        RealEstateVsStocksInputs {
            property_price: 250_000.0,
            down_payment_share: 0.20,
            purchase_costs_share: 0.08,
            mortgage_rate: 0.035,
            mortgage_years: 25,
            appreciation: 0.02,
            gross_rent_yield: 0.05,
            running_costs_share: 0.01,
            vacancy: 0.08,
            stock_return: 0.06,
            horizon_years: 25,
        }
    }

    #[test]
    fn mortgage_payment_matches_reference_value() {
        // 200k over 25 years at 3.5%: ~1001.25 per month.
        let payment = monthly_mortgage_payment(200_000.0, 0.035, 25);
        assert_approx(payment, 1_001.25, 0.05);
        assert_approx(monthly_mortgage_payment(120_000.0, 0.0, 10), 1_000.0, 1e-9);
        assert_eq!(monthly_mortgage_payment(0.0, 0.05, 10), 0.0);
        let interest_only = monthly_mortgage_payment(120_000.0, 0.06, u32::MAX);
        assert_approx(interest_only, 600.0, 1e-6);
    }

    #[test]
    fn mortgage_is_repaid_by_end_of_term() {
        let result = run_real_estate_vs_stocks(&sample_inputs());
        assert_eq!(result.years.len(), 26);
        assert_approx(result.years[25].mortgage_balance, 0.0, 1e-3);
        assert_approx(result.initial_outlay, 70_000.0, 1e-9);
        assert_approx(result.years[0].stocks_value, 70_000.0, 1e-9);
    }

    #[test]
    fn stocks_receive_property_shortfalls() {
        let mut inputs = sample_inputs();
        inputs.gross_rent_yield = 0.0;
        inputs.stock_return = 0.0;
        let result = run_real_estate_vs_stocks(&inputs);
        let y1 = result.years[1];
        assert!(y1.property_cash_flow < 0.0);
        assert_approx(y1.stocks_value, 70_000.0 - y1.property_cash_flow, 1e-6);
        assert_approx(y1.stocks_contributed, y1.stocks_value, 1e-6);
        assert_eq!(y1.property_cash, 0.0);
    }

    #[test]
    fn winner_follows_final_difference() {
        let mut inputs = sample_inputs();
        inputs.stock_return = 0.12;
        inputs.appreciation = 0.0;
        let result = run_real_estate_vs_stocks(&inputs);
        assert_eq!(result.winner, Winner::Stocks);
        assert!(result.final_difference < 0.0);
        assert!(result.stocks_overtake_year.is_some());

        inputs.stock_return = -0.05;
        inputs.appreciation = 0.05;
        let result = run_real_estate_vs_stocks(&inputs);
        assert_eq!(result.winner, Winner::RealEstate);
    }
}
