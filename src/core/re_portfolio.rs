use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub mortgage_balance: f64,
    /// Annual rate as a fraction.
    #[serde(default)]
    pub mortgage_rate: f64,
    #[serde(default)]
    pub annual_rent: f64,
    #[serde(default)]
    pub annual_costs: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMetrics {
    pub name: String,
    pub equity: f64,
    pub net_operating_income: f64,
    pub interest_cost: f64,
    pub cash_flow: f64,
    pub net_yield: f64,
    pub loan_to_value: f64,
    pub return_on_equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Recommendation {
    /// Debt costs more than the property yields.
    PayDownDebt { name: String, rate_gap: f64 },
    NegativeCashFlow { name: String, cash_flow: f64 },
    ConsiderSelling { name: String, return_on_equity: f64 },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOptimization {
    pub properties: Vec<PropertyMetrics>,
    pub total_value: f64,
    pub total_debt: f64,
    pub total_equity: f64,
    pub total_cash_flow: f64,
    pub portfolio_net_yield: f64,
    pub portfolio_loan_to_value: f64,
    pub portfolio_return_on_equity: f64,
    pub recommendations: Vec<Recommendation>,
}

/// Below this return on equity a property is listed as a sale candidate.
const SALE_CANDIDATE_ROE: f64 = 0.03;

pub fn analyze_property(property: &Property) -> PropertyMetrics {
    let equity = property.value - property.mortgage_balance;
    let net_operating_income = property.annual_rent - property.annual_costs;
    let interest_cost = property.mortgage_balance * property.mortgage_rate;
    let cash_flow = net_operating_income - interest_cost;
    PropertyMetrics {
        name: property.name.clone(),
        equity,
        net_operating_income,
        interest_cost,
        cash_flow,
        net_yield: ratio(net_operating_income, property.value),
        loan_to_value: ratio(property.mortgage_balance, property.value),
        return_on_equity: ratio(cash_flow, equity),
    }
}

pub fn optimize_portfolio(properties: &[Property]) -> PortfolioOptimization {
    let metrics: Vec<PropertyMetrics> = properties.iter().map(analyze_property).collect();

    let total_value = properties.iter().map(|p| p.value).sum::<f64>();
    let total_debt = properties.iter().map(|p| p.mortgage_balance).sum::<f64>();
    let total_noi = metrics.iter().map(|m| m.net_operating_income).sum::<f64>();
    let total_cash_flow = metrics.iter().map(|m| m.cash_flow).sum::<f64>();
    let total_equity = total_value - total_debt;

    let mut recommendations = Vec::new();
    for (property, m) in properties.iter().zip(&metrics) {
        if property.mortgage_balance > 0.0 && property.mortgage_rate > m.net_yield {
            recommendations.push(Recommendation::PayDownDebt {
                name: m.name.clone(),
                rate_gap: property.mortgage_rate - m.net_yield,
            });
        }
        if m.cash_flow < 0.0 {
            recommendations.push(Recommendation::NegativeCashFlow {
                name: m.name.clone(),
                cash_flow: m.cash_flow,
            });
        }
    }

    let mut sale_candidates: Vec<&PropertyMetrics> = metrics
        .iter()
        .filter(|m| m.equity > 0.0 && m.return_on_equity < SALE_CANDIDATE_ROE)
        .collect();
    sale_candidates.sort_by(|a, b| a.return_on_equity.total_cmp(&b.return_on_equity));
    recommendations.extend(sale_candidates.into_iter().map(|m| {
        Recommendation::ConsiderSelling {
            name: m.name.clone(),
            return_on_equity: m.return_on_equity,
        }
    }));

    PortfolioOptimization {
        total_value,
        total_debt,
        total_equity,
        total_cash_flow,
        portfolio_net_yield: ratio(total_noi, total_value),
        portfolio_loan_to_value: ratio(total_debt, total_value),
        portfolio_return_on_equity: ratio(total_cash_flow, total_equity),
        properties: metrics,
        recommendations,
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < 1e-9 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(name: &str, value: f64, debt: f64, rate: f64, rent: f64, costs: f64) -> Property {
        Property {
            name: name.to_string(),
            value,
            mortgage_balance: debt,
            mortgage_rate: rate,
            annual_rent: rent,
            annual_costs: costs,
        }
    }

    #[test]
    fn property_metrics_are_consistent() {
        let m = analyze_property(&property("flat", 200_000.0, 100_000.0, 0.04, 12_000.0, 2_000.0));
        assert_eq!(m.equity, 100_000.0);
        assert_eq!(m.net_operating_income, 10_000.0);
        assert!((m.interest_cost - 4_000.0).abs() < 1e-9);
        assert!((m.cash_flow - 6_000.0).abs() < 1e-9);
        assert!((m.net_yield - 0.05).abs() < 1e-12);
        assert!((m.loan_to_value - 0.5).abs() < 1e-12);
        assert!((m.return_on_equity - 0.06).abs() < 1e-12);
    }

    #[test]
    fn recommends_paying_down_expensive_debt_and_flags_losses() {
        let portfolio = vec![
            property("good", 300_000.0, 0.0, 0.0, 18_000.0, 3_000.0),
            property("leveraged", 200_000.0, 150_000.0, 0.06, 9_000.0, 3_000.0),
        ];
        let result = optimize_portfolio(&portfolio);
        assert_eq!(result.properties.len(), 2);
        assert_eq!(result.total_debt, 150_000.0);
        assert_eq!(result.total_equity, 350_000.0);

        let has_paydown = result.recommendations.iter().any(|r| {
            matches!(r, Recommendation::PayDownDebt { name, .. } if name == "leveraged")
        });
        let has_negative = result.recommendations.iter().any(|r| {
            matches!(r, Recommendation::NegativeCashFlow { name, .. } if name == "leveraged")
        });
        let good_flagged = result.recommendations.iter().any(|r| match r {
            Recommendation::PayDownDebt { name, .. }
            | Recommendation::NegativeCashFlow { name, .. }
            | Recommendation::ConsiderSelling { name, .. } => name == "good",
        });
        assert!(has_paydown);
        assert!(has_negative);
        assert!(!good_flagged);
    }

    #[test]
    fn sale_candidates_are_ranked_by_lowest_roe() {
        let portfolio = vec![
            property("meh", 100_000.0, 0.0, 0.0, 2_500.0, 500.0),
            property("worst", 100_000.0, 0.0, 0.0, 1_000.0, 500.0),
        ];
        let result = optimize_portfolio(&portfolio);
        let names: Vec<&str> = result
            .recommendations
            .iter()
            .filter_map(|r| match r {
                Recommendation::ConsiderSelling { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["worst", "meh"]);
    }

    #[test]
    fn empty_portfolio_has_zero_ratios() {
        let result = optimize_portfolio(&[]);
        assert_eq!(result.portfolio_net_yield, 0.0);
        assert_eq!(result.portfolio_return_on_equity, 0.0);
        assert!(result.recommendations.is_empty());
    }
}
