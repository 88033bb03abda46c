use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    Equity,
    Bond,
    Etf,
    Fund,
    Cash,
    Crypto,
    Commodity,
    Other,
}

impl AssetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Equity => "equity",
            AssetCategory::Bond => "bond",
            AssetCategory::Etf => "etf",
            AssetCategory::Fund => "fund",
            AssetCategory::Cash => "cash",
            AssetCategory::Crypto => "crypto",
            AssetCategory::Commodity => "commodity",
            AssetCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub category: AssetCategory,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
}

impl Position {
    pub fn value(&self) -> f64 {
        self.quantity * self.current_price
    }

    pub fn cost(&self) -> f64 {
        self.quantity * self.avg_price
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionView {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub category: AssetCategory,
    pub quantity: f64,
    pub avg_price: f64,
    pub current_price: f64,
    pub value: f64,
    pub cost: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub weight: f64,
    pub logo: Logo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAllocation {
    pub category: AssetCategory,
    pub value: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub positions: Vec<PositionView>,
    pub allocation: Vec<CategoryAllocation>,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_pct: f64,
}

pub fn summarize(positions: &[Position]) -> PortfolioSummary {
    let total_value = positions.iter().map(Position::value).sum::<f64>();
    let total_cost = positions.iter().map(Position::cost).sum::<f64>();

    let views = positions
        .iter()
        .map(|p| {
            let value = p.value();
            let cost = p.cost();
            PositionView {
                id: p.id.clone(),
                ticker: p.ticker.clone(),
                name: p.name.clone(),
                category: p.category,
                quantity: p.quantity,
                avg_price: p.avg_price,
                current_price: p.current_price,
                value,
                cost,
                profit_loss: value - cost,
                profit_loss_pct: share(value - cost, cost),
                weight: share(value, total_value),
                logo: logo_for(&p.ticker),
            }
        })
        .collect();

    let mut by_category: BTreeMap<AssetCategory, f64> = BTreeMap::new();
    for p in positions {
        *by_category.entry(p.category).or_insert(0.0) += p.value();
    }
    let allocation = by_category
        .into_iter()
        .map(|(category, value)| CategoryAllocation {
            category,
            value,
            weight: share(value, total_value),
        })
        .collect();

    PortfolioSummary {
        positions: views,
        allocation,
        total_value,
        total_cost,
        total_profit_loss: total_value - total_cost,
        total_profit_loss_pct: share(total_value - total_cost, total_cost),
    }
}

fn share(part: f64, whole: f64) -> f64 {
    if whole.abs() < 1e-12 { 0.0 } else { part / whole }
}

const LOGO_CDN: &str = "https://logo.clearbit.com";

const TICKER_DOMAINS: &[(&str, &str)] = &[
    ("AAPL", "apple.com"),
    ("MSFT", "microsoft.com"),
    ("GOOGL", "abc.xyz"),
    ("AMZN", "amazon.com"),
    ("META", "meta.com"),
    ("NVDA", "nvidia.com"),
    ("TSLA", "tesla.com"),
    ("ENI", "eni.com"),
    ("ENEL", "enel.com"),
    ("ISP", "intesasanpaolo.com"),
    ("UCG", "unicredit.it"),
    ("RACE", "ferrari.com"),
    ("STLAM", "stellantis.com"),
    ("G", "generali.com"),
    ("VWCE", "vanguard.com"),
    ("SWDA", "ishares.com"),
    ("CSSPX", "ishares.com"),
    ("EIMI", "ishares.com"),
];

const FALLBACK_COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    /// CDN image URL; absent when the ticker is not in the domain table.
    pub url: Option<String>,
    pub initials: String,
    pub color: &'static str,
}

/// Resolves a ticker to a logo URL plus the colored-initials fallback that
/// is shown when the image is missing or fails to load.
pub fn logo_for(ticker: &str) -> Logo {
    let normalized = ticker
        .trim()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    let url = TICKER_DOMAINS
        .iter()
        .find(|(t, _)| *t == normalized)
        .map(|(_, domain)| format!("{LOGO_CDN}/{domain}"));
    let initials: String = normalized.chars().filter(|c| c.is_ascii_alphanumeric()).take(2).collect();
    let hash = normalized
        .bytes()
        .fold(0_usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    Logo {
        url,
        initials: if initials.is_empty() { "?".to_string() } else { initials },
        color: FALLBACK_COLORS[hash % FALLBACK_COLORS.len()],
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_positions() -> Vec<Position> {
        vec![
            Position {
                id: "1".to_string(),
                ticker: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                category: AssetCategory::Equity,
                quantity: 10.0,
                avg_price: 150.0,
                current_price: 180.0,
            },
            Position {
                id: "2".to_string(),
                ticker: "VWCE.MI".to_string(),
                name: "Vanguard FTSE All-World, Acc".to_string(),
                category: AssetCategory::Etf,
                quantity: 20.0,
                avg_price: 100.0,
                current_price: 110.0,
            },
            Position {
                id: "3".to_string(),
                ticker: "BTP-2030".to_string(),
                name: "BTP \"Valore\" 2030".to_string(),
                category: AssetCategory::Bond,
                quantity: 5.0,
                avg_price: 1_000.0,
                current_price: 950.0,
            },
        ]
    }

    #[test]
    fn totals_and_weights_add_up() {
        let summary = summarize(&sample_positions());
        assert!((summary.total_value - (1_800.0 + 2_200.0 + 4_750.0)).abs() < 1e-9);
        assert!((summary.total_cost - (1_500.0 + 2_000.0 + 5_000.0)).abs() < 1e-9);
        let weights: f64 = summary.positions.iter().map(|p| p.weight).sum();
        assert!((weights - 1.0).abs() < 1e-12);
        let alloc: f64 = summary.allocation.iter().map(|a| a.value).sum();
        assert!((alloc - summary.total_value).abs() < 1e-9);
        assert!((summary.positions[2].profit_loss_pct + 0.05).abs() < 1e-12);
    }

    #[test]
    fn empty_portfolio_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.total_profit_loss_pct, 0.0);
        assert!(summary.allocation.is_empty());
    }

    #[test]
    fn logo_lookup_strips_exchange_suffix() {
        let logo = logo_for("vwce.mi");
        assert_eq!(logo.url.as_deref(), Some("https://logo.clearbit.com/vanguard.com"));
        assert_eq!(logo.initials, "VW");
    }

    #[test]
    fn unknown_ticker_falls_back_to_initials() {
        let logo = logo_for("BTP-2030");
        assert!(logo.url.is_none());
        assert_eq!(logo.initials, "BT");
        assert_eq!(logo, logo_for("btp-2030"));
        assert_eq!(logo_for("").initials, "?");
    }

    #[test]
    fn category_labels_match_wire_names() {
        for c in [AssetCategory::Equity, AssetCategory::Crypto, AssetCategory::Other] {
            let json = serde_json::to_string(&c).expect("serializes");
            assert_eq!(json, format!("\"{}\"", c.as_str()));
        }
    }
}
