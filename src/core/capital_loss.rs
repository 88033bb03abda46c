//! FIFO compensation of realized capital losses against gains.
//!
//! Losses expire on 31 December of the fourth year after the year they were
//! realized. Capital-income losses may only absorb other-income gains, while
//! other-income losses may absorb either category.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPITAL_GAINS_TAX_RATE: f64 = 0.26;
const EXPIRY_YEARS: i32 = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeCategory {
    #[serde(alias = "capitalIncome", alias = "capital_income")]
    CapitalIncome,
    #[serde(alias = "otherIncome", alias = "other_income")]
    OtherIncome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossRecord {
    pub id: String,
    pub amount: f64,
    pub realized_on: NaiveDate,
    pub category: IncomeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LossRecord {
    pub fn expires_on(&self) -> NaiveDate {
        expiry_date(self.realized_on)
    }

    pub fn days_to_expiry(&self, today: NaiveDate) -> i64 {
        (self.expires_on() - today).num_days()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GainPool {
    pub capital_income: f64,
    pub other_income: f64,
}

impl GainPool {
    pub fn total(&self) -> f64 {
        self.capital_income + self.other_income
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LossAllocation {
    pub id: String,
    pub category: IncomeCategory,
    pub amount: f64,
    pub expires_on: NaiveDate,
    pub days_to_expiry: i64,
    pub expired: bool,
    pub used_against_capital_income: f64,
    pub used_against_other_income: f64,
    pub remaining: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LossAllocation {
    pub fn used(&self) -> f64 {
        self.used_against_capital_income + self.used_against_other_income
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompensationResult {
    pub reference_date: NaiveDate,
    /// Allocations in FIFO order (nearest expiry first).
    pub allocations: Vec<LossAllocation>,
    pub total_compensated: f64,
    pub remaining_gains: GainPool,
    pub residual_losses: f64,
    pub expired_losses: f64,
    pub tax_saved: f64,
}

pub fn expiry_date(realized_on: NaiveDate) -> NaiveDate {
    let year = realized_on.year() + EXPIRY_YEARS;
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX)
}

#[derive(Copy, Clone)]
enum Pass {
    CapitalLossesOnOtherGains,
    OtherLossesOnOtherGains,
    OtherLossesOnCapitalGains,
}

impl Pass {
    const ORDER: [Pass; 3] = [
        Pass::CapitalLossesOnOtherGains,
        Pass::OtherLossesOnOtherGains,
        Pass::OtherLossesOnCapitalGains,
    ];

    fn loss_category(self) -> IncomeCategory {
        match self {
            Pass::CapitalLossesOnOtherGains => IncomeCategory::CapitalIncome,
            Pass::OtherLossesOnOtherGains | Pass::OtherLossesOnCapitalGains => {
                IncomeCategory::OtherIncome
            }
        }
    }

    fn gain_category(self) -> IncomeCategory {
        match self {
            Pass::CapitalLossesOnOtherGains | Pass::OtherLossesOnOtherGains => {
                IncomeCategory::OtherIncome
            }
            Pass::OtherLossesOnCapitalGains => IncomeCategory::CapitalIncome,
        }
    }
}

/// Greedily matches losses against `gains` as of `today`.
///
/// Passes run cross-category first (capital-income losses on other-income
/// gains), then same-category, then the remaining cross-category pairing.
/// Each pass walks losses in ascending days-to-expiry. Expired losses are
/// listed but never consumed.
pub fn compensate(
    losses: &[LossRecord],
    gains: GainPool,
    today: NaiveDate,
    tax_rate: f64,
) -> CompensationResult {
    let mut allocations: Vec<LossAllocation> = losses
        .iter()
        .map(|loss| {
            let days_to_expiry = loss.days_to_expiry(today);
            LossAllocation {
                id: loss.id.clone(),
                category: loss.category,
                amount: loss.amount.max(0.0),
                expires_on: loss.expires_on(),
                days_to_expiry,
                expired: days_to_expiry < 0,
                used_against_capital_income: 0.0,
                used_against_other_income: 0.0,
                remaining: loss.amount.max(0.0),
                description: loss.description.clone(),
            }
        })
        .collect();
    allocations.sort_by_key(|a| a.days_to_expiry);

    let mut remaining_gains = GainPool {
        capital_income: gains.capital_income.max(0.0),
        other_income: gains.other_income.max(0.0),
    };

    for pass in Pass::ORDER {
        for allocation in allocations.iter_mut() {
            if allocation.expired || allocation.category != pass.loss_category() {
                continue;
            }
            let pool = match pass.gain_category() {
                IncomeCategory::CapitalIncome => &mut remaining_gains.capital_income,
                IncomeCategory::OtherIncome => &mut remaining_gains.other_income,
            };
            if *pool <= 0.0 {
                break;
            }
            let used = allocation.remaining.min(*pool);
            if used <= 0.0 {
                continue;
            }
            *pool -= used;
            allocation.remaining -= used;
            match pass.gain_category() {
                IncomeCategory::CapitalIncome => allocation.used_against_capital_income += used,
                IncomeCategory::OtherIncome => allocation.used_against_other_income += used,
            }
        }
    }

    let total_compensated = allocations.iter().map(LossAllocation::used).sum::<f64>();
    let residual_losses = allocations
        .iter()
        .filter(|a| !a.expired)
        .map(|a| a.remaining)
        .sum::<f64>();
    let expired_losses = allocations
        .iter()
        .filter(|a| a.expired)
        .map(|a| a.amount)
        .sum::<f64>();

    CompensationResult {
        reference_date: today,
        allocations,
        total_compensated,
        remaining_gains,
        residual_losses,
        expired_losses,
        tax_saved: total_compensated * tax_rate,
    }
}
