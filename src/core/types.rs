use std::fmt;

use serde::Serialize;

/// Financing terms for the purchase.
#[derive(Debug, Clone, Copy)]
pub struct LoanInputs {
    pub purchase_price: f64,
    pub down_payment_pct: f64,
    pub loan_term_years: u32,
    pub annual_interest_rate_pct: f64,
}

impl LoanInputs {
    pub fn down_payment(&self) -> f64 {
        self.purchase_price * self.down_payment_pct / 100.0
    }

    pub fn loan_amount(&self) -> f64 {
        self.purchase_price - self.down_payment()
    }
}

/// Recurring ownership costs, each expressed as a percentage of the
/// purchase price per year.
#[derive(Debug, Clone, Copy)]
pub struct PropertyCostInputs {
    pub purchase_price: f64,
    pub property_tax_rate_pct: f64,
    pub maintenance_cost_rate_pct: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RentalInputs {
    pub annual_rent: f64,
    pub rent_increase_rate_pct: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct MarketInputs {
    pub annual_appreciation_rate_pct: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct FinancialProfile {
    pub annual_income: f64,
}

/// Validated snapshot of every input group for one analysis request.
#[derive(Debug, Clone, Copy)]
pub struct Inputs {
    pub loan: LoanInputs,
    pub property: PropertyCostInputs,
    pub rental: RentalInputs,
    pub market: MarketInputs,
    pub profile: FinancialProfile,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: u32,
    pub cumulative_buying_cost: f64,
    pub cumulative_renting_cost: f64,
    pub property_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub years: Vec<YearlyProjection>,
    pub total_buying_cost: f64,
    pub total_renting_cost: f64,
    pub final_property_value: f64,
    pub buying_is_cheaper: bool,
}

/// A ratio metric was asked to divide by a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricError {
    DivisionUndefined { denominator: &'static str },
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricError::DivisionUndefined { denominator } => {
                write!(f, "{denominator} is zero, ratio is undefined")
            }
        }
    }
}

impl std::error::Error for MetricError {}
