use serde::Serialize;

use super::metrics::{annual_property_expenses, cash_on_cash_return, price_to_rent_ratio};
use super::types::{LoanInputs, MetricError, PropertyCostInputs};

/// Samples per grid axis.
pub const GRID_POINTS: usize = 5;
/// Fraction of the base value swept on each side of it.
pub const GRID_SPREAD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub rent_index: usize,
    pub price_index: usize,
}

/// One metric evaluated over the swept (purchase price, annual rent) plane.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityGrid {
    pub prices: Vec<f64>,
    pub rents: Vec<f64>,
    /// Indexed as `values[rent_index][price_index]`.
    pub values: Vec<Vec<f64>>,
    /// Cell whose swept pair sits closest to the base inputs.
    pub highlight: GridCell,
}

/// Evaluates `metric(price, rent)` over ±20% ranges around the base inputs.
///
/// An undefined metric anywhere in the range fails the whole grid; the
/// boundary layer decides how to present that, not this builder.
pub fn build_grid<F>(
    purchase_price: f64,
    annual_rent: f64,
    metric: F,
) -> Result<SensitivityGrid, MetricError>
where
    F: Fn(f64, f64) -> Result<f64, MetricError>,
{
    let prices = linear_range(purchase_price);
    let rents = linear_range(annual_rent);

    let mut values = Vec::with_capacity(rents.len());
    for &rent in &rents {
        let mut row = Vec::with_capacity(prices.len());
        for &price in &prices {
            row.push(metric(price, rent)?);
        }
        values.push(row);
    }

    let highlight = GridCell {
        rent_index: closest_index(&rents, annual_rent),
        price_index: closest_index(&prices, purchase_price),
    };

    Ok(SensitivityGrid {
        prices,
        rents,
        values,
        highlight,
    })
}

pub fn price_to_rent_grid(
    purchase_price: f64,
    annual_rent: f64,
) -> Result<SensitivityGrid, MetricError> {
    build_grid(purchase_price, annual_rent, price_to_rent_ratio)
}

/// Cash-on-cash grid. Expenses and the down payment are recomputed from each
/// swept price; the tax, maintenance, and down-payment rates stay fixed.
pub fn cash_on_cash_grid(
    loan: &LoanInputs,
    property: &PropertyCostInputs,
    annual_rent: f64,
) -> Result<SensitivityGrid, MetricError> {
    build_grid(loan.purchase_price, annual_rent, |price, rent| {
        let expenses = annual_property_expenses(
            price,
            property.property_tax_rate_pct,
            property.maintenance_cost_rate_pct,
        );
        let down_payment = price * loan.down_payment_pct / 100.0;
        cash_on_cash_return(rent, expenses, down_payment)
    })
}

fn linear_range(center: f64) -> Vec<f64> {
    let min = center * (1.0 - GRID_SPREAD);
    let max = center * (1.0 + GRID_SPREAD);
    (0..GRID_POINTS)
        .map(|i| min + (max - min) * i as f64 / (GRID_POINTS - 1) as f64)
        .collect()
}

// Strict `<` keeps the first occurrence on ties.
fn closest_index(range: &[f64], target: f64) -> usize {
    let mut best = 0;
    for (idx, value) in range.iter().enumerate() {
        if (value - target).abs() < (range[best] - target).abs() {
            best = idx;
        }
    }
    best
}
