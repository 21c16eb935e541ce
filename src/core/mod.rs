mod engine;
mod grid;
mod metrics;
mod types;

pub use engine::project_years;
pub use grid::{
    GRID_POINTS, GRID_SPREAD, GridCell, SensitivityGrid, build_grid, cash_on_cash_grid,
    price_to_rent_grid,
};
pub use metrics::{
    annual_property_expenses, cash_on_cash_return, debt_to_income_ratio, decision_score,
    monthly_payment, net_rental_yield, price_to_rent_ratio,
};
pub use types::{
    FinancialProfile, Inputs, LoanInputs, MarketInputs, MetricError, ProjectionResult,
    PropertyCostInputs, RentalInputs, YearlyProjection,
};
