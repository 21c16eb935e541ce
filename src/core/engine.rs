use super::metrics::{annual_property_expenses, monthly_payment};
use super::types::{
    LoanInputs, MarketInputs, ProjectionResult, PropertyCostInputs, RentalInputs, YearlyProjection,
};

/// Cumulative buying cost, cumulative renting cost, and appreciated property
/// value for every year of the loan term.
///
/// The mortgage payment and the tax/maintenance base are computed once and
/// reused for every year; the model deliberately does not re-amortize the
/// loan or revalue the expense base as the property appreciates.
pub fn project_years(
    loan: &LoanInputs,
    property: &PropertyCostInputs,
    rental: &RentalInputs,
    market: &MarketInputs,
) -> ProjectionResult {
    let payment = monthly_payment(
        loan.loan_amount(),
        loan.annual_interest_rate_pct,
        loan.loan_term_years,
    );
    let annual_mortgage_cost = payment * 12.0;
    let annual_expenses = annual_property_expenses(
        property.purchase_price,
        property.property_tax_rate_pct,
        property.maintenance_cost_rate_pct,
    );

    let mut years = Vec::with_capacity(loan.loan_term_years as usize);
    let mut cumulative_buying_cost = 0.0;
    let mut cumulative_renting_cost = 0.0;
    let mut property_value = loan.purchase_price;
    let mut rent = rental.annual_rent;

    for year in 1..=loan.loan_term_years {
        cumulative_buying_cost += annual_mortgage_cost + annual_expenses;

        // Rent and property value compound before they are counted, so the
        // first projected year already carries one increase.
        property_value *= 1.0 + market.annual_appreciation_rate_pct / 100.0;
        rent *= 1.0 + rental.rent_increase_rate_pct / 100.0;
        cumulative_renting_cost += rent;

        years.push(YearlyProjection {
            year,
            cumulative_buying_cost,
            cumulative_renting_cost,
            property_value,
        });
    }

    ProjectionResult {
        total_buying_cost: cumulative_buying_cost,
        total_renting_cost: cumulative_renting_cost,
        final_property_value: property_value,
        buying_is_cheaper: cumulative_buying_cost < cumulative_renting_cost,
        years,
    }
}
