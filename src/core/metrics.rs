use super::types::MetricError;

const FAVORABLE_PRICE_TO_RENT_MAX: f64 = 15.0;
const FAVORABLE_ROI_MIN_PCT: f64 = 10.0;
const FAVORABLE_NET_YIELD_MIN_PCT: f64 = 5.0;
const FAVORABLE_DTI_MAX_PCT: f64 = 36.0;

/// Fixed-rate monthly mortgage payment for a loan repaid over `term_years`.
///
/// Zero-rate loans amortize linearly (`loan_amount / months`); the annuity
/// formula is undefined there because `(1+r)^n - 1` collapses to zero.
pub fn monthly_payment(loan_amount: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    let months = f64::from(term_years * 12);
    if annual_rate_pct == 0.0 {
        return loan_amount / months;
    }

    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let growth = (1.0 + monthly_rate).powi((term_years * 12) as i32);
    loan_amount * monthly_rate * growth / (growth - 1.0)
}

/// Combined annual property tax and maintenance cost.
pub fn annual_property_expenses(
    purchase_price: f64,
    tax_rate_pct: f64,
    maintenance_rate_pct: f64,
) -> f64 {
    purchase_price * (tax_rate_pct + maintenance_rate_pct) / 100.0
}

/// Purchase price divided by annual rent; lower favors buying.
pub fn price_to_rent_ratio(price: f64, annual_rent: f64) -> Result<f64, MetricError> {
    if annual_rent == 0.0 {
        return Err(MetricError::DivisionUndefined {
            denominator: "annual rent",
        });
    }
    Ok(price / annual_rent)
}

/// Annual net rental income as a percentage of the purchase price.
pub fn net_rental_yield(annual_rent: f64, annual_expenses: f64, price: f64) -> f64 {
    (annual_rent - annual_expenses) / price * 100.0
}

/// Annual net rental income as a percentage of the cash invested up front.
/// Also reported as ROI; the two names are the same computation.
pub fn cash_on_cash_return(
    annual_rent: f64,
    annual_expenses: f64,
    down_payment: f64,
) -> Result<f64, MetricError> {
    if down_payment == 0.0 {
        return Err(MetricError::DivisionUndefined {
            denominator: "down payment",
        });
    }
    Ok((annual_rent - annual_expenses) / down_payment * 100.0)
}

/// Annualized mortgage payment as a percentage of gross annual income.
pub fn debt_to_income_ratio(monthly_payment: f64, annual_income: f64) -> Result<f64, MetricError> {
    if annual_income == 0.0 {
        return Err(MetricError::DivisionUndefined {
            denominator: "annual income",
        });
    }
    Ok(monthly_payment * 12.0 / annual_income * 100.0)
}

/// One point per favorable metric: price-to-rent below 15, ROI above 10%,
/// net yield above 5%, DTI below 36%.
pub fn decision_score(price_to_rent: f64, roi_pct: f64, net_yield_pct: f64, dti_pct: f64) -> u8 {
    let mut score = 0;
    if price_to_rent < FAVORABLE_PRICE_TO_RENT_MAX {
        score += 1;
    }
    if roi_pct > FAVORABLE_ROI_MIN_PCT {
        score += 1;
    }
    if net_yield_pct > FAVORABLE_NET_YIELD_MIN_PCT {
        score += 1;
    }
    if dti_pct < FAVORABLE_DTI_MAX_PCT {
        score += 1;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn monthly_payment_matches_reference_loan() {
        // 300k purchase at 20% down: 240k loan, 3.5% over 30 years.
        let payment = monthly_payment(240_000.0, 3.5, 30);
        assert_approx_tol(payment, 1077.71, 0.05);
    }

    #[test]
    fn monthly_payment_zero_rate_amortizes_linearly() {
        let payment = monthly_payment(240_000.0, 0.0, 30);
        assert_approx(payment, 240_000.0 / 360.0);
    }

    #[test]
    fn monthly_payment_zero_loan_is_zero() {
        assert_approx(monthly_payment(0.0, 3.5, 30), 0.0);
        assert_approx(monthly_payment(0.0, 0.0, 30), 0.0);
    }

    #[test]
    fn annual_property_expenses_sums_both_rates() {
        assert_approx(annual_property_expenses(300_000.0, 1.0, 1.0), 6_000.0);
        assert_approx(annual_property_expenses(300_000.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn price_to_rent_ratio_divides_price_by_rent() {
        assert_approx(
            price_to_rent_ratio(300_000.0, 15_000.0).expect("rent is non-zero"),
            20.0,
        );
    }

    #[test]
    fn price_to_rent_ratio_rejects_zero_rent() {
        let err = price_to_rent_ratio(300_000.0, 0.0).expect_err("zero rent must fail");
        assert_eq!(
            err,
            MetricError::DivisionUndefined {
                denominator: "annual rent"
            }
        );
    }

    #[test]
    fn net_rental_yield_is_net_income_over_price() {
        assert_approx(net_rental_yield(15_000.0, 6_000.0, 300_000.0), 3.0);
    }

    #[test]
    fn cash_on_cash_return_uses_down_payment_as_basis() {
        let roi = cash_on_cash_return(15_000.0, 6_000.0, 60_000.0).expect("non-zero down payment");
        assert_approx(roi, 15.0);
    }

    #[test]
    fn cash_on_cash_return_rejects_zero_down_payment() {
        let err = cash_on_cash_return(15_000.0, 6_000.0, 0.0).expect_err("zero down must fail");
        assert_eq!(
            err,
            MetricError::DivisionUndefined {
                denominator: "down payment"
            }
        );
    }

    #[test]
    fn debt_to_income_ratio_annualizes_the_payment() {
        let dti = debt_to_income_ratio(1_000.0, 60_000.0).expect("non-zero income");
        assert_approx(dti, 20.0);
    }

    #[test]
    fn debt_to_income_ratio_rejects_zero_income() {
        let err = debt_to_income_ratio(1_000.0, 0.0).expect_err("zero income must fail");
        assert_eq!(
            err,
            MetricError::DivisionUndefined {
                denominator: "annual income"
            }
        );
    }

    #[test]
    fn decision_score_counts_each_favorable_metric() {
        assert_eq!(decision_score(10.0, 12.0, 6.0, 30.0), 4);
        assert_eq!(decision_score(20.0, 5.0, 2.0, 50.0), 0);
        assert_eq!(decision_score(10.0, 5.0, 6.0, 50.0), 2);
    }

    #[test]
    fn decision_score_thresholds_are_strict() {
        // Sitting exactly on a threshold earns no point.
        assert_eq!(decision_score(15.0, 10.0, 5.0, 36.0), 0);
        assert_eq!(decision_score(14.999, 10.001, 5.001, 35.999), 4);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_positive_rate_loans_pay_more_than_principal(
            loan in 1_000u32..2_000_000,
            rate_bp in 1u32..2_000,
            term in 1u32..41
        ) {
            let loan = loan as f64;
            let rate_pct = rate_bp as f64 / 100.0;
            let payment = monthly_payment(loan, rate_pct, term);
            let months = f64::from(term * 12);
            prop_assert!(payment * months > loan);
        }

        #[test]
        fn prop_payment_strictly_decreases_with_longer_terms(
            loan in 1_000u32..2_000_000,
            rate_bp in 1u32..2_000,
            term in 1u32..40
        ) {
            let loan = loan as f64;
            let rate_pct = rate_bp as f64 / 100.0;
            let shorter = monthly_payment(loan, rate_pct, term);
            let longer = monthly_payment(loan, rate_pct, term + 1);
            prop_assert!(longer < shorter);
        }

        #[test]
        fn prop_decision_score_is_bounded_and_monotone(
            p2r_tenths in 0i32..400,
            roi_tenths in -200i32..400,
            yield_tenths in -200i32..200,
            dti_tenths in 0i32..1_000
        ) {
            let p2r = p2r_tenths as f64 / 10.0;
            let roi = roi_tenths as f64 / 10.0;
            let net_yield = yield_tenths as f64 / 10.0;
            let dti = dti_tenths as f64 / 10.0;

            let base = decision_score(p2r, roi, net_yield, dti);
            prop_assert!(base <= 4);

            // Moving any single metric to its favorable side never lowers the score.
            prop_assert!(decision_score(1.0, roi, net_yield, dti) >= base);
            prop_assert!(decision_score(p2r, 99.0, net_yield, dti) >= base);
            prop_assert!(decision_score(p2r, roi, 99.0, dti) >= base);
            prop_assert!(decision_score(p2r, roi, net_yield, 1.0) >= base);
        }
    }
}
