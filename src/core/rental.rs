use super::types::ProjectionInputs;

/// Share of the purchase price treated as depreciable building value.
const BUILDING_SHARE: f64 = 0.8;
/// Straight-line recovery period for residential rental property, in years.
const RESIDENTIAL_RECOVERY_YEARS: f64 = 27.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RentalYear {
    pub annual_rent: f64,
    pub annual_expenses: f64,
    pub gross_profit: f64,
    pub rental_tax: f64,
    pub net_cash_flow: f64,
}

/// Rental cash flow for `year`, where year 0 is the decision point and reports
/// nothing.
pub fn rental_year(inputs: &ProjectionInputs, monthly_pi: f64, year: u32) -> RentalYear {
    if year == 0 {
        return RentalYear::default();
    }

    let monthly_rent = monthly_rent_for_year(inputs, year);
    let annual_rent = monthly_rent * 12.0;
    let mgmt_fee = annual_rent * inputs.property_mgmt_fee_percent / 100.0;
    let ownership_cost = annual_ownership_cost(inputs, monthly_pi);

    let gross_profit = annual_rent - mgmt_fee - ownership_cost;
    let rental_tax = rental_income_tax(inputs, gross_profit);

    RentalYear {
        annual_rent,
        annual_expenses: ownership_cost + mgmt_fee,
        gross_profit,
        rental_tax,
        net_cash_flow: gross_profit - rental_tax,
    }
}

/// Monthly rent charged during `year`. Increases start in year 2.
pub fn monthly_rent_for_year(inputs: &ProjectionInputs, year: u32) -> f64 {
    let exponent = year.saturating_sub(1) as i32;
    inputs.monthly_rental_price * (1.0 + inputs.annual_rent_increase_percent / 100.0).powi(exponent)
}

/// PITI plus HOA and maintenance, held flat across the projection.
fn annual_ownership_cost(inputs: &ProjectionInputs, monthly_pi: f64) -> f64 {
    (monthly_pi
        + inputs.monthly_taxes
        + inputs.monthly_insurance
        + inputs.monthly_hoa
        + inputs.monthly_maintenance)
        * 12.0
}

pub fn annual_depreciation(purchase_price: f64) -> f64 {
    purchase_price * BUILDING_SHARE / RESIDENTIAL_RECOVERY_YEARS
}

// Losses never produce a tax credit.
fn rental_income_tax(inputs: &ProjectionInputs, gross_profit: f64) -> f64 {
    let rate = inputs.rental_tax_rate_percent / 100.0;
    if inputs.deduct_depreciation {
        let taxable = gross_profit - annual_depreciation(inputs.purchase_price);
        return (taxable * rate).max(0.0);
    }
    if gross_profit > 0.0 {
        gross_profit * rate
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::baseline_inputs;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn rental_inputs() -> ProjectionInputs {
        let mut inputs = baseline_inputs();
        inputs.monthly_rental_price = 3_000.0;
        inputs.annual_rent_increase_percent = 10.0;
        inputs.property_mgmt_fee_percent = 10.0;
        inputs.monthly_taxes = 300.0;
        inputs.monthly_insurance = 100.0;
        inputs.monthly_hoa = 50.0;
        inputs.monthly_maintenance = 50.0;
        inputs.rental_tax_rate_percent = 25.0;
        inputs
    }

    #[test]
    fn year_zero_reports_no_cash_flow() {
        let inputs = rental_inputs();
        assert_eq!(rental_year(&inputs, 1_500.0, 0), RentalYear::default());
    }

    #[test]
    fn rent_growth_is_deferred_one_year() {
        let inputs = rental_inputs();
        assert_approx(monthly_rent_for_year(&inputs, 0), 3_000.0);
        assert_approx(monthly_rent_for_year(&inputs, 1), 3_000.0);
        assert_approx(monthly_rent_for_year(&inputs, 2), 3_300.0);
        assert_approx(monthly_rent_for_year(&inputs, 3), 3_630.0);
    }

    #[test]
    fn profitable_year_matches_hand_calculation() {
        let inputs = rental_inputs();
        // Rent 36,000; mgmt 3,600; ownership (1,000 + 500) * 12 = 18,000.
        // Profit 14,400; tax 25% = 3,600; net 10,800.
        let year = rental_year(&inputs, 1_000.0, 1);
        assert_approx(year.annual_rent, 36_000.0);
        assert_approx(year.annual_expenses, 21_600.0);
        assert_approx(year.gross_profit, 14_400.0);
        assert_approx(year.rental_tax, 3_600.0);
        assert_approx(year.net_cash_flow, 10_800.0);
    }

    #[test]
    fn losses_are_not_tax_deductible() {
        let mut inputs = rental_inputs();
        inputs.monthly_rental_price = 1_000.0;
        let year = rental_year(&inputs, 2_000.0, 1);
        assert!(year.gross_profit < 0.0);
        assert_eq!(year.rental_tax, 0.0);
        assert_approx(year.net_cash_flow, year.gross_profit);
    }

    #[test]
    fn expenses_are_not_inflated() {
        let inputs = rental_inputs();
        let first = rental_year(&inputs, 1_000.0, 1);
        let fifth = rental_year(&inputs, 1_000.0, 5);
        let first_ownership = first.annual_expenses - first.annual_rent * 0.10;
        let fifth_ownership = fifth.annual_expenses - fifth.annual_rent * 0.10;
        assert_approx(first_ownership, fifth_ownership);
    }

    #[test]
    fn depreciation_reduces_taxable_rental_income() {
        let mut inputs = rental_inputs();
        inputs.purchase_price = 275_000.0;
        inputs.deduct_depreciation = true;
        // 275,000 * 0.8 / 27.5 = 8,000 deducted from 14,400 profit.
        let year = rental_year(&inputs, 1_000.0, 1);
        assert_approx(annual_depreciation(275_000.0), 8_000.0);
        assert_approx(year.rental_tax, 6_400.0 * 0.25);
        assert_approx(year.net_cash_flow, 14_400.0 - 1_600.0);
    }

    #[test]
    fn depreciation_never_creates_negative_tax() {
        let mut inputs = rental_inputs();
        inputs.purchase_price = 1_000_000.0;
        inputs.deduct_depreciation = true;
        let year = rental_year(&inputs, 1_000.0, 1);
        assert_eq!(year.rental_tax, 0.0);
    }
}
