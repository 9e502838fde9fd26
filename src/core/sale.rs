use super::types::{ExclusionPolicy, ProjectionInputs};

/// Last projection year in which the primary-residence exclusion applies.
pub const EXCLUSION_WINDOW_YEARS: u32 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaleYear {
    pub sale_price: f64,
    pub selling_costs: f64,
    pub net_sale_proceeds: f64,
    pub capital_gain: f64,
    pub capital_gains_tax: f64,
    pub net_after_tax_proceeds: f64,
    pub invested_value: f64,
}

/// Outcome of selling at the start of `year` and investing the proceeds until
/// the end of the holding horizon.
pub fn sale_year(
    inputs: &ProjectionInputs,
    year: u32,
    home_value: f64,
    loan_balance: f64,
) -> SaleYear {
    let sale_price = home_value;
    let selling_costs = sale_price * inputs.selling_fees_percent / 100.0 + inputs.costs_to_sell;
    let net_sale_proceeds = sale_price - loan_balance - selling_costs;
    let capital_gain = sale_price - inputs.purchase_price;
    let capital_gains_tax = capital_gains_tax(inputs, year, capital_gain, net_sale_proceeds);
    let net_after_tax_proceeds = net_sale_proceeds - capital_gains_tax;

    let years_invested = inputs.years_to_hold.saturating_sub(year);
    let invested_value = grow_if_positive(
        net_after_tax_proceeds,
        inputs.investment_growth(),
        years_invested,
    );

    SaleYear {
        sale_price,
        selling_costs,
        net_sale_proceeds,
        capital_gain,
        capital_gains_tax,
        net_after_tax_proceeds,
        invested_value,
    }
}

pub fn capital_gains_tax(
    inputs: &ProjectionInputs,
    year: u32,
    capital_gain: f64,
    net_sale_proceeds: f64,
) -> f64 {
    if capital_gain <= 0.0 || net_sale_proceeds < 0.0 {
        return 0.0;
    }

    let rate = inputs.capital_gains_tax_percent / 100.0;
    if inputs.is_primary_residence && year <= EXCLUSION_WINDOW_YEARS {
        return match inputs.exclusion_policy {
            ExclusionPolicy::FullExemption => 0.0,
            ExclusionPolicy::Threshold { amount } => (capital_gain - amount).max(0.0) * rate,
        };
    }
    capital_gain * rate
}

/// Value of selling today and compounding the proceeds for `year` years.
pub fn sell_year0_total(baseline: f64, growth: f64, year: u32) -> f64 {
    grow_if_positive(baseline, growth, year)
}

// Negative balances are carried flat: no growth, no interest.
fn grow_if_positive(amount: f64, growth: f64, years: u32) -> f64 {
    if amount > 0.0 {
        amount * growth.powi(years as i32)
    } else {
        amount
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

    fn sale_inputs() -> ProjectionInputs {
        let mut inputs = baseline_inputs();
        inputs.purchase_price = 300_000.0;
        inputs.selling_fees_percent = 6.0;
        inputs.capital_gains_tax_percent = 15.0;
        inputs.investment_return_percent = 10.0;
        inputs.years_to_hold = 2;
        inputs
    }

    #[test]
    fn sale_proceeds_match_hand_calculation() {
        let inputs = sale_inputs();
        // 400k sale, 24k fees, 200k loan -> 176k net; 100k gain taxed 15%.
        let sale = sale_year(&inputs, 1, 400_000.0, 200_000.0);
        assert_approx(sale.sale_price, 400_000.0);
        assert_approx(sale.selling_costs, 24_000.0);
        assert_approx(sale.net_sale_proceeds, 176_000.0);
        assert_approx(sale.capital_gain, 100_000.0);
        assert_approx(sale.capital_gains_tax, 15_000.0);
        assert_approx(sale.net_after_tax_proceeds, 161_000.0);
        // One year of 10% growth to the horizon.
        assert_approx(sale.invested_value, 177_100.0);
    }

    #[test]
    fn flat_costs_to_sell_are_added_to_selling_costs() {
        let mut inputs = sale_inputs();
        inputs.costs_to_sell = 10_000.0;
        let sale = sale_year(&inputs, 1, 400_000.0, 200_000.0);
        assert_approx(sale.selling_costs, 34_000.0);
        assert_approx(sale.net_sale_proceeds, 166_000.0);
    }

    #[test]
    fn underwater_sale_owes_no_capital_gains_tax() {
        let inputs = sale_inputs();
        let sale = sale_year(&inputs, 2, 400_000.0, 390_000.0);
        assert!(sale.capital_gain > 0.0);
        assert!(sale.net_sale_proceeds < 0.0);
        assert_eq!(sale.capital_gains_tax, 0.0);
    }

    #[test]
    fn losses_are_carried_flat_instead_of_compounded() {
        let inputs = sale_inputs();
        let sale = sale_year(&inputs, 0, 250_000.0, 260_000.0);
        assert!(sale.net_after_tax_proceeds < 0.0);
        assert_approx(sale.invested_value, sale.net_after_tax_proceeds);
    }

    #[test]
    fn no_gain_means_no_tax() {
        let mut inputs = sale_inputs();
        inputs.is_primary_residence = true;
        for year in 0..10 {
            assert_eq!(capital_gains_tax(&inputs, year, 0.0, 50_000.0), 0.0);
            assert_eq!(capital_gains_tax(&inputs, year, -20_000.0, 50_000.0), 0.0);
        }
    }

    #[test]
    fn primary_residence_full_exemption_covers_first_four_years() {
        let mut inputs = sale_inputs();
        inputs.is_primary_residence = true;
        for year in 0..=3 {
            assert_eq!(capital_gains_tax(&inputs, year, 100_000.0, 50_000.0), 0.0);
        }
        assert_approx(capital_gains_tax(&inputs, 4, 100_000.0, 50_000.0), 15_000.0);
    }

    #[test]
    fn primary_residence_threshold_taxes_gain_above_amount() {
        let mut inputs = sale_inputs();
        inputs.is_primary_residence = true;
        inputs.exclusion_policy = ExclusionPolicy::Threshold { amount: 500_000.0 };
        assert_eq!(capital_gains_tax(&inputs, 2, 400_000.0, 50_000.0), 0.0);
        assert_approx(capital_gains_tax(&inputs, 2, 600_000.0, 50_000.0), 15_000.0);
        // Outside the window the whole gain is taxed.
        assert_approx(capital_gains_tax(&inputs, 4, 600_000.0, 50_000.0), 90_000.0);
    }

    #[test]
    fn sell_year0_total_compounds_only_positive_baselines() {
        assert_approx(sell_year0_total(100_000.0, 1.1, 2), 121_000.0);
        assert_approx(sell_year0_total(-40_000.0, 1.1, 5), -40_000.0);
        assert_approx(sell_year0_total(100_000.0, 1.1, 0), 100_000.0);
    }
}
