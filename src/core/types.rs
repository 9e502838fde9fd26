use chrono::NaiveDate;
use serde::Serialize;

/// Default gain threshold for [`ExclusionPolicy::Threshold`].
pub const DEFAULT_EXCLUSION_THRESHOLD: f64 = 500_000.0;

/// How capital gains are treated when a primary residence is sold within the
/// exclusion window (years 0 through 3 of the projection).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum ExclusionPolicy {
    #[default]
    FullExemption,
    Threshold { amount: f64 },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BetterOption {
    Rent,
    #[default]
    Sell,
}

/// A complete, already-validated snapshot of every projection input.
///
/// Percentages are stored as entered (6.5 means 6.5%).
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInputs {
    pub purchase_price: f64,
    pub loan_origination_date: NaiveDate,
    pub valuation_date: NaiveDate,
    pub original_loan_amount: f64,
    pub annual_interest_rate_percent: f64,
    pub mortgage_term_years: u32,
    pub current_home_value: f64,
    pub monthly_hoa: f64,
    pub monthly_taxes: f64,
    pub monthly_insurance: f64,
    pub monthly_maintenance: f64,
    pub monthly_rental_price: f64,
    pub annual_rent_increase_percent: f64,
    pub property_mgmt_fee_percent: f64,
    pub rental_tax_rate_percent: f64,
    pub deduct_depreciation: bool,
    pub home_appreciation_percent: f64,
    pub selling_fees_percent: f64,
    pub costs_to_sell: f64,
    pub costs_to_rent: f64,
    pub capital_gains_tax_percent: f64,
    pub investment_return_percent: f64,
    pub years_to_hold: u32,
    pub is_primary_residence: bool,
    pub exclusion_policy: ExclusionPolicy,
}

impl ProjectionInputs {
    pub(crate) fn investment_growth(&self) -> f64 {
        1.0 + self.investment_return_percent / 100.0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub home_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    pub annual_rent: f64,
    pub annual_expenses: f64,
    pub gross_rental_profit: f64,
    pub rental_tax: f64,
    pub net_rental_cash_flow: f64,
    pub cumulative_rental_cash_flow: f64,
    pub cumulative_invested_cash_flow: f64,
    pub principal_paid_this_year: f64,
    pub opportunity_cost_this_year: f64,
    pub cumulative_opportunity_cost: f64,
    pub rental_net_worth: f64,
    pub simple_rental_net_worth: f64,
    pub sale_price: f64,
    pub selling_costs: f64,
    pub net_sale_proceeds: f64,
    pub capital_gain: f64,
    pub capital_gains_tax_owed: f64,
    pub net_after_tax_proceeds: f64,
    pub invested_value: f64,
    pub sell_year0_total: f64,
    pub better_option: BetterOption,
}

impl YearRecord {
    /// Gap between the keep-renting trajectory and the sell-now trajectory.
    pub fn rent_minus_sell(&self) -> f64 {
        self.simple_rental_net_worth - self.sell_year0_total
    }
}

/// Year records for years `0..=years_to_hold`, indexed by year.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectionResult {
    pub years: Vec<YearRecord>,
}

impl ProjectionResult {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn final_year(&self) -> Option<&YearRecord> {
        self.years.last()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub final_year: u32,
    pub rent_net_worth: f64,
    pub sell_net_worth: f64,
    pub difference: f64,
    pub better_option: BetterOption,
    pub crossover_year: Option<u32>,
}
