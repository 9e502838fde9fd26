use tracing::debug;

use super::amortization::{monthly_rate, months_elapsed, remaining_balance, standard_payment};
use super::rental::rental_year;
use super::sale::{sale_year, sell_year0_total};
use super::types::{BetterOption, ProjectionInputs, ProjectionResult, YearRecord};

/// Running totals carried from one projection year to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub cumulative_cash_flow: f64,
    pub cumulative_invested: f64,
    pub cumulative_opportunity: f64,
    pub year0_baseline: f64,
}

impl Accumulator {
    /// Folds one year's net cash flow into the running totals.
    ///
    /// Prior totals compound from year 1 on. Year 0 only carries up-front
    /// costs, such as preparing the property to rent.
    pub fn advance(self, year: u32, year_cash_flow: f64, growth: f64) -> Self {
        let growth = if year == 0 { 1.0 } else { growth };
        Self {
            cumulative_cash_flow: self.cumulative_cash_flow + year_cash_flow,
            cumulative_invested: self.cumulative_invested * growth + year_cash_flow,
            cumulative_opportunity: self.cumulative_opportunity * growth + year_cash_flow.abs(),
            year0_baseline: self.year0_baseline,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LoanSchedule {
    principal: f64,
    monthly_rate: f64,
    total_months: u32,
    months_elapsed: u32,
}

impl LoanSchedule {
    fn from_inputs(inputs: &ProjectionInputs) -> Self {
        Self {
            principal: inputs.original_loan_amount,
            monthly_rate: monthly_rate(inputs.annual_interest_rate_percent),
            total_months: inputs.mortgage_term_years * 12,
            months_elapsed: months_elapsed(inputs.loan_origination_date, inputs.valuation_date),
        }
    }

    fn balance_at_year(self, year: u32) -> f64 {
        remaining_balance(
            self.principal,
            self.monthly_rate,
            self.total_months,
            self.months_elapsed + year * 12,
        )
    }
}

/// Monthly principal and interest implied by the loan terms.
pub fn monthly_payment(inputs: &ProjectionInputs) -> f64 {
    standard_payment(
        inputs.original_loan_amount,
        inputs.annual_interest_rate_percent,
        inputs.mortgage_term_years,
    )
}

pub fn home_value_at_year(inputs: &ProjectionInputs, year: u32) -> f64 {
    if year == 0 {
        return inputs.current_home_value;
    }
    inputs.current_home_value * (1.0 + inputs.home_appreciation_percent / 100.0).powi(year as i32)
}

/// Projects keep-renting versus sell-now for years `0..=years_to_hold`.
pub fn run_projection(inputs: &ProjectionInputs) -> ProjectionResult {
    let loan = LoanSchedule::from_inputs(inputs);
    let monthly_pi = monthly_payment(inputs);
    let growth = inputs.investment_growth();

    let mut years = Vec::with_capacity(inputs.years_to_hold as usize + 1);
    let mut acc = Accumulator::default();
    let mut previous_balance = loan.balance_at_year(0);

    for year in 0..=inputs.years_to_hold {
        let (record, next) = project_year(
            inputs,
            YearContext {
                loan,
                monthly_pi,
                growth,
                previous_balance,
            },
            year,
            acc,
        );
        previous_balance = record.loan_balance;
        acc = next;
        years.push(record);
    }

    debug!(
        years = years.len(),
        months_elapsed = loan.months_elapsed,
        monthly_pi,
        "projection complete"
    );
    ProjectionResult { years }
}

#[derive(Debug, Clone, Copy)]
struct YearContext {
    loan: LoanSchedule,
    monthly_pi: f64,
    growth: f64,
    previous_balance: f64,
}

fn project_year(
    inputs: &ProjectionInputs,
    ctx: YearContext,
    year: u32,
    acc: Accumulator,
) -> (YearRecord, Accumulator) {
    let home_value = home_value_at_year(inputs, year);
    let loan_balance = ctx.loan.balance_at_year(year);

    let rental = rental_year(inputs, ctx.monthly_pi, year);
    let year_cash_flow = if year == 0 {
        -inputs.costs_to_rent
    } else {
        rental.net_cash_flow
    };
    let principal_paid = if year == 0 {
        0.0
    } else {
        ctx.previous_balance - loan_balance
    };

    let mut acc = acc.advance(year, year_cash_flow, ctx.growth);

    let sale = sale_year(inputs, year, home_value, loan_balance);
    if year == 0 {
        acc.year0_baseline = sale.net_after_tax_proceeds;
    }
    let invested_value = if year == 0 { 0.0 } else { sale.invested_value };

    let rental_net_worth = sale.net_after_tax_proceeds + acc.cumulative_invested;
    let simple_rental_net_worth = if year == 0 && sale.net_after_tax_proceeds > 0.0 {
        0.0
    } else {
        sale.net_after_tax_proceeds + acc.cumulative_cash_flow
    };
    let better_option = if rental_net_worth > invested_value {
        BetterOption::Rent
    } else {
        BetterOption::Sell
    };

    let record = YearRecord {
        year,
        home_value,
        loan_balance,
        equity: home_value - loan_balance,
        annual_rent: rental.annual_rent,
        annual_expenses: rental.annual_expenses,
        gross_rental_profit: rental.gross_profit,
        rental_tax: rental.rental_tax,
        net_rental_cash_flow: rental.net_cash_flow,
        cumulative_rental_cash_flow: acc.cumulative_cash_flow,
        cumulative_invested_cash_flow: acc.cumulative_invested,
        principal_paid_this_year: principal_paid,
        opportunity_cost_this_year: year_cash_flow.abs(),
        cumulative_opportunity_cost: acc.cumulative_opportunity,
        rental_net_worth,
        simple_rental_net_worth,
        sale_price: sale.sale_price,
        selling_costs: sale.selling_costs,
        net_sale_proceeds: sale.net_sale_proceeds,
        capital_gain: sale.capital_gain,
        capital_gains_tax_owed: sale.capital_gains_tax,
        net_after_tax_proceeds: sale.net_after_tax_proceeds,
        invested_value,
        sell_year0_total: sell_year0_total(acc.year0_baseline, ctx.growth, year),
        better_option,
    };
    (record, acc)
}
