use chrono::{Datelike, NaiveDate};

/// Outstanding principal after `months_paid` scheduled payments.
pub fn remaining_balance(
    principal: f64,
    monthly_rate: f64,
    total_months: u32,
    months_paid: u32,
) -> f64 {
    let balance = if monthly_rate == 0.0 {
        principal - (principal / total_months as f64) * months_paid as f64
    } else {
        let factor = (1.0 + monthly_rate).powi(total_months as i32);
        let paid_factor = (1.0 + monthly_rate).powi(months_paid as i32);
        principal * (factor - paid_factor) / (factor - 1.0)
    };
    balance.max(0.0)
}

/// Whole payments made between loan origination and `as_of`.
///
/// Counts calendar months and drops one for the gap before the first payment
/// is due. Day of month is ignored.
pub fn months_elapsed(origination: NaiveDate, as_of: NaiveDate) -> u32 {
    let year_diff = as_of.year() - origination.year();
    let month_diff = as_of.month() as i32 - origination.month() as i32;
    (year_diff * 12 + month_diff - 1).max(0) as u32
}

/// Fixed monthly principal-and-interest payment for a fully amortizing loan.
pub fn standard_payment(principal: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let months = years * 12;
    if annual_rate_percent == 0.0 {
        return principal / months as f64;
    }
    let r = monthly_rate(annual_rate_percent);
    let factor = (1.0 + r).powi(months as i32);
    principal * r * factor / (factor - 1.0)
}

pub(crate) fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}
