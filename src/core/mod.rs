mod amortization;
mod engine;
mod rental;
mod sale;
mod summary;
mod types;

pub use amortization::{months_elapsed, remaining_balance, standard_payment};
pub use engine::{Accumulator, home_value_at_year, monthly_payment, run_projection};
pub use rental::{RentalYear, annual_depreciation, monthly_rent_for_year, rental_year};
pub use sale::{EXCLUSION_WINDOW_YEARS, SaleYear, capital_gains_tax, sale_year, sell_year0_total};
pub use summary::{crossover_year, summarize};
pub use types::{
    BetterOption, DEFAULT_EXCLUSION_THRESHOLD, ExclusionPolicy, ProjectionInputs,
    ProjectionResult, ProjectionSummary, YearRecord,
};
