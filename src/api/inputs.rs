use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::{DEFAULT_EXCLUSION_THRESHOLD, ExclusionPolicy, ProjectionInputs};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must be a YYYY-MM-DD date, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("--loan-origination-date {origination} is after the valuation date {valuation}")]
    OriginationInFuture {
        origination: NaiveDate,
        valuation: NaiveDate,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("failed to encode share query: {0}")]
    ShareQuery(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum CliExclusionPolicy {
    FullExemption,
    Threshold,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ApiExclusionPolicy {
    #[serde(alias = "fullExemption", alias = "full_exemption", alias = "full")]
    FullExemption,
    Threshold,
}

impl From<ApiExclusionPolicy> for CliExclusionPolicy {
    fn from(value: ApiExclusionPolicy) -> Self {
        match value {
            ApiExclusionPolicy::FullExemption => CliExclusionPolicy::FullExemption,
            ApiExclusionPolicy::Threshold => CliExclusionPolicy::Threshold,
        }
    }
}

impl From<CliExclusionPolicy> for ApiExclusionPolicy {
    fn from(value: CliExclusionPolicy) -> Self {
        match value {
            CliExclusionPolicy::FullExemption => ApiExclusionPolicy::FullExemption,
            CliExclusionPolicy::Threshold => ApiExclusionPolicy::Threshold,
        }
    }
}

/// Flat camelCase key/value form of the inputs, shared by the query string,
/// the JSON body and share links. Absent keys keep their defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ProjectPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_origination_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_loan_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortgage_term_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_home_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_hoa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_taxes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_insurance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_maintenance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rental_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rent_increase: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_mgmt_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_tax_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduct_depreciation: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_appreciation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs_to_sell: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costs_to_rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_gains_tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_return: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_to_hold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary_residence: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_policy: Option<ApiExclusionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_threshold: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rent-or-sell",
    about = "Year-by-year projection of keeping a rental property versus selling it today"
)]
pub(crate) struct Cli {
    #[arg(long, default_value_t = 400_000.0)]
    pub purchase_price: f64,
    #[arg(long, default_value = "2022-01-01", help = "Loan origination date (YYYY-MM-DD)")]
    pub loan_origination_date: String,
    #[arg(long, help = "Date the projection is valued at (YYYY-MM-DD); defaults to today")]
    pub valuation_date: Option<String>,
    #[arg(long, default_value_t = 320_000.0)]
    pub original_loan_amount: f64,
    #[arg(
        long,
        default_value_t = 6.5,
        help = "Annual mortgage interest rate in percent"
    )]
    pub interest_rate: f64,
    #[arg(long, default_value_t = 30)]
    pub mortgage_term_years: u32,
    #[arg(long, default_value_t = 450_000.0)]
    pub current_home_value: f64,
    #[arg(long, default_value_t = 150.0)]
    pub monthly_hoa: f64,
    #[arg(long, default_value_t = 350.0)]
    pub monthly_taxes: f64,
    #[arg(long, default_value_t = 150.0)]
    pub monthly_insurance: f64,
    #[arg(long, default_value_t = 200.0)]
    pub monthly_maintenance: f64,
    #[arg(long, default_value_t = 2_800.0)]
    pub monthly_rental_price: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual rent increase in percent, applied from year 2"
    )]
    pub annual_rent_increase: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Property management fee as percent of rent"
    )]
    pub property_mgmt_fee: f64,
    #[arg(
        long,
        default_value_t = 22.0,
        help = "Income tax rate on rental profit in percent"
    )]
    pub rental_tax_rate: f64,
    #[arg(
        long,
        default_value_t = false,
        action = ArgAction::Set,
        help = "Deduct straight-line depreciation from taxable rental income"
    )]
    pub deduct_depreciation: bool,
    #[arg(
        long,
        default_value_t = 3.0,
        allow_negative_numbers = true,
        help = "Annual home appreciation in percent"
    )]
    pub home_appreciation: f64,
    #[arg(long, default_value_t = 6.0, help = "Selling fees in percent of sale price")]
    pub selling_fees: f64,
    #[arg(long, default_value_t = 0.0, help = "Flat closing costs paid on sale")]
    pub costs_to_sell: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "One-time cost to prepare the property for renting"
    )]
    pub costs_to_rent: f64,
    #[arg(long, default_value_t = 15.0, help = "Capital gains tax rate in percent")]
    pub capital_gains_tax: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Annual investment return in percent"
    )]
    pub investment_return: f64,
    #[arg(long, default_value_t = 10)]
    pub years_to_hold: u32,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub is_primary_residence: bool,
    #[arg(long, value_enum, default_value_t = CliExclusionPolicy::FullExemption)]
    pub exclusion_policy: CliExclusionPolicy,
    #[arg(
        long,
        default_value_t = DEFAULT_EXCLUSION_THRESHOLD,
        help = "Gain excluded on an early primary-residence sale when --exclusion-policy=threshold"
    )]
    pub exclusion_threshold: f64,
}

pub(crate) fn default_cli_for_api() -> Cli {
    Cli {
        purchase_price: 400_000.0,
        loan_origination_date: "2022-01-01".to_string(),
        valuation_date: None,
        original_loan_amount: 320_000.0,
        interest_rate: 6.5,
        mortgage_term_years: 30,
        current_home_value: 450_000.0,
        monthly_hoa: 150.0,
        monthly_taxes: 350.0,
        monthly_insurance: 150.0,
        monthly_maintenance: 200.0,
        monthly_rental_price: 2_800.0,
        annual_rent_increase: 3.0,
        property_mgmt_fee: 10.0,
        rental_tax_rate: 22.0,
        deduct_depreciation: false,
        home_appreciation: 3.0,
        selling_fees: 6.0,
        costs_to_sell: 0.0,
        costs_to_rent: 0.0,
        capital_gains_tax: 15.0,
        investment_return: 7.0,
        years_to_hold: 10,
        is_primary_residence: true,
        exclusion_policy: CliExclusionPolicy::FullExemption,
        exclusion_threshold: DEFAULT_EXCLUSION_THRESHOLD,
    }
}

/// Turns raw inputs into a projection snapshot, clamping each field into its
/// supported range. `today` is used when no valuation date was given.
pub(crate) fn build_inputs(cli: Cli, today: NaiveDate) -> Result<ProjectionInputs, InputError> {
    let loan_origination_date = parse_date("--loan-origination-date", &cli.loan_origination_date)?;
    let valuation_date = match cli.valuation_date.as_deref() {
        Some(raw) => parse_date("--valuation-date", raw)?,
        None => today,
    };
    if loan_origination_date > valuation_date {
        return Err(InputError::OriginationInFuture {
            origination: loan_origination_date,
            valuation: valuation_date,
        });
    }

    let exclusion_policy = match cli.exclusion_policy {
        CliExclusionPolicy::FullExemption => ExclusionPolicy::FullExemption,
        CliExclusionPolicy::Threshold => ExclusionPolicy::Threshold {
            amount: at_least("--exclusion-threshold", cli.exclusion_threshold, 0.0)?,
        },
    };

    Ok(ProjectionInputs {
        purchase_price: at_least("--purchase-price", cli.purchase_price, 0.0)?,
        loan_origination_date,
        valuation_date,
        original_loan_amount: at_least("--original-loan-amount", cli.original_loan_amount, 0.0)?,
        annual_interest_rate_percent: clamp_field("--interest-rate", cli.interest_rate, 0.0, 30.0)?,
        mortgage_term_years: clamp_years("--mortgage-term-years", cli.mortgage_term_years, 1, 50),
        current_home_value: at_least("--current-home-value", cli.current_home_value, 0.0)?,
        monthly_hoa: at_least("--monthly-hoa", cli.monthly_hoa, 0.0)?,
        monthly_taxes: at_least("--monthly-taxes", cli.monthly_taxes, 0.0)?,
        monthly_insurance: at_least("--monthly-insurance", cli.monthly_insurance, 0.0)?,
        monthly_maintenance: at_least("--monthly-maintenance", cli.monthly_maintenance, 0.0)?,
        monthly_rental_price: at_least("--monthly-rental-price", cli.monthly_rental_price, 0.0)?,
        annual_rent_increase_percent: clamp_field(
            "--annual-rent-increase",
            cli.annual_rent_increase,
            0.0,
            20.0,
        )?,
        property_mgmt_fee_percent: clamp_field(
            "--property-mgmt-fee",
            cli.property_mgmt_fee,
            0.0,
            100.0,
        )?,
        rental_tax_rate_percent: clamp_field("--rental-tax-rate", cli.rental_tax_rate, 0.0, 100.0)?,
        deduct_depreciation: cli.deduct_depreciation,
        home_appreciation_percent: clamp_field(
            "--home-appreciation",
            cli.home_appreciation,
            -20.0,
            30.0,
        )?,
        selling_fees_percent: clamp_field("--selling-fees", cli.selling_fees, 0.0, 100.0)?,
        costs_to_sell: at_least("--costs-to-sell", cli.costs_to_sell, 0.0)?,
        costs_to_rent: at_least("--costs-to-rent", cli.costs_to_rent, 0.0)?,
        capital_gains_tax_percent: clamp_field(
            "--capital-gains-tax",
            cli.capital_gains_tax,
            0.0,
            100.0,
        )?,
        investment_return_percent: clamp_field(
            "--investment-return",
            cli.investment_return,
            -50.0,
            50.0,
        )?,
        years_to_hold: clamp_years("--years-to-hold", cli.years_to_hold, 1, 30),
        is_primary_residence: cli.is_primary_residence,
        exclusion_policy,
    })
}

pub(crate) fn apply_payload(cli: &mut Cli, payload: ProjectPayload) {
    if let Some(v) = payload.purchase_price {
        cli.purchase_price = v;
    }
    if let Some(v) = payload.loan_origination_date {
        cli.loan_origination_date = v;
    }
    if let Some(v) = payload.valuation_date {
        cli.valuation_date = Some(v);
    }
    if let Some(v) = payload.original_loan_amount {
        cli.original_loan_amount = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.mortgage_term_years {
        cli.mortgage_term_years = v;
    }
    if let Some(v) = payload.current_home_value {
        cli.current_home_value = v;
    }

    if let Some(v) = payload.monthly_hoa {
        cli.monthly_hoa = v;
    }
    if let Some(v) = payload.monthly_taxes {
        cli.monthly_taxes = v;
    }
    if let Some(v) = payload.monthly_insurance {
        cli.monthly_insurance = v;
    }
    if let Some(v) = payload.monthly_maintenance {
        cli.monthly_maintenance = v;
    }

    if let Some(v) = payload.monthly_rental_price {
        cli.monthly_rental_price = v;
    }
    if let Some(v) = payload.annual_rent_increase {
        cli.annual_rent_increase = v;
    }
    if let Some(v) = payload.property_mgmt_fee {
        cli.property_mgmt_fee = v;
    }
    if let Some(v) = payload.rental_tax_rate {
        cli.rental_tax_rate = v;
    }
    if let Some(v) = payload.deduct_depreciation {
        cli.deduct_depreciation = v;
    }

    if let Some(v) = payload.home_appreciation {
        cli.home_appreciation = v;
    }
    if let Some(v) = payload.selling_fees {
        cli.selling_fees = v;
    }
    if let Some(v) = payload.costs_to_sell {
        cli.costs_to_sell = v;
    }
    if let Some(v) = payload.costs_to_rent {
        cli.costs_to_rent = v;
    }
    if let Some(v) = payload.capital_gains_tax {
        cli.capital_gains_tax = v;
    }
    if let Some(v) = payload.investment_return {
        cli.investment_return = v;
    }
    if let Some(v) = payload.years_to_hold {
        cli.years_to_hold = v;
    }
    if let Some(v) = payload.is_primary_residence {
        cli.is_primary_residence = v;
    }
    if let Some(v) = payload.exclusion_policy {
        cli.exclusion_policy = v.into();
    }
    if let Some(v) = payload.exclusion_threshold {
        cli.exclusion_threshold = v;
    }
}

impl From<&Cli> for ProjectPayload {
    fn from(cli: &Cli) -> Self {
        ProjectPayload {
            purchase_price: Some(cli.purchase_price),
            loan_origination_date: Some(cli.loan_origination_date.clone()),
            valuation_date: cli.valuation_date.clone(),
            original_loan_amount: Some(cli.original_loan_amount),
            interest_rate: Some(cli.interest_rate),
            mortgage_term_years: Some(cli.mortgage_term_years),
            current_home_value: Some(cli.current_home_value),
            monthly_hoa: Some(cli.monthly_hoa),
            monthly_taxes: Some(cli.monthly_taxes),
            monthly_insurance: Some(cli.monthly_insurance),
            monthly_maintenance: Some(cli.monthly_maintenance),
            monthly_rental_price: Some(cli.monthly_rental_price),
            annual_rent_increase: Some(cli.annual_rent_increase),
            property_mgmt_fee: Some(cli.property_mgmt_fee),
            rental_tax_rate: Some(cli.rental_tax_rate),
            deduct_depreciation: Some(cli.deduct_depreciation),
            home_appreciation: Some(cli.home_appreciation),
            selling_fees: Some(cli.selling_fees),
            costs_to_sell: Some(cli.costs_to_sell),
            costs_to_rent: Some(cli.costs_to_rent),
            capital_gains_tax: Some(cli.capital_gains_tax),
            investment_return: Some(cli.investment_return),
            years_to_hold: Some(cli.years_to_hold),
            is_primary_residence: Some(cli.is_primary_residence),
            exclusion_policy: Some(cli.exclusion_policy.into()),
            exclusion_threshold: Some(cli.exclusion_threshold),
        }
    }
}

/// Encodes every input as a form-urlencoded query string that the
/// `/api/project` query extractor reads back unchanged.
pub(crate) fn share_query(cli: &Cli) -> Result<String, InputError> {
    serde_urlencoded::to_string(ProjectPayload::from(cli))
        .map_err(|e| InputError::ShareQuery(e.to_string()))
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| InputError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn clamp_field(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field, value, clamped, "input clamped into supported range");
    }
    Ok(clamped)
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<f64, InputError> {
    clamp_field(field, value, min, f64::MAX)
}

fn clamp_years(field: &'static str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(field, value, clamped, "input clamped into supported range");
    }
    clamped
}
