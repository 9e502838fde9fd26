mod inputs;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    ProjectionInputs, ProjectionSummary, YearRecord, monthly_payment, months_elapsed,
    run_projection, summarize,
};

use inputs::{Cli, ProjectPayload, apply_payload, build_inputs, default_cli_for_api, share_query};

pub use inputs::InputError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Args(#[from] clap::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to encode projection: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
struct ApiRequest {
    inputs: ProjectionInputs,
    share_query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    monthly_payment: f64,
    months_elapsed: u32,
    share_query: String,
    summary: Option<ProjectionSummary>,
    years: Vec<YearRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Runs one projection from command-line style arguments and returns it as
/// pretty-printed JSON. The first item is treated as the program name.
///
/// Bad flags come back as [`CommandError::Args`]; `--help` and `--version`
/// are reported the same way so the caller decides how to exit.
pub fn run_project_command<I, T>(args: I) -> Result<String, CommandError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let request = api_request_from_cli(cli, today())?;
    let response = build_project_response(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!("rent-or-sell HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{port}/api/project");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload, today()) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    json_response(StatusCode::OK, build_project_response(&request))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn api_request_from_payload(
    payload: ProjectPayload,
    today: NaiveDate,
) -> Result<ApiRequest, InputError> {
    let mut cli = default_cli_for_api();
    apply_payload(&mut cli, payload);
    api_request_from_cli(cli, today)
}

fn api_request_from_cli(cli: Cli, today: NaiveDate) -> Result<ApiRequest, InputError> {
    let share_query = share_query(&cli)?;
    let inputs = build_inputs(cli, today)?;
    Ok(ApiRequest {
        inputs,
        share_query,
    })
}

fn build_project_response(request: &ApiRequest) -> ProjectResponse {
    let inputs = &request.inputs;
    let projection = run_projection(inputs);
    ProjectResponse {
        monthly_payment: monthly_payment(inputs),
        months_elapsed: months_elapsed(inputs.loan_origination_date, inputs.valuation_date),
        share_query: request.share_query.clone(),
        summary: summarize(&projection),
        years: projection.years,
    }
}
