//! HTTP request handlers for the benefit engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate;
use crate::error::EngineResult;

use super::request::{CalculateRequestBody, MaximumBenefitRequest};
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, MaximumBenefitResponse, SchedulesResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/maximum-benefit", post(maximum_benefit_handler))
        .route("/schedules", get(schedules_handler))
        .with_state(state)
}

fn ok_json<T: serde::Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to an API error.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

fn engine_error_response(
    err: crate::error::EngineError,
    correlation_id: Uuid,
    context: &str,
) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "{}", context
    );
    ApiErrorResponse::from(err).into_response()
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the final benefit with its
/// audit trace.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequestBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match perform_calculation(&body, &state) {
        Ok(result) => {
            let duration_us = start_time.elapsed().as_micros() as u64;
            info!(
                correlation_id = %correlation_id,
                household_type = %result.household_type,
                income = result.income,
                final_amount = result.final_amount,
                duration_us,
                "Calculation completed successfully"
            );
            ok_json(CalculationResponse {
                calculation_id: correlation_id,
                timestamp: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                duration_us,
                result,
            })
        }
        Err(err) => engine_error_response(err, correlation_id, "Calculation failed"),
    }
}

/// Builds the request snapshot and runs the calculation.
fn perform_calculation(
    body: &CalculateRequestBody,
    state: &AppState,
) -> EngineResult<crate::models::CalculationResult> {
    let request = body.to_request()?;
    let (config, table_warnings) = body.to_config(state.config())?;
    let mut result = calculate(&request, &config)?;
    result.audit_trace.warnings.extend(table_warnings);
    Ok(result)
}

/// Handler for POST /maximum-benefit endpoint.
async fn maximum_benefit_handler(
    State(state): State<AppState>,
    payload: Result<Json<MaximumBenefitRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match body.parse() {
        Ok((household_type, age)) => {
            let amount = state.maximum_benefit(household_type, age);
            info!(
                correlation_id = %correlation_id,
                household_type = %household_type,
                maximum_benefit = amount,
                "Maximum benefit resolved"
            );
            ok_json(MaximumBenefitResponse {
                household_type,
                age,
                maximum_benefit: amount,
            })
        }
        Err(err) => engine_error_response(err, correlation_id, "Maximum benefit request rejected"),
    }
}

/// Handler for GET /schedules endpoint.
async fn schedules_handler(State(state): State<AppState>) -> Response {
    ok_json(SchedulesResponse {
        program: state.config().program().clone(),
        schedules: *state.schedules(),
        default_stages: state.default_stages().to_vec(),
    })
}
