//! Response types for the benefit engine API.
//!
//! This module defines the success payloads and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::AdjustmentStage;
use crate::config::ProgramMetadata;
use crate::error::EngineError;
use crate::models::{CalculationResult, HouseholdType, ScheduleSet};

/// Successful response from `/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// Time spent in the calculation, in microseconds.
    pub duration_us: u64,
    /// The calculation itself.
    #[serde(flatten)]
    pub result: CalculationResult,
}

/// Successful response from `/maximum-benefit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaximumBenefitResponse {
    /// The household type queried.
    pub household_type: HouseholdType,
    /// The age used for the bonus, if given.
    pub age: Option<u32>,
    /// The most the household can receive.
    pub maximum_benefit: i64,
}

/// Successful response from `/schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulesResponse {
    /// Programme metadata.
    pub program: ProgramMetadata,
    /// The configured default schedules.
    pub schedules: ScheduleSet,
    /// The configured default stage order.
    pub default_stages: Vec<AdjustmentStage>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::ConfigParseError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration parse error", message),
            },
            EngineError::InvalidHouseholdType { label } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_HOUSEHOLD_TYPE",
                    message,
                    format!(
                        "'{}' is not one of single, single_earner, dual_earner, 단독, 홑벌이, 맞벌이",
                        label
                    ),
                ),
            ),
            EngineError::InvalidIncome { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_INCOME", message))
            }
            EngineError::InvalidScheduleTable { .. } => ApiErrorResponse::bad_request(
                ApiError::with_details(
                    "INVALID_SCHEDULE_TABLE",
                    message,
                    "Tables need household_type, income and amount columns",
                ),
            ),
            EngineError::InvalidSchedule { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_SCHEDULE", message))
            }
            EngineError::InvalidRequest { .. } => {
                ApiErrorResponse::bad_request(ApiError::validation_error(message))
            }
        }
    }
}
