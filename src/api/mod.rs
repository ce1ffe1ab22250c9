//! HTTP API module for the benefit engine.
//!
//! This module provides the REST API endpoints for calculating benefit
//! amounts and inspecting the configured schedules.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculateRequestBody, CalculationMode, MaximumBenefitRequest};
pub use response::{
    ApiError, ApiErrorResponse, CalculationResponse, MaximumBenefitResponse, SchedulesResponse,
};
pub use state::AppState;
