//! Error types for the benefit engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop a benefit calculation.

use thiserror::Error;

/// The main error type for the benefit engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently from the CLI and the HTTP API.
///
/// # Example
///
/// ```
/// use eitc_engine::error::EngineError;
///
/// let error = EngineError::InvalidHouseholdType {
///     label: "triple_earner".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid household type: triple_earner");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A household type label did not match any known household type.
    #[error("Invalid household type: {label}")]
    InvalidHouseholdType {
        /// The label that could not be recognised.
        label: String,
    },

    /// Reported income was negative.
    #[error("Invalid income {income}: income must not be negative")]
    InvalidIncome {
        /// The rejected income.
        income: i64,
    },

    /// A schedule table was missing required columns or contained malformed rows.
    #[error("Invalid schedule table: {message}")]
    InvalidScheduleTable {
        /// A description of what made the table invalid.
        message: String,
    },

    /// A benefit schedule violated its threshold ordering.
    #[error("Invalid schedule for '{household_type}': {message}")]
    InvalidSchedule {
        /// The household type the schedule belongs to.
        household_type: String,
        /// A description of the violated constraint.
        message: String,
    },

    /// A request field other than income was out of range.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/schedules.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/schedules.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_household_type_displays_label() {
        let error = EngineError::InvalidHouseholdType {
            label: "unknown".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid household type: unknown");
    }

    #[test]
    fn test_invalid_income_displays_value() {
        let error = EngineError::InvalidIncome { income: -1 };
        assert_eq!(
            error.to_string(),
            "Invalid income -1: income must not be negative"
        );
    }

    #[test]
    fn test_invalid_schedule_table_displays_message() {
        let error = EngineError::InvalidScheduleTable {
            message: "missing required columns: amount".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid schedule table: missing required columns: amount"
        );
    }

    #[test]
    fn test_invalid_schedule_displays_household_and_message() {
        let error = EngineError::InvalidSchedule {
            household_type: "single".to_string(),
            message: "plateau_end must not exceed income_upper_bound".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid schedule for 'single': plateau_end must not exceed income_upper_bound"
        );
    }

    #[test]
    fn test_invalid_request_displays_field_and_message() {
        let error = EngineError::InvalidRequest {
            field: "asset_value".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid request field 'asset_value': must not be negative"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_income() -> EngineResult<()> {
            Err(EngineError::InvalidIncome { income: -5 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_income()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
