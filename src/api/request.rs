//! Request types for the benefit engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/maximum-benefit` endpoints, and their conversion into domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculation::{AdjustmentStage, CalculationConfig, CalculationRequest};
use crate::config::{ConfigLoader, TableParseMode, load_schedule_table};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditWarning, HouseholdType, ScheduleOverride};

/// Which base amount source a request uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// The configured piecewise-linear schedules.
    #[default]
    Formula,
    /// A sampled table supplied in the request.
    Table,
}

/// Request body for the `/calculate` endpoint.
///
/// Household labels are kept as strings here so that unknown labels surface
/// as `InvalidHouseholdType` rather than a generic JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequestBody {
    /// Household label (snake_case, CamelCase or Korean).
    pub household_type: String,
    /// Reported annual income in won.
    pub income: i64,
    /// Total household assets in won.
    #[serde(default)]
    pub asset_value: Option<i64>,
    /// Whether the application was filed late.
    #[serde(default)]
    pub late_filing: Option<bool>,
    /// Applicant age.
    #[serde(default)]
    pub age: Option<i64>,
    /// Base amount source.
    #[serde(default)]
    pub mode: CalculationMode,
    /// CSV schedule table, required in table mode.
    #[serde(default)]
    pub table_csv: Option<String>,
    /// Reject the table on the first malformed row.
    #[serde(default = "default_strict_table")]
    pub strict_table: bool,
    /// Adjustment stages in order; the configured defaults when absent.
    #[serde(default)]
    pub stages: Option<Vec<AdjustmentStage>>,
    /// Per-household schedule tweaks for this request only.
    #[serde(default)]
    pub schedule_overrides: BTreeMap<String, ScheduleOverride>,
}

fn default_strict_table() -> bool {
    true
}

/// Request body for the `/maximum-benefit` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaximumBenefitRequest {
    /// Household label.
    pub household_type: String,
    /// Applicant age.
    #[serde(default)]
    pub age: Option<i64>,
}

pub(crate) fn parse_age(age: Option<i64>) -> EngineResult<Option<u32>> {
    age.map(|age| {
        u32::try_from(age).map_err(|_| EngineError::InvalidRequest {
            field: "age".to_string(),
            message: format!("must be between 0 and {}, got {}", u32::MAX, age),
        })
    })
    .transpose()
}

impl CalculateRequestBody {
    /// Converts the body into a domain calculation request.
    pub fn to_request(&self) -> EngineResult<CalculationRequest> {
        let household_type: HouseholdType = self.household_type.parse()?;
        Ok(CalculationRequest {
            household_type,
            income: self.income,
            asset_value: self.asset_value,
            late_filing: self.late_filing,
            age: parse_age(self.age)?,
        })
    }

    /// Builds the per-request configuration snapshot.
    ///
    /// Returns the configuration plus any warnings raised while loading a
    /// lenient table. The loader's defaults are never modified.
    pub fn to_config(
        &self,
        loader: &ConfigLoader,
    ) -> EngineResult<(CalculationConfig, Vec<AuditWarning>)> {
        let mut warnings = Vec::new();

        let config = match self.mode {
            CalculationMode::Formula => {
                let mut schedules = *loader.schedules();
                for (label, schedule_override) in &self.schedule_overrides {
                    let household_type: HouseholdType = label.parse()?;
                    schedules = schedules.with_override(household_type, schedule_override)?;
                }
                CalculationConfig::formula(schedules)
            }
            CalculationMode::Table => {
                let csv = self
                    .table_csv
                    .as_deref()
                    .ok_or_else(|| EngineError::InvalidRequest {
                        field: "table_csv".to_string(),
                        message: "required when mode is 'table'".to_string(),
                    })?;
                let parse_mode = if self.strict_table {
                    TableParseMode::Strict
                } else {
                    TableParseMode::Lenient
                };
                let report = load_schedule_table(csv.as_bytes(), parse_mode)?;
                warnings.extend(report.warnings());
                CalculationConfig::table(report.table)
            }
        };

        let stages = self
            .stages
            .clone()
            .unwrap_or_else(|| loader.default_stages().to_vec());

        Ok((config.with_stages(stages).with_rules(*loader.rules()), warnings))
    }
}

impl MaximumBenefitRequest {
    /// Parses the household label and age.
    pub fn parse(&self) -> EngineResult<(HouseholdType, Option<u32>)> {
        Ok((self.household_type.parse()?, parse_age(self.age)?))
    }
}
