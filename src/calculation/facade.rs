//! End-to-end benefit calculation.
//!
//! This module selects the base amount source (schedule formula or sampled
//! table), threads the base amount through the configured adjustment stages,
//! and assembles the [`CalculationResult`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdjustmentRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculationResult, HouseholdType, ScheduleSet,
};

use super::age_bonus::apply_age_bonus;
use super::pipeline::{AdjustmentContext, AdjustmentStage, apply_adjustments};
use super::schedule_resolver::resolve_with_audit;
use super::table_interpolator::{ScheduleTable, interpolate_with_audit};

/// A single benefit calculation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The household type used to pick a schedule.
    pub household_type: HouseholdType,
    /// Reported annual income in won.
    pub income: i64,
    /// Total household assets in won, if reported.
    #[serde(default)]
    pub asset_value: Option<i64>,
    /// Whether the application was filed late.
    #[serde(default)]
    pub late_filing: Option<bool>,
    /// Applicant age, if reported.
    #[serde(default)]
    pub age: Option<u32>,
}

impl CalculationRequest {
    /// Creates a request with no optional facts.
    pub fn new(household_type: HouseholdType, income: i64) -> Self {
        Self {
            household_type,
            income,
            asset_value: None,
            late_filing: None,
            age: None,
        }
    }

    /// Creates a request from a raw household label.
    ///
    /// Returns `InvalidHouseholdType` for labels that match no household type.
    pub fn from_label(household_label: &str, income: i64) -> EngineResult<Self> {
        Ok(Self::new(household_label.parse()?, income))
    }

    fn validate(&self) -> EngineResult<()> {
        if self.income < 0 {
            return Err(EngineError::InvalidIncome {
                income: self.income,
            });
        }
        if let Some(assets) = self.asset_value {
            if assets < 0 {
                return Err(EngineError::InvalidRequest {
                    field: "asset_value".to_string(),
                    message: format!("must not be negative, got {}", assets),
                });
            }
        }
        Ok(())
    }

    fn context(&self) -> AdjustmentContext {
        AdjustmentContext {
            asset_value: self.asset_value,
            late_filing: self.late_filing.unwrap_or(false),
            age: self.age,
        }
    }
}

/// Where the base amount comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalculationSource {
    /// Piecewise-linear schedules, one per household type.
    Formula {
        /// The schedules in effect for this calculation.
        schedules: ScheduleSet,
    },
    /// Linear interpolation over sampled points.
    Table {
        /// The sampled table in effect for this calculation.
        table: ScheduleTable,
    },
}

/// An immutable per-calculation configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationConfig {
    /// The base amount source.
    pub source: CalculationSource,
    /// Adjustment stages in the order they run.
    #[serde(default)]
    pub stages: Vec<AdjustmentStage>,
    /// Thresholds and multipliers for the stages.
    #[serde(default)]
    pub rules: AdjustmentRules,
}

impl CalculationConfig {
    /// Creates a formula configuration with no adjustment stages.
    pub fn formula(schedules: ScheduleSet) -> Self {
        Self {
            source: CalculationSource::Formula { schedules },
            stages: Vec::new(),
            rules: AdjustmentRules::default(),
        }
    }

    /// Creates a table configuration with no adjustment stages.
    pub fn table(table: ScheduleTable) -> Self {
        Self {
            source: CalculationSource::Table { table },
            stages: Vec::new(),
            rules: AdjustmentRules::default(),
        }
    }

    /// Replaces the adjustment stages.
    pub fn with_stages(mut self, stages: impl Into<Vec<AdjustmentStage>>) -> Self {
        self.stages = stages.into();
        self
    }

    /// Replaces the adjustment rules.
    pub fn with_rules(mut self, rules: AdjustmentRules) -> Self {
        self.rules = rules;
        self
    }
}

fn degenerate_span_warnings(
    household_type: HouseholdType,
    schedules: &ScheduleSet,
) -> Vec<AuditWarning> {
    let schedule = schedules.get(household_type);
    let mut warnings = Vec::new();
    if schedule.has_degenerate_phase_in() {
        warnings.push(AuditWarning {
            code: "DEGENERATE_SCHEDULE_SPAN".to_string(),
            message: format!(
                "Phase-in span for {} has zero width at {}; maximum applies from that income",
                household_type, schedule.plateau_start
            ),
            severity: "low".to_string(),
        });
    }
    if schedule.has_degenerate_phase_out() {
        warnings.push(AuditWarning {
            code: "DEGENERATE_SCHEDULE_SPAN".to_string(),
            message: format!(
                "Phase-out span for {} has zero width at {}; benefit drops to zero above it",
                household_type, schedule.plateau_end
            ),
            severity: "low".to_string(),
        });
    }
    warnings
}

fn missing_household_warning(household_type: HouseholdType, table: &ScheduleTable) -> AuditWarning {
    let covered: Vec<String> = table
        .household_types()
        .into_iter()
        .map(|covered| format!("{} ({})", covered, covered.korean_label()))
        .collect();
    AuditWarning {
        code: "TABLE_HOUSEHOLD_MISSING".to_string(),
        message: format!(
            "Schedule table has no samples for {} ({}); it covers {}",
            household_type,
            household_type.korean_label(),
            covered.join(", ")
        ),
        severity: "medium".to_string(),
    }
}

/// Calculates the final benefit for a request.
///
/// # Errors
///
/// - `InvalidIncome` if the income is negative
/// - `InvalidRequest` if the asset value is negative
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::{
///     AdjustmentStage, CalculationConfig, CalculationRequest, calculate,
/// };
/// use eitc_engine::models::{BenefitSchedule, HouseholdType, ScheduleSet};
///
/// let mut schedules = ScheduleSet::default();
/// schedules.single = BenefitSchedule {
///     max_amount: 1_650_000,
///     phase_in_start: 4_000_000,
///     plateau_start: 9_000_000,
///     plateau_end: 14_000_000,
///     income_upper_bound: 22_000_000,
/// };
/// let config = CalculationConfig::formula(schedules)
///     .with_stages([AdjustmentStage::Asset, AdjustmentStage::LateFiling]);
///
/// let mut request = CalculationRequest::new(HouseholdType::Single, 10_000_000);
/// request.asset_value = Some(200_000_000);
/// request.late_filing = Some(true);
///
/// let result = calculate(&request, &config).unwrap();
/// assert_eq!(result.base_amount, 1_650_000);
/// assert_eq!(result.final_amount, 742_500);
/// ```
pub fn calculate(
    request: &CalculationRequest,
    config: &CalculationConfig,
) -> EngineResult<CalculationResult> {
    request.validate()?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let base_amount = match &config.source {
        CalculationSource::Formula { schedules } => {
            let resolution = resolve_with_audit(
                request.income,
                request.household_type,
                schedules.get(request.household_type),
                step_number,
            );
            warnings.extend(degenerate_span_warnings(request.household_type, schedules));
            steps.push(resolution.audit_step);
            resolution.amount
        }
        CalculationSource::Table { table } => {
            let interpolation =
                interpolate_with_audit(request.income, request.household_type, table, step_number);
            if table.points_for(request.household_type).is_empty() {
                warnings.push(missing_household_warning(request.household_type, table));
            }
            steps.push(interpolation.audit_step);
            interpolation.amount
        }
    };
    step_number += 1;

    let pipeline = apply_adjustments(
        base_amount,
        &config.stages,
        &request.context(),
        &config.rules,
        step_number,
    );
    steps.extend(pipeline.audit_steps);

    debug!(
        household_type = %request.household_type,
        income = request.income,
        base_amount,
        final_amount = pipeline.amount,
        "Benefit calculated"
    );

    Ok(CalculationResult {
        household_type: request.household_type,
        income: request.income,
        base_amount,
        final_amount: pipeline.amount,
        adjustments: pipeline.labels,
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Returns the most a household can receive, with the age bonus applied.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::maximum_benefit;
/// use eitc_engine::config::AdjustmentRules;
/// use eitc_engine::models::{HouseholdType, ScheduleSet};
///
/// let schedules = ScheduleSet::default();
/// let rules = AdjustmentRules::default();
/// assert_eq!(maximum_benefit(HouseholdType::DualEarner, None, &schedules, &rules), 3_300_000);
/// assert_eq!(maximum_benefit(HouseholdType::Single, Some(70), &schedules, &rules), 1_815_000);
/// ```
pub fn maximum_benefit(
    household_type: HouseholdType,
    age: Option<u32>,
    schedules: &ScheduleSet,
    rules: &AdjustmentRules,
) -> i64 {
    let max_amount = schedules.get(household_type).max_amount;
    match age {
        Some(age) => apply_age_bonus(max_amount, age, &rules.age_bonus, 1).amount,
        None => max_amount.max(0),
    }
}
