//! Calculation result models for the benefit engine.
//!
//! This module contains the [`CalculationResult`] type and the audit
//! structures that record every decision made while computing a benefit.

use serde::{Deserialize, Serialize};

use super::HouseholdType;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The outcome of one adjustment stage.
///
/// `amount` is never negative. `label` is empty when the stage made no
/// classification worth displaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentResult {
    /// The amount after this stage.
    pub amount: i64,
    /// Display label describing what the stage did.
    pub label: String,
    /// The audit step recording this stage.
    pub audit_step: AuditStep,
}

/// The complete result of a benefit calculation.
///
/// # Example
///
/// ```
/// use eitc_engine::models::{AuditTrace, CalculationResult, HouseholdType};
///
/// let result = CalculationResult {
///     household_type: HouseholdType::Single,
///     income: 6_500_000,
///     base_amount: 825_000,
///     final_amount: 825_000,
///     adjustments: vec![],
///     audit_trace: AuditTrace::default(),
/// };
/// assert!(result.is_standard_payout());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The household type the benefit was computed for.
    pub household_type: HouseholdType,
    /// The reported annual income.
    pub income: i64,
    /// The benefit before any adjustment stage ran.
    pub base_amount: i64,
    /// The benefit after all adjustment stages.
    pub final_amount: i64,
    /// Labels of the applied adjustments, in the order they ran.
    pub adjustments: Vec<String>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl CalculationResult {
    /// Returns true if no adjustment produced a label.
    pub fn is_standard_payout(&self) -> bool {
        self.adjustments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_sample_step() -> AuditStep {
        AuditStep {
            step_number: 1,
            rule_id: "schedule_resolution".to_string(),
            rule_name: "Schedule Resolution".to_string(),
            input: serde_json::json!({ "income": 6_500_000 }),
            output: serde_json::json!({ "amount": 825_000 }),
            reasoning: "phase-in".to_string(),
        }
    }

    #[test]
    fn test_calculation_result_serialization() {
        let result = CalculationResult {
            household_type: HouseholdType::Single,
            income: 18_000_000,
            base_amount: 825_000,
            final_amount: 742_500,
            adjustments: vec!["late-filing reduction (10%)".to_string()],
            audit_trace: AuditTrace {
                steps: vec![create_sample_step()],
                warnings: vec![],
            },
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"household_type\":\"single\""));
        assert!(json.contains("\"final_amount\":742500"));
        assert!(json.contains("\"adjustments\":[\"late-filing reduction (10%)\"]"));
        assert!(json.contains("\"rule_id\":\"schedule_resolution\""));
    }

    #[test]
    fn test_calculation_result_round_trips_through_json() {
        let result = CalculationResult {
            household_type: HouseholdType::DualEarner,
            income: 0,
            base_amount: 0,
            final_amount: 0,
            adjustments: vec![],
            audit_trace: AuditTrace::default(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_standard_payout_depends_on_labels() {
        let mut result = CalculationResult {
            household_type: HouseholdType::Single,
            income: 10_000_000,
            base_amount: 1_650_000,
            final_amount: 1_650_000,
            adjustments: vec![],
            audit_trace: AuditTrace::default(),
        };
        assert!(result.is_standard_payout());

        result.adjustments.push("normal payment".to_string());
        assert!(!result.is_standard_payout());
    }

    #[test]
    fn test_audit_warning_deserialization() {
        let json = r#"{
            "code": "DEGENERATE_SCHEDULE_SPAN",
            "message": "phase-in span has zero width",
            "severity": "low"
        }"#;

        let warning: AuditWarning = serde_json::from_str(json).unwrap();
        assert_eq!(warning.code, "DEGENERATE_SCHEDULE_SPAN");
        assert_eq!(warning.severity, "low");
    }
}
