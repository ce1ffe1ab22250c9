//! Ordered application of adjustment stages.
//!
//! Each stage is an independent pure function; the pipeline runs whichever
//! stages the caller lists, in the caller's order, and collects their labels.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdjustmentRules;
use crate::models::AuditStep;

use super::age_bonus::apply_age_bonus;
use super::asset_adjustment::apply_asset_adjustment;
use super::late_filing::apply_late_filing_adjustment;

/// An adjustment stage that can be applied to a base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStage {
    /// Asset-based reduction or exclusion.
    Asset,
    /// Late-filing penalty.
    LateFiling,
    /// Senior age bonus.
    AgeBonus,
}

impl AdjustmentStage {
    /// Returns the snake_case identifier used in configuration and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentStage::Asset => "asset",
            AdjustmentStage::LateFiling => "late_filing",
            AdjustmentStage::AgeBonus => "age_bonus",
        }
    }
}

/// The applicant facts the adjustment stages read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjustmentContext {
    /// Total household assets, if reported.
    pub asset_value: Option<i64>,
    /// Whether the application was filed late.
    pub late_filing: bool,
    /// Applicant age, if reported.
    pub age: Option<u32>,
}

/// The result of running the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// The amount after every stage.
    pub amount: i64,
    /// Non-empty stage labels, in stage order.
    pub labels: Vec<String>,
    /// One audit step per stage that ran or was skipped.
    pub audit_steps: Vec<AuditStep>,
}

fn skipped_step(stage: AdjustmentStage, amount: i64, missing: &str, step_number: u32) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: stage.as_str().to_string(),
        rule_name: "Adjustment Skipped".to_string(),
        input: serde_json::json!({
            "amount": amount,
            missing: serde_json::Value::Null
        }),
        output: serde_json::json!({
            "amount": amount,
            "skipped": true
        }),
        reasoning: format!("No {} reported - stage skipped", missing.replace('_', " ")),
    }
}

/// Applies `stages` to `base_amount` in order.
///
/// A negative base amount is clamped to zero before the first stage. The
/// asset stage is skipped when no asset value was reported and the age bonus
/// when no age was reported; both skips are recorded in the audit steps.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::{AdjustmentContext, AdjustmentStage, apply_adjustments};
/// use eitc_engine::config::AdjustmentRules;
///
/// let context = AdjustmentContext {
///     asset_value: Some(200_000_000),
///     late_filing: true,
///     age: None,
/// };
/// let result = apply_adjustments(
///     1_650_000,
///     &[AdjustmentStage::Asset, AdjustmentStage::LateFiling],
///     &context,
///     &AdjustmentRules::default(),
///     1,
/// );
/// assert_eq!(result.amount, 742_500);
/// assert_eq!(
///     result.labels,
///     vec!["asset-based reduction (50%)", "late-filing reduction (10%)"]
/// );
/// ```
pub fn apply_adjustments(
    base_amount: i64,
    stages: &[AdjustmentStage],
    context: &AdjustmentContext,
    rules: &AdjustmentRules,
    first_step_number: u32,
) -> PipelineResult {
    let mut amount = base_amount.max(0);
    let mut labels = Vec::new();
    let mut audit_steps = Vec::with_capacity(stages.len());
    let mut step_number = first_step_number;

    for stage in stages {
        let result = match stage {
            AdjustmentStage::Asset => context
                .asset_value
                .map(|assets| apply_asset_adjustment(amount, assets, &rules.asset, step_number)),
            AdjustmentStage::LateFiling => Some(apply_late_filing_adjustment(
                amount,
                context.late_filing,
                &rules.late_filing,
                step_number,
            )),
            AdjustmentStage::AgeBonus => context
                .age
                .map(|age| apply_age_bonus(amount, age, &rules.age_bonus, step_number)),
        };

        match result {
            Some(result) => {
                debug!(
                    stage = stage.as_str(),
                    before = amount,
                    after = result.amount,
                    "Adjustment stage applied"
                );
                amount = result.amount;
                if !result.label.is_empty() {
                    labels.push(result.label);
                }
                audit_steps.push(result.audit_step);
            }
            None => {
                let missing = match stage {
                    AdjustmentStage::Asset => "asset_value",
                    _ => "age",
                };
                debug!(stage = stage.as_str(), missing, "Adjustment stage skipped");
                audit_steps.push(skipped_step(*stage, amount, missing, step_number));
            }
        }
        step_number += 1;
    }

    PipelineResult {
        amount,
        labels,
        audit_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(asset_value: Option<i64>, late_filing: bool, age: Option<u32>) -> AdjustmentContext {
        AdjustmentContext {
            asset_value,
            late_filing,
            age,
        }
    }

    /// AP-001: asset reduction then late filing
    #[test]
    fn test_asset_then_late_filing() {
        let result = apply_adjustments(
            1_650_000,
            &[AdjustmentStage::Asset, AdjustmentStage::LateFiling],
            &context(Some(200_000_000), true, None),
            &AdjustmentRules::default(),
            2,
        );

        assert_eq!(result.amount, 742_500);
        assert_eq!(
            result.labels,
            vec![
                "asset-based reduction (50%)".to_string(),
                "late-filing reduction (10%)".to_string()
            ]
        );
        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].step_number, 2);
        assert_eq!(result.audit_steps[1].step_number, 3);
    }

    /// AP-002: no stages leaves the amount untouched
    #[test]
    fn test_no_stages_is_identity() {
        let result = apply_adjustments(
            1_650_000,
            &[],
            &context(Some(999_000_000), true, Some(90)),
            &AdjustmentRules::default(),
            1,
        );
        assert_eq!(result.amount, 1_650_000);
        assert!(result.labels.is_empty());
        assert!(result.audit_steps.is_empty());
    }

    /// AP-003: on-time filing contributes no label
    #[test]
    fn test_on_time_filing_has_no_label() {
        let result = apply_adjustments(
            1_000_000,
            &[AdjustmentStage::LateFiling],
            &context(None, false, None),
            &AdjustmentRules::default(),
            1,
        );
        assert_eq!(result.amount, 1_000_000);
        assert!(result.labels.is_empty());
        assert_eq!(result.audit_steps.len(), 1);
    }

    /// AP-004: age bonus composes with the asset and late stages
    #[test]
    fn test_age_bonus_composes_with_other_stages() {
        let result = apply_adjustments(
            1_000_000,
            &[
                AdjustmentStage::Asset,
                AdjustmentStage::LateFiling,
                AdjustmentStage::AgeBonus,
            ],
            &context(Some(100_000_000), true, Some(70)),
            &AdjustmentRules::default(),
            1,
        );
        // 1,000,000 -> 1,000,000 -> 900,000 -> 990,000
        assert_eq!(result.amount, 990_000);
        assert_eq!(
            result.labels,
            vec![
                "normal payment".to_string(),
                "late-filing reduction (10%)".to_string(),
                "senior bonus (+10%)".to_string()
            ]
        );
    }

    #[test]
    fn test_order_is_caller_specified() {
        let rules = AdjustmentRules::default();
        let ctx = context(None, true, Some(65));

        let bonus_first = apply_adjustments(
            1_000_001,
            &[AdjustmentStage::AgeBonus, AdjustmentStage::LateFiling],
            &ctx,
            &rules,
            1,
        );
        let late_first = apply_adjustments(
            1_000_001,
            &[AdjustmentStage::LateFiling, AdjustmentStage::AgeBonus],
            &ctx,
            &rules,
            1,
        );

        // 1,100,001 -> 990,000 versus 900,000 -> 990,000
        assert_eq!(bonus_first.amount, 990_000);
        assert_eq!(late_first.amount, 990_000);
        assert_eq!(bonus_first.labels[0], "senior bonus (+10%)");
        assert_eq!(late_first.labels[0], "late-filing reduction (10%)");
    }

    #[test]
    fn test_missing_inputs_skip_stages() {
        let result = apply_adjustments(
            1_650_000,
            &[AdjustmentStage::Asset, AdjustmentStage::AgeBonus],
            &context(None, false, None),
            &AdjustmentRules::default(),
            1,
        );

        assert_eq!(result.amount, 1_650_000);
        assert!(result.labels.is_empty());
        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].rule_id, "asset");
        assert_eq!(result.audit_steps[0].output["skipped"], true);
        assert!(result.audit_steps[1].reasoning.contains("No age reported"));
    }

    #[test]
    fn test_negative_base_amount_is_clamped() {
        let result = apply_adjustments(
            -100,
            &[AdjustmentStage::LateFiling],
            &context(None, true, None),
            &AdjustmentRules::default(),
            1,
        );
        assert_eq!(result.amount, 0);
    }

    #[test]
    fn test_exclusion_zeroes_later_stages() {
        let result = apply_adjustments(
            3_300_000,
            &[AdjustmentStage::Asset, AdjustmentStage::AgeBonus],
            &context(Some(300_000_000), false, Some(70)),
            &AdjustmentRules::default(),
            1,
        );
        assert_eq!(result.amount, 0);
        assert_eq!(result.labels[0], "asset threshold exceeded (no payment)");
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&AdjustmentStage::LateFiling).unwrap();
        assert_eq!(json, "\"late_filing\"");
        let stage: AdjustmentStage = serde_json::from_str("\"age_bonus\"").unwrap();
        assert_eq!(stage, AdjustmentStage::AgeBonus);
    }
}
