//! Late-filing penalty.
//!
//! Applications filed after the regular period receive a reduced benefit.

use crate::config::LateFilingRules;
use crate::models::{AdjustmentResult, AuditStep};

use super::multiplier::{apply_multiplier, percent_from_one};

/// Applies the late-filing penalty to a benefit amount.
///
/// On-time filings are returned unchanged with an empty label.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::apply_late_filing_adjustment;
/// use eitc_engine::config::LateFilingRules;
///
/// let result = apply_late_filing_adjustment(1_000_000, true, &LateFilingRules::default(), 1);
/// assert_eq!(result.amount, 900_000);
/// assert_eq!(result.label, "late-filing reduction (10%)");
/// ```
pub fn apply_late_filing_adjustment(
    amount: i64,
    late: bool,
    rules: &LateFilingRules,
    step_number: u32,
) -> AdjustmentResult {
    let amount = amount.max(0);

    if late {
        let adjusted = apply_multiplier(amount, rules.multiplier);
        let label = format!(
            "late-filing reduction ({}%)",
            percent_from_one(rules.multiplier)
        );

        let audit_step = AuditStep {
            step_number,
            rule_id: "late_filing".to_string(),
            rule_name: "Late-Filing Reduction".to_string(),
            input: serde_json::json!({
                "amount": amount,
                "late_filing": true
            }),
            output: serde_json::json!({
                "amount": adjusted,
                "penalty_applied": true,
                "multiplier": rules.multiplier.normalize().to_string()
            }),
            reasoning: format!(
                "{} x {} = {}",
                amount,
                rules.multiplier.normalize(),
                adjusted
            ),
        };

        AdjustmentResult {
            amount: adjusted,
            label,
            audit_step,
        }
    } else {
        let audit_step = AuditStep {
            step_number,
            rule_id: "late_filing".to_string(),
            rule_name: "Late-Filing Reduction".to_string(),
            input: serde_json::json!({
                "amount": amount,
                "late_filing": false
            }),
            output: serde_json::json!({
                "amount": amount,
                "penalty_applied": false
            }),
            reasoning: "Filed on time - no late-filing reduction".to_string(),
        };

        AdjustmentResult {
            amount,
            label: String::new(),
            audit_step,
        }
    }
}
