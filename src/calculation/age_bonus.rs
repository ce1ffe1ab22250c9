//! Senior age bonus.
//!
//! Applicants at or above the configured age receive an increased benefit.

use crate::config::AgeBonusRules;
use crate::models::{AdjustmentResult, AuditStep};

use super::multiplier::{apply_multiplier, percent_from_one};

/// Applies the age bonus to a benefit amount.
///
/// Applicants younger than `rules.min_age` are returned unchanged with an
/// empty label.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::apply_age_bonus;
/// use eitc_engine::config::AgeBonusRules;
///
/// let result = apply_age_bonus(1_500_000, 65, &AgeBonusRules::default(), 1);
/// assert_eq!(result.amount, 1_650_000);
/// assert_eq!(result.label, "senior bonus (+10%)");
/// ```
pub fn apply_age_bonus(
    amount: i64,
    age: u32,
    rules: &AgeBonusRules,
    step_number: u32,
) -> AdjustmentResult {
    let amount = amount.max(0);
    let eligible = age >= rules.min_age;

    let (adjusted, label, reasoning) = if eligible {
        let adjusted = apply_multiplier(amount, rules.multiplier);
        (
            adjusted,
            format!("senior bonus (+{}%)", percent_from_one(rules.multiplier)),
            format!(
                "Age {} >= {}: {} x {} = {}",
                age,
                rules.min_age,
                amount,
                rules.multiplier.normalize(),
                adjusted
            ),
        )
    } else {
        (
            amount,
            String::new(),
            format!("Age {} is below {} - no bonus", age, rules.min_age),
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "age_bonus".to_string(),
        rule_name: "Senior Age Bonus".to_string(),
        input: serde_json::json!({
            "amount": amount,
            "age": age
        }),
        output: serde_json::json!({
            "amount": adjusted,
            "bonus_applied": eligible
        }),
        reasoning,
    };

    AdjustmentResult {
        amount: adjusted,
        label,
        audit_step,
    }
}
