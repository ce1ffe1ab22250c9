//! Asset-based reduction.
//!
//! Households with large property holdings receive half the benefit or
//! nothing at all, depending on which asset band they fall into.

use crate::config::AssetRules;
use crate::models::{AdjustmentResult, AuditStep};

use super::multiplier::{apply_multiplier, percent_from_one};

/// Label used when assets are within the full-payment limit.
pub const ASSET_NORMAL_LABEL: &str = "normal payment";

/// Label used when assets exceed the reduction limit.
pub const ASSET_EXCEEDED_LABEL: &str = "asset threshold exceeded (no payment)";

/// The asset band a household falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetBand {
    FullPayment,
    Reduced,
    Excluded,
}

impl AssetBand {
    fn classify(asset_value: i64, rules: &AssetRules) -> Self {
        if asset_value <= rules.full_payment_limit {
            AssetBand::FullPayment
        } else if asset_value <= rules.reduction_limit {
            AssetBand::Reduced
        } else {
            AssetBand::Excluded
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            AssetBand::FullPayment => "full_payment",
            AssetBand::Reduced => "reduced",
            AssetBand::Excluded => "excluded",
        }
    }
}

/// Applies the asset-based reduction to a benefit amount.
///
/// | Asset value | Result |
/// |---|---|
/// | `<= full_payment_limit` | unchanged, "normal payment" |
/// | `<= reduction_limit` | `amount * reduction_multiplier`, truncated |
/// | above | `0`, "asset threshold exceeded (no payment)" |
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::apply_asset_adjustment;
/// use eitc_engine::config::AssetRules;
///
/// let rules = AssetRules::default();
/// let result = apply_asset_adjustment(1_650_000, 200_000_000, &rules, 1);
/// assert_eq!(result.amount, 825_000);
/// assert_eq!(result.label, "asset-based reduction (50%)");
/// ```
pub fn apply_asset_adjustment(
    amount: i64,
    asset_value: i64,
    rules: &AssetRules,
    step_number: u32,
) -> AdjustmentResult {
    let amount = amount.max(0);

    let band = AssetBand::classify(asset_value, rules);

    let (adjusted, label, reasoning) = match band {
        AssetBand::FullPayment => (
            amount,
            ASSET_NORMAL_LABEL.to_string(),
            format!(
                "Assets {} are within the full-payment limit {}; amount unchanged",
                asset_value, rules.full_payment_limit
            ),
        ),
        AssetBand::Reduced => {
            let adjusted = apply_multiplier(amount, rules.reduction_multiplier);
            (
                adjusted,
                format!(
                    "asset-based reduction ({}%)",
                    percent_from_one(rules.reduction_multiplier)
                ),
                format!(
                    "Assets {} exceed {} but not {}: {} x {} = {}",
                    asset_value,
                    rules.full_payment_limit,
                    rules.reduction_limit,
                    amount,
                    rules.reduction_multiplier.normalize(),
                    adjusted
                ),
            )
        }
        AssetBand::Excluded => (
            0,
            ASSET_EXCEEDED_LABEL.to_string(),
            format!(
                "Assets {} exceed the reduction limit {}; no payment",
                asset_value, rules.reduction_limit
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "asset_adjustment".to_string(),
        rule_name: "Asset-Based Reduction".to_string(),
        input: serde_json::json!({
            "amount": amount,
            "asset_value": asset_value
        }),
        output: serde_json::json!({
            "amount": adjusted,
            "band": band.as_str(),
            "label": label
        }),
        reasoning,
    };

    AdjustmentResult {
        amount: adjusted,
        label,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjust(amount: i64, asset_value: i64) -> AdjustmentResult {
        apply_asset_adjustment(amount, asset_value, &AssetRules::default(), 1)
    }

    /// AA-001: assets at the full-payment limit keep the full amount
    #[test]
    fn test_full_payment_limit_is_inclusive() {
        let result = adjust(1_650_000, 140_000_000);
        assert_eq!(result.amount, 1_650_000);
        assert_eq!(result.label, "normal payment");
    }

    /// AA-002: one won above the limit halves the amount
    #[test]
    fn test_just_above_full_payment_limit_is_reduced() {
        let result = adjust(1_650_001, 140_000_001);
        assert_eq!(result.amount, 825_000);
        assert_eq!(result.label, "asset-based reduction (50%)");
    }

    /// AA-003: reduction limit is inclusive
    #[test]
    fn test_reduction_limit_is_inclusive() {
        let result = adjust(1_650_000, 240_000_000);
        assert_eq!(result.amount, 825_000);
        assert_eq!(result.label, "asset-based reduction (50%)");
    }

    /// AA-004: one won above the reduction limit pays nothing
    #[test]
    fn test_above_reduction_limit_pays_nothing() {
        let result = adjust(1_650_000, 240_000_001);
        assert_eq!(result.amount, 0);
        assert_eq!(result.label, "asset threshold exceeded (no payment)");
    }

    #[test]
    fn test_zero_assets_are_normal() {
        let result = adjust(2_850_000, 0);
        assert_eq!(result.amount, 2_850_000);
        assert_eq!(result.label, ASSET_NORMAL_LABEL);
    }

    #[test]
    fn test_negative_amount_is_clamped() {
        let result = adjust(-10, 0);
        assert_eq!(result.amount, 0);
    }

    #[test]
    fn test_is_idempotent_for_same_inputs() {
        assert_eq!(adjust(1_234_567, 200_000_000), adjust(1_234_567, 200_000_000));
    }

    #[test]
    fn test_custom_rules_change_label() {
        let rules = AssetRules {
            full_payment_limit: 100,
            reduction_limit: 200,
            reduction_multiplier: rust_decimal::Decimal::new(75, 2),
        };
        let result = apply_asset_adjustment(1_000, 150, &rules, 1);
        assert_eq!(result.amount, 750);
        assert_eq!(result.label, "asset-based reduction (25%)");
    }

    #[test]
    fn test_band_classification_follows_limits() {
        let rules = AssetRules::default();
        assert_eq!(AssetBand::classify(0, &rules), AssetBand::FullPayment);
        assert_eq!(AssetBand::classify(140_000_001, &rules), AssetBand::Reduced);
        assert_eq!(AssetBand::classify(240_000_001, &rules), AssetBand::Excluded);
        assert_eq!(AssetBand::Excluded.as_str(), "excluded");
    }

    #[test]
    fn test_audit_step_records_band() {
        let result = apply_asset_adjustment(1_650_000, 200_000_000, &AssetRules::default(), 4);

        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(result.audit_step.rule_id, "asset_adjustment");
        assert_eq!(result.audit_step.input["asset_value"], 200_000_000);
        assert_eq!(result.audit_step.output["band"], "reduced");
        assert_eq!(result.audit_step.output["amount"], 825_000);
        assert!(result.audit_step.reasoning.contains("1650000 x 0.5 = 825000"));
    }
}
