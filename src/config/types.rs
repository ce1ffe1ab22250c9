//! Configuration types for benefit calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::AdjustmentStage;
use crate::models::ScheduleSet;

/// Metadata about the benefit programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Short programme code (e.g., "EITC-2025").
    pub code: String,
    /// The human-readable name of the programme.
    pub name: String,
    /// The tax year the schedules apply to.
    pub tax_year: u16,
    /// URL to the official programme documentation.
    pub source_url: String,
}

/// Asset-based reduction thresholds.
///
/// Assets up to `full_payment_limit` keep the full amount, assets up to
/// `reduction_limit` are multiplied by `reduction_multiplier`, and anything
/// above pays nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRules {
    /// Highest asset value paid in full (inclusive).
    pub full_payment_limit: i64,
    /// Highest asset value paid at the reduced rate (inclusive).
    pub reduction_limit: i64,
    /// Multiplier applied inside the reduction band.
    pub reduction_multiplier: Decimal,
}

impl Default for AssetRules {
    fn default() -> Self {
        Self {
            full_payment_limit: 140_000_000,
            reduction_limit: 240_000_000,
            reduction_multiplier: Decimal::new(5, 1),
        }
    }
}

/// Late-filing penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFilingRules {
    /// Multiplier applied to late applications.
    pub multiplier: Decimal,
}

impl Default for LateFilingRules {
    fn default() -> Self {
        Self {
            multiplier: Decimal::new(9, 1),
        }
    }
}

/// Senior age bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBonusRules {
    /// Youngest age that receives the bonus.
    pub min_age: u32,
    /// Multiplier applied to eligible applicants.
    pub multiplier: Decimal,
}

impl Default for AgeBonusRules {
    fn default() -> Self {
        Self {
            min_age: 65,
            multiplier: Decimal::new(11, 1),
        }
    }
}

/// The thresholds and multipliers used by every adjustment stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRules {
    /// Asset-based reduction rules.
    #[serde(default)]
    pub asset: AssetRules,
    /// Late-filing penalty rules.
    #[serde(default)]
    pub late_filing: LateFilingRules,
    /// Age bonus rules.
    #[serde(default)]
    pub age_bonus: AgeBonusRules,
}

/// Adjustment configuration from adjustments.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Stages applied when a request does not name its own.
    #[serde(default)]
    pub default_stages: Vec<AdjustmentStage>,
    /// Stage thresholds and multipliers.
    #[serde(flatten)]
    pub rules: AdjustmentRules,
}

/// The complete engine configuration loaded from YAML files.
///
/// The schedules held here are the startup defaults; requests that tune
/// them work on a copy.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: ProgramMetadata,
    schedules: ScheduleSet,
    adjustments: AdjustmentConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        metadata: ProgramMetadata,
        schedules: ScheduleSet,
        adjustments: AdjustmentConfig,
    ) -> Self {
        Self {
            metadata,
            schedules,
            adjustments,
        }
    }

    /// Returns the programme metadata.
    pub fn program(&self) -> &ProgramMetadata {
        &self.metadata
    }

    /// Returns the default schedules.
    pub fn schedules(&self) -> &ScheduleSet {
        &self.schedules
    }

    /// Returns the adjustment rules.
    pub fn rules(&self) -> &AdjustmentRules {
        &self.adjustments.rules
    }

    /// Returns the stages applied when a request names none.
    pub fn default_stages(&self) -> &[AdjustmentStage] {
        &self.adjustments.default_stages
    }
}
