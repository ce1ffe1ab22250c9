//! Base benefit resolution from a benefit schedule.
//!
//! This module maps an income onto the piecewise-linear phase-in, plateau and
//! phase-out curve defined by a [`BenefitSchedule`].

use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, BenefitSchedule, HouseholdType};

/// The part of the benefit curve an income falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBand {
    /// Below `phase_in_start`; nothing is paid.
    BelowPhaseIn,
    /// Rising linearly towards the maximum.
    PhaseIn,
    /// Flat at the maximum.
    Plateau,
    /// Falling linearly towards zero.
    PhaseOut,
    /// At or above `income_upper_bound`; nothing is paid.
    AboveUpperBound,
}

impl IncomeBand {
    /// Returns the snake_case name used in audit output.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeBand::BelowPhaseIn => "below_phase_in",
            IncomeBand::PhaseIn => "phase_in",
            IncomeBand::Plateau => "plateau",
            IncomeBand::PhaseOut => "phase_out",
            IncomeBand::AboveUpperBound => "above_upper_bound",
        }
    }
}

/// The result of resolving a base benefit, including the audit step.
#[derive(Debug, Clone)]
pub struct ScheduleResolution {
    /// The base benefit amount.
    pub amount: i64,
    /// The band the income fell into.
    pub band: IncomeBand,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Returns the band `income` falls into for `schedule`.
pub fn income_band(income: i64, schedule: &BenefitSchedule) -> IncomeBand {
    if income < schedule.phase_in_start {
        IncomeBand::BelowPhaseIn
    } else if income < schedule.plateau_start {
        IncomeBand::PhaseIn
    } else if income <= schedule.plateau_end {
        IncomeBand::Plateau
    } else if income < schedule.income_upper_bound {
        IncomeBand::PhaseOut
    } else {
        IncomeBand::AboveUpperBound
    }
}

/// Computes `max_amount * numerator / span` truncated toward zero.
///
/// Spans are taken in `i128` so thresholds anywhere in the `i64` range cannot
/// overflow. Returns `None` for a non-positive span instead of dividing.
fn scale(max_amount: i64, numerator: i128, span: i128) -> Option<i64> {
    if span <= 0 {
        return None;
    }
    let scaled = i128::from(max_amount).checked_mul(numerator)? / span;
    i64::try_from(scaled).ok()
}

/// Resolves the base benefit for an income.
///
/// The bands are disjoint and exhaustive, every comparison is on whole
/// won, and fractional results are truncated toward zero. A zero-width
/// phase-in span pays `max_amount`; a zero-width phase-out span pays nothing.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::resolve;
/// use eitc_engine::models::BenefitSchedule;
///
/// let schedule = BenefitSchedule {
///     max_amount: 1_650_000,
///     phase_in_start: 4_000_000,
///     plateau_start: 9_000_000,
///     plateau_end: 14_000_000,
///     income_upper_bound: 22_000_000,
/// };
/// assert_eq!(resolve(6_500_000, &schedule), 825_000);
/// assert_eq!(resolve(18_000_000, &schedule), 825_000);
/// assert_eq!(resolve(22_000_000, &schedule), 0);
/// ```
pub fn resolve(income: i64, schedule: &BenefitSchedule) -> i64 {
    match income_band(income, schedule) {
        IncomeBand::BelowPhaseIn | IncomeBand::AboveUpperBound => 0,
        IncomeBand::PhaseIn => scale(
            schedule.max_amount,
            i128::from(income) - i128::from(schedule.phase_in_start),
            i128::from(schedule.plateau_start) - i128::from(schedule.phase_in_start),
        )
        .unwrap_or(schedule.max_amount),
        IncomeBand::Plateau => schedule.max_amount,
        IncomeBand::PhaseOut => scale(
            schedule.max_amount,
            i128::from(schedule.income_upper_bound) - i128::from(income),
            i128::from(schedule.income_upper_bound) - i128::from(schedule.plateau_end),
        )
        .unwrap_or(0)
        .max(0),
    }
}

/// Resolves the base benefit and records an audit step.
pub fn resolve_with_audit(
    income: i64,
    household_type: HouseholdType,
    schedule: &BenefitSchedule,
    step_number: u32,
) -> ScheduleResolution {
    let band = income_band(income, schedule);
    let amount = resolve(income, schedule);

    let reasoning = match band {
        IncomeBand::BelowPhaseIn => format!(
            "Income {} is below the phase-in start {}; no benefit",
            income, schedule.phase_in_start
        ),
        IncomeBand::PhaseIn => format!(
            "{} x ({} - {}) / ({} - {}) = {}",
            schedule.max_amount,
            income,
            schedule.phase_in_start,
            schedule.plateau_start,
            schedule.phase_in_start,
            amount
        ),
        IncomeBand::Plateau => format!(
            "Income {} is within the plateau {}..={}; maximum {} applies",
            income, schedule.plateau_start, schedule.plateau_end, schedule.max_amount
        ),
        IncomeBand::PhaseOut => format!(
            "{} x ({} - {}) / ({} - {}) = {}",
            schedule.max_amount,
            schedule.income_upper_bound,
            income,
            schedule.income_upper_bound,
            schedule.plateau_end,
            amount
        ),
        IncomeBand::AboveUpperBound => format!(
            "Income {} is at or above the upper bound {}; no benefit",
            income, schedule.income_upper_bound
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "schedule_resolution".to_string(),
        rule_name: "Schedule Resolution".to_string(),
        input: serde_json::json!({
            "household_type": household_type.as_str(),
            "income": income,
            "schedule": schedule
        }),
        output: serde_json::json!({
            "amount": amount,
            "band": band.as_str()
        }),
        reasoning,
    };

    ScheduleResolution {
        amount,
        band,
        audit_step,
    }
}
