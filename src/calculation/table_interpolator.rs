//! Benefit lookup from a sampled schedule table.
//!
//! This module computes a benefit by linear interpolation between externally
//! supplied `(income, amount)` sample points, clamping flat beyond both ends.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, HouseholdType};

/// One `(income, amount)` sample belonging to a household type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// The household type this sample belongs to.
    pub household_type: HouseholdType,
    /// The sampled income.
    pub income: i64,
    /// The benefit paid at `income`.
    pub amount: i64,
}

/// A non-empty set of sample points covering one or more household types.
///
/// Points are kept in input order; [`ScheduleTable::points_for`] sorts them.
/// Serializes as a plain array of sample points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SamplePoint>", into = "Vec<SamplePoint>")]
pub struct ScheduleTable {
    points: Vec<SamplePoint>,
}

impl ScheduleTable {
    /// Creates a table from sample points.
    ///
    /// Returns `InvalidScheduleTable` if `points` is empty.
    pub fn new(points: Vec<SamplePoint>) -> EngineResult<Self> {
        if points.is_empty() {
            return Err(EngineError::InvalidScheduleTable {
                message: "table contains no sample points".to_string(),
            });
        }
        Ok(Self { points })
    }

    /// Returns all sample points in input order.
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Returns the household types that have at least one sample.
    pub fn household_types(&self) -> BTreeSet<HouseholdType> {
        self.points.iter().map(|p| p.household_type).collect()
    }

    /// Returns the samples for one household type, sorted ascending by income.
    ///
    /// The sort is stable, so duplicate incomes keep their input order.
    pub fn points_for(&self, household_type: HouseholdType) -> Vec<SamplePoint> {
        let mut points: Vec<SamplePoint> = self
            .points
            .iter()
            .filter(|p| p.household_type == household_type)
            .copied()
            .collect();
        points.sort_by_key(|p| p.income);
        points
    }
}

impl TryFrom<Vec<SamplePoint>> for ScheduleTable {
    type Error = EngineError;

    fn try_from(points: Vec<SamplePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ScheduleTable> for Vec<SamplePoint> {
    fn from(table: ScheduleTable) -> Self {
        table.points
    }
}

/// The result of a table interpolation, including the audit step.
#[derive(Debug, Clone)]
pub struct TableInterpolation {
    /// The interpolated benefit amount.
    pub amount: i64,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// How an interpolated amount was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    NoSamples,
    ClampedLow(SamplePoint),
    ClampedHigh(SamplePoint),
    Between(SamplePoint, SamplePoint),
}

fn lookup(income: i64, points: &[SamplePoint]) -> (i64, Lookup) {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return (0, Lookup::NoSamples);
    };

    if income <= first.income {
        return (first.amount, Lookup::ClampedLow(*first));
    }
    if income >= last.income {
        return (last.amount, Lookup::ClampedHigh(*last));
    }

    for pair in points.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if lower.income <= income && income <= upper.income {
            let span = i128::from(upper.income) - i128::from(lower.income);
            if span == 0 {
                return (lower.amount, Lookup::Between(lower, upper));
            }
            // y0 + (x - x0) * (y1 - y0) / (x1 - x0), as one exact quotient.
            let rise = i128::from(upper.amount) - i128::from(lower.amount);
            let numerator = i128::from(lower.amount)
                .checked_mul(span)
                .zip((i128::from(income) - i128::from(lower.income)).checked_mul(rise))
                .and_then(|(base, delta)| base.checked_add(delta));
            let amount = numerator
                .and_then(|numerator| i64::try_from(numerator / span).ok())
                .unwrap_or(lower.amount);
            return (amount, Lookup::Between(lower, upper));
        }
    }

    // Unreachable for sorted points: first.income < income < last.income.
    (0, Lookup::NoSamples)
}

/// Interpolates the benefit for an income from a schedule table.
///
/// Returns `0` when the table has no samples for `household_type`. Incomes at
/// or beyond either end return that end's amount. Between samples the amount
/// is linearly interpolated and truncated toward zero.
///
/// # Examples
///
/// ```
/// use eitc_engine::calculation::{interpolate, SamplePoint, ScheduleTable};
/// use eitc_engine::models::HouseholdType;
///
/// let table = ScheduleTable::new(vec![
///     SamplePoint { household_type: HouseholdType::Single, income: 9_000_000, amount: 1_650_000 },
///     SamplePoint { household_type: HouseholdType::Single, income: 4_000_000, amount: 0 },
/// ])
/// .unwrap();
///
/// assert_eq!(interpolate(6_500_000, HouseholdType::Single, &table), 825_000);
/// assert_eq!(interpolate(1_000_000, HouseholdType::Single, &table), 0);
/// assert_eq!(interpolate(6_500_000, HouseholdType::DualEarner, &table), 0);
/// ```
pub fn interpolate(income: i64, household_type: HouseholdType, table: &ScheduleTable) -> i64 {
    lookup(income, &table.points_for(household_type)).0
}

/// Interpolates the benefit and records an audit step.
pub fn interpolate_with_audit(
    income: i64,
    household_type: HouseholdType,
    table: &ScheduleTable,
    step_number: u32,
) -> TableInterpolation {
    let points = table.points_for(household_type);
    let (amount, how) = lookup(income, &points);

    let (method, reasoning) = match how {
        Lookup::NoSamples => (
            "no_samples",
            format!("Table has no samples for {}; no benefit", household_type),
        ),
        Lookup::ClampedLow(point) => (
            "clamped_low",
            format!(
                "Income {} is at or below the lowest sample {}; using {}",
                income, point.income, point.amount
            ),
        ),
        Lookup::ClampedHigh(point) => (
            "clamped_high",
            format!(
                "Income {} is at or above the highest sample {}; using {}",
                income, point.income, point.amount
            ),
        ),
        Lookup::Between(lower, upper) => (
            "interpolated",
            format!(
                "Between ({}, {}) and ({}, {}): {}",
                lower.income, lower.amount, upper.income, upper.amount, amount
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "table_interpolation".to_string(),
        rule_name: "Table Interpolation".to_string(),
        input: serde_json::json!({
            "household_type": household_type.as_str(),
            "income": income,
            "sample_count": points.len()
        }),
        output: serde_json::json!({
            "amount": amount,
            "method": method
        }),
        reasoning,
    };

    TableInterpolation { amount, audit_step }
}
