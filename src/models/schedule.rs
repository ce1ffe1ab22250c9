//! Benefit schedule models.
//!
//! A [`BenefitSchedule`] is the five-threshold parameter set that defines one
//! household type's phase-in, plateau and phase-out curve. A [`ScheduleSet`]
//! holds one schedule per [`HouseholdType`], so lookups are exhaustive.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::HouseholdType;

/// Share of the plateau-start to upper-bound distance covered by the plateau
/// in the built-in defaults, in percent.
pub const DEFAULT_PLATEAU_SHARE_PERCENT: i64 = 35;

/// The benefit curve parameters for a single household type.
///
/// All values are whole won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitSchedule {
    /// The benefit paid across the plateau.
    pub max_amount: i64,
    /// Income at which the benefit starts rising from zero.
    pub phase_in_start: i64,
    /// Income at which the benefit reaches `max_amount`.
    pub plateau_start: i64,
    /// Last income paid at `max_amount`.
    pub plateau_end: i64,
    /// Income at or above which nothing is paid.
    pub income_upper_bound: i64,
}

impl BenefitSchedule {
    /// Creates a schedule and validates its threshold ordering.
    pub fn new(
        household_type: HouseholdType,
        max_amount: i64,
        phase_in_start: i64,
        plateau_start: i64,
        plateau_end: i64,
        income_upper_bound: i64,
    ) -> EngineResult<Self> {
        let schedule = Self {
            max_amount,
            phase_in_start,
            plateau_start,
            plateau_end,
            income_upper_bound,
        };
        schedule.validate(household_type)?;
        Ok(schedule)
    }

    /// Creates a schedule whose plateau covers the first 35% of the distance
    /// between `plateau_start` and `income_upper_bound`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eitc_engine::models::BenefitSchedule;
    ///
    /// let schedule =
    ///     BenefitSchedule::with_derived_plateau_end(1_650_000, 4_000_000, 9_000_000, 22_000_000);
    /// assert_eq!(schedule.plateau_end, 13_550_000);
    /// ```
    pub fn with_derived_plateau_end(
        max_amount: i64,
        phase_in_start: i64,
        plateau_start: i64,
        income_upper_bound: i64,
    ) -> Self {
        let start = i128::from(plateau_start);
        let derived = start
            + (i128::from(income_upper_bound) - start) * i128::from(DEFAULT_PLATEAU_SHARE_PERCENT)
                / 100;
        let plateau_end = i64::try_from(derived).unwrap_or(income_upper_bound);
        Self {
            max_amount,
            phase_in_start,
            plateau_start,
            plateau_end,
            income_upper_bound,
        }
    }

    /// Checks `0 <= phase_in_start <= plateau_start <= plateau_end <= income_upper_bound`
    /// and a non-negative maximum.
    ///
    /// Zero-width phase-in and phase-out spans pass validation; the resolver
    /// handles them with guarded branches.
    pub fn validate(&self, household_type: HouseholdType) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::InvalidSchedule {
            household_type: household_type.to_string(),
            message: message.to_string(),
        };

        if self.max_amount < 0 {
            return Err(invalid("max_amount must not be negative"));
        }
        if self.phase_in_start < 0 {
            return Err(invalid("phase_in_start must not be negative"));
        }
        if self.phase_in_start > self.plateau_start {
            return Err(invalid("phase_in_start must not exceed plateau_start"));
        }
        if self.plateau_start > self.plateau_end {
            return Err(invalid("plateau_start must not exceed plateau_end"));
        }
        if self.plateau_end > self.income_upper_bound {
            return Err(invalid("plateau_end must not exceed income_upper_bound"));
        }
        Ok(())
    }

    /// Returns true if the phase-in span has zero width.
    pub fn has_degenerate_phase_in(&self) -> bool {
        self.plateau_start == self.phase_in_start
    }

    /// Returns true if the phase-out span has zero width.
    pub fn has_degenerate_phase_out(&self) -> bool {
        self.income_upper_bound == self.plateau_end
    }
}

/// Partial replacement values for a [`BenefitSchedule`].
///
/// Fields left as `None` keep the base schedule's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    /// Replacement maximum amount.
    #[serde(default)]
    pub max_amount: Option<i64>,
    /// Replacement phase-in start.
    #[serde(default)]
    pub phase_in_start: Option<i64>,
    /// Replacement plateau start.
    #[serde(default)]
    pub plateau_start: Option<i64>,
    /// Replacement plateau end.
    #[serde(default)]
    pub plateau_end: Option<i64>,
    /// Replacement income upper bound.
    #[serde(default)]
    pub income_upper_bound: Option<i64>,
}

impl ScheduleOverride {
    /// Applies the override to `base`, returning a new validated schedule.
    pub fn apply(
        &self,
        household_type: HouseholdType,
        base: &BenefitSchedule,
    ) -> EngineResult<BenefitSchedule> {
        BenefitSchedule::new(
            household_type,
            self.max_amount.unwrap_or(base.max_amount),
            self.phase_in_start.unwrap_or(base.phase_in_start),
            self.plateau_start.unwrap_or(base.plateau_start),
            self.plateau_end.unwrap_or(base.plateau_end),
            self.income_upper_bound.unwrap_or(base.income_upper_bound),
        )
    }
}

/// One benefit schedule per household type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSet {
    /// Schedule for single-person households.
    pub single: BenefitSchedule,
    /// Schedule for single-earner households.
    pub single_earner: BenefitSchedule,
    /// Schedule for dual-earner households.
    pub dual_earner: BenefitSchedule,
}

impl Default for ScheduleSet {
    fn default() -> Self {
        Self {
            single: BenefitSchedule::with_derived_plateau_end(
                1_650_000, 4_000_000, 9_000_000, 22_000_000,
            ),
            single_earner: BenefitSchedule::with_derived_plateau_end(
                2_850_000, 7_000_000, 14_000_000, 32_000_000,
            ),
            dual_earner: BenefitSchedule::with_derived_plateau_end(
                3_300_000, 8_000_000, 17_000_000, 44_000_000,
            ),
        }
    }
}

impl ScheduleSet {
    /// Returns the schedule for a household type.
    pub fn get(&self, household_type: HouseholdType) -> &BenefitSchedule {
        match household_type {
            HouseholdType::Single => &self.single,
            HouseholdType::SingleEarner => &self.single_earner,
            HouseholdType::DualEarner => &self.dual_earner,
        }
    }

    /// Validates every schedule in the set.
    pub fn validate(&self) -> EngineResult<()> {
        for household_type in HouseholdType::ALL {
            self.get(household_type).validate(household_type)?;
        }
        Ok(())
    }

    /// Returns a copy of this set with one household's schedule overridden.
    ///
    /// The receiver is left untouched, so a shared default set can be
    /// specialised per request.
    pub fn with_override(
        &self,
        household_type: HouseholdType,
        schedule_override: &ScheduleOverride,
    ) -> EngineResult<Self> {
        let schedule = schedule_override.apply(household_type, self.get(household_type))?;
        let mut updated = *self;
        match household_type {
            HouseholdType::Single => updated.single = schedule,
            HouseholdType::SingleEarner => updated.single_earner = schedule,
            HouseholdType::DualEarner => updated.dual_earner = schedule,
        }
        Ok(updated)
    }
}
