//! Core data models for the benefit engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod household;
mod schedule;

pub use calculation_result::{
    AdjustmentResult, AuditStep, AuditTrace, AuditWarning, CalculationResult,
};
pub use household::HouseholdType;
pub use schedule::{
    BenefitSchedule, DEFAULT_PLATEAU_SHARE_PERCENT, ScheduleOverride, ScheduleSet,
};
