//! Calculation logic for the benefit engine.
//!
//! This module contains the base amount sources (schedule resolution and
//! table interpolation), the independent adjustment stages (asset-based
//! reduction, late-filing penalty, senior age bonus), the pipeline that runs
//! them in a caller-chosen order, and the [`calculate`] entry point.

mod age_bonus;
mod asset_adjustment;
mod facade;
mod late_filing;
mod multiplier;
mod pipeline;
mod schedule_resolver;
mod table_interpolator;

pub use age_bonus::apply_age_bonus;
pub use asset_adjustment::{ASSET_EXCEEDED_LABEL, ASSET_NORMAL_LABEL, apply_asset_adjustment};
pub use facade::{
    CalculationConfig, CalculationRequest, CalculationSource, calculate, maximum_benefit,
};
pub use late_filing::apply_late_filing_adjustment;
pub use pipeline::{AdjustmentContext, AdjustmentStage, PipelineResult, apply_adjustments};
pub use schedule_resolver::{
    IncomeBand, ScheduleResolution, income_band, resolve, resolve_with_audit,
};
pub use table_interpolator::{
    SamplePoint, ScheduleTable, TableInterpolation, interpolate, interpolate_with_audit,
};
