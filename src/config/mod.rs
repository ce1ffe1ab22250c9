//! Configuration loading and management for the benefit engine.
//!
//! This module loads programme configuration from YAML files (metadata,
//! per-household schedules, adjustment rules) and sampled schedule tables
//! from CSV.
//!
//! # Example
//!
//! ```no_run
//! use eitc_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/eitc_2025").unwrap();
//! println!("Loaded programme: {}", config.program().name);
//! ```

mod loader;
mod table_loader;
mod types;

pub use loader::ConfigLoader;
pub use table_loader::{
    REQUIRED_COLUMNS, SkippedRow, TableLoadReport, TableParseMode, load_schedule_table,
    load_schedule_table_file,
};
pub use types::{
    AdjustmentConfig, AdjustmentRules, AgeBonusRules, AssetRules, EngineConfig, LateFilingRules,
    ProgramMetadata,
};
