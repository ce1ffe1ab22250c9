//! Application state for the benefit engine API.
//!
//! Every request starts from the programme defaults held here. Handlers copy
//! what they need into a per-request snapshot, so overrides never reach the
//! shared state.

use std::sync::Arc;

use crate::calculation::{AdjustmentStage, maximum_benefit};
use crate::config::{AdjustmentRules, ConfigLoader};
use crate::models::{HouseholdType, ScheduleSet};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the programme's schedules before any request override.
    pub fn schedules(&self) -> &ScheduleSet {
        self.config.schedules()
    }

    /// Returns the adjustment thresholds and multipliers.
    pub fn rules(&self) -> &AdjustmentRules {
        self.config.rules()
    }

    /// Returns the stages run when a request names none.
    pub fn default_stages(&self) -> &[AdjustmentStage] {
        self.config.default_stages()
    }

    /// Returns the most a household can receive under the loaded programme.
    pub fn maximum_benefit(&self, household_type: HouseholdType, age: Option<u32>) -> i64 {
        maximum_benefit(household_type, age, self.schedules(), self.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(ConfigLoader::load("./config/eitc_2025").unwrap())
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_default_stages_come_from_adjustments_file() {
        assert_eq!(
            state().default_stages(),
            &[AdjustmentStage::Asset, AdjustmentStage::LateFiling]
        );
    }

    #[test]
    fn test_maximum_benefit_uses_loaded_schedules() {
        let state = state();
        assert_eq!(state.maximum_benefit(HouseholdType::DualEarner, None), 3_300_000);
        assert_eq!(
            state.maximum_benefit(HouseholdType::Single, Some(65)),
            1_815_000
        );
        assert_eq!(state.schedules().single.max_amount, 1_650_000);
    }

    #[test]
    fn test_clones_share_configuration() {
        let state = state();
        let clone = state.clone();
        assert!(std::ptr::eq(state.config(), clone.config()));
    }
}
