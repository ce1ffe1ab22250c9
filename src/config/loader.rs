//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading programme
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::calculation::{AdjustmentStage, CalculationConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::ScheduleSet;

use super::types::{AdjustmentConfig, AdjustmentRules, EngineConfig, ProgramMetadata};

/// Loads and provides access to programme configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides the default schedules, adjustment rules and stage order.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/eitc_2025/
/// ├── program.yaml      # Programme metadata
/// ├── schedules.yaml    # One benefit curve per household type
/// └── adjustments.yaml  # Stage thresholds, multipliers and default order
/// ```
///
/// # Example
///
/// ```no_run
/// use eitc_engine::config::ConfigLoader;
/// use eitc_engine::models::HouseholdType;
///
/// let loader = ConfigLoader::load("./config/eitc_2025").unwrap();
///
/// let schedule = loader.schedules().get(HouseholdType::Single);
/// println!("Single maximum: {} won", schedule.max_amount);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/eitc_2025")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A schedule's thresholds are out of order
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ProgramMetadata>(&path.join("program.yaml"))?;

        let schedules_path = path.join("schedules.yaml");
        let schedules = Self::load_yaml::<ScheduleSet>(&schedules_path)?;
        schedules
            .validate()
            .map_err(|e| EngineError::ConfigParseError {
                path: schedules_path.display().to_string(),
                message: e.to_string(),
            })?;

        let adjustments = Self::load_yaml::<AdjustmentConfig>(&path.join("adjustments.yaml"))?;

        info!(
            program = %metadata.code,
            tax_year = metadata.tax_year,
            default_stages = adjustments.default_stages.len(),
            "Configuration loaded"
        );

        Ok(Self {
            config: EngineConfig::new(metadata, schedules, adjustments),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the programme metadata.
    pub fn program(&self) -> &ProgramMetadata {
        self.config.program()
    }

    /// Returns the default schedules.
    pub fn schedules(&self) -> &ScheduleSet {
        self.config.schedules()
    }

    /// Returns the adjustment rules.
    pub fn rules(&self) -> &AdjustmentRules {
        self.config.rules()
    }

    /// Returns the stages applied when a request names none.
    pub fn default_stages(&self) -> &[AdjustmentStage] {
        self.config.default_stages()
    }

    /// Builds a formula-mode calculation snapshot from the loaded defaults.
    pub fn formula_config(&self) -> CalculationConfig {
        CalculationConfig::formula(*self.schedules())
            .with_stages(self.default_stages())
            .with_rules(*self.rules())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{CalculationRequest, calculate};
    use crate::models::HouseholdType;
    use std::io::Write;

    fn config_path() -> &'static str {
        "./config/eitc_2025"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.program().code, "EITC-2025");
        assert_eq!(loader.program().tax_year, 2025);
    }

    #[test]
    fn test_loaded_schedules_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(*loader.schedules(), ScheduleSet::default());
    }

    #[test]
    fn test_loaded_rules_match_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(*loader.rules(), AdjustmentRules::default());
        assert_eq!(
            loader.default_stages(),
            &[AdjustmentStage::Asset, AdjustmentStage::LateFiling]
        );
    }

    #[test]
    fn test_formula_config_uses_loaded_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let config = loader.formula_config();

        let mut request = CalculationRequest::new(HouseholdType::DualEarner, 20_000_000);
        request.asset_value = Some(150_000_000);

        let result = calculate(&request, &config).unwrap();
        assert_eq!(result.base_amount, 3_300_000);
        assert_eq!(result.final_amount, 1_650_000);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("program.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_order_schedule_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("eitc-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["program.yaml", "adjustments.yaml"] {
            fs::copy(Path::new(config_path()).join(name), dir.join(name)).unwrap();
        }
        let mut schedules = fs::File::create(dir.join("schedules.yaml")).unwrap();
        write!(
            schedules,
            "single: {{max_amount: 1, phase_in_start: 5, plateau_start: 4, plateau_end: 6, income_upper_bound: 7}}\n\
             single_earner: {{max_amount: 1, phase_in_start: 0, plateau_start: 1, plateau_end: 2, income_upper_bound: 3}}\n\
             dual_earner: {{max_amount: 1, phase_in_start: 0, plateau_start: 1, plateau_end: 2, income_upper_bound: 3}}\n"
        )
        .unwrap();
        drop(schedules);

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.ends_with("schedules.yaml"));
                assert!(message.contains("single"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
