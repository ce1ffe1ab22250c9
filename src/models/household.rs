//! Household type model.
//!
//! This module defines the [`HouseholdType`] enum that selects which benefit
//! schedule applies to a calculation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The household composition used to select a benefit schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdType {
    /// A single-person household (단독).
    Single,
    /// A household with a spouse or dependants and one earner (홑벌이).
    SingleEarner,
    /// A household where both spouses earn (맞벌이).
    DualEarner,
}

impl HouseholdType {
    /// Every household type, in schedule order.
    pub const ALL: [HouseholdType; 3] = [
        HouseholdType::Single,
        HouseholdType::SingleEarner,
        HouseholdType::DualEarner,
    ];

    /// Returns the snake_case identifier used in configuration and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            HouseholdType::Single => "single",
            HouseholdType::SingleEarner => "single_earner",
            HouseholdType::DualEarner => "dual_earner",
        }
    }

    /// Returns the Korean label used on official forms and uploaded tables.
    pub fn korean_label(&self) -> &'static str {
        match self {
            HouseholdType::Single => "단독",
            HouseholdType::SingleEarner => "홑벌이",
            HouseholdType::DualEarner => "맞벌이",
        }
    }
}

impl fmt::Display for HouseholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses snake_case identifiers, CamelCase names and the Korean labels.
///
/// # Examples
///
/// ```
/// use eitc_engine::models::HouseholdType;
///
/// assert_eq!("single_earner".parse::<HouseholdType>().unwrap(), HouseholdType::SingleEarner);
/// assert_eq!("맞벌이".parse::<HouseholdType>().unwrap(), HouseholdType::DualEarner);
/// assert!("triple".parse::<HouseholdType>().is_err());
/// ```
impl FromStr for HouseholdType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single" | "Single" | "단독" => Ok(HouseholdType::Single),
            "single_earner" | "SingleEarner" | "홑벌이" => Ok(HouseholdType::SingleEarner),
            "dual_earner" | "DualEarner" | "맞벌이" => Ok(HouseholdType::DualEarner),
            other => Err(EngineError::InvalidHouseholdType {
                label: other.to_string(),
            }),
        }
    }
}
