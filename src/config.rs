use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    #[serde(rename = "Highrise Residential")]
    HighriseResidential,
    Commercial,
    Industrial,
    Other,
}

impl BuildingType {
    pub const ALL: [BuildingType; 4] = [
        BuildingType::HighriseResidential,
        BuildingType::Commercial,
        BuildingType::Industrial,
        BuildingType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingType::HighriseResidential => "Highrise Residential",
            BuildingType::Commercial => "Commercial",
            BuildingType::Industrial => "Industrial",
            BuildingType::Other => "Other",
        }
    }

    /// Valid labels joined for error messages.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|t| format!("'{}'", t.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// Project level settings for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub project_start_date: Option<NaiveDate>,
    /// Informational only; never used in duration math.
    pub building_type: Option<BuildingType>,
}
