use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stage of construction work a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "Site Establishment")]
    SiteEstablishment,
    Demolition,
    Excavation,
    /// Tasks derived from classified object labels.
    Construction,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::SiteEstablishment => "Site Establishment",
            Phase::Demolition => "Demolition",
            Phase::Excavation => "Excavation",
            Phase::Construction => "Construction",
        }
    }

    /// Prefix used for task ids, e.g. `SE` in `SE.01`.
    pub fn code(&self) -> &'static str {
        match self {
            Phase::SiteEstablishment => "SE",
            Phase::Demolition => "DM",
            Phase::Excavation => "EX",
            Phase::Construction => "CO",
        }
    }

    pub fn task_id(&self, ordinal: u32) -> String {
        format!("{}.{:02}", self.code(), ordinal)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Site Establishment" => Ok(Phase::SiteEstablishment),
            "Demolition" => Ok(Phase::Demolition),
            "Excavation" => Ok(Phase::Excavation),
            "Construction" => Ok(Phase::Construction),
            _ => Err(()),
        }
    }
}

/// Excavation soil classes and their productivity factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilType {
    SoftLoose,
    Medium,
    HardDense,
    Rock,
}

impl SoilType {
    pub const ALL: [SoilType; 4] = [
        SoilType::SoftLoose,
        SoilType::Medium,
        SoilType::HardDense,
        SoilType::Rock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::SoftLoose => "Soft/Loose Soils",
            SoilType::Medium => "Medium Soils",
            SoilType::HardDense => "Hard/Dense Soils",
            SoilType::Rock => "Rock",
        }
    }

    /// Multiplier applied to the baseline daily excavation rate.
    pub fn factor(&self) -> f64 {
        match self {
            SoilType::SoftLoose => 1.0,
            SoilType::Medium => 0.8,
            SoilType::HardDense => 0.6,
            SoilType::Rock => 0.3,
        }
    }

    /// Factor for a free-text soil label; unrecognised labels get 1.0.
    pub fn factor_for_label(label: &str) -> f64 {
        label.parse::<SoilType>().map_or(1.0, |soil| soil.factor())
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}
