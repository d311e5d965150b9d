//! JSON request payload and the fixed phase pipeline that turns it into tasks.

use crate::schedule::{
    DEFAULT_DAILY_RATE, DEFAULT_MOBILISE_DURATION, DEFAULT_SOIL_TYPE, DemolitionParams,
    ExcavationParams, PERIMETER_NONE, ScheduleBuilder, ScheduleError, SiteEstablishmentParams,
};
use crate::task::Task;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Start date used when the payload does not name one.
pub const DEFAULT_PROJECT_START_DATE: &str = "2024-01-01";
pub const DEFAULT_DEMOLITION_DURATION: i64 = 10;
pub const DEFAULT_SCAFFOLDING_ERECTION_DURATION: i64 = 3;
pub const DEFAULT_SCAFFOLDING_DISMANTLE_DURATION: i64 = 2;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid JSON parameters: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default)]
    pub project_start_date: Option<String>,
    #[serde(default)]
    pub building_type: Option<String>,
    #[serde(default)]
    pub site_establishment: Option<SiteEstablishmentRequest>,
    #[serde(default)]
    pub demolition: Option<DemolitionRequest>,
    #[serde(default)]
    pub excavation: Option<ExcavationRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteEstablishmentRequest {
    pub enabled: bool,
    pub mobilise_duration: i64,
    pub perimeter_type: String,
    pub site_sheds: SiteShedsRequest,
}

impl Default for SiteEstablishmentRequest {
    fn default() -> Self {
        Self {
            enabled: false,
            mobilise_duration: DEFAULT_MOBILISE_DURATION,
            perimeter_type: PERIMETER_NONE.to_string(),
            site_sheds: SiteShedsRequest::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteShedsRequest {
    pub enabled: bool,
    pub duration: i64,
    pub overlap: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemolitionRequest {
    pub enabled: bool,
    pub duration: i64,
    pub scaffolding: ScaffoldingRequest,
}

impl Default for DemolitionRequest {
    fn default() -> Self {
        Self {
            enabled: false,
            duration: DEFAULT_DEMOLITION_DURATION,
            scaffolding: ScaffoldingRequest::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScaffoldingRequest {
    pub enabled: bool,
    pub erection_duration: i64,
    pub dismantle_duration: i64,
}

impl Default for ScaffoldingRequest {
    fn default() -> Self {
        Self {
            enabled: false,
            erection_duration: DEFAULT_SCAFFOLDING_ERECTION_DURATION,
            dismantle_duration: DEFAULT_SCAFFOLDING_DISMANTLE_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExcavationRequest {
    pub enabled: bool,
    pub soil_type: String,
    pub volume: f64,
    pub daily_rate: f64,
}

impl Default for ExcavationRequest {
    fn default() -> Self {
        Self {
            enabled: false,
            soil_type: DEFAULT_SOIL_TYPE.to_string(),
            volume: 0.0,
            daily_rate: DEFAULT_DAILY_RATE,
        }
    }
}

impl SiteEstablishmentRequest {
    pub fn to_params(&self) -> SiteEstablishmentParams {
        SiteEstablishmentParams {
            mobilise_duration: self.mobilise_duration,
            perimeter_type: Some(self.perimeter_type.clone()),
            site_sheds_duration: self.site_sheds.enabled.then_some(self.site_sheds.duration),
            site_sheds_overlap: self.site_sheds.overlap,
        }
    }
}

impl DemolitionRequest {
    pub fn to_params(&self) -> DemolitionParams {
        DemolitionParams {
            main_duration: Some(self.duration),
            scaffolding_required: self.scaffolding.enabled,
            scaffolding_erection_duration: Some(self.scaffolding.erection_duration),
            scaffolding_dismantle_duration: Some(self.scaffolding.dismantle_duration),
        }
    }
}

impl ExcavationRequest {
    pub fn to_params(&self) -> ExcavationParams {
        ExcavationParams {
            soil_type: self.soil_type.clone(),
            volume: Some(self.volume),
            daily_rate: Some(self.daily_rate),
        }
    }
}

impl ScheduleRequest {
    pub fn from_json(text: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(text)?)
    }

    fn start_date(&self) -> &str {
        self.project_start_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_PROJECT_START_DATE)
    }

    /// Run enabled phases in site, demolition, excavation order.
    ///
    /// An invalid start date aborts the run; an invalid building type is
    /// logged and ignored.
    pub fn generate(&self) -> Result<Vec<Task>, RequestError> {
        let mut builder = ScheduleBuilder::new();
        builder.set_project_start_date(self.start_date())?;

        if let Some(building_type) = &self.building_type {
            if let Err(err) = builder.set_building_type(building_type) {
                warn!("{err}");
            }
        }

        if let Some(site) = self.site_establishment.as_ref().filter(|p| p.enabled) {
            builder.add_site_establishment(&site.to_params())?;
        }
        if let Some(demolition) = self.demolition.as_ref().filter(|p| p.enabled) {
            builder.add_demolition_phase(&demolition.to_params())?;
        }
        if let Some(excavation) = self.excavation.as_ref().filter(|p| p.enabled) {
            builder.add_excavation_phase(&excavation.to_params())?;
        }

        let tasks = builder.finalize();
        info!(tasks = tasks.len(), "schedule generated from request");
        Ok(tasks)
    }
}

pub fn generate_from_json(text: &str) -> Result<Vec<Task>, RequestError> {
    ScheduleRequest::from_json(text)?.generate()
}
