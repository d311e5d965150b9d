use crate::calendar::{self, next_day};
use crate::config::{BuildingType, ScheduleConfig};
use crate::phase::{Phase, SoilType};
use crate::task::{AdditionalInfo, Task};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MOBILISE_DURATION: i64 = 5;
pub const PERIMETER_SETUP_DURATION: i64 = 3;
pub const DEFAULT_DAILY_RATE: f64 = 100.0;
pub const DEFAULT_SOIL_TYPE: &str = "Soft/Loose Soils";
/// Perimeter type that means "no perimeter setup".
pub const PERIMETER_NONE: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid date format '{input}', expected YYYY-MM-DD")]
    InvalidStartDate { input: String },
    #[error("building type must be one of [{valid}], got '{value}'")]
    InvalidBuildingType { value: String, valid: String },
    #[error("project start date must be set before adding the {phase} phase")]
    MissingStartDate { phase: Phase },
    #[error("the {phase} phase runs past the supported calendar: {source}")]
    DateOutOfRange {
        phase: Phase,
        source: calendar::DateOutOfRange,
    },
}

impl ScheduleError {
    /// Rejected input; the builder state was left untouched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidStartDate { .. }
                | ScheduleError::InvalidBuildingType { .. }
                | ScheduleError::DateOutOfRange { .. }
        )
    }

    /// Phase operation called out of order; nothing was added.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ScheduleError::MissingStartDate { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteEstablishmentParams {
    pub mobilise_duration: i64,
    pub perimeter_type: Option<String>,
    pub site_sheds_duration: Option<i64>,
    /// Days the site sheds may start before the running cursor.
    pub site_sheds_overlap: i64,
}

impl Default for SiteEstablishmentParams {
    fn default() -> Self {
        Self {
            mobilise_duration: DEFAULT_MOBILISE_DURATION,
            perimeter_type: None,
            site_sheds_duration: None,
            site_sheds_overlap: 0,
        }
    }
}

impl SiteEstablishmentParams {
    fn perimeter(&self) -> Option<&str> {
        self.perimeter_type
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case(PERIMETER_NONE))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemolitionParams {
    pub main_duration: Option<i64>,
    pub scaffolding_required: bool,
    pub scaffolding_erection_duration: Option<i64>,
    pub scaffolding_dismantle_duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExcavationParams {
    /// Free-text soil label; unknown labels excavate at the baseline rate.
    pub soil_type: String,
    pub volume: Option<f64>,
    pub daily_rate: Option<f64>,
}

impl Default for ExcavationParams {
    fn default() -> Self {
        Self {
            soil_type: DEFAULT_SOIL_TYPE.to_string(),
            volume: None,
            daily_rate: None,
        }
    }
}

impl ExcavationParams {
    pub fn effective_rate(&self) -> f64 {
        let base = self
            .daily_rate
            .filter(|rate| *rate > 0.0)
            .unwrap_or(DEFAULT_DAILY_RATE);
        base * SoilType::factor_for_label(&self.soil_type)
    }
}

/// `max(1, round(volume / rate))`, rounding halves to even.
///
/// Oversized results saturate at `i64::MAX` and fail later as out of range.
pub fn excavation_duration(volume: f64, effective_rate: f64) -> i64 {
    let days = (volume / effective_rate).round_ties_even();
    if days.is_nan() || days < 1.0 {
        1
    } else {
        days as i64
    }
}

fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

/// `cursor - overlap`, never before the project start.
fn site_sheds_start(cursor: NaiveDate, project_start: NaiveDate, overlap: i64) -> NaiveDate {
    if overlap <= 0 {
        return cursor;
    }
    calendar::add_days(cursor, -overlap).map_or(project_start, |start| start.max(project_start))
}

/// Tasks of one phase, staged until the whole phase has been laid out.
struct PhaseDraft {
    phase: Phase,
    first_sequence: i64,
    tasks: Vec<Task>,
}

impl PhaseDraft {
    fn task(
        &self,
        ordinal: u32,
        description: impl Into<String>,
        start: NaiveDate,
        duration_days: i64,
    ) -> Result<Task, ScheduleError> {
        let sequence = self.first_sequence + self.tasks.len() as i64;
        Task::new(
            self.phase.task_id(ordinal),
            description,
            self.phase,
            start,
            duration_days,
            sequence,
        )
        .map_err(|source| self.out_of_range(source))
    }

    /// Stage `task` and return the day after it ends.
    fn push(&mut self, task: Task) -> Result<NaiveDate, ScheduleError> {
        let after = next_day(task.end_date).map_err(|source| self.out_of_range(source))?;
        self.tasks.push(task);
        Ok(after)
    }

    fn out_of_range(&self, source: calendar::DateOutOfRange) -> ScheduleError {
        warn!(phase = %self.phase, "{source}");
        ScheduleError::DateOutOfRange {
            phase: self.phase,
            source,
        }
    }
}

/// Builds one schedule by appending phases onto a single timeline.
///
/// A builder belongs to one generation run and is consumed by [`finalize`].
/// A phase that fails part way adds none of its tasks.
///
/// [`finalize`]: ScheduleBuilder::finalize
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    config: ScheduleConfig,
    tasks: Vec<Task>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn project_start_date(&self) -> Option<NaiveDate> {
        self.config.project_start_date
    }

    pub fn building_type(&self) -> Option<BuildingType> {
        self.config.building_type
    }

    pub fn set_project_start_date(&mut self, input: &str) -> Result<NaiveDate, ScheduleError> {
        let date = calendar::parse_input_date(input).ok_or_else(|| {
            ScheduleError::InvalidStartDate {
                input: input.to_string(),
            }
        })?;
        self.config.project_start_date = Some(date);
        Ok(date)
    }

    pub fn set_building_type(&mut self, value: &str) -> Result<BuildingType, ScheduleError> {
        let building_type =
            value
                .parse::<BuildingType>()
                .map_err(|_| ScheduleError::InvalidBuildingType {
                    value: value.to_string(),
                    valid: BuildingType::valid_values(),
                })?;
        self.config.building_type = Some(building_type);
        Ok(building_type)
    }

    /// Day after the latest end date so far, or the project start if empty.
    pub fn cursor(&self) -> Option<NaiveDate> {
        match self.latest_end() {
            Some(latest) => next_day(latest).ok(),
            None => self.config.project_start_date,
        }
    }

    /// Mobilisation, perimeter setup and site sheds. Returns the number of tasks added.
    pub fn add_site_establishment(
        &mut self,
        params: &SiteEstablishmentParams,
    ) -> Result<usize, ScheduleError> {
        let phase = Phase::SiteEstablishment;
        let phase_start = self.require_start_date(phase)?;
        let mut draft = self.draft(phase);
        let mut cursor = phase_start;

        if params.mobilise_duration > 0 {
            let task = draft.task(1, "Site Mobilisation", cursor, params.mobilise_duration)?;
            cursor = draft.push(task)?;
        }

        if let Some(perimeter) = params.perimeter() {
            let description = format!("Perimeter Setup - {perimeter}");
            let task = draft.task(2, description, cursor, PERIMETER_SETUP_DURATION)?;
            cursor = draft.push(task)?;
        }

        // Sheds may run alongside earlier site works; they never move the cursor.
        if let Some(duration) = positive(params.site_sheds_duration) {
            let start = site_sheds_start(cursor, phase_start, params.site_sheds_overlap);
            let task = draft.task(3, "Site Sheds Setup", start, duration)?;
            draft.push(task)?;
        }

        Ok(self.commit(draft))
    }

    /// Optional scaffolding erection, main demolition, optional dismantling.
    pub fn add_demolition_phase(
        &mut self,
        params: &DemolitionParams,
    ) -> Result<usize, ScheduleError> {
        let phase = Phase::Demolition;
        self.require_start_date(phase)?;
        let Some(main_duration) = positive(params.main_duration) else {
            warn!(phase = %phase, "no main demolition duration, skipping phase");
            return Ok(0);
        };
        let mut cursor = self.next_phase_start(phase)?;
        let mut draft = self.draft(phase);

        if params.scaffolding_required {
            if let Some(duration) = positive(params.scaffolding_erection_duration) {
                let description = "Scaffolding Erection for Demolition";
                let task = draft.task(1, description, cursor, duration)?;
                cursor = draft.push(task)?;
            }
        }

        let task = draft.task(2, "Main Demolition Works", cursor, main_duration)?;
        cursor = draft.push(task)?;

        if params.scaffolding_required {
            if let Some(duration) = positive(params.scaffolding_dismantle_duration) {
                let task = draft.task(3, "Scaffolding Dismantling", cursor, duration)?;
                draft.push(task)?;
            }
        }

        Ok(self.commit(draft))
    }

    /// One excavation task sized from volume and the soil-adjusted daily rate.
    pub fn add_excavation_phase(
        &mut self,
        params: &ExcavationParams,
    ) -> Result<usize, ScheduleError> {
        let phase = Phase::Excavation;
        self.require_start_date(phase)?;
        let Some(volume) = params.volume.filter(|v| *v > 0.0) else {
            warn!(phase = %phase, "no excavation volume, skipping phase");
            return Ok(0);
        };
        if params.soil_type.parse::<SoilType>().is_err() {
            warn!(soil_type = %params.soil_type, "unknown soil type, using factor 1.0");
        }

        let effective_rate = params.effective_rate();
        let duration = excavation_duration(volume, effective_rate);
        let cursor = self.next_phase_start(phase)?;
        let mut draft = self.draft(phase);

        let description = format!("Excavation - {}", params.soil_type);
        let task = draft
            .task(1, description, cursor, duration)?
            .with_additional_info(AdditionalInfo {
                volume,
                soil_type: params.soil_type.clone(),
                effective_rate,
            });
        draft.push(task)?;

        Ok(self.commit(draft))
    }

    /// Tasks ordered by sequence. Consumes the builder.
    pub fn finalize(self) -> Vec<Task> {
        let mut tasks = self.tasks;
        if tasks.is_empty() {
            info!("schedule finalized with no tasks");
            return tasks;
        }
        tasks.sort_by_key(|task| task.sequence);
        info!(
            tasks = tasks.len(),
            start = %tasks[0].start_date,
            "schedule finalized"
        );
        tasks
    }

    fn latest_end(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|task| task.end_date).max()
    }

    fn require_start_date(&self, phase: Phase) -> Result<NaiveDate, ScheduleError> {
        self.config.project_start_date.ok_or_else(|| {
            let err = ScheduleError::MissingStartDate { phase };
            warn!(phase = %phase, "{err}");
            err
        })
    }

    fn next_phase_start(&self, phase: Phase) -> Result<NaiveDate, ScheduleError> {
        let project_start = self.require_start_date(phase)?;
        match self.latest_end() {
            Some(latest) => next_day(latest)
                .map_err(|source| ScheduleError::DateOutOfRange { phase, source }),
            None => Ok(project_start),
        }
    }

    fn draft(&self, phase: Phase) -> PhaseDraft {
        PhaseDraft {
            phase,
            first_sequence: self.tasks.len() as i64 + 1,
            tasks: Vec::new(),
        }
    }

    fn commit(&mut self, draft: PhaseDraft) -> usize {
        for task in &draft.tasks {
            debug!(
                task_id = %task.task_id,
                start = %task.start_date,
                end = %task.end_date,
                sequence = task.sequence,
                "task added"
            );
        }
        let added = draft.tasks.len();
        self.tasks.extend(draft.tasks);
        added
    }
}
