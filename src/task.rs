use crate::calendar::{DateOutOfRange, end_date_for, format_task_date, parse_task_date};
use crate::phase::Phase;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Phase-specific values carried through for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub volume: f64,
    pub soil_type: String,
    /// Daily rate after the soil factor was applied.
    #[serde(rename = "daily_rate")]
    pub effective_rate: f64,
}

/// One dated line item of a schedule.
///
/// Serialized field names and the date text layout are shared with the chart
/// renderers that consume exported schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    #[serde(rename = "object_description")]
    pub description: String,
    #[serde(with = "task_date")]
    pub start_date: NaiveDate,
    #[serde(with = "task_date")]
    pub end_date: NaiveDate,
    #[serde(rename = "duration")]
    pub duration_days: i64,
    pub phase: Phase,
    pub sequence: i64,
    pub is_child: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<AdditionalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_count: Option<u32>,
}

impl Task {
    /// Build a leaf task; the end date follows from start and duration.
    ///
    /// Fails when the end date falls outside the representable calendar.
    pub fn new(
        task_id: impl Into<String>,
        description: impl Into<String>,
        phase: Phase,
        start_date: NaiveDate,
        duration_days: i64,
        sequence: i64,
    ) -> Result<Self, DateOutOfRange> {
        Ok(Self {
            task_id: task_id.into(),
            description: description.into(),
            start_date,
            end_date: end_date_for(start_date, duration_days)?,
            duration_days,
            phase,
            sequence,
            is_child: true,
            additional_info: None,
            object_code: None,
            floor: None,
            object_count: None,
        })
    }

    pub fn with_additional_info(mut self, info: AdditionalInfo) -> Self {
        self.additional_info = Some(info);
        self
    }

    pub fn start_date_text(&self) -> String {
        format_task_date(self.start_date)
    }

    pub fn end_date_text(&self) -> String {
        format_task_date(self.end_date)
    }
}

mod task_date {
    use super::{format_task_date, parse_task_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_task_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_task_date(&raw).map_err(serde::de::Error::custom)
    }
}
