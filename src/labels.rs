//! Schedules derived from classified object labels.
//!
//! Every label maps to a sequence number; each sequence step occupies a fixed
//! block of days counted from a base date. Unlike [`ScheduleBuilder`] tasks,
//! label tasks that share a sequence number run in parallel.
//!
//! [`ScheduleBuilder`]: crate::ScheduleBuilder

use crate::calendar::{DateOutOfRange, add_days};
use crate::phase::Phase;
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

pub const DEFAULT_DAYS_PER_SEQUENCE: i64 = 7;
pub const UNKNOWN_FLOOR: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSequence {
    pub description: String,
    pub sequence: i64,
}

/// Label code to description and sequence, e.g. `"KO.01"`.
pub type LabelSequences = BTreeMap<String, LabelSequence>;

/// One classified object; only the label matters for scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedObject {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelScheduleOptions {
    pub base_date: NaiveDate,
    pub days_per_sequence: i64,
}

impl Default for LabelScheduleOptions {
    fn default() -> Self {
        Self {
            base_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            days_per_sequence: DEFAULT_DAYS_PER_SEQUENCE,
        }
    }
}

pub fn build_label_schedule(
    sequences: &LabelSequences,
    objects: &[ClassifiedObject],
    options: &LabelScheduleOptions,
) -> Vec<Task> {
    let days_per_sequence = options.days_per_sequence.max(1);

    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for label in objects.iter().filter_map(|o| o.label.as_deref()) {
        *counts.entry(label).or_default() += 1;
    }

    let mut ordered: BTreeSet<(i64, &str)> = BTreeSet::new();
    for code in counts.keys().copied() {
        match sequences.get(code) {
            Some(entry) => {
                ordered.insert((entry.sequence, code));
            }
            None => warn!(code = %code, "label has no sequence mapping, skipping"),
        }
    }

    let tasks: Vec<Task> = ordered
        .into_iter()
        .filter_map(|(sequence, code)| {
            let entry = sequences.get(code)?;
            let task = label_task(code, entry, options.base_date, days_per_sequence);
            match task {
                Ok(mut task) => {
                    task.object_count = counts.get(code).copied();
                    Some(task)
                }
                Err(err) => {
                    warn!(code = %code, sequence, "label dates out of range, skipping: {err}");
                    None
                }
            }
        })
        .collect();

    info!(
        mappings = sequences.len(),
        objects = objects.len(),
        tasks = tasks.len(),
        "label schedule built"
    );
    tasks
}

/// Task for one label code, starting `(sequence - 1) * days_per_sequence` after the base date.
fn label_task(
    code: &str,
    entry: &LabelSequence,
    base_date: NaiveDate,
    days_per_sequence: i64,
) -> Result<Task, DateOutOfRange> {
    let offset = entry
        .sequence
        .checked_sub(1)
        .and_then(|steps| steps.checked_mul(days_per_sequence))
        .ok_or(DateOutOfRange {
            start: base_date,
            days: i64::MAX,
        })?;
    let start = add_days(base_date, offset)?;
    let mut task = Task::new(
        code,
        entry.description.clone(),
        Phase::Construction,
        start,
        days_per_sequence,
        entry.sequence,
    )?;
    task.object_code = Some(code.to_string());
    task.floor = Some(UNKNOWN_FLOOR.to_string());
    Ok(task)
}
