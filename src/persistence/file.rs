use super::{PersistenceError, PersistenceResult};
use crate::{
    Phase, Task,
    calendar::{format_task_date, parse_task_date},
    labels::{ClassifiedObject, LabelSequences},
    task::AdditionalInfo,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn write_tasks_json<W: Write>(tasks: &[Task], writer: W) -> PersistenceResult<()> {
    super::validate_tasks(tasks)?;
    serde_json::to_writer_pretty(writer, tasks)?;
    Ok(())
}

pub fn save_tasks_to_json<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_tasks_json(tasks, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let file = File::open(path)?;
    let tasks: Vec<Task> = serde_json::from_reader(BufReader::new(file))?;
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

pub fn load_label_sequences<P: AsRef<Path>>(path: P) -> PersistenceResult<LabelSequences> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn load_classified_objects<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<ClassifiedObject>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    task_id: String,
    object_description: String,
    start_date: String,
    end_date: String,
    duration: i64,
    phase: String,
    sequence: i64,
    is_child: bool,
    #[serde(default)]
    volume: String,
    #[serde(default)]
    soil_type: String,
    #[serde(default)]
    daily_rate: String,
    #[serde(default)]
    object_code: String,
    #[serde(default)]
    floor: String,
    #[serde(default)]
    object_count: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord {
            task_id: task.task_id.clone(),
            object_description: task.description.clone(),
            start_date: format_task_date(task.start_date),
            end_date: format_task_date(task.end_date),
            duration: task.duration_days,
            phase: task.phase.as_str().to_string(),
            sequence: task.sequence,
            is_child: task.is_child,
            ..TaskCsvRecord::default()
        };
        if let Some(info) = &task.additional_info {
            record.volume = info.volume.to_string();
            record.soil_type = info.soil_type.clone();
            record.daily_rate = info.effective_rate.to_string();
        }
        record.object_code = task.object_code.clone().unwrap_or_default();
        record.floor = task.floor.clone().unwrap_or_default();
        record.object_count = task
            .object_count
            .map(|count| count.to_string())
            .unwrap_or_default();
        record
    }
}

impl TaskCsvRecord {
    fn into_task(self) -> PersistenceResult<Task> {
        let phase = self.phase.parse::<Phase>().map_err(|_| {
            PersistenceError::InvalidData(format!("invalid phase '{}'", self.phase))
        })?;
        let additional_info = if self.volume.trim().is_empty() {
            None
        } else {
            Some(AdditionalInfo {
                volume: parse_f64(&self.volume)?,
                soil_type: self.soil_type,
                effective_rate: parse_f64(&self.daily_rate)?,
            })
        };
        let object_count = if self.object_count.trim().is_empty() {
            None
        } else {
            Some(self.object_count.trim().parse::<u32>().map_err(|e| {
                PersistenceError::InvalidData(format!(
                    "invalid object_count '{}': {e}",
                    self.object_count
                ))
            })?)
        };

        Ok(Task {
            task_id: self.task_id,
            description: self.object_description,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            duration_days: self.duration,
            phase,
            sequence: self.sequence,
            is_child: self.is_child,
            additional_info,
            object_code: parse_string_option(self.object_code),
            floor: parse_string_option(self.floor),
            object_count,
        })
    }
}

pub fn write_tasks_csv<W: Write>(tasks: &[Task], writer: W) -> PersistenceResult<()> {
    super::validate_tasks(tasks)?;
    let mut writer = csv::Writer::from_writer(writer);
    for task in tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_tasks_to_csv<P: AsRef<Path>>(tasks: &[Task], path: P) -> PersistenceResult<()> {
    write_tasks_csv(tasks, File::create(path)?)
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<Task>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        tasks.push(record?.into_task()?);
    }
    super::validate_tasks(&tasks)?;
    Ok(tasks)
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    parse_task_date(input).map_err(|e| PersistenceError::InvalidData(e.to_string()))
}

fn parse_f64(input: &str) -> PersistenceResult<f64> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|e| PersistenceError::InvalidData(format!("invalid float '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
