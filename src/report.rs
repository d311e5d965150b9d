use crate::calendar::{date_from_i32, date_to_i32, format_task_date, span_days};
use crate::phase::Phase;
use crate::task::Task;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub task_count: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub first_start: Option<NaiveDate>,
    pub last_end: Option<NaiveDate>,
    /// Calendar days from first start to last end, inclusive.
    pub span_days: i64,
    pub total_objects: u64,
    pub phases: Vec<PhaseSummary>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        if let (Some(start), Some(end)) = (self.first_start, self.last_end) {
            parts.push(format!(
                "range={}..{}",
                format_task_date(start),
                format_task_date(end)
            ));
            parts.push(format!("days={}", self.span_days));
        }
        if self.total_objects > 0 {
            parts.push(format!("objects={}", self.total_objects));
        }
        if !self.phases.is_empty() {
            let phases = self
                .phases
                .iter()
                .map(|p| format!("{}:{}", p.phase.code(), p.task_count))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("phases={}", phases));
        }
        parts.join(", ")
    }
}

pub fn summarize(tasks: &[Task]) -> ScheduleSummary {
    let first_start = tasks.iter().map(|t| t.start_date).min();
    let last_end = tasks.iter().map(|t| t.end_date).max();
    let span = match (first_start, last_end) {
        (Some(start), Some(end)) => span_days(start, end),
        _ => 0,
    };

    let mut by_phase: BTreeMap<Phase, PhaseSummary> = BTreeMap::new();
    for task in tasks {
        by_phase
            .entry(task.phase)
            .and_modify(|summary| {
                summary.task_count += 1;
                summary.start = summary.start.min(task.start_date);
                summary.end = summary.end.max(task.end_date);
            })
            .or_insert(PhaseSummary {
                phase: task.phase,
                task_count: 1,
                start: task.start_date,
                end: task.end_date,
            });
    }

    ScheduleSummary {
        task_count: tasks.len(),
        first_start,
        last_end,
        span_days: span,
        total_objects: tasks
            .iter()
            .filter_map(|t| t.object_count)
            .map(u64::from)
            .sum(),
        phases: by_phase.into_values().collect(),
    }
}

pub fn tasks_to_dataframe(tasks: &[Task]) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(10);

    let ids: Vec<&str> = tasks.iter().map(|t| t.task_id.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("task_id"), ids).into_column());

    let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("description"), descriptions).into_column());

    let phases: Vec<&str> = tasks.iter().map(|t| t.phase.as_str()).collect();
    columns.push(Series::new(PlSmallStr::from_static("phase"), phases).into_column());

    let sequences: Vec<i64> = tasks.iter().map(|t| t.sequence).collect();
    columns.push(Series::new(PlSmallStr::from_static("sequence"), sequences).into_column());

    let starts: Vec<NaiveDate> = tasks.iter().map(|t| t.start_date).collect();
    columns.push(series_from_dates("start_date", &starts)?.into_column());

    let ends: Vec<NaiveDate> = tasks.iter().map(|t| t.end_date).collect();
    columns.push(series_from_dates("end_date", &ends)?.into_column());

    let durations: Vec<i64> = tasks.iter().map(|t| t.duration_days).collect();
    columns.push(Series::new(PlSmallStr::from_static("duration_days"), durations).into_column());

    let is_child: Vec<bool> = tasks.iter().map(|t| t.is_child).collect();
    columns.push(Series::new(PlSmallStr::from_static("is_child"), is_child).into_column());

    let codes: Vec<Option<&str>> = tasks.iter().map(|t| t.object_code.as_deref()).collect();
    columns.push(Series::new(PlSmallStr::from_static("object_code"), codes).into_column());

    let counts: Vec<Option<i64>> = tasks
        .iter()
        .map(|t| t.object_count.map(i64::from))
        .collect();
    columns.push(Series::new(PlSmallStr::from_static("object_count"), counts).into_column());

    DataFrame::new(columns)
}

fn series_from_dates(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
    let days: Vec<i32> = dates.iter().copied().map(date_to_i32).collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

fn render_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Date(days) => date_from_i32(*days)
            .map(format_task_date)
            .unwrap_or_else(|| days.to_string()),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Boxed text table, one row per dataframe row.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| {
                col.as_materialized_series()
                    .get(row_idx)
                    .map(|av| render_cell(&av))
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, row: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in row.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}
