use chrono::NaiveDate;
use construction_schedule::{
    ClassifiedObject, LabelScheduleOptions, LabelSequence, LabelSequences, Phase,
    build_label_schedule, task_validation::validate_task_collection,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sequences() -> LabelSequences {
    let mut map = LabelSequences::new();
    for (code, description, sequence) in [
        ("KO.01", "Foundations", 1),
        ("KO.02", "Slabs", 2),
        ("KO.03", "Columns", 2),
        ("KO.04", "Roof", 4),
    ] {
        map.insert(
            code.to_string(),
            LabelSequence {
                description: description.to_string(),
                sequence,
            },
        );
    }
    map
}

fn objects(labels: &[Option<&str>]) -> Vec<ClassifiedObject> {
    labels
        .iter()
        .map(|label| ClassifiedObject {
            label: label.map(str::to_string),
        })
        .collect()
}

#[test]
fn one_task_per_used_label_with_counts() {
    let tasks = build_label_schedule(
        &sequences(),
        &objects(&[Some("KO.02"), Some("KO.01"), Some("KO.02"), Some("KO.04"), None]),
        &LabelScheduleOptions::default(),
    );
    validate_task_collection(&tasks).unwrap();

    let summary: Vec<_> = tasks
        .iter()
        .map(|t| (t.task_id.as_str(), t.sequence, t.object_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("KO.01", 1, Some(1)),
            ("KO.02", 2, Some(2)),
            ("KO.04", 4, Some(1)),
        ]
    );
    for task in &tasks {
        assert_eq!(task.phase, Phase::Construction);
        assert_eq!(task.object_code.as_deref(), Some(task.task_id.as_str()));
        assert_eq!(task.floor.as_deref(), Some("N/A"));
        assert_eq!(task.duration_days, 7);
    }
}

#[test]
fn start_dates_step_by_sequence_block() {
    let tasks = build_label_schedule(
        &sequences(),
        &objects(&[Some("KO.01"), Some("KO.03"), Some("KO.04")]),
        &LabelScheduleOptions::default(),
    );
    assert_eq!(tasks[0].start_date, d(2024, 1, 1));
    assert_eq!(tasks[0].end_date, d(2024, 1, 7));
    assert_eq!(tasks[1].start_date, d(2024, 1, 8));
    // sequence 3 is unused, the gap stays
    assert_eq!(tasks[2].start_date, d(2024, 1, 22));
}

#[test]
fn custom_base_date_and_block_length() {
    let options = LabelScheduleOptions {
        base_date: d(2025, 9, 1),
        days_per_sequence: 3,
    };
    let tasks = build_label_schedule(&sequences(), &objects(&[Some("KO.02")]), &options);
    assert_eq!(tasks[0].start_date, d(2025, 9, 4));
    assert_eq!(tasks[0].end_date, d(2025, 9, 6));
}

#[test]
fn non_positive_block_length_counts_as_one_day() {
    let options = LabelScheduleOptions {
        base_date: d(2024, 1, 1),
        days_per_sequence: 0,
    };
    let tasks = build_label_schedule(&sequences(), &objects(&[Some("KO.04")]), &options);
    assert_eq!(tasks[0].start_date, d(2024, 1, 4));
    assert_eq!(tasks[0].duration_days, 1);
}

#[test]
fn unmapped_and_missing_labels_are_skipped() {
    let tasks = build_label_schedule(
        &sequences(),
        &objects(&[Some("ZZ.99"), None, Some("")]),
        &LabelScheduleOptions::default(),
    );
    assert!(tasks.is_empty());
}

#[test]
fn no_objects_yield_empty_schedule() {
    assert!(build_label_schedule(&sequences(), &[], &LabelScheduleOptions::default()).is_empty());
    assert!(
        build_label_schedule(
            &LabelSequences::new(),
            &objects(&[Some("KO.01")]),
            &LabelScheduleOptions::default()
        )
        .is_empty()
    );
}
