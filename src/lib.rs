pub mod calendar;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod labels;
pub mod logging;
pub mod persistence;
pub mod phase;
pub mod report;
pub mod request;
pub mod schedule;
pub mod task;
pub mod task_validation;

pub use calendar::{format_task_date, parse_task_date};
pub use config::{BuildingType, ScheduleConfig};
pub use labels::{
    ClassifiedObject, LabelScheduleOptions, LabelSequence, LabelSequences, build_label_schedule,
};
pub use persistence::{
    PersistenceError, load_classified_objects, load_label_sequences, load_tasks_from_csv,
    load_tasks_from_json, save_tasks_to_csv, save_tasks_to_json, validate_tasks,
    write_tasks_csv, write_tasks_json,
};
pub use phase::{Phase, SoilType};
pub use report::{ScheduleSummary, render_text_table, summarize, tasks_to_dataframe};
pub use request::{RequestError, ScheduleRequest, generate_from_json};
pub use schedule::{
    DemolitionParams, ExcavationParams, ScheduleBuilder, ScheduleError, SiteEstablishmentParams,
};
pub use task::{AdditionalInfo, Task};
pub use task_validation::TaskValidationError;
