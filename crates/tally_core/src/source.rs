use crate::analytics::{AggregationEngine, AnalyticsReport, Window};
use crate::error::AppError;
use crate::model::Task;
use crate::storage::json_store;
use std::path::PathBuf;

/// Producer of the current task snapshot handed to the analytics engine.
pub trait TaskRecordSource {
    fn records(&self) -> Result<Vec<Task>, AppError>;
}

impl TaskRecordSource for [Task] {
    fn records(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.to_vec())
    }
}

impl TaskRecordSource for Vec<Task> {
    fn records(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(json_store::store_path()?))
    }
}

impl TaskRecordSource for JsonFileSource {
    fn records(&self) -> Result<Vec<Task>, AppError> {
        json_store::load_tasks(&self.path)
    }
}

pub fn report_from_source<S: TaskRecordSource + ?Sized>(
    source: &S,
    engine: &AggregationEngine,
    window: Window,
    today: time::Date,
) -> Result<AnalyticsReport, AppError> {
    let records = source.records()?;
    Ok(engine.report(&records, window, today))
}
