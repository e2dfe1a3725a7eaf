use crate::analytics::{AggregationEngine, AnalyticsReport, Window};
use crate::error::AppError;
use crate::model::{Category, Task};
use crate::source::{JsonFileSource, report_from_source};
use crate::storage::json_store;
use std::path::Path;
use time::OffsetDateTime;
use tracing::debug;

pub fn add_task(text: &str, category: Option<Category>) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, text, category)
}

pub fn toggle_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    toggle_task_with_path(&path, id)
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, id)
}

pub fn list_tasks() -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    list_tasks_with_path(&path)
}

pub fn get_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    get_task_with_path(&path, id)
}

/// Loads the current store snapshot and aggregates it as of the engine's today.
pub fn analytics_report(
    engine: &AggregationEngine,
    window: Window,
) -> Result<AnalyticsReport, AppError> {
    let source = JsonFileSource::from_env()?;
    report_from_source(&source, engine, window, engine.today())
}

fn add_task_with_path(
    path: &Path,
    text: &str,
    category: Option<Category>,
) -> Result<Task, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("text is required"));
    }

    let created_at = OffsetDateTime::now_utc();
    let mut tasks = json_store::load_tasks(path)?;
    let id = next_task_id(&tasks, created_at);

    let task = Task {
        id,
        text: trimmed.to_string(),
        completed: false,
        created_at,
        category,
    };

    tasks.push(task.clone());
    json_store::save_tasks(path, &tasks)?;
    debug!(id = %task.id, "added task");

    Ok(task)
}

fn next_task_id(tasks: &[Task], created_at: OffsetDateTime) -> String {
    let mut nanos = created_at.unix_timestamp_nanos();
    loop {
        let candidate = format!("task-{nanos}");
        if !tasks.iter().any(|task| task.id == candidate) {
            return candidate;
        }
        nanos += 1;
    }
}

fn toggle_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let trimmed_id = required_id(id)?;

    let mut tasks = json_store::load_tasks(path)?;
    let task = tasks
        .iter_mut()
        .find(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;
    task.completed = !task.completed;
    let updated = task.clone();

    json_store::save_tasks(path, &tasks)?;
    debug!(id = %updated.id, completed = updated.completed, "toggled task");

    Ok(updated)
}

fn delete_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let trimmed_id = required_id(id)?;

    let mut tasks = json_store::load_tasks(path)?;
    let index = tasks
        .iter()
        .position(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;

    let removed = tasks.remove(index);
    json_store::save_tasks(path, &tasks)?;
    debug!(id = %removed.id, "deleted task");

    Ok(removed)
}

/// Newest first; tasks created at the same instant keep store order.
fn list_tasks_with_path(path: &Path) -> Result<Vec<Task>, AppError> {
    let mut tasks = json_store::load_tasks(path)?;
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tasks)
}

fn get_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let trimmed_id = required_id(id)?;

    json_store::load_tasks(path)?
        .into_iter()
        .find(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn required_id(id: &str) -> Result<&str, AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed_id)
}

#[cfg(test)]
mod tests {
    use super::{
        add_task_with_path, delete_task_with_path, get_task_with_path, list_tasks_with_path,
        next_task_id, toggle_task_with_path,
    };
    use crate::model::{Category, Task};
    use crate::storage::json_store;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::macros::datetime;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tally-{nanos}-{file_name}"))
    }

    fn sample_task(id: &str, created_at: time::OffsetDateTime) -> Task {
        Task {
            id: id.to_string(),
            text: "demo".to_string(),
            completed: false,
            created_at,
            category: None,
        }
    }

    #[test]
    fn add_task_rejects_blank_text() {
        let path = temp_path("blank-text.json");
        let err = add_task_with_path(&path, "  ", None).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn add_task_trims_and_writes_to_store() {
        let path = temp_path("add-task.json");
        let task = add_task_with_path(&path, "  buy milk ", Some(Category::Daily)).unwrap();
        let loaded = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(task.text, "buy milk");
        assert!(!task.completed);
        assert!(task.id.starts_with("task-"));
        assert_eq!(loaded, vec![task]);
    }

    #[test]
    fn next_task_id_skips_taken_ids() {
        let created_at = datetime!(2025-12-20 00:00:00 UTC);
        let taken = format!("task-{}", created_at.unix_timestamp_nanos());
        let tasks = vec![sample_task(&taken, created_at)];

        let id = next_task_id(&tasks, created_at);

        assert_ne!(id, taken);
        assert_eq!(
            id,
            format!("task-{}", created_at.unix_timestamp_nanos() + 1)
        );
    }

    #[test]
    fn toggle_task_flips_completion_both_ways() {
        let path = temp_path("toggle.json");
        let task = sample_task("task-1", datetime!(2025-12-20 00:00:00 UTC));
        json_store::save_tasks(&path, &[task.clone()]).unwrap();

        let first = toggle_task_with_path(&path, "task-1").unwrap();
        let second = toggle_task_with_path(&path, " task-1 ").unwrap();
        let loaded = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(first.completed);
        assert!(!second.completed);
        assert!(!loaded[0].completed);
        assert_eq!(loaded[0].created_at, task.created_at);
    }

    #[test]
    fn toggle_task_rejects_missing_and_blank_ids() {
        let path = temp_path("toggle-missing.json");
        json_store::save_tasks(&path, &[]).unwrap();

        let missing = toggle_task_with_path(&path, "task-9").unwrap_err();
        let blank = toggle_task_with_path(&path, "  ").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(missing.code(), "invalid_input");
        assert_eq!(missing.message(), "task not found");
        assert_eq!(blank.message(), "id is required");
    }

    #[test]
    fn delete_task_removes_task() {
        let path = temp_path("delete.json");
        let tasks = vec![
            sample_task("task-1", datetime!(2025-12-19 00:00:00 UTC)),
            sample_task("task-2", datetime!(2025-12-20 00:00:00 UTC)),
        ];
        json_store::save_tasks(&path, &tasks).unwrap();

        let removed = delete_task_with_path(&path, "task-1").unwrap();
        let loaded = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(removed.id, "task-1");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "task-2");
    }

    #[test]
    fn delete_task_rejects_missing_id() {
        let path = temp_path("delete-missing.json");
        json_store::save_tasks(&path, &[]).unwrap();

        let err = delete_task_with_path(&path, "task-1").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn list_tasks_orders_newest_first() {
        let path = temp_path("list.json");
        let tasks = vec![
            sample_task("old", datetime!(2025-12-01 00:00:00 UTC)),
            sample_task("new", datetime!(2025-12-20 00:00:00 UTC)),
            sample_task("mid", datetime!(2025-12-10 00:00:00 UTC)),
        ];
        json_store::save_tasks(&path, &tasks).unwrap();

        let listed = list_tasks_with_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let ids: Vec<&str> = listed.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn get_task_returns_task_or_error() {
        let path = temp_path("get.json");
        let task = sample_task("task-1", datetime!(2025-12-20 00:00:00 UTC));
        json_store::save_tasks(&path, std::slice::from_ref(&task)).unwrap();

        let fetched = get_task_with_path(&path, "task-1").unwrap();
        let err = get_task_with_path(&path, "task-2").unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(fetched, task);
        assert_eq!(err.code(), "invalid_input");
    }
}
