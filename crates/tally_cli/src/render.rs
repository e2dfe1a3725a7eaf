use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tally_core::analytics::{
    AnalyticsReport, DailyBucket, PRODUCTIVITY_TIP, StatusSplit, WeekdayBucket, completion_rate,
};
use tally_core::config::Palette;
use tally_core::error::AppError;
use tally_core::model::Task;
use time::format_description::well_known::Rfc3339;

pub fn status_label(task: &Task) -> &'static str {
    if task.completed {
        "completed"
    } else {
        "pending"
    }
}

fn created_at(task: &Task) -> Result<String, AppError> {
    task.created_at
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn task_line(task: &Task) -> Result<String, AppError> {
    let category = task.category.map(|category| category.label()).unwrap_or("-");
    Ok(format!(
        "{} | {} | {} | {} | {}",
        task.id,
        task.text,
        status_label(task),
        category,
        created_at(task)?
    ))
}

pub fn tasks_plain(tasks: &[Task]) -> Result<String, AppError> {
    if tasks.is_empty() {
        return Ok("No tasks yet!".to_string());
    }

    let mut lines = Vec::with_capacity(tasks.len());
    for task in tasks {
        lines.push(task_line(task)?);
    }
    Ok(lines.join("\n"))
}

pub fn task_json(task: &Task) -> Result<Value, AppError> {
    Ok(json!({
        "id": task.id,
        "text": task.text,
        "completed": task.completed,
        "status": status_label(task),
        "category": task.category.map(|category| category.label()),
        "created_at": created_at(task)?,
    }))
}

pub fn tasks_json(tasks: &[Task]) -> Result<Value, AppError> {
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        payload.push(task_json(task)?);
    }
    Ok(Value::Array(payload))
}

pub fn summary_plain(report: &AnalyticsReport, palette: &Palette) -> String {
    let insights = &report.insights;
    let (most, least) = match insights.ranking {
        Some(ranking) => (
            ranking.most_productive.name,
            ranking.least_productive.name,
        ),
        None => ("not enough data", "not enough data"),
    };

    [
        format!(
            "Tasks: {} total, {} completed ({}%)",
            report.total_count, report.completed_count, report.completion_rate
        ),
        palette.accentize(&insights.message),
        format!("Most productive day: {most}"),
        format!("Least productive day: {least}"),
        palette.mutedize(&format!("Tip: {PRODUCTIVITY_TIP}")),
    ]
    .join("\n")
}

#[derive(Tabled)]
struct DailyRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
    #[tabled(rename = "Rate")]
    rate: String,
}

pub fn daily_table(daily: &[DailyBucket]) -> String {
    let rows = daily.iter().map(|bucket| DailyRow {
        date: bucket.date_key(),
        total: bucket.total_count,
        completed: bucket.completed_count,
        rate: format!("{}%", bucket.completion_rate),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

#[derive(Tabled)]
struct WeekdayRow {
    #[tabled(rename = "Day")]
    name: &'static str,
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Completed")]
    completed: usize,
    #[tabled(rename = "Rate")]
    rate: String,
}

pub fn weekday_table(weekday: &[WeekdayBucket]) -> String {
    let rows = weekday.iter().map(|bucket| WeekdayRow {
        name: bucket.name,
        total: bucket.total_count,
        completed: bucket.completed_count,
        rate: format!("{}%", bucket.completion_rate),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Status")]
    name: &'static str,
    #[tabled(rename = "Count")]
    value: usize,
    #[tabled(rename = "Share")]
    share: String,
}

pub fn status_table(status: &StatusSplit) -> String {
    let total = status.total();
    let rows = status.entries().into_iter().map(|entry| StatusRow {
        name: entry.status.label(),
        value: entry.value,
        share: format!("{}%", completion_rate(entry.value, total)),
    });
    Table::new(rows).with(Style::psql()).to_string()
}

pub fn daily_json(daily: &[DailyBucket]) -> Value {
    Value::Array(
        daily
            .iter()
            .map(|bucket| {
                json!({
                    "date": bucket.date_key(),
                    "total": bucket.total_count,
                    "completed": bucket.completed_count,
                    "completion_rate": bucket.completion_rate,
                })
            })
            .collect(),
    )
}

pub fn weekday_json(weekday: &[WeekdayBucket]) -> Value {
    Value::Array(
        weekday
            .iter()
            .map(|bucket| {
                json!({
                    "name": bucket.name,
                    "total": bucket.total_count,
                    "completed": bucket.completed_count,
                    "completion_rate": bucket.completion_rate,
                })
            })
            .collect(),
    )
}

pub fn status_json(status: &StatusSplit) -> Value {
    Value::Array(
        status
            .entries()
            .iter()
            .map(|entry| json!({ "name": entry.status.label(), "value": entry.value }))
            .collect(),
    )
}

pub fn report_json(report: &AnalyticsReport) -> Value {
    let ranking = report.insights.ranking;
    json!({
        "window": report.window.days(),
        "today": report.today.to_string(),
        "total_count": report.total_count,
        "completed_count": report.completed_count,
        "completion_rate": report.completion_rate,
        "tier": report.insights.tier.label(),
        "message": report.insights.message,
        "most_productive_day": ranking.map(|ranking| ranking.most_productive.name),
        "least_productive_day": ranking.map(|ranking| ranking.least_productive.name),
        "tip": PRODUCTIVITY_TIP,
        "daily": daily_json(&report.daily),
        "weekday": weekday_json(&report.weekday),
        "status": status_json(&report.status),
    })
}

#[cfg(test)]
mod tests {
    use super::{daily_table, report_json, status_table, summary_plain, task_line, tasks_plain};
    use tally_core::analytics::{AggregationEngine, Window};
    use tally_core::config::palette_for_theme;
    use tally_core::model::{Category, Task};
    use time::macros::{date, datetime};

    fn fixture() -> Vec<Task> {
        vec![
            Task {
                id: "task-1".to_string(),
                text: "stretch".to_string(),
                completed: true,
                created_at: datetime!(2025-12-15 07:00:00 UTC),
                category: Some(Category::Daily),
            },
            Task {
                id: "task-2".to_string(),
                text: "budget".to_string(),
                completed: false,
                created_at: datetime!(2025-12-19 19:00:00 UTC),
                category: None,
            },
        ]
    }

    #[test]
    fn task_line_shows_status_and_category() {
        let tasks = fixture();

        assert_eq!(
            task_line(&tasks[0]).unwrap(),
            "task-1 | stretch | completed | daily | 2025-12-15T07:00:00Z"
        );
        assert!(task_line(&tasks[1]).unwrap().contains("| pending | - |"));
        assert_eq!(tasks_plain(&[]).unwrap(), "No tasks yet!");
    }

    #[test]
    fn summary_without_data_reports_missing_ranking() {
        let report = AggregationEngine::default().report(&[], Window::Week, date!(2025 - 12 - 20));

        let text = summary_plain(&report, &palette_for_theme(None));

        assert!(text.contains("Tasks: 0 total, 0 completed (0%)"));
        assert!(text.contains("Consider breaking tasks into smaller steps."));
        assert!(text.contains("Most productive day: not enough data"));
    }

    #[test]
    fn tables_include_every_bucket() {
        let report =
            AggregationEngine::default().report(&fixture(), Window::Week, date!(2025 - 12 - 20));

        let daily = daily_table(&report.daily);
        assert!(daily.contains("2025-12-14"));
        assert!(daily.contains("2025-12-20"));
        assert!(daily.contains("100%"));

        let status = status_table(&report.status);
        assert!(status.contains("Completed"));
        assert!(status.contains("Pending"));
        assert!(status.contains("50%"));
    }

    #[test]
    fn report_json_exposes_views_and_ranking() {
        let report =
            AggregationEngine::default().report(&fixture(), Window::Week, date!(2025 - 12 - 20));

        let value = report_json(&report);

        assert_eq!(value["window"], 7);
        assert_eq!(value["today"], "2025-12-20");
        assert_eq!(value["completion_rate"], 50);
        assert_eq!(value["tier"], "developing");
        assert_eq!(value["daily"].as_array().unwrap().len(), 7);
        assert_eq!(value["weekday"].as_array().unwrap().len(), 7);
        assert_eq!(value["status"][0]["name"], "Completed");
        assert_eq!(value["status"][0]["value"], 1);
        // 2025-12-15 is a Monday, 2025-12-19 a Friday.
        assert_eq!(value["most_productive_day"], "Monday");
        assert_eq!(value["least_productive_day"], "Friday");
    }
}
