use super::{Counts, Window};
use crate::model::Task;
use time::macros::format_description;
use time::{Date, Duration, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBucket {
    pub date: Date,
    pub total_count: usize,
    pub completed_count: usize,
    pub completion_rate: u8,
}

impl DailyBucket {
    /// Canonical `YYYY-MM-DD` key for the bucket's date.
    pub fn date_key(&self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.date
            .format(&format)
            .unwrap_or_else(|_| self.date.to_string())
    }
}

/// One bucket per day from `today - (days - 1)` through `today`, oldest first.
///
/// Records whose local creation date falls outside the window are skipped.
pub fn compute_daily_series(
    records: &[Task],
    window: Window,
    today: Date,
    offset: UtcOffset,
) -> Vec<DailyBucket> {
    let days = window.days() as usize;
    let start = today - Duration::days(days as i64 - 1);
    let mut counts = vec![Counts::default(); days];

    for task in records {
        let date = task.created_at.to_offset(offset).date();
        if let Some(index) = day_index(start, date, days) {
            counts[index].record(task.completed);
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(index, counts)| DailyBucket {
            date: start + Duration::days(index as i64),
            total_count: counts.total,
            completed_count: counts.completed,
            completion_rate: counts.rate(),
        })
        .collect()
}

fn day_index(start: Date, date: Date, days: usize) -> Option<usize> {
    let offset = (date - start).whole_days();
    if offset < 0 {
        return None;
    }
    let index = offset as usize;
    (index < days).then_some(index)
}
