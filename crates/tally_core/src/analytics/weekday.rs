use super::Counts;
use crate::model::Task;
use time::{UtcOffset, Weekday};

/// Weekday order of the series, Sunday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayBucket {
    pub weekday: Weekday,
    pub name: &'static str,
    pub total_count: usize,
    pub completed_count: usize,
    pub completion_rate: u8,
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sunday => "Sunday",
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
    }
}

/// Classifies every record by the weekday of its creation time. Not windowed.
pub fn compute_weekday_series(records: &[Task], offset: UtcOffset) -> [WeekdayBucket; 7] {
    let mut counts = [Counts::default(); 7];

    for task in records {
        let weekday = task.created_at.to_offset(offset).weekday();
        counts[weekday.number_days_from_sunday() as usize].record(task.completed);
    }

    WEEKDAYS.map(|weekday| {
        let counts = counts[weekday.number_days_from_sunday() as usize];
        WeekdayBucket {
            weekday,
            name: weekday_name(weekday),
            total_count: counts.total,
            completed_count: counts.completed,
            completion_rate: counts.rate(),
        }
    })
}
