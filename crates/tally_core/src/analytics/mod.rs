//! Completion analytics over a snapshot of task records.
//!
//! Every view is recomputed from scratch on each call. "Today" is always an
//! explicit argument so identical inputs give identical output; the reference
//! offset held by [`AggregationEngine`] decides which calendar day and weekday
//! a timestamp belongs to.

mod daily;
mod insights;
mod status;
mod weekday;

pub use daily::{DailyBucket, compute_daily_series};
pub use insights::{
    CompletionTier, Insights, PRODUCTIVITY_TIP, ProductivityRanking, derive_insights,
    rank_weekdays,
};
pub use status::{StatusEntry, StatusSplit, compute_status_split};
pub use weekday::{WEEKDAYS, WeekdayBucket, compute_weekday_series, weekday_name};

use crate::error::AppError;
use crate::model::Task;
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::debug;

/// Trailing day span of the daily view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Window {
    Week,
    Fortnight,
    #[default]
    Month,
    Quarter,
}

impl Window {
    pub const ALL: [Window; 4] = [
        Window::Week,
        Window::Fortnight,
        Window::Month,
        Window::Quarter,
    ];

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Fortnight => 14,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for Window {
    type Error = AppError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|window| window.days() == days)
            .ok_or(AppError::InvalidWindow(days))
    }
}

impl FromStr for Window {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let days = raw.trim().parse::<u32>().map_err(|_| {
            AppError::invalid_input(format!("window must be a number of days: '{raw}'"))
        })?;
        Self::try_from(days)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// `round(completed / total * 100)` with halves rounded up, `0` for an empty total.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((completed * 200 + total) / (total * 2)) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    total: usize,
    completed: usize,
}

impl Counts {
    fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }

    fn rate(&self) -> u8 {
        completion_rate(self.completed, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub window: Window,
    pub today: Date,
    pub total_count: usize,
    pub completed_count: usize,
    pub completion_rate: u8,
    pub daily: Vec<DailyBucket>,
    pub weekday: [WeekdayBucket; 7],
    pub status: StatusSplit,
    pub insights: Insights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationEngine {
    offset: UtcOffset,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl AggregationEngine {
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Current calendar date in the engine's reference offset.
    pub fn today(&self) -> Date {
        OffsetDateTime::now_utc().to_offset(self.offset).date()
    }

    pub fn compute_daily_series(
        &self,
        records: &[Task],
        window: Window,
        today: Date,
    ) -> Vec<DailyBucket> {
        compute_daily_series(records, window, today, self.offset)
    }

    pub fn compute_weekday_series(&self, records: &[Task]) -> [WeekdayBucket; 7] {
        compute_weekday_series(records, self.offset)
    }

    pub fn compute_status_split(&self, records: &[Task]) -> StatusSplit {
        compute_status_split(records)
    }

    pub fn report(&self, records: &[Task], window: Window, today: Date) -> AnalyticsReport {
        let daily = self.compute_daily_series(records, window, today);
        let weekday = self.compute_weekday_series(records);
        let status = self.compute_status_split(records);
        let completion_rate = completion_rate(status.completed, status.total());
        let insights = derive_insights(&weekday, completion_rate);

        debug!(
            records = records.len(),
            window = window.days(),
            %today,
            completion_rate,
            "computed analytics report"
        );

        AnalyticsReport {
            window,
            today,
            total_count: status.total(),
            completed_count: status.completed,
            completion_rate,
            daily,
            weekday,
            status,
            insights,
        }
    }
}
