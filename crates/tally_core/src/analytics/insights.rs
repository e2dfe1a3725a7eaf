use super::WeekdayBucket;

pub const PRODUCTIVITY_TIP: &str =
    "Based on your patterns, consider scheduling important tasks for your most productive days.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTier {
    Excellent,
    Developing,
    NeedsAttention,
}

impl CompletionTier {
    /// Bands are checked in order: above 70, then above 40, then everything else.
    pub fn from_rate(rate: u8) -> Self {
        if rate > 70 {
            Self::Excellent
        } else if rate > 40 {
            Self::Developing
        } else {
            Self::NeedsAttention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Developing => "developing",
            Self::NeedsAttention => "needs attention",
        }
    }

    pub fn message(self, rate: u8) -> String {
        match self {
            Self::Excellent => {
                format!("Great job! Your task completion rate is excellent at {rate}%.")
            }
            Self::Developing => {
                format!("You're making progress with a {rate}% completion rate. Keep it up!")
            }
            Self::NeedsAttention => format!(
                "Your task completion rate is {rate}%. Consider breaking tasks into smaller steps."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductivityRanking {
    pub most_productive: WeekdayBucket,
    pub least_productive: WeekdayBucket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insights {
    pub completion_rate: u8,
    pub tier: CompletionTier,
    pub message: String,
    /// `None` when no weekday has any tasks.
    pub ranking: Option<ProductivityRanking>,
}

pub fn derive_insights(weekday_series: &[WeekdayBucket], completion_rate: u8) -> Insights {
    let tier = CompletionTier::from_rate(completion_rate);
    Insights {
        completion_rate,
        tier,
        message: tier.message(completion_rate),
        ranking: rank_weekdays(weekday_series),
    }
}

/// Highest and lowest completion rate among weekdays that have tasks.
/// Ties keep the earlier weekday in series order.
pub fn rank_weekdays(weekday_series: &[WeekdayBucket]) -> Option<ProductivityRanking> {
    let mut active = weekday_series
        .iter()
        .filter(|bucket| bucket.total_count > 0);
    let first = active.next()?;

    let mut most = first;
    let mut least = first;
    for bucket in active {
        if bucket.completion_rate > most.completion_rate {
            most = bucket;
        }
        if bucket.completion_rate < least.completion_rate {
            least = bucket;
        }
    }

    Some(ProductivityRanking {
        most_productive: *most,
        least_productive: *least,
    })
}

#[cfg(test)]
mod tests {
    use super::{CompletionTier, derive_insights, rank_weekdays};
    use crate::analytics::{WEEKDAYS, WeekdayBucket, weekday_name};
    use time::Weekday;

    fn series(rates: [(usize, u8); 7]) -> [WeekdayBucket; 7] {
        let mut index = 0;
        WEEKDAYS.map(|weekday| {
            let (total_count, completion_rate) = rates[index];
            index += 1;
            WeekdayBucket {
                weekday,
                name: weekday_name(weekday),
                total_count,
                completed_count: 0,
                completion_rate,
            }
        })
    }

    #[test]
    fn tier_boundaries_are_exclusive_at_the_top_of_each_band() {
        assert_eq!(CompletionTier::from_rate(100), CompletionTier::Excellent);
        assert_eq!(CompletionTier::from_rate(71), CompletionTier::Excellent);
        assert_eq!(CompletionTier::from_rate(70), CompletionTier::Developing);
        assert_eq!(CompletionTier::from_rate(41), CompletionTier::Developing);
        assert_eq!(CompletionTier::from_rate(40), CompletionTier::NeedsAttention);
        assert_eq!(CompletionTier::from_rate(0), CompletionTier::NeedsAttention);
    }

    #[test]
    fn messages_embed_the_rate() {
        let insights = derive_insights(&series([(0, 0); 7]), 55);

        assert_eq!(insights.tier, CompletionTier::Developing);
        assert_eq!(
            insights.message,
            "You're making progress with a 55% completion rate. Keep it up!"
        );
    }

    #[test]
    fn empty_weekdays_are_not_ranked() {
        assert!(rank_weekdays(&series([(0, 0); 7])).is_none());

        // Sunday has no tasks, so its zero rate must not win "least productive".
        let ranking = rank_weekdays(&series([
            (0, 0),
            (3, 60),
            (0, 0),
            (2, 50),
            (0, 0),
            (4, 75),
            (0, 0),
        ]))
        .unwrap();

        assert_eq!(ranking.most_productive.weekday, Weekday::Friday);
        assert_eq!(ranking.least_productive.weekday, Weekday::Wednesday);
    }

    #[test]
    fn ties_keep_the_first_weekday() {
        let ranking = rank_weekdays(&series([
            (1, 50),
            (1, 80),
            (1, 20),
            (1, 80),
            (1, 20),
            (1, 50),
            (1, 50),
        ]))
        .unwrap();

        assert_eq!(ranking.most_productive.weekday, Weekday::Monday);
        assert_eq!(ranking.least_productive.weekday, Weekday::Tuesday);
    }

    #[test]
    fn single_active_weekday_is_both_most_and_least() {
        let mut rates = [(0, 0); 7];
        rates[4] = (2, 50);

        let ranking = rank_weekdays(&series(rates)).unwrap();

        assert_eq!(ranking.most_productive.weekday, Weekday::Thursday);
        assert_eq!(ranking.least_productive.weekday, Weekday::Thursday);
    }
}
