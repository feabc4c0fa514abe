use app_reviews_models::{Granularity, TimeBucket, UnifiedReview};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Data spanning at most this many calendar months is bucketed by week
pub const WEEKLY_MAX_MONTHS: usize = 5;

/// Concatenate review sets in order. Ids are not compared across sets.
pub fn merge_review_sets<S: AsRef<[UnifiedReview]>>(sets: &[S]) -> Vec<UnifiedReview> {
    sets.iter()
        .flat_map(|set| set.as_ref().iter().cloned())
        .collect()
}

/// `iso_year * 100 + iso_week`, e.g. 202409 for the ninth ISO week of 2024
pub fn week_key(updated: &DateTime<Utc>) -> i32 {
    let week = updated.iso_week();
    week.year() * 100 + week.week() as i32
}

/// Monday of the ISO week named by a [`week_key`]
pub fn week_start_from_key(key: i32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(key / 100, (key % 100) as u32, Weekday::Mon)
}

pub fn week_start(updated: &DateTime<Utc>) -> NaiveDate {
    // Every key built from a real date maps back to a real Monday
    week_start_from_key(week_key(updated)).unwrap_or_else(|| updated.date_naive())
}

pub fn month_start(updated: &DateTime<Utc>) -> NaiveDate {
    updated.date_naive().with_day(1).unwrap_or_else(|| updated.date_naive())
}

/// Weekly when the reviews cover few enough distinct months, monthly otherwise
pub fn choose_granularity<'a>(reviews: impl IntoIterator<Item = &'a UnifiedReview>) -> Granularity {
    let months: BTreeSet<NaiveDate> = reviews.into_iter().map(|r| month_start(&r.updated)).collect();
    if months.len() <= WEEKLY_MAX_MONTHS {
        Granularity::Weekly
    } else {
        Granularity::Monthly
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: usize,
    positive: usize,
    negative: usize,
}

impl Tally {
    fn ratio(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64
        }
    }
}

/// Bucket all review sets by week or month and compute the share of positive (4-5)
/// and negative (1-2) reviews per bucket, ascending by bucket start.
///
/// Granularity is chosen once for the whole input, never per bucket.
pub fn aggregate<S: AsRef<[UnifiedReview]>>(sets: &[S]) -> Vec<TimeBucket> {
    let reviews = || sets.iter().flat_map(|set| set.as_ref().iter());

    // Pick week or month from the span of the merged set
    let granularity = choose_granularity(reviews());

    // Count per bucket start; BTreeMap keeps the buckets ascending
    let mut tallies: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for review in reviews() {
        let start = match granularity {
            Granularity::Weekly => week_start(&review.updated),
            Granularity::Monthly => month_start(&review.updated),
        };
        let tally = tallies.entry(start).or_default();
        tally.total += 1;
        // Rating 3 counts toward the total only
        if review.rating.is_positive() {
            tally.positive += 1;
        } else if review.rating.is_negative() {
            tally.negative += 1;
        }
    }

    // ratio() yields 0.0 for an empty tally
    tallies
        .into_iter()
        .map(|(start, tally)| TimeBucket {
            start,
            granularity,
            review_count: tally.total,
            positive_ratio: tally.ratio(tally.positive),
            negative_ratio: tally.ratio(tally.negative),
        })
        .collect()
}

/// Chart input: an ascending time axis with two parallel ratio series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentSeries {
    pub granularity: Option<Granularity>,
    pub dates: Vec<NaiveDate>,
    pub positive: Vec<f64>,
    pub negative: Vec<f64>,
}

impl SentimentSeries {
    pub fn from_buckets(buckets: &[TimeBucket]) -> Self {
        Self {
            granularity: buckets.first().map(|b| b.granularity),
            dates: buckets.iter().map(|b| b.start).collect(),
            positive: buckets.iter().map(|b| b.positive_ratio).collect(),
            negative: buckets.iter().map(|b| b.negative_ratio).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests;
