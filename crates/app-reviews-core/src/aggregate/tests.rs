use super::*;
use app_reviews_models::{Platform, StarRating};
use chrono::TimeZone;

fn create_review(id: &str, platform: Platform, rating: i64, year: i32, month: u32, day: u32) -> UnifiedReview {
    UnifiedReview {
        id: id.to_string(),
        updated: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        title: None,
        content: "content".to_string(),
        rating: StarRating::try_from(rating).unwrap(),
        version: None,
        author: "author".to_string(),
        platform,
        country: "gb".to_string(),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[test]
fn test_week_key_round_trip() {
    // Wednesday 2024-02-28 is in ISO week 9 of 2024
    let updated = Utc.with_ymd_and_hms(2024, 2, 28, 8, 0, 0).unwrap();
    assert_eq!(week_key(&updated), 202409);
    assert_eq!(week_start_from_key(202409), Some(date(2024, 2, 26)));
    assert_eq!(week_start(&updated), date(2024, 2, 26));
}

#[test]
fn test_week_start_across_year_boundary() {
    // 2021-01-01 belongs to ISO week 53 of 2020
    let updated = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(week_key(&updated), 202053);
    assert_eq!(week_start(&updated), date(2020, 12, 28));
}

#[test]
fn test_month_start() {
    let updated = Utc.with_ymd_and_hms(2024, 7, 31, 23, 59, 59).unwrap();
    assert_eq!(month_start(&updated), date(2024, 7, 1));
}

#[test]
fn test_five_months_is_weekly() {
    let reviews: Vec<UnifiedReview> = (1..=5)
        .map(|m| create_review(&format!("r{m}"), Platform::Ios, 5, 2024, m, 15))
        .collect();

    assert_eq!(choose_granularity(&reviews), Granularity::Weekly);
    let buckets = aggregate(&[reviews]);
    assert_eq!(buckets.len(), 5);
    assert!(buckets.iter().all(|b| b.granularity == Granularity::Weekly));
}

#[test]
fn test_six_months_is_monthly() {
    let reviews: Vec<UnifiedReview> = (1..=6)
        .map(|m| create_review(&format!("r{m}"), Platform::Ios, 5, 2024, m, 15))
        .collect();

    assert_eq!(choose_granularity(&reviews), Granularity::Monthly);
    let buckets = aggregate(&[reviews]);
    let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.start).collect();
    assert_eq!(starts, (1..=6).map(|m| date(2024, m, 1)).collect::<Vec<_>>());
    assert!(buckets.iter().all(|b| b.granularity == Granularity::Monthly));
}

#[test]
fn test_bucket_ratios() {
    let reviews: Vec<UnifiedReview> = [5, 5, 4, 1, 1]
        .iter()
        .enumerate()
        .map(|(i, r)| create_review(&format!("r{i}"), Platform::Android, *r, 2024, 3, 6))
        .collect();

    let buckets = aggregate(&[reviews]);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].review_count, 5);
    assert_close(buckets[0].positive_ratio, 0.6);
    assert_close(buckets[0].negative_ratio, 0.4);
}

#[test]
fn test_neutral_ratings_count_toward_total_only() {
    let reviews = vec![
        create_review("a", Platform::Android, 3, 2024, 3, 6),
        create_review("b", Platform::Android, 3, 2024, 3, 6),
        create_review("c", Platform::Android, 5, 2024, 3, 6),
        create_review("d", Platform::Android, 2, 2024, 3, 6),
    ];

    let buckets = aggregate(&[reviews]);
    assert_close(buckets[0].positive_ratio, 0.25);
    assert_close(buckets[0].negative_ratio, 0.25);
}

#[test]
fn test_empty_input() {
    let empty: Vec<Vec<UnifiedReview>> = vec![vec![], vec![]];
    assert!(aggregate(&empty).is_empty());
    assert!(SentimentSeries::from_buckets(&[]).is_empty());
}

#[test]
fn test_zero_total_ratio_is_zero() {
    let tally = Tally::default();
    assert_eq!(tally.ratio(0), 0.0);
}

#[test]
fn test_buckets_sorted_ascending() {
    let reviews = vec![
        create_review("late", Platform::Ios, 5, 2024, 3, 20),
        create_review("early", Platform::Ios, 1, 2024, 1, 3),
        create_review("mid", Platform::Ios, 4, 2024, 2, 14),
    ];

    let buckets = aggregate(&[reviews]);
    let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert_eq!(buckets.len(), 3);
}

#[test]
fn test_merge_then_aggregate_matches_split_sets() {
    let set_a = vec![
        create_review("a1", Platform::Ios, 5, 2024, 1, 10),
        create_review("a2", Platform::Ios, 2, 2024, 2, 10),
    ];
    let set_b = vec![
        create_review("b1", Platform::Android, 4, 2024, 1, 11),
        create_review("b2", Platform::Android, 1, 2024, 3, 1),
    ];

    let split = aggregate(&[set_a.clone(), set_b.clone()]);
    let merged = aggregate(&[merge_review_sets(&[set_a, set_b])]);
    assert_eq!(split, merged);
}

#[test]
fn test_merge_keeps_colliding_ids() {
    let set_a = vec![create_review("same", Platform::Ios, 5, 2024, 1, 10)];
    let set_b = vec![create_review("same", Platform::Android, 1, 2024, 1, 10)];

    let merged = merge_review_sets(&[set_a, set_b]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].platform, Platform::Ios);
    assert_eq!(merged[1].platform, Platform::Android);
}

#[test]
fn test_two_platforms_over_two_months() {
    let ratings = [5, 5, 5, 4, 4, 3, 2, 2, 1, 1];
    let build = |platform: Platform, prefix: &str| -> Vec<UnifiedReview> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (month, day) = if i % 2 == 0 { (4, 2 + i as u32) } else { (5, 3 + i as u32) };
                create_review(&format!("{prefix}{i}"), platform, *r, 2024, month, day)
            })
            .collect()
    };
    let android = build(Platform::Android, "gp");
    let ios = build(Platform::Ios, "as");

    let buckets = aggregate(&[android, ios]);
    assert!(buckets.len() > 1);
    assert!(buckets.iter().all(|b| b.granularity == Granularity::Weekly));

    let total: usize = buckets.iter().map(|b| b.review_count).sum();
    assert_eq!(total, 20);

    let weighted_positive: f64 = buckets
        .iter()
        .map(|b| b.positive_ratio * b.review_count as f64)
        .sum::<f64>()
        / total as f64;
    let weighted_negative: f64 = buckets
        .iter()
        .map(|b| b.negative_ratio * b.review_count as f64)
        .sum::<f64>()
        / total as f64;
    assert_close(weighted_positive, 0.5);
    assert_close(weighted_negative, 0.4);
}

#[test]
fn test_sentiment_series_parallel_vectors() {
    let reviews = vec![
        create_review("a", Platform::Ios, 5, 2024, 1, 10),
        create_review("b", Platform::Ios, 1, 2024, 1, 20),
    ];
    let buckets = aggregate(&[reviews]);
    let series = SentimentSeries::from_buckets(&buckets);

    assert_eq!(series.granularity, Some(Granularity::Weekly));
    assert_eq!(series.dates, vec![date(2024, 1, 8), date(2024, 1, 15)]);
    assert_eq!(series.positive, vec![1.0, 0.0]);
    assert_eq!(series.negative, vec![0.0, 1.0]);
}
