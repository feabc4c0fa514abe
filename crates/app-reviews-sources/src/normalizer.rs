use crate::error::{Result, SourceError};
use app_reviews_models::{
    AndroidRawReview, IosRawReview, Platform, RawReview, RawReviewRecord, StarRating, UnifiedReview,
};
use chrono::{DateTime, Utc};

/// Map a raw store record onto the unified schema.
///
/// Ratings must be integers in 1-5; anything else fails instead of skewing the aggregation.
pub fn normalize(raw: RawReview) -> Result<UnifiedReview> {
    let RawReview { record, country } = raw;

    if record.id().trim().is_empty() {
        return Err(SourceError::normalization(record.platform(), "", "review has no id"));
    }

    match record {
        RawReviewRecord::Android(review) => normalize_android(review, country),
        RawReviewRecord::Ios(review) => normalize_ios(review, country),
    }
}

/// Normalize a whole fetch result, failing on the first invalid record
pub fn normalize_all(raw: Vec<RawReview>) -> Result<Vec<UnifiedReview>> {
    raw.into_iter().map(normalize).collect()
}

fn normalize_android(review: AndroidRawReview, country: String) -> Result<UnifiedReview> {
    let rating = StarRating::try_from(review.score)
        .map_err(|e| SourceError::normalization(Platform::Android, &review.review_id, e))?;

    Ok(UnifiedReview {
        id: review.review_id,
        updated: review.at,
        title: None,
        content: review.content.unwrap_or_default(),
        rating,
        version: non_empty(review.review_created_version),
        author: review.user_name,
        platform: Platform::Android,
        country,
    })
}

fn normalize_ios(review: IosRawReview, country: String) -> Result<UnifiedReview> {
    let score: i64 = review.rating.trim().parse().map_err(|_| {
        SourceError::normalization(
            Platform::Ios,
            &review.id,
            format!("rating '{}' is not an integer", review.rating),
        )
    })?;
    let rating = StarRating::try_from(score)
        .map_err(|e| SourceError::normalization(Platform::Ios, &review.id, e))?;

    let updated = DateTime::parse_from_rfc3339(review.updated.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SourceError::normalization(
                Platform::Ios,
                &review.id,
                format!("invalid timestamp '{}': {}", review.updated, e),
            )
        })?;

    Ok(UnifiedReview {
        id: review.id,
        updated,
        title: non_empty(Some(review.title)),
        content: review.content,
        rating,
        version: non_empty(Some(review.version)),
        author: review.author,
        platform: Platform::Ios,
        country,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn android(score: i64) -> RawReview {
        RawReview::android(
            AndroidRawReview {
                at: Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap(),
                review_id: "gp:abc".to_string(),
                content: None,
                score,
                review_created_version: Some("3.2.1".to_string()),
                user_name: "Alex".to_string(),
            },
            "gb",
        )
    }

    fn ios(rating: &str) -> RawReview {
        RawReview::ios(
            IosRawReview {
                updated: "2024-02-03T04:05:06-07:00".to_string(),
                id: "10001".to_string(),
                title: "Nice".to_string(),
                content: "Works well".to_string(),
                rating: rating.to_string(),
                version: "".to_string(),
                author: "Sam".to_string(),
            },
            "us",
        )
    }

    #[test]
    fn test_normalize_android() {
        let review = normalize(android(4)).unwrap();
        assert_eq!(review.id, "gp:abc");
        assert_eq!(review.platform, Platform::Android);
        assert_eq!(review.title, None);
        assert_eq!(review.content, "");
        assert_eq!(review.rating.value(), 4);
        assert_eq!(review.version.as_deref(), Some("3.2.1"));
        assert_eq!(review.author, "Alex");
        assert_eq!(review.country, "gb");
        assert_eq!(review.updated, Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap());
    }

    #[test]
    fn test_normalize_ios() {
        let review = normalize(ios("2")).unwrap();
        assert_eq!(review.id, "10001");
        assert_eq!(review.platform, Platform::Ios);
        assert_eq!(review.title.as_deref(), Some("Nice"));
        assert_eq!(review.rating.value(), 2);
        assert_eq!(review.version, None);
        assert_eq!(review.country, "us");
        assert_eq!(review.updated, Utc.with_ymd_and_hms(2024, 2, 3, 11, 5, 6).unwrap());
    }

    #[test]
    fn test_valid_ratings_map_one_to_one() {
        for value in 1..=5 {
            assert_eq!(normalize(android(value)).unwrap().rating.value() as i64, value);
            assert_eq!(normalize(ios(&value.to_string())).unwrap().rating.value() as i64, value);
        }
        assert_eq!(normalize(ios(" 3 ")).unwrap().rating.value(), 3);
    }

    #[test]
    fn test_invalid_ratings_fail() {
        for value in [0, 6, -1] {
            assert!(matches!(normalize(android(value)), Err(SourceError::Normalization { .. })));
        }
        for value in ["0", "6", "4.5", "five", ""] {
            assert!(matches!(normalize(ios(value)), Err(SourceError::Normalization { .. })));
        }
    }

    #[test]
    fn test_missing_id_fails() {
        let mut raw = ios("5");
        if let RawReviewRecord::Ios(review) = &mut raw.record {
            review.id = " ".to_string();
        }
        assert!(matches!(normalize(raw), Err(SourceError::Normalization { .. })));
    }

    #[test]
    fn test_invalid_timestamp_fails() {
        let mut raw = ios("5");
        if let RawReviewRecord::Ios(review) = &mut raw.record {
            review.updated = "yesterday".to_string();
        }
        assert!(matches!(normalize(raw), Err(SourceError::Normalization { .. })));
    }

    #[test]
    fn test_normalize_all_fails_fast() {
        let result = normalize_all(vec![android(5), ios("9"), android(1)]);
        match result {
            Err(SourceError::Normalization { platform, id, .. }) => {
                assert_eq!(platform, Platform::Ios);
                assert_eq!(id, "10001");
            }
            other => panic!("expected normalization error, got {other:?}"),
        }

        let reviews = normalize_all(vec![android(5), ios("1")]).unwrap();
        assert_eq!(reviews.len(), 2);
    }
}
