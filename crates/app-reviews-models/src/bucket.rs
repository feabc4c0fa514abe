use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    Monthly,
}

impl Granularity {
    /// Axis label used by the chart series ("week" / "month")
    pub fn unit(&self) -> &'static str {
        match self {
            Granularity::Weekly => "week",
            Granularity::Monthly => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Weekly => f.write_str("weekly"),
            Granularity::Monthly => f.write_str("monthly"),
        }
    }
}

/// Sentiment over one calendar week (starting Monday) or month (starting on the 1st)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeBucket {
    pub start: NaiveDate,
    pub granularity: Granularity,
    pub review_count: usize,
    pub positive_ratio: f64, // Share of 4 and 5 star reviews
    pub negative_ratio: f64, // Share of 1 and 2 star reviews
}
