use serde::{Deserialize, Serialize};
use std::fmt;

/// Star rating in the range 1-5, shared by both stores
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "i64", into = "u8")]
pub struct StarRating(u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRating(pub i64);

impl fmt::Display for InvalidRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rating {} is outside 1-5", self.0)
    }
}

impl std::error::Error for InvalidRating {}

impl StarRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 4 and 5 star reviews
    pub fn is_positive(&self) -> bool {
        self.0 >= 4
    }

    /// 1 and 2 star reviews
    pub fn is_negative(&self) -> bool {
        self.0 <= 2
    }
}

impl TryFrom<i64> for StarRating {
    type Error = InvalidRating;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(InvalidRating(value))
        }
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
