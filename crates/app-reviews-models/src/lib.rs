pub mod bucket;
pub mod platform;
pub mod rating;
pub mod raw;
pub mod review;

pub use bucket::{Granularity, TimeBucket};
pub use platform::Platform;
pub use rating::{InvalidRating, StarRating};
pub use raw::{AndroidRawReview, IosRawReview, RawReview, RawReviewRecord};
pub use review::UnifiedReview;
