use crate::error::Result;
use app_reviews_models::{Platform, RawReview};
use async_trait::async_trait;

/// Retrieves raw reviews for one app from one store, following that store's pagination.
///
/// Pages are requested strictly one after another; later requests depend on earlier responses.
#[async_trait]
pub trait ReviewFetcher: Send + Sync {
    fn platform(&self) -> Platform;

    async fn fetch(&self, app_id: &str, country: &str, limit: Option<usize>) -> Result<Vec<RawReview>>;
}
