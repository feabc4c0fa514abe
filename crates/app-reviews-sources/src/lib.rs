pub mod error;
pub mod itunes;
pub mod markup;
pub mod normalizer;
pub mod page;
pub mod play;
pub mod resolver;
pub mod similar;
pub mod traits;

pub use error::SourceError;
pub use itunes::{IosReviewSource, ItunesRssSource, PagedRssFetcher};
pub use markup::{Document, MarkupMode, XmlRecord};
pub use normalizer::{normalize, normalize_all};
pub use page::{create_store_client, HttpPageFetcher, PageFetcher};
pub use play::{
    AndroidReviewSource, ContinuationToken, PlayStoreReviewSource, ReviewBatch, ReviewQuery, SortOrder,
    TokenPaginatedFetcher, DEFAULT_REVIEW_COUNT,
};
pub use resolver::{IdentifierResolver, IosCandidate};
pub use similar::SimilarAppFinder;
pub use traits::ReviewFetcher;
