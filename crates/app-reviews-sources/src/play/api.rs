use crate::error::{Result, SourceError};
use crate::play::{AndroidReviewSource, ContinuationToken, ReviewBatch, ReviewQuery, SortOrder};
use app_reviews_models::AndroidRawReview;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// The RPC rejects larger page sizes
const MAX_COUNT_EACH_FETCH: usize = 199;

const RESPONSE_PREFIX: &str = ")]}'";

/// Play Store review RPC (`UsvDTd` over `batchexecute`)
#[derive(Clone)]
pub struct PlayStoreReviewSource {
    client: Client,
}

impl PlayStoreReviewSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_page(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
        sort: SortOrder,
        count: usize,
        token: Option<&str>,
    ) -> Result<(Vec<AndroidRawReview>, Option<String>)> {
        let url = format!(
            "https://play.google.com/_/PlayStoreUi/data/batchexecute?hl={}&gl={}",
            urlencoding::encode(lang),
            urlencoding::encode(country)
        );
        let body = build_request_body(app_id, sort, count, token);

        let response = self
            .client
            .post(&url)
            .form(&[("f.req", body)])
            .send()
            .await
            .map_err(|e| SourceError::fetch(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::fetch(&url, format!("HTTP {}", status)));
        }

        let text = response.text().await.map_err(|e| SourceError::fetch(&url, e))?;
        parse_response(&url, &text)
    }
}

#[async_trait]
impl AndroidReviewSource for PlayStoreReviewSource {
    async fn query_reviews(&self, query: &ReviewQuery) -> Result<ReviewBatch> {
        let (lang, country, sort, count) = query.resolved();
        let mut token = query.continuation.as_ref().map(|t| t.token.clone());
        let mut records: Vec<AndroidRawReview> = Vec::new();

        // The RPC caps each round trip, so large counts take several requests
        while records.len() < count {
            let page_size = (count - records.len()).min(MAX_COUNT_EACH_FETCH);
            let (page, next) = self
                .fetch_page(&query.app_id, &lang, &country, sort, page_size, token.as_deref())
                .await?;

            debug!(
                app_id = %query.app_id,
                page = page.len(),
                total = records.len() + page.len(),
                has_next = next.is_some(),
                "Fetched Play Store review page"
            );

            // An empty page with a token would loop forever
            let exhausted = page.is_empty();
            records.extend(page);
            token = next;

            if token.is_none() || exhausted {
                break;
            }
        }

        // Hand back the last token so the caller can resume where this query stopped
        Ok(ReviewBatch {
            records,
            next_token: token.map(|token| ContinuationToken {
                token,
                lang,
                country,
                sort,
                count,
            }),
        })
    }
}

/// `f.req` form value: the RPC arguments are themselves a JSON string inside the envelope
pub(crate) fn build_request_body(app_id: &str, sort: SortOrder, count: usize, token: Option<&str>) -> String {
    let args = json!([null, null, [2, sort.code(), [count, null, token], null, []], [app_id, 7]]);
    json!([[["UsvDTd", args.to_string(), null, "generic"]]]).to_string()
}

pub(crate) fn parse_response(url: &str, text: &str) -> Result<(Vec<AndroidRawReview>, Option<String>)> {
    let payload = text
        .trim_start()
        .strip_prefix(RESPONSE_PREFIX)
        .ok_or_else(|| SourceError::fetch(url, "unexpected review response prefix"))?;

    let envelope: Value = serde_json::from_str(payload.trim_start())
        .map_err(|e| SourceError::fetch(url, format!("invalid review envelope: {}", e)))?;

    // A null payload means the app has no (more) reviews
    let inner = match envelope[0][2].as_str() {
        Some(inner) => inner,
        None => return Ok((Vec::new(), None)),
    };
    let data: Value = serde_json::from_str(inner)
        .map_err(|e| SourceError::fetch(url, format!("invalid review payload: {}", e)))?;

    let records = match data[0].as_array() {
        Some(items) => items
            .iter()
            .map(|item| parse_review(url, item))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let token = data
        .as_array()
        .filter(|parts| parts.len() >= 2)
        .and_then(|parts| parts[parts.len() - 2].as_array())
        .and_then(|cursor| cursor.last())
        .and_then(|t| t.as_str())
        .map(|t| t.to_string());

    Ok((records, token))
}

fn parse_review(url: &str, item: &Value) -> Result<AndroidRawReview> {
    let review_id = item[0]
        .as_str()
        .ok_or_else(|| SourceError::fetch(url, "review without id"))?
        .to_string();

    let seconds = item[5][0]
        .as_i64()
        .ok_or_else(|| SourceError::fetch(url, format!("review {} without timestamp", review_id)))?;
    let at = DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| SourceError::fetch(url, format!("review {} has invalid timestamp {}", review_id, seconds)))?;

    Ok(AndroidRawReview {
        at,
        user_name: item[1][0].as_str().unwrap_or_default().to_string(),
        // Missing scores become 0 and are rejected during normalization
        score: item[2].as_i64().unwrap_or(0),
        content: item[4].as_str().map(|s| s.to_string()),
        review_created_version: item[10].as_str().map(|s| s.to_string()),
        review_id,
    })
}
