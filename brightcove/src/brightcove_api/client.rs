//! Authenticated access to the Brightcove CMS and Analytics APIs.

use crate::brightcove_api::analytics::{
    ANALYTICS_FIELDS, AnalyticsRecord, AnalyticsResponse, DateRange,
};
use crate::brightcove_api::videos::{self, Video};
use crate::config::Endpoints;
use crate::oauth::AccessToken;
use crate::{Error, Result};
use serde_json::Value;
use tracing::instrument;

/// Client for the Brightcove CMS and Analytics APIs of a single account.
///
/// Every request carries the bearer token the client was built with. The token is never
/// refreshed, so a client is meant to live for one report run.
///
/// Fetch failures are handled here rather than by callers: a request that cannot be sent,
/// is answered with a non-success status, or returns unreadable JSON is logged and treated
/// as "no data". The one exception is a video listing that parses but is not a list, which
/// is surfaced as [`Error::MalformedResponse`] so the caller can stop.
#[derive(Debug, Clone)]
pub struct BrightcoveClient {
    token: AccessToken,
    account_id: String,
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl BrightcoveClient {
    /// Creates a client for `account_id` that authenticates with `token`.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token from [`crate::oauth::OAuthManager::access_token`]
    /// * `account_id` - Brightcove account (publisher) id
    /// * `endpoints` - Where the CMS and Analytics APIs live
    /// * `client` - Shared HTTP client for making API requests
    pub fn new(
        token: AccessToken,
        account_id: impl Into<String>,
        endpoints: Endpoints,
        client: reqwest::Client,
    ) -> Self {
        Self {
            token,
            account_id: account_id.into(),
            endpoints,
            client,
        }
    }

    /// Makes an authenticated GET request and parses the body as JSON.
    ///
    /// Non-success statuses are turned into [`Error::HttpStatus`] carrying the response
    /// body, so the logged error says what the API complained about.
    #[instrument(skip(self), level = tracing::Level::TRACE)]
    async fn get_json(&self, url: &str, query_params: &[(&str, &str)]) -> Result<Value> {
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.secret())
            .query(query_params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            reason: format!("body is not JSON: {e}"),
        })
    }

    /// Fetches metadata for the videos in the account.
    ///
    /// Only the first page the CMS API returns by default is read; accounts with more
    /// videos than that are reported partially.
    ///
    /// # Returns
    ///
    /// * `Ok(videos)` - The listing, or an empty list if the request failed (logged)
    /// * `Err(Error::MalformedResponse)` - The API answered with JSON that is not a list
    ///   of videos
    ///
    /// # API Reference
    ///
    /// <https://apis.support.brightcove.com/cms/references/reference.html#operation/GetVideos>
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn all_videos_metadata(&self) -> Result<Vec<Video>> {
        let url = format!(
            "{}/accounts/{}/videos",
            self.endpoints.cms_base_url, self.account_id
        );

        let body = match self.get_json(&url, &[]).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "request error while listing videos");
                return Ok(Vec::new());
            }
        };

        let videos = videos::parse_listing(body)
            .map_err(|reason| Error::MalformedResponse { url, reason })?;
        tracing::debug!(count = videos.len(), "fetched video metadata");
        Ok(videos)
    }

    /// Fetches metadata for a single video.
    ///
    /// Returns `None`, after logging, if the video cannot be fetched or parsed.
    ///
    /// # API Reference
    ///
    /// <https://apis.support.brightcove.com/cms/references/reference.html#operation/GetVideo>
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn video_metadata(&self, video_id: &str) -> Option<Video> {
        let url = format!(
            "{}/accounts/{}/videos/{}",
            self.endpoints.cms_base_url, self.account_id, video_id
        );

        let result = self.get_json(&url, &[]).await.and_then(|body| {
            serde_json::from_value::<Video>(body).map_err(|e| Error::MalformedResponse {
                url: url.clone(),
                reason: format!("invalid video: {e}"),
            })
        });

        match result {
            Ok(video) => Some(video),
            Err(e) => {
                tracing::error!(error = %e, "request error while fetching video");
                None
            }
        }
    }

    /// Fetches per-day analytics for one video over `range`.
    ///
    /// Requests the `video` and `date` dimensions filtered to `video_id`, so each returned
    /// record covers that video on one day of the range.
    ///
    /// Returns an empty list, after logging, if the request fails or the body cannot be
    /// read. A missing `items` field also yields an empty list.
    ///
    /// # API Reference
    ///
    /// <https://apis.support.brightcove.com/analytics/references/reference.html#operation/GetAnalyticsReport>
    #[instrument(skip(self), fields(account_id = %self.account_id))]
    pub async fn video_views_by_date(
        &self,
        video_id: &str,
        range: DateRange,
    ) -> Vec<AnalyticsRecord> {
        let url = &self.endpoints.analytics_url;
        let filter = format!("video=={video_id}");
        let from = range.start.to_string();
        let to = range.end.to_string();
        let query_params = [
            ("accounts", self.account_id.as_str()),
            ("dimensions", "video,date"),
            ("where", filter.as_str()),
            ("fields", ANALYTICS_FIELDS),
            ("from", from.as_str()),
            ("to", to.as_str()),
        ];

        let result = self.get_json(url, &query_params).await.and_then(|body| {
            serde_json::from_value::<AnalyticsResponse>(body).map_err(|e| {
                Error::MalformedResponse {
                    url: url.clone(),
                    reason: format!("invalid analytics data: {e}"),
                }
            })
        });

        match result {
            Ok(response) => {
                tracing::debug!(rows = response.items.len(), "fetched analytics");
                response.items
            }
            Err(e) => {
                tracing::error!(error = %e, "request error while fetching analytics");
                Vec::new()
            }
        }
    }
}
