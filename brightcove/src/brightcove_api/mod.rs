//! Brightcove CMS and Analytics API client.
//!
//! Two Brightcove services feed the report:
//!
//! - The **CMS API** owns video metadata: the video's id, its name, and the account-defined
//!   custom fields such as `brand`. See [`videos::Video`].
//! - The **Analytics API** owns viewing data, aggregated along requested dimensions. The
//!   report asks for the `video` and `date` dimensions, which yields one
//!   [`analytics::AnalyticsRecord`] per video per day.
//!
//! Both are reached through [`BrightcoveClient`], which attaches the bearer token obtained
//! by [`crate::oauth::OAuthManager`] to every request.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use brightcove_video_report::{BrightcoveClient, Config, DateRange, OAuthManager};
//!
//! # async fn example() -> brightcove_video_report::Result<()> {
//! let config = Config::from_env();
//! let token = OAuthManager::new(&config.credentials, &config.endpoints)
//!     .access_token()
//!     .await?;
//! let client = BrightcoveClient::new(
//!     token,
//!     config.credentials.account_id.clone(),
//!     config.endpoints.clone(),
//!     reqwest::Client::new(),
//! );
//!
//! let range = DateRange::lagging(jiff::Zoned::now().date());
//! for video in client.all_videos_metadata().await? {
//!     for record in client.video_views_by_date(&video.id, range).await {
//!         println!("{}: {:?} views", video.id, record.video_view);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod client;
pub mod videos;

pub use analytics::{AnalyticsRecord, AnalyticsResponse, DateRange};
pub use client::BrightcoveClient;
pub use videos::Video;
