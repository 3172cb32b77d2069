//! # Brightcove video report
//!
//! Prints a daily line per video with its views, impressions, unique viewers and play rate,
//! taken from the Brightcove Analytics API and joined with the video's name and brand from
//! the CMS API.
//!
//! A run is a single sequential pass:
//!
//! 1. exchange the API client credentials for a bearer token ([`OAuthManager`]),
//! 2. list the account's videos ([`BrightcoveClient::all_videos_metadata`]),
//! 3. fetch each video's analytics for the day [`REPORT_LAG_DAYS`] ago
//!    ([`BrightcoveClient::video_views_by_date`]),
//! 4. print one [`ReportLine`] per analytics record.
//!
//! ```ignore
//! use brightcove_video_report::{Config, run};
//!
//! #[tokio::main]
//! async fn main() -> brightcove_video_report::Result<()> {
//!     let config = Config::from_env();
//!     let today = jiff::Zoned::now().date();
//!     run(&config, today, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod brightcove_api;
pub mod config;
pub mod error;
pub mod oauth;
pub mod report;

pub use brightcove_api::analytics::REPORT_LAG_DAYS;
pub use brightcove_api::{AnalyticsRecord, AnalyticsResponse, BrightcoveClient, DateRange, Video};
pub use config::{Config, Credentials, Endpoints, load_dotenv};
pub use error::Error;
pub use oauth::{AccessToken, OAuthManager};
pub use report::{ReportLine, RunSummary, run};

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, Error>;
