//! Brightcove Analytics API types.

use jiff::ToSpan;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// How many days the report lags behind today.
///
/// Analytics data for a day is not final until some time after it ends.
pub const REPORT_LAG_DAYS: i64 = 2;

/// Fields requested from the analytics endpoint for every video/date row.
pub(crate) const ANALYTICS_FIELDS: &str =
    "video_view,video_name,video_impression,daily_unique_viewers,play_rate";

/// An inclusive range of days to request analytics for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    /// The single-day window [`REPORT_LAG_DAYS`] before `today`.
    pub fn lagging(today: Date) -> Self {
        let day = today.saturating_sub(REPORT_LAG_DAYS.days());
        Self {
            start: day,
            end: day,
        }
    }
}

/// Response body of the analytics `data` endpoint.
///
/// See: <https://apis.support.brightcove.com/analytics/references/reference.html>
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    /// Number of rows matching the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    /// One row per combination of the requested dimensions.
    #[serde(default)]
    pub items: Vec<AnalyticsRecord>,
}

/// One row of analytics, here for a single video on a single day.
///
/// Every field is optional: the API omits fields it has no data for, and the report
/// shows those as `N/A`. Counts are kept as the JSON numbers that arrived, so a count
/// reported as `5.0` is shown as such instead of making the whole row unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    /// Video id dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Video name at the time of the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_name: Option<String>,
    /// Day dimension, as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Number of video views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_view: Option<Number>,
    /// Number of times the player loaded with the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_impression: Option<Number>,
    /// Unique viewers on that day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_unique_viewers: Option<Number>,
    /// Views divided by impressions, as a fraction in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_rate: Option<f64>,
}
