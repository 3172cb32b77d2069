//! Report rendering and the end-to-end report run.

use crate::brightcove_api::{AnalyticsRecord, BrightcoveClient, DateRange, Video};
use crate::config::Config;
use crate::oauth::OAuthManager;
use crate::{Error, Result};
use jiff::civil::Date;
use std::fmt;
use std::io::Write;

/// Shown in place of any value the APIs did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Printed instead of a report when the video listing is not a list.
pub const MALFORMED_LISTING_DIAGNOSTIC: &str =
    "Expected a list of video metadata but received something else.";

/// One line of the report: a video's metadata joined with one day of its analytics.
#[derive(Debug, Clone, Copy)]
pub struct ReportLine<'a> {
    pub video: &'a Video,
    pub record: &'a AnalyticsRecord,
}

impl fmt::Display for ReportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { video, record } = self;
        write!(
            f,
            "Video ID: {}, Video Name: {}, Brand: {}, Date: {}, Views: {}, Impressions: {}, \
             Unique Viewers: {}, Play Rate: {}%",
            video.id,
            OrNotAvailable(record.video_name.as_deref()),
            OrNotAvailable(video.brand()),
            OrNotAvailable(record.date.as_deref()),
            OrNotAvailable(record.video_view.as_ref()),
            OrNotAvailable(record.video_impression.as_ref()),
            OrNotAvailable(record.daily_unique_viewers.as_ref()),
            Percentage(record.play_rate),
        )
    }
}

struct OrNotAvailable<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrNotAvailable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// A fraction shown scaled to a percentage.
///
/// Uses the shortest representation that round-trips, always with a decimal part, so
/// `0.5` shows as `50.0`.
struct Percentage(Option<f64>);

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(fraction) => write!(f, "{:?}", fraction * 100.0),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// What a report run covered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Videos whose analytics were requested.
    pub videos: usize,
    /// Report lines written.
    pub lines: usize,
}

/// Produces the daily report for the account in `config`, writing one line per video/day
/// to `out`.
///
/// The run asks for a single token, lists the account's videos once, and then fetches
/// analytics for each video in turn for the day [`crate::REPORT_LAG_DAYS`] before `today`.
///
/// # Errors
///
/// * [`Error::Auth`] - No token could be obtained. Nothing else is requested.
/// * [`Error::Io`] - Writing to `out` failed.
///
/// Failed listing or analytics requests are not errors: they are logged and contribute no
/// lines. A listing that is not a list writes [`MALFORMED_LISTING_DIAGNOSTIC`] and ends the
/// run successfully without requesting analytics.
#[tracing::instrument(skip_all, fields(account_id = %config.credentials.account_id, %today))]
pub async fn run<W: Write>(config: &Config, today: Date, out: &mut W) -> Result<RunSummary> {
    let token = OAuthManager::new(&config.credentials, &config.endpoints)
        .access_token()
        .await?;

    let range = DateRange::lagging(today);
    tracing::debug!(from = %range.start, to = %range.end, "report window");

    let client = BrightcoveClient::new(
        token,
        config.credentials.account_id.clone(),
        config.endpoints.clone(),
        reqwest::Client::new(),
    );

    let videos = match client.all_videos_metadata().await {
        Ok(videos) => videos,
        Err(e @ Error::MalformedResponse { .. }) => {
            tracing::warn!(error = %e, "video listing is not a list, skipping report");
            writeln!(out, "{MALFORMED_LISTING_DIAGNOSTIC}")?;
            return Ok(RunSummary::default());
        }
        Err(e) => return Err(e),
    };

    let mut summary = RunSummary::default();
    for video in &videos {
        let records = client.video_views_by_date(&video.id, range).await;
        for record in &records {
            writeln!(out, "{}", ReportLine { video, record })?;
        }
        summary.videos += 1;
        summary.lines += records.len();
    }

    tracing::info!(
        videos = summary.videos,
        lines = summary.lines,
        "report complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, Endpoints};
    use jiff::civil::date;
    use mockito::{Matcher, Mock, ServerGuard};
    use pretty_assertions::assert_eq;
    use serde_json::{Number, json};

    fn video(value: serde_json::Value) -> Video {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn renders_full_line() {
        let video = video(json!({ "id": "v1", "custom_fields": { "brand": "Acme" } }));
        let record = AnalyticsRecord {
            video: Some("v1".into()),
            video_name: Some("Clip".into()),
            date: Some("2024-03-08".into()),
            video_view: Some(Number::from(10u64)),
            video_impression: Some(Number::from(20u64)),
            daily_unique_viewers: Some(Number::from(5u64)),
            play_rate: Some(0.5),
        };
        insta::assert_snapshot!(
            ReportLine { video: &video, record: &record },
            @"Video ID: v1, Video Name: Clip, Brand: Acme, Date: 2024-03-08, Views: 10, Impressions: 20, Unique Viewers: 5, Play Rate: 50.0%"
        );
    }

    #[test]
    fn missing_values_render_as_not_available() {
        let video = video(json!({ "id": "v9" }));
        let record = AnalyticsRecord::default();
        assert_eq!(
            ReportLine { video: &video, record: &record }.to_string(),
            "Video ID: v9, Video Name: N/A, Brand: N/A, Date: N/A, Views: N/A, \
             Impressions: N/A, Unique Viewers: N/A, Play Rate: N/A%"
        );
    }

    #[test]
    fn play_rate_as_percentage() {
        assert_eq!(Percentage(Some(0.5)).to_string(), "50.0");
        assert_eq!(Percentage(Some(0.0)).to_string(), "0.0");
        assert_eq!(Percentage(Some(1.0)).to_string(), "100.0");
        assert_eq!(Percentage(Some(0.25)).to_string(), "25.0");
        assert_eq!(Percentage(None).to_string(), "N/A");
    }

    struct Brightcove {
        server: ServerGuard,
    }

    impl Brightcove {
        async fn start() -> Self {
            Self {
                server: mockito::Server::new_async().await,
            }
        }

        fn config(&self) -> Config {
            Config {
                credentials: Credentials::new("abc", "xyz", "1234"),
                endpoints: Endpoints::rooted_at(&self.server.url()),
            }
        }

        async fn token(&mut self, status: usize, body: &str) -> Mock {
            self.server
                .mock("POST", "/v4/access_token")
                .with_status(status)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await
        }

        async fn good_token(&mut self) -> Mock {
            self.token(
                200,
                r#"{"access_token":"tok-1","token_type":"Bearer","expires_in":300}"#,
            )
            .await
        }

        async fn listing(&mut self, status: usize, body: &str, calls: usize) -> Mock {
            self.server
                .mock("GET", "/v1/accounts/1234/videos")
                .match_query(Matcher::Any)
                .match_header("authorization", "Bearer tok-1")
                .with_status(status)
                .with_header("content-type", "application/json")
                .with_body(body)
                .expect(calls)
                .create_async()
                .await
        }

        async fn analytics(&mut self, video_id: &str, status: usize, body: &str) -> Mock {
            self.server
                .mock("GET", "/v1/data")
                .match_query(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("where".into(), format!("video=={video_id}")),
                    Matcher::UrlEncoded("from".into(), "2024-03-08".into()),
                    Matcher::UrlEncoded("to".into(), "2024-03-08".into()),
                ]))
                .match_header("authorization", "Bearer tok-1")
                .with_status(status)
                .with_header("content-type", "application/json")
                .with_body(body)
                .expect(1)
                .create_async()
                .await
        }

        async fn no_analytics(&mut self) -> Mock {
            self.server
                .mock("GET", "/v1/data")
                .match_query(Matcher::Any)
                .expect(0)
                .create_async()
                .await
        }
    }

    async fn run_report(config: &Config) -> (Result<RunSummary>, String) {
        let mut out = Vec::new();
        let result = run(config, date(2024, 3, 10), &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn end_to_end_single_video() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let listing = bc
            .listing(200, r#"[{"id":"v1","custom_fields":{"brand":"Acme"}}]"#, 1)
            .await;
        let analytics = bc
            .analytics(
                "v1",
                200,
                r#"{"items":[{"video_name":"Clip","date":"2024-03-08","video_view":10,
                    "video_impression":20,"daily_unique_viewers":5,"play_rate":0.5}]}"#,
            )
            .await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary { videos: 1, lines: 1 });
        assert_eq!(
            out,
            "Video ID: v1, Video Name: Clip, Brand: Acme, Date: 2024-03-08, Views: 10, \
             Impressions: 20, Unique Viewers: 5, Play Rate: 50.0%\n"
        );
        listing.assert_async().await;
        analytics.assert_async().await;
    }

    #[tokio::test]
    async fn token_failure_aborts_before_any_fetch() {
        let mut bc = Brightcove::start().await;
        let _token = bc.token(401, r#"{"error_code":"INVALID_CLIENT"}"#).await;
        let listing = bc.listing(200, "[]", 0).await;
        let analytics = bc.no_analytics().await;

        let (result, out) = run_report(&bc.config()).await;
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Auth(ref body) if body.contains("INVALID_CLIENT")));
        assert_eq!(out, "");
        listing.assert_async().await;
        analytics.assert_async().await;
    }

    #[tokio::test]
    async fn non_list_listing_prints_diagnostic() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let _listing = bc.listing(200, r#"{"error_code":"NOT_FOUND"}"#, 1).await;
        let analytics = bc.no_analytics().await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary::default());
        assert_eq!(out, format!("{MALFORMED_LISTING_DIAGNOSTIC}\n"));
        analytics.assert_async().await;
    }

    #[tokio::test]
    async fn failed_listing_produces_empty_report() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let _listing = bc.listing(503, "unavailable", 1).await;
        let analytics = bc.no_analytics().await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary::default());
        assert_eq!(out, "");
        analytics.assert_async().await;
    }

    #[tokio::test]
    async fn failed_analytics_skips_only_that_video() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let _listing = bc.listing(
            200,
            r#"[{"id":"v1","custom_fields":{"brand":"Acme"}},
                {"id":"v2"},
                {"id":"v3","custom_fields":{"brand":"Globex"}}]"#,
            1,
        )
        .await;
        let first = bc
            .analytics("v1", 500, r#"{"error_code":"SERVER_ERROR"}"#)
            .await;
        let second = bc
            .analytics(
                "v2",
                200,
                r#"{"items":[{"video_name":"Two","date":"2024-03-08","video_view":3}]}"#,
            )
            .await;
        let third = bc
            .analytics(
                "v3",
                200,
                r#"{"items":[
                    {"video_name":"Three","date":"2024-03-08","video_view":7,
                     "video_impression":14,"daily_unique_viewers":2,"play_rate":0.25},
                    {"video_name":"Three","date":"2024-03-08","video_view":1}
                ]}"#,
            )
            .await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary { videos: 3, lines: 3 });
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "Video ID: v2, Video Name: Two, Brand: N/A, Date: 2024-03-08, Views: 3, \
                 Impressions: N/A, Unique Viewers: N/A, Play Rate: N/A%",
                "Video ID: v3, Video Name: Three, Brand: Globex, Date: 2024-03-08, Views: 7, \
                 Impressions: 14, Unique Viewers: 2, Play Rate: 25.0%",
                "Video ID: v3, Video Name: Three, Brand: Globex, Date: 2024-03-08, Views: 1, \
                 Impressions: N/A, Unique Viewers: N/A, Play Rate: N/A%",
            ]
        );
        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn unusable_listing_entries_do_not_hide_the_rest() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let _listing = bc
            .listing(
                200,
                r#"[{"id":"v1","custom_fields":{"brand":"Acme"}},
                    {"name":"no id"},
                    {"id":"v2","custom_fields":[]}]"#,
                1,
            )
            .await;
        let first = bc
            .analytics(
                "v1",
                200,
                r#"{"items":[{"video_name":"One","date":"2024-03-08","video_view":4}]}"#,
            )
            .await;
        let second = bc
            .analytics(
                "v2",
                200,
                r#"{"items":[{"video_name":"Two","date":"2024-03-08","video_view":6}]}"#,
            )
            .await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary { videos: 2, lines: 2 });
        assert!(!out.contains(MALFORMED_LISTING_DIAGNOSTIC), "{out}");
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "Video ID: v1, Video Name: One, Brand: Acme, Date: 2024-03-08, Views: 4, \
                 Impressions: N/A, Unique Viewers: N/A, Play Rate: N/A%",
                "Video ID: v2, Video Name: Two, Brand: N/A, Date: 2024-03-08, Views: 6, \
                 Impressions: N/A, Unique Viewers: N/A, Play Rate: N/A%",
            ]
        );
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn non_integer_counts_are_printed_as_received() {
        let mut bc = Brightcove::start().await;
        let _token = bc.good_token().await;
        let _listing = bc.listing(200, r#"[{"id":"v1"}]"#, 1).await;
        let analytics = bc
            .analytics(
                "v1",
                200,
                r#"{"items":[{"video_name":"Clip","video_view":10,
                    "daily_unique_viewers":5.0,"play_rate":0}]}"#,
            )
            .await;

        let (result, out) = run_report(&bc.config()).await;
        assert_eq!(result.unwrap(), RunSummary { videos: 1, lines: 1 });
        assert_eq!(
            out,
            "Video ID: v1, Video Name: Clip, Brand: N/A, Date: N/A, Views: 10, \
             Impressions: N/A, Unique Viewers: 5.0, Play Rate: 0.0%\n"
        );
        analytics.assert_async().await;
    }
}
