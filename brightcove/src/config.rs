//! Credentials and service endpoints for the report.
//!
//! Credentials come from the process environment once at startup and are then passed
//! explicitly to every component that needs them. Endpoints are fixed to the production
//! Brightcove services; only tests point them elsewhere.

use std::fmt;
use std::path::PathBuf;

/// Brightcove OAuth token endpoint used for the client-credentials exchange.
const TOKEN_URL: &str = "https://oauth.brightcove.com/v4/access_token";

/// Base of the CMS API; account and video paths are appended to it.
const CMS_BASE_URL: &str = "https://cms.api.brightcove.com/v1";

/// Analytics API data endpoint.
const ANALYTICS_URL: &str = "https://analytics.api.brightcove.com/v1/data";

/// Complete runtime configuration for one report run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
}

impl Config {
    /// Reads credentials from `CLIENT_ID`, `CLIENT_SECRET` and `ACCOUNT_ID` and uses the
    /// production endpoints.
    ///
    /// Missing variables are not an error here. They become empty strings and the
    /// provider rejects them when the token is requested.
    pub fn from_env() -> Self {
        Self {
            credentials: Credentials::from_env(),
            endpoints: Endpoints::default(),
        }
    }
}

/// Loads variables from a `.env` file in the working directory or one of its parents.
///
/// Has to run before logging is set up, otherwise a `RUST_LOG` set in the file is ignored.
/// A missing file is not an error and yields `Ok(None)`. Variables already present in the
/// environment win over the file.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    unless_missing(dotenvy::dotenv())
}

fn unless_missing<T>(loaded: Result<T, dotenvy::Error>) -> Result<Option<T>, dotenvy::Error> {
    match loaded {
        Ok(found) => Ok(Some(found)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// API client credentials and the account they belong to.
#[derive(Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub account_id: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            account_id: account_id.into(),
        }
    }

    fn from_env() -> Self {
        Self {
            client_id: env_or_empty("CLIENT_ID"),
            client_secret: env_or_empty("CLIENT_SECRET"),
            account_id: env_or_empty("ACCOUNT_ID"),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("account_id", &self.account_id)
            .finish()
    }
}

fn env_or_empty(key: &str) -> String {
    match std::env::var(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(key, error = %e, "credential not available from environment");
            String::new()
        }
    }
}

/// URLs of the three Brightcove services the report talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub token_url: String,
    pub cms_base_url: String,
    pub analytics_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_url: TOKEN_URL.to_string(),
            cms_base_url: CMS_BASE_URL.to_string(),
            analytics_url: ANALYTICS_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Places all three services under a single origin, keeping the production paths.
    ///
    /// Handy for pointing the client at a local mock server.
    pub fn rooted_at(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            token_url: format!("{origin}/v4/access_token"),
            cms_base_url: format!("{origin}/v1"),
            analytics_url: format!("{origin}/v1/data"),
        }
    }
}
