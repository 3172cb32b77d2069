//! OAuth 2.0 client-credentials authentication against the Brightcove token service.
//!
//! Brightcove API clients authenticate as themselves: the client id and secret are sent with
//! HTTP Basic authentication and exchanged for a short-lived bearer token. No user is involved
//! and there is no refresh token, so one token is fetched per run and used for every request
//! in that run.

use crate::config::{Credentials, Endpoints};
use crate::{Error, Result};
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse};
use oauth2::{ClientId, ClientSecret, RequestTokenError, TokenResponse, TokenUrl, reqwest};
use tracing::instrument;

/// A bearer token obtained from the client-credentials exchange.
///
/// Expiry is never checked. The token only has to outlive a single report run.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: BasicTokenResponse,
}

impl AccessToken {
    pub fn new(token: BasicTokenResponse) -> Self {
        Self { token }
    }

    /// The secret to place in an `Authorization: Bearer` header.
    pub fn secret(&self) -> &str {
        self.token.access_token().secret()
    }

    #[cfg(test)]
    pub(crate) fn bearer(secret: &str) -> Self {
        use oauth2::basic::BasicTokenType;
        use oauth2::{EmptyExtraTokenFields, StandardTokenResponse};

        Self::new(StandardTokenResponse::new(
            oauth2::AccessToken::new(secret.to_string()),
            BasicTokenType::Bearer,
            EmptyExtraTokenFields {},
        ))
    }
}

/// Exchanges API client credentials for access tokens.
#[derive(Debug, Clone)]
pub struct OAuthManager {
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl OAuthManager {
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            token_url: endpoints.token_url.clone(),
        }
    }

    /// Performs the client-credentials grant and returns the resulting bearer token.
    ///
    /// Any failure, whether the provider rejected the credentials, answered with something
    /// that is not a token, or could not be reached, is reported as [`Error::Auth`]. The
    /// error carries the provider's response body verbatim where one was received.
    #[instrument(skip(self), fields(token_url = %self.token_url))]
    pub async fn access_token(&self) -> Result<AccessToken> {
        let token_url = TokenUrl::new(self.token_url.clone())
            .map_err(|e| Error::Config(format!("token endpoint {}: {e}", self.token_url)))?;
        let client = BasicClient::new(ClientId::new(self.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.client_secret.clone()))
            .set_token_uri(token_url);

        let http_client = reqwest::ClientBuilder::new()
            // SSRF no thank you.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Auth(format!("build HTTP client: {e}")))?;

        match client
            .exchange_client_credentials()
            .request_async(&http_client)
            .await
        {
            Ok(token) => {
                tracing::debug!("obtained access token");
                Ok(AccessToken::new(token))
            }
            Err(e) => {
                let reason = describe_token_error(e);
                tracing::error!(%reason, "access token request rejected");
                Err(Error::Auth(reason))
            }
        }
    }
}

/// Recovers the most useful text from a failed token request.
fn describe_token_error<RE>(e: RequestTokenError<RE, BasicErrorResponse>) -> String
where
    RE: std::error::Error + 'static,
{
    match e {
        // The body parsed as a standard OAuth error; turn it back into the JSON we received.
        RequestTokenError::ServerResponse(response) => {
            serde_json::to_string(&response).unwrap_or_else(|_| response.to_string())
        }
        RequestTokenError::Parse(_, body) => String::from_utf8_lossy(&body).into_owned(),
        RequestTokenError::Request(e) => e.to_string(),
        RequestTokenError::Other(reason) => reason,
    }
}
