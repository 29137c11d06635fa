//! HTTP client for the hosted backend.
//!
//! Tables are served PostgREST-style under `rest/v1/`, password auth
//! GoTrue-style under `auth/v1/`. Every request carries the public anon key as
//! `apikey`; the bearer token is the signed-in user's access token when there
//! is one, the anon key otherwise.

use passport_types::{AuthSession, NewVisit, UserId, Venue, VenueId, VisitedVenue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{BackendError, IdentityBackend, VenueBackend};
use crate::config::BackendConfig;

const VENUES: &str = "rest/v1/venues";
const USER_VISITS: &str = "rest/v1/user_visits";
const AUTH_TOKEN: &str = "auth/v1/token";
const AUTH_SIGNUP: &str = "auth/v1/signup";
const AUTH_LOGOUT: &str = "auth/v1/logout";

#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base: Url,
    anon_key: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl RestClient {
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self, BackendError> {
        let mut base = Url::parse(url.trim()).map_err(|_| BackendError::InvalidUrl {
            url: url.to_string(),
        })?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
            anon_key: anon_key.into(),
            access_token: None,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(&config.url, config.anon_key.clone())
    }

    /// Client acting as the given signed-in user (or anonymously for `None`).
    pub fn with_session(&self, session: Option<&AuthSession>) -> Self {
        Self {
            access_token: session.map(|s| s.access_token.clone()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base.join(path).map_err(|_| BackendError::InvalidUrl {
            url: format!("{}{}", self.base, path),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request.header("apikey", &self.anon_key).bearer_auth(token)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "Backend response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(endpoint, status.as_u16(), &body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, BackendError> {
        response
            .json::<T>()
            .await
            .map_err(|source| BackendError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

impl VenueBackend for RestClient {
    async fn fetch_venues(&self) -> Result<Vec<Venue>, BackendError> {
        let mut url = self.endpoint(VENUES)?;
        url.query_pairs_mut().append_pair("select", "*");

        let response = self.send(VENUES, self.authorize(self.http.get(url))).await?;
        Self::decode(VENUES, response).await
    }

    async fn fetch_visited_venue_ids(&self, user: &UserId) -> Result<Vec<VenueId>, BackendError> {
        let mut url = self.endpoint(USER_VISITS)?;
        url.query_pairs_mut()
            .append_pair("select", "venue_id")
            .append_pair("user_id", &format!("eq.{}", user));

        let response = self
            .send(USER_VISITS, self.authorize(self.http.get(url)))
            .await?;
        let rows: Vec<VisitedVenue> = Self::decode(USER_VISITS, response).await?;
        Ok(rows.into_iter().map(|row| row.venue_id).collect())
    }

    async fn insert_visit(&self, visit: &NewVisit) -> Result<(), BackendError> {
        let url = self.endpoint(USER_VISITS)?;
        let request = self
            .authorize(self.http.post(url))
            .header("Prefer", "return=minimal")
            .json(visit);

        self.send(USER_VISITS, request).await?;
        Ok(())
    }
}

impl IdentityBackend for RestClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let mut url = self.endpoint(AUTH_TOKEN)?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordCredentials { email, password });

        let response = self.send(AUTH_TOKEN, request).await?;
        Self::decode(AUTH_TOKEN, response).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError> {
        let mut url = self.endpoint(AUTH_SIGNUP)?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let request = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&PasswordCredentials { email, password });

        self.send(AUTH_SIGNUP, request).await?;
        Ok(())
    }

    async fn sign_out(&self, session: &AuthSession) -> Result<(), BackendError> {
        let url = self.endpoint(AUTH_LOGOUT)?;
        let request = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token);

        self.send(AUTH_LOGOUT, request).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Bodies
// ─────────────────────────────────────────────────────────────────────────────

/// Union of the PostgREST (`code`, `message`) and auth service (`code`,
/// `error_code`, `msg`, `error_description`) error shapes.
#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub(crate) fn status_error(endpoint: &str, status: u16, body: &str) -> BackendError {
    let parsed: ServiceErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = match parsed.code {
        Some(Value::String(code)) => Some(code),
        numeric => parsed
            .error_code
            .or_else(|| numeric.and_then(|v| v.as_u64()).map(|n| n.to_string())),
    };

    let message = parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

    BackendError::Status {
        endpoint: endpoint.to_string(),
        status,
        code,
        message,
    }
}
