//! HTTP client for the travel-planning service.
//!
//! [`Wayfarer`] wraps a reqwest client with the session token store: every
//! request carries a bearer header when a token is held, cookies always
//! ride along so the refresh endpoint can authenticate, and a 401 triggers
//! exactly one silent refresh-and-retry before the session is torn down.

use std::env;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::frame::{Frame, decode_frames};
use crate::observability;
use crate::session::{SessionStore, TokenResponse};
use crate::types::ChatRequest;

const DEFAULT_API_URL: &str = "http://0.0.0.0:8081/api/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The login-view redirect seam.
///
/// The SDK has no router of its own; hosts implement this to decide what
/// "navigate to the login view" means for them. The forced-logout path
/// calls it exactly once per expired session.
#[async_trait::async_trait]
pub trait Navigator: Send + Sync {
    /// Take the user to the login view.
    async fn to_login(&self);
}

/// A navigator that does nothing, for headless and test use.
#[derive(Debug, Default)]
pub struct NoopNavigator;

#[async_trait::async_trait]
impl Navigator for NoopNavigator {
    async fn to_login(&self) {}
}

/// Client for the wayfarer travel-planning service.
pub struct Wayfarer {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fullname: Option<&'a str>,
}

impl Wayfarer {
    /// Create a new client against the default API URL, or the one named
    /// by the `WAYFARER_API_URL` environment variable.
    pub fn new(session: Arc<SessionStore>) -> Result<Self> {
        let base_url = env::var("WAYFARER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::with_options(session, Some(base_url), None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        session: Arc<SessionStore>,
        base_url: Option<String>,
        timeout: Option<Duration>,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        // Cookies carry the refresh credential between calls.
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            session,
            navigator: navigator.unwrap_or_else(|| Arc::new(NoopNavigator)),
        })
    }

    /// Returns the session store backing this client.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        observability::CLIENT_REQUEST_ERRORS.click();
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Process API response errors and convert to our Error type.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        // The service answers errors either as `{ "error", "message" }`
        // JSON or as a bare text line; take whichever is there.
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<String>,
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let message = parsed
            .and_then(|e| e.message.or(e.error))
            .unwrap_or_else(|| error_body.trim().to_string());

        match status_code {
            400 => Error::bad_request(message, None),
            401 => Error::unauthenticated(message),
            404 => Error::not_found(message),
            408 => Error::timeout(message, None),
            500 => Error::internal_server(message),
            502..=504 => Error::service_unavailable(message),
            _ => Error::api(status_code, message),
        }
    }

    /// The authenticated fetch core.
    ///
    /// Sends the request with a bearer header when a token is held. On a
    /// 401, performs one silent refresh and retries once with the new
    /// token; if the refresh fails, clears the session, navigates to the
    /// login view, and fails with [`Error::SessionExpired`]. Any other
    /// response is returned verbatim.
    async fn send_with_auth<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&ReqwestClient) -> RequestBuilder,
    {
        observability::CLIENT_REQUESTS.click();
        let mut builder = build(&self.client);
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        observability::CLIENT_REFRESHES.click();
        match self.refresh().await {
            Ok(tokens) => {
                observability::CLIENT_REQUEST_RETRIES.click();
                build(&self.client)
                    .bearer_auth(&tokens.access_token)
                    .send()
                    .await
                    .map_err(|e| self.map_send_error(e))
            }
            Err(_) => {
                // Refresh failures of every kind fall through to logout.
                observability::CLIENT_REFRESH_FAILURES.click();
                self.force_logout().await;
                Err(Error::session_expired("please log in again"))
            }
        }
    }

    /// Exchange the refresh cookie for a new access token.
    pub async fn refresh(&self) -> Result<TokenResponse> {
        let response = self
            .client
            .get(self.endpoint("auth/refresh"))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        let tokens = response.json::<TokenResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse refresh response: {e}"),
                Some(Box::new(e)),
            )
        })?;
        self.session.apply(&tokens)?;
        Ok(tokens)
    }

    /// Log in with email and password, storing the returned tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse> {
        self.auth_request(
            "auth/login",
            &Credentials {
                email,
                password,
                fullname: None,
            },
        )
        .await
    }

    /// Create an account, storing the returned tokens.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        fullname: Option<&str>,
    ) -> Result<TokenResponse> {
        self.auth_request(
            "auth/signup",
            &Credentials {
                email,
                password,
                fullname,
            },
        )
        .await
    }

    async fn auth_request(&self, path: &str, body: &Credentials<'_>) -> Result<TokenResponse> {
        observability::CLIENT_REQUESTS.click();
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        let tokens = response.json::<TokenResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse auth response: {e}"),
                Some(Box::new(e)),
            )
        })?;
        self.session.apply(&tokens)?;
        Ok(tokens)
    }

    /// Log out: tell the server (best effort), clear the session, and
    /// navigate to the login view.
    pub async fn logout(&self) -> Result<()> {
        // Best-effort server call; network errors are ignored.
        let _ = self.client.get(self.endpoint("auth/logout")).send().await;
        self.session.clear()?;
        self.navigator.to_login().await;
        Ok(())
    }

    async fn force_logout(&self) {
        observability::CLIENT_FORCED_LOGOUTS.click();
        let _ = self.session.clear();
        self.navigator.to_login().await;
    }

    /// Send a chat message and stream the reply frames.
    ///
    /// Goes through the authenticated fetch path, so a stale token gets
    /// one silent refresh before the stream opens.
    pub async fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<Frame>> + Send>>> {
        let response = self
            .send_with_auth(|client| {
                client
                    .post(self.endpoint("chats/"))
                    .header(header::ACCEPT, HeaderValue::from_static("text/event-stream"))
                    .json(&request)
            })
            .await?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let stream = response.bytes_stream();
        Ok(Box::pin(decode_frames(stream)))
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    // Validate early so a bad URL fails at construction, not first use.
    Url::parse(base_url)?;
    if base_url.ends_with('/') {
        Ok(base_url.to_string())
    } else {
        Ok(format!("{base_url}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_defaults() {
        let session = Arc::new(SessionStore::in_memory());
        let client = Wayfarer::with_options(session, None, None, None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let session = Arc::new(SessionStore::in_memory());
        let client = Wayfarer::with_options(
            session,
            Some("https://api.example.com/api/v1".to_string()),
            Some(Duration::from_secs(30)),
            None,
        )
        .unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/api/v1/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let session = Arc::new(SessionStore::in_memory());
        let err = Wayfarer::with_options(session, Some("not a url".to_string()), None, None);
        assert!(err.is_err());
    }

    #[test]
    fn endpoint_joins_paths() {
        let session = Arc::new(SessionStore::in_memory());
        let client = Wayfarer::with_options(
            session,
            Some("http://localhost:9999/api/v1".to_string()),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            client.endpoint("auth/refresh"),
            "http://localhost:9999/api/v1/auth/refresh"
        );
    }
}
