use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, StatusCode, Url, header, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::infra::errors::{ApiResult, ProfileApiError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SESSION_COOKIE: &str = "authToken";

/// Whether a request submits field values the server may reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Session credential attached to every request as a cookie
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// HTTP transport for the profile backend.
///
/// Owns the session, serializes JSON and multipart bodies and maps every
/// failure onto [`ProfileApiError`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_cookie: String,
    session: Arc<RwLock<Option<SessionToken>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session_cookie", &self.session_cookie)
            .field(
                "has_session",
                &self
                    .session
                    .try_read()
                    .map(|s| s.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

/// Normalize a user supplied base URL.
///
/// `localhost:8080/` becomes `http://localhost:8080`; reqwest rejects URLs
/// without a scheme and a trailing slash would double up when joining paths.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let raw = base_url.into();
        let base_url = normalize_base_url(&raw);
        if base_url != raw {
            warn!(
                "[ApiClient] Normalized base URL from '{}' to '{}'",
                raw, base_url
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(
                    "[ApiClient] Falling back to default HTTP client: {}",
                    err
                );
                Client::new()
            });

        info!("[ApiClient] Creating API client with base URL: {}", base_url);

        Self {
            client,
            base_url,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Use a different cookie name for the session credential
    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Seed the session before any request is made
    pub fn with_session(self, token: Option<SessionToken>) -> Self {
        Self {
            session: Arc::new(RwLock::new(token)),
            ..self
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL; absolute URLs pass through untouched
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    /// Same scheme, host and port as the base URL
    pub fn is_backend_url(&self, url: &str) -> bool {
        match (Url::parse(&self.base_url), Url::parse(url)) {
            (Ok(base), Ok(target)) => {
                base.scheme() == target.scheme()
                    && base.host_str() == target.host_str()
                    && base.port_or_known_default()
                        == target.port_or_known_default()
            }
            _ => false,
        }
    }

    pub async fn set_session(&self, token: Option<SessionToken>) {
        *self.session.write().await = token;
    }

    pub async fn session(&self) -> Option<SessionToken> {
        self.session.read().await.clone()
    }

    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Attach the session cookie, if any
    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.read().await.as_ref() {
            Some(token) => builder.header(
                header::COOKIE,
                format!("{}={}", self.session_cookie, token.expose()),
            ),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body from a 2xx response
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> ApiResult<T> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|err| {
                ProfileApiError::Decode(format!(
                    "failed to decode {} response: {}",
                    status, err
                ))
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = match access {
            Access::Write => ProfileApiError::from_status(status, &body),
            Access::Read => ProfileApiError::from_read_status(status, &body),
        };

        if error.is_auth() {
            warn!("[ApiClient] Session rejected ({}), clearing it", status);
            self.set_session(None).await;
        } else {
            debug!("[ApiClient] Request failed with {}: {}", status, error);
        }

        Err(error)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] GET {}", url);
        self.execute(self.client.get(url), Access::Read).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {} (json)", url);
        self.execute(self.client.put(url).json(body), Access::Write)
            .await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] PUT {} (multipart)", url);
        self.execute(self.client.put(url).multipart(form), Access::Write)
            .await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {} (multipart)", url);
        self.execute(self.client.post(url).multipart(form), Access::Write)
            .await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("[ApiClient] POST {}", url);
        self.execute(self.client.post(url), Access::Read).await
    }

    /// Fetch raw bytes, e.g. a stored avatar for display.
    ///
    /// The session cookie only goes to our own backend, never to a CDN.
    pub async fn get_bytes(&self, url: &str) -> ApiResult<Vec<u8>> {
        let url = self.build_url(url);
        let request = self.client.get(&url);
        let request = if self.is_backend_url(&url) {
            self.authorize(request).await
        } else {
            request
        };

        let response = request.send().await?;
        match response.status() {
            StatusCode::OK => Ok(response.bytes().await?.to_vec()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProfileApiError::from_read_status(status, &body))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        assert_eq!(normalize_base_url("localhost:8080/"), "http://localhost:8080");
        assert_eq!(
            normalize_base_url("  https://api.example.com// "),
            "https://api.example.com"
        );
        assert_eq!(normalize_base_url("http://10.0.0.2"), "http://10.0.0.2");
    }

    #[test]
    fn build_url_joins_relative_paths_only() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(
            client.build_url("/api/profile/me"),
            "http://localhost:8080/api/profile/me"
        );
        assert_eq!(
            client.build_url("api/auth/logout"),
            "http://localhost:8080/api/auth/logout"
        );
        assert_eq!(
            client.build_url("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[tokio::test]
    async fn session_is_seeded_and_cleared() {
        let client = ApiClient::new("localhost:1")
            .with_session(Some(SessionToken::new("jwt")));
        assert!(client.has_session().await);
        assert_eq!(client.session().await.unwrap().expose(), "jwt");

        client.set_session(None).await;
        assert!(!client.has_session().await);
    }

    #[test]
    fn backend_urls_match_on_origin_not_prefix() {
        let client = ApiClient::new("http://api.example.com");
        assert!(client.is_backend_url("http://api.example.com/files/a.png"));
        assert!(client.is_backend_url("http://api.example.com:80/a.png"));
        assert!(!client.is_backend_url("http://api.example.com.evil.net/a.png"));
        assert!(!client.is_backend_url("https://api.example.com/a.png"));
        assert!(!client.is_backend_url("not a url"));

        let local = ApiClient::new("http://127.0.0.1:4");
        assert!(local.is_backend_url("http://127.0.0.1:4/x.png"));
        assert!(!local.is_backend_url("http://127.0.0.1:41603/x.png"));
    }

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("secret");
        assert_eq!(format!("{:?}", token), "SessionToken(***)");
    }
}
