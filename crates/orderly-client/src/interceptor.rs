//! # Auth Interceptor
//!
//! Every request to the backend goes through [`AuthInterceptor::send`].
//!
//! ```text
//! ┌──────────────┐   request()   ┌──────────────────┐   send()   ┌─────────┐
//! │  Repository  │──────────────►│ AuthInterceptor  │───────────►│ backend │
//! └──────────────┘               │                  │◄───────────│         │
//!                                │ + Bearer <token> │  Response  └─────────┘
//!                                │ 401 → tokens.clear()
//!                                └──────────────────┘
//! ```
//!
//! The failed request is not retried. The caller gets the 401 back and the
//! next `is_logged_in()` check sends the user to the login screen.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::token::TokenManager;

#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenManager,
}

impl AuthInterceptor {
    pub fn new(settings: &ApiSettings, tokens: TokenManager) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: settings.base_url()?,
            tokens,
        })
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Starts a request to `path`, relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.request_url(method, url))
    }

    /// Starts a request to an already-built URL.
    pub fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Adds the bearer token, sends, and clears the session on a 401.
    pub async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let builder = match self.tokens.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, "Sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "Received response");

        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, %path, "Unauthorized; clearing session");
            if let Err(e) = self.tokens.clear().await {
                warn!(error = %e, "Session clear after 401 failed");
            }
        }

        Ok(response)
    }
}
