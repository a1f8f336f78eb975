//! Shared REST plumbing for hosting providers
//!
//! Providers differ only in base URL, how the token is attached and how error
//! bodies are shaped; everything else goes through `RestClient`.

use crate::error::{FishError, FishResult};
use reqwest::{Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// How the API token travels with each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: token <t>` header plus a vendor Accept header
    TokenHeader { accept: &'static str },
    /// `access_token=<t>` query parameter
    AccessTokenQuery,
}

/// Error body returned by both supported APIs
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    documentation_url: Option<String>,
}

/// Authenticated JSON client for one provider API
#[derive(Debug, Clone)]
pub struct RestClient {
    provider: &'static str,
    base: Url,
    auth: AuthScheme,
    token: Option<String>,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(provider: &'static str, base: Url, auth: AuthScheme, user_agent: &str) -> Self {
        Self {
            provider,
            base,
            auth,
            token: None,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Append path segments to the base URL, preserving its own path
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> FishResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| self.unavailable(None, format!("URL cannot have path segments: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);

        let query_token = match (self.auth, &self.token) {
            (AuthScheme::AccessTokenQuery, Some(token)) => Some(token.as_str()),
            _ => None,
        };
        if !query.is_empty() || query_token.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(token) = query_token {
                pairs.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    /// Build (without sending) an authenticated request
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> FishResult<Request> {
        let url = self.endpoint(segments, query)?;
        let mut builder = self.client.request(method, url);

        if let AuthScheme::TokenHeader { accept } = self.auth {
            builder = builder.header(reqwest::header::ACCEPT, accept);
            if let Some(token) = &self.token {
                builder = builder.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
            }
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder
            .build()
            .map_err(|e| self.transport(None, e))
    }

    async fn send(&self, request: Request) -> FishResult<(StatusCode, String)> {
        debug!(provider = self.provider, method = %request.method(), path = request.url().path(), "hosting request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport(None, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport(Some(status), e))?;
        Ok((status, text))
    }

    /// Send and decode; `None` when the resource does not exist
    async fn send_optional<T: DeserializeOwned>(&self, request: Request) -> FishResult<Option<T>> {
        let (status, text) = self.send(request).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(FishError::AuthenticationInvalid {
                provider: self.provider.to_string(),
                detail: self.error_detail(&text),
            });
        }
        if !status.is_success() {
            return Err(self.unavailable(Some(status), self.error_detail(&text)));
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| self.unavailable(Some(status), format!("unexpected response: {}", e)))
    }

    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> FishResult<Option<T>> {
        let request = self.build_request::<()>(Method::GET, segments, query, None)?;
        self.send_optional(request).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> FishResult<T> {
        self.get_optional(segments, query)
            .await?
            .ok_or_else(|| self.unavailable(Some(StatusCode::NOT_FOUND), format!("/{} not found", segments.join("/"))))
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> FishResult<T> {
        let request = self.build_request(Method::POST, segments, &[], Some(body))?;
        self.send_optional(request)
            .await?
            .ok_or_else(|| self.unavailable(Some(StatusCode::NOT_FOUND), format!("/{} not found", segments.join("/"))))
    }

    /// Provider error message, falling back to the raw body
    fn error_detail(&self, body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(message),
                documentation_url,
            }) => match documentation_url {
                Some(doc) => format!("{} ({})", message, doc),
                None => message,
            },
            _ => body.trim().to_string(),
        }
    }

    /// Transport failure; the URL is dropped since it may carry `access_token`
    fn transport(&self, status: Option<StatusCode>, error: reqwest::Error) -> FishError {
        self.unavailable(status, error.without_url().to_string())
    }

    fn unavailable(&self, status: Option<StatusCode>, detail: String) -> FishError {
        FishError::HostingUnavailable {
            provider: self.provider.to_string(),
            status: status.map(|s| s.as_u16()),
            detail,
        }
    }
}
