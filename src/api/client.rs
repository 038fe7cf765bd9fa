// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use super::error::ApiError;
use super::session::{is_token_expired, SessionContext};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single request, kept around so it can be replayed after a token refresh.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    method: Method,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
}

impl Call {
    pub(crate) fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|source| ApiError::Decode {
            path: self.path(),
            source,
        })?;
        self.body = Some(value);
        Ok(self)
    }

    fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// JSON-over-HTTP client for the Flowdesk backend.
///
/// Every request carries the current access token. An access token whose `exp` claim has passed
/// is refreshed before sending; a 401 triggers one refresh and one retry. When neither helps the
/// session is cleared and [`ApiError::SessionExpired`] is returned.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base: Url, session: SessionContext) -> Result<Self, ApiError> {
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base.to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            http,
            base,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn endpoint(&self, segments: &[String]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends `call` and decodes the JSON response body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, call: Call) -> Result<T, ApiError> {
        let path = call.path();
        let body = self.execute(call).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { path, source })
    }

    /// Sends `call` and ignores any response body.
    pub(crate) async fn send(&self, call: Call) -> Result<(), ApiError> {
        self.execute(call).await.map(drop)
    }

    /// Sends a request that does not require (or attach) a session.
    pub(crate) async fn fetch_public<T: DeserializeOwned>(
        &self,
        call: Call,
    ) -> Result<T, ApiError> {
        let path = call.path();
        let response = self.send_once(&call, None).await?;
        let body = read_body(response, &path).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { path, source })
    }

    async fn execute(&self, call: Call) -> Result<String, ApiError> {
        let path = call.path();
        let Some(session) = self.session.current().await else {
            return Err(ApiError::Unauthenticated);
        };

        let mut token = session.access_token;
        let mut refreshed = false;
        if is_token_expired(&token, OffsetDateTime::now_utc()) {
            debug!("event=token_expired module=api path={path}");
            token = self.refresh(&token).await?;
            refreshed = true;
        }

        loop {
            let response = self.send_once(&call, Some(&token)).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return read_body(response, &path).await;
            }
            // One refresh per request, whether it happened up front or after a 401.
            if refreshed {
                warn!("event=api_request module=api path={path} status=401 retry=exhausted");
                self.session.clear().await;
                return Err(ApiError::SessionExpired);
            }
            token = self.refresh(&token).await?;
            refreshed = true;
        }
    }

    async fn send_once(
        &self,
        call: &Call,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(&call.segments)?;
        let mut request = self.http.request(call.method.clone(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let started = std::time::Instant::now();
        let result = request.send().await;
        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(response) => info!(
                "event=api_request module=api method={} path={} status={} elapsed_ms={elapsed_ms}",
                call.method,
                call.path(),
                response.status().as_u16()
            ),
            Err(err) => warn!(
                "event=api_request module=api method={} path={} status=error elapsed_ms={elapsed_ms} err={err}",
                call.method,
                call.path()
            ),
        }
        result.map_err(ApiError::Transport)
    }

    /// Exchanges the refresh token for a new access token and returns it.
    ///
    /// `stale` is the access token that was found wanting. If another request already replaced
    /// it while this one waited for the refresh lock, the newer token is returned as is.
    async fn refresh(&self, stale: &str) -> Result<String, ApiError> {
        let _guard = self.session.refresh_guard().await;

        let Some(session) = self.session.current().await else {
            return Err(ApiError::SessionExpired);
        };
        if session.access_token != stale {
            return Ok(session.access_token);
        }

        let call = Call::new(Method::POST, ["auth", "refresh"]).json(&RefreshRequest {
            refresh_token: &session.refresh_token,
        })?;
        let refreshed = match self.fetch_public::<RefreshResponse>(call).await {
            Ok(RefreshResponse {
                access_token: Some(access_token),
                refresh_token,
            }) => Some((access_token, refresh_token)),
            Ok(_) => None,
            Err(err) => {
                warn!("event=token_refresh module=api status=error err={err}");
                None
            }
        };

        let Some((access_token, refresh_token)) = refreshed else {
            self.session.clear().await;
            return Err(ApiError::SessionExpired);
        };
        if !self
            .session
            .update_tokens(access_token.clone(), refresh_token)
            .await
        {
            return Err(ApiError::SessionExpired);
        }
        info!("event=token_refresh module=api status=ok");
        Ok(access_token)
    }
}

async fn read_body(response: reqwest::Response, path: &str) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::Transport)?;
    if status.is_success() {
        return Ok(body);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            path: path.to_owned(),
        });
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pulls a human-readable message out of an error body (`{error}` or `{message}`), falling back
/// to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
            ..
        })
        | Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => body.trim().chars().take(200).collect(),
    }
}
