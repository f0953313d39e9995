//! Authenticated request pipeline.
//!
//! Every resource call goes through [`Pipeline::execute`]: the stored
//! bearer token is attached, and a 401 answer triggers at most one token
//! refresh followed by at most one replay of the original request. The
//! replay's outcome is final, a second 401 comes back to the caller rather
//! than looping. When no refresh token is stored, or the refresh itself is
//! rejected, the session is cleared and the original 401 stands.
//!
//! Concurrent 401s serialize on a refresh gate. Whoever enters the gate
//! after a successful refresh finds the token already rotated and goes
//! straight to its replay, so N failing calls cost one network refresh.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use warden_core::types::{RefreshRequest, RefreshedTokens};
use warden_core::{Result, WardenError, decode_data};

use crate::session::SessionManager;

/// A replayable request description.
///
/// Keeping method, path, query, and JSON body here instead of a one-shot
/// `reqwest` builder is what lets the pipeline resend the exact request
/// after a token refresh.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub(crate) fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }
}

/// Raw outcome of a pipeline call: HTTP status plus parsed JSON body.
///
/// Bodies that are not JSON come back as a JSON string so the envelope
/// decoder can still surface them as error text.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: Value,
}

pub(crate) struct Pipeline {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
    refresh_gate: Mutex<()>,
}

impl Pipeline {
    pub(crate) fn new(http: reqwest::Client, base_url: String, session: Arc<SessionManager>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Sends the request with the current credentials, recovering once from
    /// a 401 via refresh-and-replay.
    pub(crate) async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        let sent_with = self.session.access_token().await;
        let first = self.send(request, sent_with.as_deref()).await?;

        if first.status != 401 {
            return Ok(first);
        }

        debug!(path = %request.path, "request rejected with 401, attempting recovery");
        self.recover_unauthorized(request, sent_with, first).await
    }

    /// Refreshes the session explicitly with the stored refresh token.
    ///
    /// This is the same exchange the 401 recovery performs, and it takes the
    /// same gate, so an explicit refresh and an automatic one never race.
    pub(crate) async fn refresh_session(&self) -> Result<RefreshedTokens> {
        let _gate = self.refresh_gate.lock().await;

        let Some(refresh_token) = self.session.refresh_token().await else {
            return Err(WardenError::unauthorized("no refresh token stored"));
        };
        self.refresh_locked(&refresh_token).await
    }

    async fn recover_unauthorized(
        &self,
        request: &ApiRequest,
        sent_with: Option<String>,
        original: RawResponse,
    ) -> Result<RawResponse> {
        let Some(refresh_token) = self.session.refresh_token().await else {
            debug!("no refresh token stored, clearing session");
            self.force_logout().await;
            return Ok(original);
        };

        let gate = self.refresh_gate.lock().await;

        // A concurrent caller may have finished the refresh while we waited
        // on the gate; in that case the rotated token is enough.
        let current = self.session.access_token().await;
        if current.is_some() && current != sent_with {
            drop(gate);
            debug!("token already rotated by concurrent refresh, replaying");
            return self.send(request, current.as_deref()).await;
        }

        match self.refresh_locked(&refresh_token).await {
            Ok(_) => {
                drop(gate);
                debug!("token refresh succeeded, replaying original request");
                let token = self.session.access_token().await;
                self.send(request, token.as_deref()).await
            }
            Err(err) => {
                debug!(error = %err, "token refresh failed, clearing session");
                self.force_logout().await;
                Ok(original)
            }
        }
    }

    /// Performs the network refresh and stores the rotated credentials,
    /// preserving the current user. Caller must hold the refresh gate.
    ///
    /// The service may answer with only a new access token; the stored
    /// refresh token is kept in that case.
    async fn refresh_locked(&self, refresh_token: &str) -> Result<RefreshedTokens> {
        let payload = serde_json::to_value(RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })
        .map_err(|err| WardenError::decode(format!("cannot encode refresh request: {err}")))?;

        let request = ApiRequest::post("/auth/refresh").with_json(payload);
        let token = self.session.access_token().await;
        let response = self.send(&request, token.as_deref()).await?;
        let tokens: RefreshedTokens = decode_data(response.status, &response.body)?;

        let next_refresh = tokens
            .refresh_token
            .clone()
            .unwrap_or_else(|| refresh_token.to_string());
        self.session
            .set_credentials(None, tokens.access_token.clone(), next_refresh)
            .await?;

        Ok(tokens)
    }

    /// Sends one request as-is. No recovery, no replay.
    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| WardenError::transport(format!("request to {url} failed: {err}")))?;

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(RawResponse { status, body })
    }

    async fn force_logout(&self) {
        if let Err(err) = self.session.log_out().await {
            warn!(error = %err, "failed to clear session after auth failure");
        }
    }
}
