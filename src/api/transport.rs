// src/api/transport.rs
//! The retrying HTTP transport.
//!
//! One job: turn `(method, path, body)` into parsed JSON or a typed
//! `AppError`, applying the retry policy on the way. No response parsing
//! beyond JSON, no business logic. Actual HTTP I/O sits behind the
//! `HttpSend` trait so the retry loop is testable with scripted
//! responses.

use crate::constants::{API_BASE_URL, API_VERSION};
use crate::error::AppError;
use crate::types::AccessToken;
use super::retry::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper};
use chrono::Utc;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// HTTP verbs this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// One wire request, before any retry bookkeeping.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, without a leading slash.
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A raw response: status, the `Retry-After` header verbatim, body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

/// A network-level failure before any HTTP status existed.
#[derive(Debug, Clone)]
pub struct TransportFault(pub String);

/// The ability to perform one HTTP exchange.
///
/// Implemented by `ReqwestSender` in production and by scripted fakes in
/// tests.
#[async_trait::async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault>;
}

/// Production sender: reqwest with bearer auth and the protocol-version
/// header applied to every request.
pub struct ReqwestSender {
    client: reqwest::Client,
}

impl ReqwestSender {
    pub fn new(token: &AccessToken) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .default_headers(Self::default_headers(token)?)
            .build()?;
        Ok(Self { client })
    }

    fn default_headers(token: &AccessToken) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", token.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault> {
        let url = format!("{}/{}", API_BASE_URL, request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFault(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| TransportFault(e.to_string()))?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// The retrying transport: sender + sleeper + policy.
pub struct Transport {
    sender: Arc<dyn HttpSend>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl Transport {
    /// Production transport over reqwest with real sleeps.
    pub fn new(token: &AccessToken, policy: RetryPolicy) -> Result<Self, AppError> {
        Ok(Self::with_parts(
            Arc::new(ReqwestSender::new(token)?),
            Arc::new(TokioSleeper),
            policy,
        ))
    }

    /// Assembles a transport from explicit parts; tests inject scripted
    /// senders and recording sleepers here.
    pub fn with_parts(
        sender: Arc<dyn HttpSend>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            sender,
            sleeper,
            policy,
        }
    }

    /// Issues a request with the full retry/backoff treatment.
    pub async fn request(&self, request: ApiRequest) -> Result<serde_json::Value, AppError> {
        self.request_with_deadline(request, None).await
    }

    /// Like [`request`](Self::request), but aborts pending retries once
    /// the deadline would be overrun, returning `DeadlineExceeded` —
    /// a distinct signal, never conflated with a 5xx or network failure.
    pub async fn request_with_deadline(
        &self,
        request: ApiRequest,
        deadline: Option<Instant>,
    ) -> Result<serde_json::Value, AppError> {
        // Attempt 0 is the initial try; the budget counts retries beyond it.
        for attempt in 0..=self.policy.max_retries {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(AppError::DeadlineExceeded);
            }

            log::debug!("{} {} (attempt {})", request.method.as_str(), request.path, attempt);

            let decision = match self.sender.send(&request).await {
                Ok(response) if (200..300).contains(&response.status) => {
                    return parse_body(&response.body);
                }
                Ok(response) => {
                    let retry_after = parse_retry_after(response.retry_after.as_deref());
                    match self.policy.classify(attempt, response.status, retry_after) {
                        RetryDecision::RetryAfter(delay) if attempt < self.policy.max_retries => {
                            Ok(delay)
                        }
                        _ => Err(AppError::from_response(
                            response.status,
                            &response.body,
                            retry_after.map(|d| d.as_secs()),
                        )),
                    }
                }
                Err(fault) => match self.policy.classify_transport_fault(attempt) {
                    RetryDecision::RetryAfter(delay) if attempt < self.policy.max_retries => {
                        Ok(delay)
                    }
                    _ => Err(AppError::Transport(fault.0)),
                },
            };

            match decision {
                Ok(delay) => {
                    if deadline.is_some_and(|d| Instant::now() + delay >= d) {
                        return Err(AppError::DeadlineExceeded);
                    }
                    log::warn!(
                        "{} {} failed (attempt {}), retrying in {:?}",
                        request.method.as_str(),
                        request.path,
                        attempt,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }

        // The loop always returns from its final iteration: with no
        // attempts remaining, every branch yields Err.
        unreachable!("retry loop exited without a terminal result")
    }
}

fn parse_body(body: &str) -> Result<serde_json::Value, AppError> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body).map_err(AppError::from)
}

/// Parses a `Retry-After` header: integer seconds, or an HTTP-date.
fn parse_retry_after(header: Option<&str>) -> Option<Duration> {
    let value = header?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // HTTP-date form; anything already past means "retry now".
    let date = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.signed_duration_since(Utc::now());
    Some(Duration::from_secs(delta.num_seconds().max(0) as u64))
}
