// src/api/retry.rs
//! Retry policy as an explicit, independently testable value.
//!
//! The rules for "what happens after a failed attempt" live here, not
//! inline in the transport loop: a policy value classifies a status into
//! a decision, computes backoff delays, and bounds the budget. Sleeping
//! goes through the `Sleeper` trait, so tests drive the whole retry path
//! with scripted responses and a recording sleeper — no network, no real
//! waits.

use crate::constants::{BACKOFF_BASE_SECS, DEFAULT_RETRY_BUDGET};
use std::time::Duration;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient; wait this long, then try again.
    RetryAfter(Duration),
    /// Not transient; surface the failure immediately.
    Fail,
}

/// The retry/backoff rules for one logical request.
///
/// Budgets are call-local: every `request()` gets a fresh attempt counter
/// and there is no shared backoff clock across calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries permitted after the initial attempt.
    pub max_retries: u32,
    /// Base delay; retry `n` (0-indexed) backs off `base * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRY_BUDGET,
            base_delay: Duration::from_secs(BACKOFF_BASE_SECS),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries, for callers that want one shot.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential backoff for the given attempt index.
    pub fn backoff(&self, attempt: u32) -> Duration {
        // Saturate the shift so absurd budgets can't overflow.
        self.base_delay * 2u32.saturating_pow(attempt.min(16))
    }

    /// Classifies an HTTP status into a retry decision.
    ///
    /// - 429: honor `Retry-After` when the server sent one, else back off
    ///   exponentially;
    /// - 5xx: exponential backoff;
    /// - anything else non-2xx: a client error, never retried.
    pub fn classify(
        &self,
        attempt: u32,
        status: u16,
        retry_after: Option<Duration>,
    ) -> RetryDecision {
        match status {
            429 => RetryDecision::RetryAfter(retry_after.unwrap_or_else(|| self.backoff(attempt))),
            500..=599 => RetryDecision::RetryAfter(self.backoff(attempt)),
            _ => RetryDecision::Fail,
        }
    }

    /// Network-level faults are transient by definition.
    pub fn classify_transport_fault(&self, attempt: u32) -> RetryDecision {
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}

/// Cooperative delay primitive.
///
/// The transport never calls `tokio::time::sleep` directly; it asks its
/// sleeper, which tests replace with one that records requested delays
/// and returns immediately.
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The production sleeper.
pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
