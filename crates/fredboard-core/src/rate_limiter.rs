use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::error::ConfigError;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Admission gate the API client passes through before every upstream call.
pub trait Limiter: Send + Sync {
    /// Resolves once the caller may issue one request. Never fails.
    fn acquire<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

    fn status(&self) -> RateLimiterStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimiterStatus {
    pub available_tokens: u32,
    pub max_tokens: u32,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Continuous-refill token bucket: `max_tokens` per window, bursts up to capacity.
#[derive(Debug)]
pub struct TokenBucket {
    max_tokens: u32,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(max_per_minute: u32) -> Result<Self, ConfigError> {
        Self::with_window(max_per_minute, DEFAULT_WINDOW)
    }

    pub fn with_window(max_tokens: u32, window: Duration) -> Result<Self, ConfigError> {
        if max_tokens == 0 {
            return Err(ConfigError::ZeroLimit {
                name: "rate_limit_per_minute",
            });
        }
        if window.is_zero() {
            return Err(ConfigError::ZeroLimit {
                name: "rate_limit_window",
            });
        }

        Ok(Self {
            max_tokens,
            refill_per_sec: f64::from(max_tokens) / window.as_secs_f64(),
            state: Mutex::new(BucketState {
                tokens: f64::from(max_tokens),
                last_refill: Instant::now(),
            }),
        })
    }

    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    // Refill, test and decrement happen under one guard and never panic midway.
    fn lock(&self) -> MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill);
        state.tokens =
            (state.tokens + elapsed.as_secs_f64() * self.refill_per_sec).min(f64::from(self.max_tokens));
        state.last_refill = now;
    }

    /// Takes one token without waiting. On refusal returns how long until one
    /// whole token will have refilled.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.lock();
        self.refill(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return Ok(());
        }

        let wait_ms = ((1.0 - state.tokens) / self.refill_per_sec * 1_000.0).ceil();
        Err(Duration::from_millis((wait_ms as u64).max(1)))
    }

    /// Waits until a token is available and takes it.
    pub async fn acquire(&self) {
        loop {
            match self.try_acquire() {
                Ok(()) => return,
                Err(wait) => {
                    tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limiter suspending caller");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    pub fn status(&self) -> RateLimiterStatus {
        let mut state = self.lock();
        self.refill(&mut state);
        RateLimiterStatus {
            available_tokens: state.tokens.floor() as u32,
            max_tokens: self.max_tokens,
        }
    }
}

impl Limiter for TokenBucket {
    fn acquire<'a>(&'a self) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(TokenBucket::acquire(self))
    }

    fn status(&self) -> RateLimiterStatus {
        TokenBucket::status(self)
    }
}
