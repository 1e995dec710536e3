use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// Standard response envelope for every handler output.
///
/// Exactly one of `data` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub cached: bool,
    pub timestamp: UtcDateTime,
}

impl<T> Envelope<T> {
    pub fn success(data: T, cached: bool) -> Self {
        Self {
            data: Some(data),
            error: None,
            cached,
            timestamp: UtcDateTime::now(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            cached: false,
            timestamp: UtcDateTime::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
