use std::borrow::Cow;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Query-string extractor that keeps the first value of a repeated key.
///
/// Rejections are [`ApiError`]s, so a malformed query still gets an error
/// envelope instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for FirstQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let fields = first_values(parts.uri.query().unwrap_or_default())?;
        serde_json::from_value(Value::Object(fields))
            .map(Self)
            .map_err(|error| ApiError::InvalidQuery(error.to_string()))
    }
}

fn first_values(query: &str) -> Result<Map<String, Value>, ApiError> {
    let mut fields = Map::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode(name)?;
        if fields.contains_key(&name) {
            continue;
        }
        fields.insert(name, Value::String(decode(value)?));
    }
    Ok(fields)
}

fn decode(raw: &str) -> Result<String, ApiError> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(Cow::into_owned)
        .map_err(|_| ApiError::InvalidQuery(format!("'{raw}' is not valid UTF-8")))
}
