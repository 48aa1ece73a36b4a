use std::collections::BTreeMap;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

const MESSAGE_KEYS: [&str; 3] = ["detail", "error", "message"];
const MAX_BODY_IN_MESSAGE: usize = 200;

/// Decodes a success body, or turns the failure body into an [`AppError`].
pub async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

/// For endpoints whose success body is irrelevant (`DELETE`).
pub async fn expect_success(response: Response) -> AppResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

pub fn error_from_body(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::BAD_REQUEST {
        if let Some(fields) = parse_field_errors(body) {
            return AppError::FieldErrors(fields);
        }
    }

    log::debug!("Request failed with {}: {}", status, body);
    AppError::from_status(status, extract_message(body))
}

/// Picks the human-readable message out of an error body.
pub fn extract_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in MESSAGE_KEYS {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_BODY_IN_MESSAGE {
        let cut: String = trimmed.chars().take(MAX_BODY_IN_MESSAGE).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}

/// Reads `{"field": ["message", ...]}` bodies. Message-style bodies yield `None`.
pub fn parse_field_errors(body: &str) -> Option<BTreeMap<String, Vec<String>>> {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    if map.is_empty() || MESSAGE_KEYS.iter().any(|key| map.contains_key(*key)) {
        return None;
    }

    let mut fields = BTreeMap::new();
    for (field, value) in map {
        let messages = match value {
            Value::String(message) => vec![message],
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(message) => Some(message),
                    _ => None,
                })
                .collect(),
            _ => return None,
        };
        fields.insert(field, messages);
    }
    Some(fields)
}
