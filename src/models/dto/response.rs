use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{domain::Question, serde_helpers::deserialize_optional_timestamp};

#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoinInfo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub has_password: bool,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionStarted {
    pub message: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmissionQuestions {
    #[serde(default)]
    pub questions: Vec<Question>,
}
