use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    domain::Quiz,
    serde_helpers::{deserialize_optional_timestamp, deserialize_score},
};

/// A user's attempt at a quiz. Produced and scored by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizSubmission {
    pub id: Uuid,
    pub quiz: Quiz,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: Option<f64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_spent: Option<i64>,
}
