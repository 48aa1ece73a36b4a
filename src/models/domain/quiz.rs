use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::AppResult,
    models::{domain::question::Question, duration, serde_helpers::deserialize_optional_timestamp},
};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub password: Option<String>, // Returned in plaintext to the owner
    #[serde(default)]
    pub creator: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<String>, // "[D ]HH:MM:SS"
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn duration_minutes(&self) -> AppResult<Option<f64>> {
        self.duration
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(duration::parse_minutes)
            .transpose()
    }

    pub fn question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}
