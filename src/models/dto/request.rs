use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use validator::Validate;

use crate::{
    errors::AppResult,
    models::{
        domain::{QuestionType, Quiz},
        duration,
    },
};

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters."))]
    pub name: String,

    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 4, message = "Username must be at least 4 characters."))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "The passwords did not match"))]
    pub password_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    pub fn to_payload(&self) -> AppResult<RegisterPayload> {
        self.validate()?;
        Ok(RegisterPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, message = "Full name must be at least 2 characters."))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, message = "Username must be at least 4 characters."))]
    pub username: Option<String>,
}

/// Quiz metadata as entered on the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct QuizForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    pub description: Option<String>,

    pub password: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    #[validate(range(min = 1.0, max = 180.0, message = "Duration must be between 1 and 180 minutes"))]
    pub duration_minutes: Option<f64>,
}

/// Body of `POST /quiz/create/` and `PATCH /quiz/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<u64>, // seconds
}

impl QuizForm {
    /// Pre-fills the edit form from a fetched quiz.
    pub fn from_quiz(quiz: &Quiz) -> AppResult<Self> {
        Ok(QuizForm {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            password: quiz.password.clone(),
            start_time: quiz.start_time,
            duration_minutes: quiz.duration_minutes()?,
        })
    }

    pub fn to_payload(&self) -> AppResult<QuizPayload> {
        self.validate()?;
        Ok(QuizPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            password: self.password.clone(),
            start_time: self
                .start_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            duration: self.duration_minutes.map(duration::minutes_to_seconds),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQuestion {
    pub content: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub correct_choice: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_choice: Option<i64>,
}

impl QuestionPatch {
    pub fn content(content: &str) -> Self {
        QuestionPatch {
            content: Some(content.to_string()),
            correct_choice: None,
        }
    }

    pub fn correct_choice(choice_id: i64) -> Self {
        QuestionPatch {
            content: None,
            correct_choice: Some(choice_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoicePayload {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRequest {
    pub question: i64,
    pub choice: i64,
}
