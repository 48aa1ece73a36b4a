use std::fmt;

use chrono::Local;
use uuid::Uuid;

use crate::{
    api::QuizApi,
    errors::AppResult,
    models::{domain::Quiz, duration},
};

const MASK: char = '•';

/// A fetched quiz as shown to its owner. The password stays masked until
/// [`QuizDetail::toggle_password`] is called.
#[derive(Debug, Clone)]
pub struct QuizDetail {
    quiz: Quiz,
    password_visible: bool,
}

impl QuizDetail {
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            password_visible: false,
        }
    }

    pub async fn load(api: &dyn QuizApi, quiz_id: Uuid) -> AppResult<Self> {
        log::info!("Fetching quiz {}", quiz_id);
        Ok(Self::new(api.get_quiz(quiz_id).await?))
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn password_visible(&self) -> bool {
        self.password_visible
    }

    /// Flips password visibility and returns the new state.
    pub fn toggle_password(&mut self) -> bool {
        self.password_visible = !self.password_visible;
        self.password_visible
    }

    pub fn password_display(&self) -> Option<String> {
        let password = self.quiz.password.as_deref().filter(|p| !p.is_empty())?;
        if self.password_visible {
            Some(password.to_string())
        } else {
            Some(password.chars().map(|_| MASK).collect())
        }
    }

    pub fn duration_label(&self) -> String {
        let label = self
            .quiz
            .duration
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(duration::format_label);
        match label {
            Some(Ok(label)) => label,
            Some(Err(e)) => {
                log::warn!("Unreadable duration on quiz {}: {}", self.quiz.id, e);
                "No specific duration set.".to_string()
            }
            None => "No specific duration set.".to_string(),
        }
    }

    pub fn start_time_label(&self) -> String {
        match self.quiz.start_time {
            Some(start) => start
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => "No specific time set.".to_string(),
        }
    }

    pub async fn refresh(&mut self, api: &dyn QuizApi) -> AppResult<()> {
        self.quiz = api.get_quiz(self.quiz.id).await?;
        Ok(())
    }

    /// Deletes one question and refetches the whole quiz.
    pub async fn delete_question(&mut self, api: &dyn QuizApi, question_id: i64) -> AppResult<()> {
        log::info!("Deleting question {} of quiz {}", question_id, self.quiz.id);
        api.delete_question(self.quiz.id, question_id).await?;
        self.refresh(api).await
    }
}

impl fmt::Display for QuizDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quiz = &self.quiz;
        writeln!(f, "{} ({})", quiz.title, quiz.id)?;
        if let Some(description) = quiz.description_text() {
            writeln!(f, "{}", description)?;
        }
        if let Some(password) = self.password_display() {
            writeln!(f, "Password: {}", password)?;
        }
        writeln!(f, "Duration: {}", self.duration_label())?;
        writeln!(f, "Starts: {}", self.start_time_label())?;
        writeln!(f)?;

        if quiz.questions.is_empty() {
            return write!(f, "No questions");
        }
        for (index, question) in quiz.questions.iter().enumerate() {
            writeln!(f, "{}. {} [id {}]", index + 1, question.content, question.id)?;
            for choice in &question.choices {
                let mark = if question.is_correct(choice.id) { "x" } else { " " };
                writeln!(f, "   [{}] {} [id {}]", mark, choice.content, choice.id)?;
            }
        }
        Ok(())
    }
}
