use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::QuizApi,
    errors::AppResult,
    models::{domain::Quiz, dto::request::QuizForm},
};

pub struct QuizService {
    api: Arc<dyn QuizApi>,
}

impl QuizService {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    pub async fn create_quiz(&self, form: &QuizForm) -> AppResult<Quiz> {
        let payload = form.to_payload()?;
        log::info!("Creating quiz '{}'", payload.title);
        let quiz = self.api.create_quiz(&payload).await?;
        log::info!("Created quiz {}", quiz.id);
        Ok(quiz)
    }

    /// Fetches the quiz and pre-fills the edit form, duration in minutes.
    pub async fn edit_form(&self, id: Uuid) -> AppResult<QuizForm> {
        let quiz = self.api.get_quiz(id).await?;
        QuizForm::from_quiz(&quiz)
    }

    pub async fn update_quiz(&self, id: Uuid, form: &QuizForm) -> AppResult<Quiz> {
        let payload = form.to_payload()?;
        log::info!("Updating quiz {}", id);
        self.api.update_quiz(id, &payload).await
    }

    pub async fn delete_quiz(&self, id: Uuid) -> AppResult<()> {
        log::info!("Deleting quiz {}", id);
        self.api.delete_quiz(id).await
    }
}
