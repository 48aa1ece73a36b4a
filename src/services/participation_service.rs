use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::QuizApi,
    errors::AppResult,
    models::{
        domain::Question,
        dto::{
            request::{AnswerRequest, JoinRequest},
            response::{JoinInfo, SessionStarted},
        },
    },
};

/// Taking a quiz: join, start the timed session, fetch questions, answer.
pub struct ParticipationService {
    api: Arc<dyn QuizApi>,
}

impl ParticipationService {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    pub async fn join_info(&self, quiz_id: Uuid) -> AppResult<JoinInfo> {
        self.api.join_info(quiz_id).await
    }

    pub async fn join(&self, quiz_id: Uuid, password: Option<String>) -> AppResult<String> {
        log::info!("Joining quiz {}", quiz_id);
        let request = JoinRequest {
            password: password.filter(|p| !p.is_empty()),
        };
        Ok(self.api.join_quiz(quiz_id, &request).await?.message)
    }

    pub async fn start(&self, quiz_id: Uuid, submission_id: Uuid) -> AppResult<SessionStarted> {
        log::info!("Starting submission {} of quiz {}", submission_id, quiz_id);
        self.api.start_submission(quiz_id, submission_id).await
    }

    pub async fn questions(&self, quiz_id: Uuid, submission_id: Uuid) -> AppResult<Vec<Question>> {
        Ok(self
            .api
            .submission_questions(quiz_id, submission_id)
            .await?
            .questions)
    }

    pub async fn answer(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
        question_id: i64,
        choice_id: i64,
    ) -> AppResult<String> {
        log::info!("Answering question {} with choice {}", question_id, choice_id);
        let answer = AnswerRequest {
            question: question_id,
            choice: choice_id,
        };
        Ok(self
            .api
            .submit_answer(quiz_id, submission_id, &answer)
            .await?
            .message)
    }
}
