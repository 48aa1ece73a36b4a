use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    errors::AppResult,
    models::{
        domain::{Choice, Dashboard, Question, Quiz, User},
        dto::{
            request::{
                AnswerRequest, ChoicePayload, JoinRequest, LoginForm, NewQuestion,
                ProfileUpdate, QuestionPatch, QuizPayload, RegisterPayload,
            },
            response::{JoinInfo, MessageResponse, SessionStarted, SubmissionQuestions, TokenPair},
        },
    },
};

/// Every backend endpoint the client calls. One method per request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn login(&self, form: &LoginForm) -> AppResult<TokenPair>;
    async fn register(&self, payload: &RegisterPayload) -> AppResult<User>;
    async fn get_profile(&self) -> AppResult<User>;
    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<User>;

    async fn user_quizzes(&self) -> AppResult<Dashboard>;

    async fn create_quiz(&self, payload: &QuizPayload) -> AppResult<Quiz>;
    async fn get_quiz(&self, quiz_id: Uuid) -> AppResult<Quiz>;
    async fn update_quiz(&self, quiz_id: Uuid, payload: &QuizPayload) -> AppResult<Quiz>;
    async fn delete_quiz(&self, quiz_id: Uuid) -> AppResult<()>;

    async fn create_question(&self, quiz_id: Uuid, question: &NewQuestion) -> AppResult<Question>;
    async fn get_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<Question>;
    async fn update_question(
        &self,
        quiz_id: Uuid,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> AppResult<Question>;
    async fn delete_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<()>;

    async fn create_choice(&self, question_id: i64, choice: &ChoicePayload) -> AppResult<Choice>;
    async fn update_choice(
        &self,
        question_id: i64,
        choice_id: i64,
        choice: &ChoicePayload,
    ) -> AppResult<Choice>;
    async fn delete_choice(&self, question_id: i64, choice_id: i64) -> AppResult<()>;

    async fn join_info(&self, quiz_id: Uuid) -> AppResult<JoinInfo>;
    async fn join_quiz(&self, quiz_id: Uuid, request: &JoinRequest) -> AppResult<MessageResponse>;
    async fn start_submission(&self, quiz_id: Uuid, submission_id: Uuid)
        -> AppResult<SessionStarted>;
    async fn submission_questions(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
    ) -> AppResult<SubmissionQuestions>;
    async fn submit_answer(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
        answer: &AnswerRequest,
    ) -> AppResult<MessageResponse>;
}

/// Request paths, relative to the configured base URL.
pub mod paths {
    use uuid::Uuid;

    pub const LOGIN: &str = "login/";
    pub const REGISTER: &str = "register/";
    pub const PROFILE: &str = "profile/";
    pub const USER_QUIZZES: &str = "user/quizzes/";
    pub const QUIZ_CREATE: &str = "quiz/create/";

    pub fn quiz(quiz_id: Uuid) -> String {
        format!("quiz/{}/", quiz_id)
    }

    pub fn questions(quiz_id: Uuid) -> String {
        format!("quiz/{}/question/", quiz_id)
    }

    pub fn question(quiz_id: Uuid, question_id: i64) -> String {
        format!("quiz/{}/question/{}/", quiz_id, question_id)
    }

    pub fn choices(question_id: i64) -> String {
        format!("question/{}/choice/", question_id)
    }

    pub fn choice(question_id: i64, choice_id: i64) -> String {
        format!("question/{}/choice/{}/", question_id, choice_id)
    }

    pub fn join(quiz_id: Uuid) -> String {
        format!("quiz/{}/join/", quiz_id)
    }

    pub fn submission(quiz_id: Uuid, submission_id: Uuid) -> String {
        format!("quiz/{}/submit/{}/", quiz_id, submission_id)
    }

    pub fn submission_start(quiz_id: Uuid, submission_id: Uuid) -> String {
        format!("quiz/{}/submit/{}/start/", quiz_id, submission_id)
    }

    pub fn submission_questions(quiz_id: Uuid, submission_id: Uuid) -> String {
        format!("quiz/{}/submit/{}/questions/", quiz_id, submission_id)
    }
}

#[cfg(test)]
mod tests {
    use super::paths;
    use crate::test_utils::fixtures::quiz_id;

    #[test]
    fn test_paths_keep_trailing_slash() {
        let id = quiz_id();
        assert_eq!(paths::quiz(id), format!("quiz/{}/", id));
        assert_eq!(paths::question(id, 12), format!("quiz/{}/question/12/", id));
        assert_eq!(paths::choice(12, 3), "question/12/choice/3/");
        assert_eq!(paths::choices(12), "question/12/choice/");
    }

    #[test]
    fn test_submission_paths() {
        let id = quiz_id();
        let sid = uuid::Uuid::nil();
        assert_eq!(
            paths::submission_start(id, sid),
            format!("quiz/{}/submit/{}/start/", id, sid)
        );
        assert!(paths::submission_questions(id, sid).ends_with("/questions/"));
    }
}
