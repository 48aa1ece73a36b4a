use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use uuid::Uuid;

use crate::{
    api::{
        http_helpers::{expect_success, read_json},
        quiz_api::{paths, QuizApi},
    },
    auth::SessionManager,
    config::Config,
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

/// [`QuizApi`] over HTTP. Authenticated calls take the bearer token from the
/// session manager at send time.
pub struct HttpQuizApi {
    client: Client,
    config: Arc<Config>,
    session: Arc<SessionManager>,
}

impl HttpQuizApi {
    pub fn new(config: Arc<Config>, session: Arc<SessionManager>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    fn anonymous(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        log::debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    fn authed(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let bearer = self.session.bearer()?;
        Ok(self.anonymous(method, path).bearer_auth(bearer))
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn login(&self, form: &LoginForm) -> AppResult<TokenPair> {
        let response = self
            .anonymous(Method::POST, paths::LOGIN)
            .json(form)
            .send()
            .await?;
        read_json(response).await
    }

    async fn register(&self, payload: &RegisterPayload) -> AppResult<User> {
        let response = self
            .anonymous(Method::POST, paths::REGISTER)
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_profile(&self) -> AppResult<User> {
        let response = self.authed(Method::GET, paths::PROFILE)?.send().await?;
        read_json(response).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<User> {
        let response = self
            .authed(Method::PATCH, paths::PROFILE)?
            .json(update)
            .send()
            .await?;
        read_json(response).await
    }

    async fn user_quizzes(&self) -> AppResult<Dashboard> {
        let response = self.authed(Method::GET, paths::USER_QUIZZES)?.send().await?;
        read_json(response).await
    }

    async fn create_quiz(&self, payload: &QuizPayload) -> AppResult<Quiz> {
        let response = self
            .authed(Method::POST, paths::QUIZ_CREATE)?
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> AppResult<Quiz> {
        let response = self
            .authed(Method::GET, &paths::quiz(quiz_id))?
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_quiz(&self, quiz_id: Uuid, payload: &QuizPayload) -> AppResult<Quiz> {
        let response = self
            .authed(Method::PATCH, &paths::quiz(quiz_id))?
            .json(payload)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> AppResult<()> {
        let response = self
            .authed(Method::DELETE, &paths::quiz(quiz_id))?
            .send()
            .await?;
        expect_success(response).await
    }

    async fn create_question(&self, quiz_id: Uuid, question: &NewQuestion) -> AppResult<Question> {
        let response = self
            .authed(Method::POST, &paths::questions(quiz_id))?
            .json(question)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<Question> {
        let response = self
            .authed(Method::GET, &paths::question(quiz_id, question_id))?
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_question(
        &self,
        quiz_id: Uuid,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> AppResult<Question> {
        let response = self
            .authed(Method::PATCH, &paths::question(quiz_id, question_id))?
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<()> {
        let response = self
            .authed(Method::DELETE, &paths::question(quiz_id, question_id))?
            .send()
            .await?;
        expect_success(response).await
    }

    async fn create_choice(&self, question_id: i64, choice: &ChoicePayload) -> AppResult<Choice> {
        let response = self
            .authed(Method::POST, &paths::choices(question_id))?
            .json(choice)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_choice(
        &self,
        question_id: i64,
        choice_id: i64,
        choice: &ChoicePayload,
    ) -> AppResult<Choice> {
        let response = self
            .authed(Method::PUT, &paths::choice(question_id, choice_id))?
            .json(choice)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_choice(&self, question_id: i64, choice_id: i64) -> AppResult<()> {
        let response = self
            .authed(Method::DELETE, &paths::choice(question_id, choice_id))?
            .send()
            .await?;
        expect_success(response).await
    }

    async fn join_info(&self, quiz_id: Uuid) -> AppResult<JoinInfo> {
        let response = self
            .authed(Method::GET, &paths::join(quiz_id))?
            .send()
            .await?;
        read_json(response).await
    }

    async fn join_quiz(&self, quiz_id: Uuid, request: &JoinRequest) -> AppResult<MessageResponse> {
        let response = self
            .authed(Method::POST, &paths::join(quiz_id))?
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn start_submission(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
    ) -> AppResult<SessionStarted> {
        let response = self
            .authed(Method::POST, &paths::submission_start(quiz_id, submission_id))?
            .send()
            .await?;
        read_json(response).await
    }

    async fn submission_questions(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
    ) -> AppResult<SubmissionQuestions> {
        let response = self
            .authed(Method::GET, &paths::submission_questions(quiz_id, submission_id))?
            .send()
            .await?;
        read_json(response).await
    }

    async fn submit_answer(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
        answer: &AnswerRequest,
    ) -> AppResult<MessageResponse> {
        let response = self
            .authed(Method::POST, &paths::submission(quiz_id, submission_id))?
            .json(answer)
            .send()
            .await?;
        read_json(response).await
    }
}
