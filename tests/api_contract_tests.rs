use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quizwhiz_client::{
    api::QuizApi,
    errors::{AppError, AppResult},
    models::{
        domain::{Choice, Dashboard, Question, Quiz, User},
        dto::{
            request::{
                AnswerRequest, ChoicePayload, JoinRequest, LoginForm, NewQuestion, ProfileUpdate,
                QuestionPatch, QuizForm, QuizPayload, RegisterPayload,
            },
            response::{JoinInfo, MessageResponse, SessionStarted, SubmissionQuestions, TokenPair},
        },
    },
    services::{
        DashboardService, DashboardView, QuestionDrafts, QuestionEditor, QuizDetail, QuizService,
        SaveError, SavePolicy, TableRow,
    },
};

#[derive(Default)]
struct Backend {
    quizzes: HashMap<Uuid, Quiz>,
    next_id: i64,
    calls: Vec<String>,
    choice_creates: usize,
    fail_choice_create: Option<usize>,
}

impl Backend {
    /// Ids jump around so tests cannot rely on them being sequential.
    fn allocate_id(&mut self) -> i64 {
        self.next_id = if self.next_id == 0 { 1009 } else { self.next_id * 7 % 9973 };
        self.next_id
    }

    fn quiz_mut(&mut self, quiz_id: Uuid) -> AppResult<&mut Quiz> {
        self.quizzes
            .get_mut(&quiz_id)
            .ok_or_else(|| AppError::NotFound("No Quiz matches the given query.".to_string()))
    }

    fn question_mut(&mut self, question_id: i64) -> AppResult<&mut Question> {
        self.quizzes
            .values_mut()
            .flat_map(|quiz| quiz.questions.iter_mut())
            .find(|q| q.id == question_id)
            .ok_or_else(|| AppError::NotFound("No Question matches the given query.".to_string()))
    }
}

fn apply_payload(payload: &QuizPayload, quiz: &mut Quiz) {
    quiz.title = payload.title.clone();
    quiz.description = payload.description.clone();
    quiz.password = payload.password.clone();
    quiz.start_time = payload
        .start_time
        .as_deref()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&chrono::Utc));
    quiz.duration = payload.duration.map(|secs| {
        format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
    });
}

#[derive(Clone, Default)]
struct InMemoryQuizApi {
    backend: Arc<RwLock<Backend>>,
}

impl InMemoryQuizApi {
    async fn seed_quiz(&self, title: &str) -> Uuid {
        let id = Uuid::new_v4();
        let quiz = Quiz {
            id,
            title: title.to_string(),
            description: None,
            password: None,
            creator: Some(1),
            start_time: None,
            duration: None,
            questions: Vec::new(),
        };
        self.backend.write().await.quizzes.insert(id, quiz);
        id
    }

    async fn fail_choice_create(&self, nth: usize) {
        self.backend.write().await.fail_choice_create = Some(nth);
    }

    async fn clear_failures(&self) {
        self.backend.write().await.fail_choice_create = None;
    }

    async fn quiz(&self, quiz_id: Uuid) -> Quiz {
        self.backend.read().await.quizzes[&quiz_id].clone()
    }

    async fn calls(&self) -> Vec<String> {
        self.backend.read().await.calls.clone()
    }

    async fn record(&self, call: String) {
        self.backend.write().await.calls.push(call);
    }
}

#[async_trait]
impl QuizApi for InMemoryQuizApi {
    async fn login(&self, _form: &LoginForm) -> AppResult<TokenPair> {
        Err(AppError::Unauthorized(
            "No active account found with the given credentials".to_string(),
        ))
    }

    async fn register(&self, payload: &RegisterPayload) -> AppResult<User> {
        Ok(User::new(1, &payload.name, &payload.email, &payload.username))
    }

    async fn get_profile(&self) -> AppResult<User> {
        Ok(User::new(1, "Owner", "owner@example.com", "owner"))
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> AppResult<User> {
        self.get_profile().await
    }

    async fn user_quizzes(&self) -> AppResult<Dashboard> {
        self.record("GET user/quizzes".to_string()).await;
        let backend = self.backend.read().await;
        let mut created: Vec<Quiz> = backend.quizzes.values().cloned().collect();
        created.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(Dashboard {
            created,
            participated: Vec::new(),
        })
    }

    async fn create_quiz(&self, payload: &QuizPayload) -> AppResult<Quiz> {
        let id = self.seed_quiz(&payload.title).await;
        let mut backend = self.backend.write().await;
        let mut quiz = backend.quizzes[&id].clone();
        apply_payload(payload, &mut quiz);
        backend.quizzes.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn get_quiz(&self, quiz_id: Uuid) -> AppResult<Quiz> {
        self.record(format!("GET quiz/{}", quiz_id)).await;
        let mut backend = self.backend.write().await;
        Ok(backend.quiz_mut(quiz_id)?.clone())
    }

    async fn update_quiz(&self, quiz_id: Uuid, payload: &QuizPayload) -> AppResult<Quiz> {
        let mut backend = self.backend.write().await;
        let mut quiz = backend.quiz_mut(quiz_id)?.clone();
        apply_payload(payload, &mut quiz);
        backend.quizzes.insert(quiz_id, quiz.clone());
        Ok(quiz)
    }

    async fn delete_quiz(&self, quiz_id: Uuid) -> AppResult<()> {
        let mut backend = self.backend.write().await;
        backend
            .quizzes
            .remove(&quiz_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("No Quiz matches the given query.".to_string()))
    }

    async fn create_question(&self, quiz_id: Uuid, question: &NewQuestion) -> AppResult<Question> {
        let mut backend = self.backend.write().await;
        backend.calls.push("POST question".to_string());
        let id = backend.allocate_id();
        let created = Question {
            id,
            quiz: Some(quiz_id),
            content: question.content.clone(),
            question_type: question.question_type,
            correct_choice: question.correct_choice,
            choices: Vec::new(),
        };
        backend.quiz_mut(quiz_id)?.questions.push(created.clone());
        Ok(created)
    }

    async fn get_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<Question> {
        let mut backend = self.backend.write().await;
        backend
            .quiz_mut(quiz_id)?
            .question(question_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("No Question matches the given query.".to_string()))
    }

    async fn update_question(
        &self,
        _quiz_id: Uuid,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> AppResult<Question> {
        let mut backend = self.backend.write().await;
        backend.calls.push(format!("PATCH question/{}", question_id));
        let question = backend.question_mut(question_id)?;
        if let Some(content) = &patch.content {
            question.content = content.clone();
        }
        if let Some(choice_id) = patch.correct_choice {
            if !question.choices.iter().any(|c| c.id == choice_id) {
                return Err(AppError::Api {
                    status: 400,
                    message: "Correct choice must belong to the question".to_string(),
                });
            }
            question.correct_choice = Some(choice_id);
        }
        Ok(question.clone())
    }

    async fn delete_question(&self, quiz_id: Uuid, question_id: i64) -> AppResult<()> {
        let mut backend = self.backend.write().await;
        backend.calls.push(format!("DELETE question/{}", question_id));
        let quiz = backend.quiz_mut(quiz_id)?;
        let before = quiz.questions.len();
        quiz.questions.retain(|q| q.id != question_id);
        if quiz.questions.len() == before {
            return Err(AppError::NotFound("No Question matches the given query.".to_string()));
        }
        Ok(())
    }

    async fn create_choice(&self, question_id: i64, choice: &ChoicePayload) -> AppResult<Choice> {
        let mut backend = self.backend.write().await;
        backend.calls.push(format!("POST choice on {}", question_id));
        backend.choice_creates += 1;
        if backend.fail_choice_create == Some(backend.choice_creates) {
            return Err(AppError::Transport("connection reset by peer".to_string()));
        }
        let id = backend.allocate_id();
        let created = Choice {
            id,
            content: choice.content.clone(),
        };
        backend.question_mut(question_id)?.choices.push(created.clone());
        Ok(created)
    }

    async fn update_choice(
        &self,
        question_id: i64,
        choice_id: i64,
        choice: &ChoicePayload,
    ) -> AppResult<Choice> {
        let mut backend = self.backend.write().await;
        backend.calls.push(format!("PUT choice/{}", choice_id));
        let question = backend.question_mut(question_id)?;
        let existing = question
            .choices
            .iter_mut()
            .find(|c| c.id == choice_id)
            .ok_or_else(|| AppError::NotFound("No Choice matches the given query.".to_string()))?;
        existing.content = choice.content.clone();
        Ok(existing.clone())
    }

    async fn delete_choice(&self, question_id: i64, choice_id: i64) -> AppResult<()> {
        let mut backend = self.backend.write().await;
        backend.calls.push(format!("DELETE choice/{}", choice_id));
        let question = backend.question_mut(question_id)?;
        question.choices.retain(|c| c.id != choice_id);
        if question.correct_choice == Some(choice_id) {
            question.correct_choice = None;
        }
        Ok(())
    }

    async fn join_info(&self, quiz_id: Uuid) -> AppResult<JoinInfo> {
        let quiz = self.get_quiz(quiz_id).await?;
        Ok(JoinInfo {
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            has_password: quiz.has_password(),
            start_time: quiz.start_time,
            duration: quiz.duration.clone(),
        })
    }

    async fn join_quiz(&self, _quiz_id: Uuid, _request: &JoinRequest) -> AppResult<MessageResponse> {
        Ok(MessageResponse {
            message: "Joined quiz successfully".to_string(),
        })
    }

    async fn start_submission(
        &self,
        _quiz_id: Uuid,
        _submission_id: Uuid,
    ) -> AppResult<SessionStarted> {
        Ok(SessionStarted {
            message: "Quiz started".to_string(),
            end_at: None,
        })
    }

    async fn submission_questions(
        &self,
        quiz_id: Uuid,
        _submission_id: Uuid,
    ) -> AppResult<SubmissionQuestions> {
        let mut questions = self.get_quiz(quiz_id).await?.questions;
        for question in &mut questions {
            question.correct_choice = None;
        }
        Ok(SubmissionQuestions { questions })
    }

    async fn submit_answer(
        &self,
        _quiz_id: Uuid,
        _submission_id: Uuid,
        _answer: &AnswerRequest,
    ) -> AppResult<MessageResponse> {
        Ok(MessageResponse {
            message: "Answer submitted".to_string(),
        })
    }
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_correct_choice_follows_server_ids() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Ownership").await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts
        .add_filled_question("Which moves?", &texts(&["A", "B", "C"]), Some(1))
        .unwrap();

    let report = drafts.save(&api, SavePolicy::Abort).await.unwrap();

    let quiz = api.quiz(quiz_id).await;
    let question = &quiz.questions[0];
    let b = question.choices.iter().find(|c| c.content == "B").unwrap();
    assert_eq!(question.correct_choice, Some(b.id));
    assert_eq!(report.saved[0].correct_choice_id, Some(b.id));
}

#[tokio::test]
async fn test_choice_failure_leaves_partial_question_on_server() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Ownership").await;
    api.fail_choice_create(2).await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts
        .add_filled_question("Which moves?", &texts(&["A", "B", "C"]), Some(2))
        .unwrap();

    let err = drafts.save(&api, SavePolicy::Abort).await.unwrap_err();

    let SaveError::Aborted(failure) = err else {
        panic!("expected an aborted save");
    };
    assert_eq!(failure.orphaned.len(), 2);
    let quiz = api.quiz(quiz_id).await;
    assert_eq!(quiz.questions.len(), 1);
    assert_eq!(quiz.questions[0].choices.len(), 1);
    assert_eq!(quiz.questions[0].correct_choice, None);

    let calls = api.calls().await;
    assert!(!calls.iter().any(|c| c.starts_with("PATCH")), "{:?}", calls);
    assert!(!calls.iter().any(|c| c.starts_with("DELETE")), "{:?}", calls);
}

#[tokio::test]
async fn test_compensation_removes_partial_question() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Ownership").await;
    api.fail_choice_create(2).await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts
        .add_filled_question("Which moves?", &texts(&["A", "B", "C"]), None)
        .unwrap();

    let Err(SaveError::Aborted(failure)) = drafts.save(&api, SavePolicy::Compensate).await else {
        panic!("expected an aborted save");
    };

    assert!(failure.orphaned.is_empty());
    assert!(api.quiz(quiz_id).await.questions.is_empty());
}

#[tokio::test]
async fn test_retry_only_sends_remaining_questions() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Ownership").await;
    api.fail_choice_create(3).await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts
        .add_filled_question("First", &texts(&["A", "B"]), None)
        .unwrap();
    drafts
        .add_filled_question("Second", &texts(&["C", "D"]), Some(1))
        .unwrap();

    assert!(drafts.save(&api, SavePolicy::Compensate).await.is_err());
    assert_eq!(drafts.len(), 1);

    api.clear_failures().await;
    let report = drafts.save(&api, SavePolicy::Compensate).await.unwrap();

    assert_eq!(report.saved.len(), 1);
    let quiz = api.quiz(quiz_id).await;
    let titles: Vec<&str> = quiz.questions.iter().map(|q| q.content.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    let d = quiz.questions[1].choices.iter().find(|c| c.content == "D").unwrap();
    assert_eq!(quiz.questions[1].correct_choice, Some(d.id));
}

#[tokio::test]
async fn test_editor_round_trip() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Traits").await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts
        .add_filled_question("Pick one", &texts(&["x", "y", "z"]), Some(2))
        .unwrap();
    let report = drafts.save(&api, SavePolicy::Abort).await.unwrap();
    let question_id = report.saved[0].question_id;

    let mut editor = QuestionEditor::load(&api, quiz_id, question_id).await.unwrap();
    assert_eq!(editor.correct_choice_index(), Some(2));

    let unsaved = editor.add_choice("w");
    let calls_before = api.calls().await.len();
    editor.delete_choice(&api, unsaved).await.unwrap();
    assert_eq!(api.calls().await.len(), calls_before);

    editor.delete_choice(&api, 0).await.unwrap();
    let deletes = api
        .calls()
        .await
        .iter()
        .filter(|c| c.starts_with("DELETE choice"))
        .count();
    assert_eq!(deletes, 1);
    assert_eq!(editor.correct_choice_index(), Some(1));

    editor.set_content("Pick the last one");
    let new_index = editor.add_choice("v");
    editor.select_correct(new_index).unwrap();
    editor.save(&api).await.unwrap();

    let saved = api.quiz(quiz_id).await.questions[0].clone();
    assert_eq!(saved.content, "Pick the last one");
    assert_eq!(saved.choices.len(), 3);
    let v = saved.choices.iter().find(|c| c.content == "v").unwrap();
    assert_eq!(saved.correct_choice, Some(v.id));
}

#[tokio::test]
async fn test_detail_delete_question_refetches() {
    let api = InMemoryQuizApi::default();
    let quiz_id = api.seed_quiz("Generics").await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts.add_filled_question("One", &texts(&["a"]), None).unwrap();
    drafts.add_filled_question("Two", &texts(&["b"]), None).unwrap();
    let report = drafts.save(&api, SavePolicy::Abort).await.unwrap();

    let mut detail = QuizDetail::load(&api, quiz_id).await.unwrap();
    assert_eq!(detail.quiz().question_count(), 2);
    detail
        .delete_question(&api, report.saved[0].question_id)
        .await
        .unwrap();

    assert_eq!(detail.quiz().question_count(), 1);
    let fetches = api
        .calls()
        .await
        .iter()
        .filter(|c| c.starts_with("GET quiz/"))
        .count();
    assert_eq!(fetches, 2);
}

#[tokio::test]
async fn test_quiz_create_and_edit_keep_duration_in_minutes() {
    let api = Arc::new(InMemoryQuizApi::default());
    let service = QuizService::new(api.clone());
    let form = QuizForm {
        title: "Lifetimes".to_string(),
        duration_minutes: Some(95.0),
        ..QuizForm::default()
    };

    let quiz = service.create_quiz(&form).await.unwrap();
    assert_eq!(quiz.duration.as_deref(), Some("01:35:00"));

    let edit = service.edit_form(quiz.id).await.unwrap();
    assert_eq!(edit.duration_minutes, Some(95.0));
    assert_eq!(edit.title, "Lifetimes");
}

#[tokio::test]
async fn test_dashboard_reflects_backend_state() {
    let api = Arc::new(InMemoryQuizApi::default());
    let service = DashboardService::new(api.clone());

    let empty = service.load().await.unwrap();
    assert_eq!(empty.created.len(), 1);
    assert!(matches!(empty.created[0], TableRow::Empty(_)));

    let quiz_id = api.seed_quiz("Async").await;
    let mut drafts = QuestionDrafts::new(quiz_id);
    drafts.add_filled_question("Q1", &texts(&["a"]), None).unwrap();
    drafts.add_filled_question("Q2", &texts(&["b"]), None).unwrap();
    drafts.save(api.as_ref(), SavePolicy::Abort).await.unwrap();
    api.seed_quiz("Borrowing").await;

    let view: DashboardView = service.load().await.unwrap();
    let counts: Vec<(String, usize)> = view
        .created
        .iter()
        .filter_map(|row| match row {
            TableRow::Entry(row) => Some((row.title.clone(), row.question_count)),
            TableRow::Empty(_) => None,
        })
        .collect();
    assert_eq!(
        counts,
        vec![("Async".to_string(), 2), ("Borrowing".to_string(), 0)]
    );
}
