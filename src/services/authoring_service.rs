use std::fmt;

use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    api::QuizApi,
    errors::{AppError, AppResult},
    models::{
        domain::QuestionType,
        dto::request::{ChoicePayload, NewQuestion, QuestionPatch},
    },
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct DraftChoice {
    pub local_id: Uuid,
    #[validate(custom(function = "not_blank", message = "Choice content is required"))]
    pub content: String,
}

impl DraftChoice {
    fn empty() -> Self {
        DraftChoice {
            local_id: Uuid::new_v4(),
            content: String::new(),
        }
    }
}

/// A question staged locally. The correct choice is tracked by the choice's
/// local id, and its index is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct DraftQuestion {
    pub local_id: Uuid,
    #[validate(custom(function = "not_blank", message = "Question content is required"))]
    pub content: String,
    pub question_type: QuestionType,
    #[validate(nested)]
    pub choices: Vec<DraftChoice>,
    pub correct_choice: Option<Uuid>,
}

impl DraftQuestion {
    fn new() -> Self {
        DraftQuestion {
            local_id: Uuid::new_v4(),
            content: String::new(),
            question_type: QuestionType::MultipleChoice,
            choices: vec![DraftChoice::empty()],
            correct_choice: None,
        }
    }

    pub fn correct_choice_index(&self) -> Option<usize> {
        let selected = self.correct_choice?;
        self.choices.iter().position(|c| c.local_id == selected)
    }

    /// The selected choice, or the first one when nothing is selected.
    pub fn effective_correct_index(&self) -> Option<usize> {
        if self.choices.is_empty() {
            return None;
        }
        Some(self.correct_choice_index().unwrap_or(0))
    }

    fn choice_mut(&mut self, choice_id: Uuid) -> AppResult<&mut DraftChoice> {
        self.choices
            .iter_mut()
            .find(|c| c.local_id == choice_id)
            .ok_or_else(|| AppError::NotFound(format!("Draft choice {} not found", choice_id)))
    }
}

/// What to do with records created for a question whose save failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SavePolicy {
    /// Leave them on the server and report them.
    #[default]
    Abort,
    /// Delete them again, newest first.
    Compensate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    CreateQuestion,
    CreateChoice { index: usize },
    SetCorrectChoice,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStep::CreateQuestion => write!(f, "creating the question"),
            SaveStep::CreateChoice { index } => write!(f, "creating choice {}", index + 1),
            SaveStep::SetCorrectChoice => write!(f, "setting the correct choice"),
        }
    }
}

/// The delete that undoes one completed create step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    DeleteQuestion { quiz_id: Uuid, question_id: i64 },
    DeleteChoice { question_id: i64, choice_id: i64 },
}

impl Compensation {
    async fn run(&self, api: &dyn QuizApi) -> AppResult<()> {
        match self {
            Compensation::DeleteQuestion {
                quiz_id,
                question_id,
            } => api.delete_question(*quiz_id, *question_id).await,
            Compensation::DeleteChoice {
                question_id,
                choice_id,
            } => api.delete_choice(*question_id, *choice_id).await,
        }
    }
}

impl fmt::Display for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compensation::DeleteQuestion { question_id, .. } => {
                write!(f, "question {}", question_id)
            }
            Compensation::DeleteChoice {
                question_id,
                choice_id,
            } => write!(f, "choice {} of question {}", choice_id, question_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuestion {
    pub local_id: Uuid,
    pub question_id: i64,
    /// Server ids in local choice order.
    pub choice_ids: Vec<i64>,
    pub correct_choice_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: Vec<SavedQuestion>,
}

#[derive(Debug, Clone, Error)]
#[error("Saving question {position} failed while {step}: {cause}")]
pub struct SaveFailure {
    /// 1-based position of the failed question in the submitted drafts.
    pub position: usize,
    pub local_id: Uuid,
    pub step: SaveStep,
    #[source]
    pub cause: AppError,
    /// Questions fully saved before the failure.
    pub saved: Vec<SavedQuestion>,
    /// Records deleted again under [`SavePolicy::Compensate`].
    pub compensated: Vec<Compensation>,
    /// Records left on the server.
    pub orphaned: Vec<Compensation>,
}

#[derive(Debug, Clone, Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(AppError),
    #[error(transparent)]
    Aborted(SaveFailure),
}

impl From<SaveFailure> for AppError {
    fn from(failure: SaveFailure) -> Self {
        let mut message = format!("{} ({} question(s) saved", failure, failure.saved.len());
        if failure.orphaned.is_empty() {
            message.push(')');
        } else {
            let orphans: Vec<String> = failure.orphaned.iter().map(|c| c.to_string()).collect();
            message.push_str(&format!("; left on the server: {})", orphans.join(", ")));
        }
        AppError::PartialSave(message)
    }
}

impl From<SaveError> for AppError {
    fn from(error: SaveError) -> Self {
        match error {
            SaveError::Invalid(e) => e,
            SaveError::Aborted(failure) => failure.into(),
        }
    }
}

struct StepFailure {
    step: SaveStep,
    cause: AppError,
    pending: Vec<Compensation>,
}

/// Questions staged for one quiz before they are written to the backend.
#[derive(Debug, Clone)]
pub struct QuestionDrafts {
    quiz_id: Uuid,
    questions: Vec<DraftQuestion>,
}

impl QuestionDrafts {
    pub fn new(quiz_id: Uuid) -> Self {
        Self {
            quiz_id,
            questions: Vec::new(),
        }
    }

    pub fn quiz_id(&self) -> Uuid {
        self.quiz_id
    }

    pub fn questions(&self) -> &[DraftQuestion] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, question_id: Uuid) -> AppResult<&DraftQuestion> {
        self.questions
            .iter()
            .find(|q| q.local_id == question_id)
            .ok_or_else(|| not_found(question_id))
    }

    fn question_mut(&mut self, question_id: Uuid) -> AppResult<&mut DraftQuestion> {
        self.questions
            .iter_mut()
            .find(|q| q.local_id == question_id)
            .ok_or_else(|| not_found(question_id))
    }

    /// Stages a blank question with one blank choice.
    pub fn add_question(&mut self) -> Uuid {
        let question = DraftQuestion::new();
        let id = question.local_id;
        self.questions.push(question);
        id
    }

    /// Stages a filled-in question in one go.
    pub fn add_filled_question(
        &mut self,
        content: &str,
        choices: &[String],
        correct_index: Option<usize>,
    ) -> AppResult<Uuid> {
        let id = self.add_question();
        let question = self.question_mut(id)?;
        question.content = content.to_string();
        question.choices = choices
            .iter()
            .map(|content| DraftChoice {
                local_id: Uuid::new_v4(),
                content: content.clone(),
            })
            .collect();
        if let Some(index) = correct_index {
            self.select_correct_index(id, index)?;
        }
        Ok(id)
    }

    pub fn set_question_content(&mut self, question_id: Uuid, content: &str) -> AppResult<()> {
        self.question_mut(question_id)?.content = content.to_string();
        Ok(())
    }

    pub fn add_choice(&mut self, question_id: Uuid) -> AppResult<Uuid> {
        let choice = DraftChoice::empty();
        let id = choice.local_id;
        self.question_mut(question_id)?.choices.push(choice);
        Ok(id)
    }

    pub fn set_choice_content(
        &mut self,
        question_id: Uuid,
        choice_id: Uuid,
        content: &str,
    ) -> AppResult<()> {
        self.question_mut(question_id)?.choice_mut(choice_id)?.content = content.to_string();
        Ok(())
    }

    pub fn select_correct(&mut self, question_id: Uuid, choice_id: Uuid) -> AppResult<()> {
        let question = self.question_mut(question_id)?;
        question.choice_mut(choice_id)?;
        question.correct_choice = Some(choice_id);
        Ok(())
    }

    pub fn select_correct_index(&mut self, question_id: Uuid, index: usize) -> AppResult<()> {
        let question = self.question_mut(question_id)?;
        let choice = question.choices.get(index).ok_or_else(|| {
            AppError::Validation(format!(
                "Choice {} does not exist, the question has {} choice(s)",
                index + 1,
                question.choices.len()
            ))
        })?;
        question.correct_choice = Some(choice.local_id);
        Ok(())
    }

    pub fn delete_question(&mut self, question_id: Uuid) -> AppResult<DraftQuestion> {
        let position = self
            .questions
            .iter()
            .position(|q| q.local_id == question_id)
            .ok_or_else(|| not_found(question_id))?;
        Ok(self.questions.remove(position))
    }

    /// Removes a choice. Removing the selected choice clears the selection.
    pub fn delete_choice(&mut self, question_id: Uuid, choice_id: Uuid) -> AppResult<DraftChoice> {
        let question = self.question_mut(question_id)?;
        let position = question
            .choices
            .iter()
            .position(|c| c.local_id == choice_id)
            .ok_or_else(|| AppError::NotFound(format!("Draft choice {} not found", choice_id)))?;
        if question.correct_choice == Some(choice_id) {
            question.correct_choice = None;
        }
        Ok(question.choices.remove(position))
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.questions.is_empty() {
            return Err(AppError::Validation("There are no questions to save".to_string()));
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate().map_err(|e| {
                AppError::Validation(format!("Question {}: {}", index + 1, e))
            })?;
        }
        Ok(())
    }

    /// Writes every staged question to the backend, one after the other.
    ///
    /// The first failing request stops the save. Questions saved up to that
    /// point are dropped from the drafts, the failed one and everything after
    /// it stay staged.
    pub async fn save(
        &mut self,
        api: &dyn QuizApi,
        policy: SavePolicy,
    ) -> Result<SaveReport, SaveError> {
        self.validate().map_err(SaveError::Invalid)?;

        let quiz_id = self.quiz_id;
        let mut remaining = std::mem::take(&mut self.questions).into_iter().enumerate();
        let mut saved = Vec::new();

        while let Some((index, draft)) = remaining.next() {
            match save_question(api, quiz_id, &draft).await {
                Ok(record) => {
                    log::info!("Saved question {} as id {}", index + 1, record.question_id);
                    saved.push(record);
                }
                Err(failure) => {
                    log::error!(
                        "Saving question {} failed while {}: {}",
                        index + 1,
                        failure.step,
                        failure.cause
                    );
                    let local_id = draft.local_id;
                    self.questions = std::iter::once(draft)
                        .chain(remaining.map(|(_, d)| d))
                        .collect();

                    let (compensated, orphaned) = match policy {
                        SavePolicy::Abort => (Vec::new(), failure.pending),
                        SavePolicy::Compensate => compensate(api, failure.pending).await,
                    };
                    for orphan in &orphaned {
                        log::warn!("Left on the server: {}", orphan);
                    }

                    return Err(SaveError::Aborted(SaveFailure {
                        position: index + 1,
                        local_id,
                        step: failure.step,
                        cause: failure.cause,
                        saved,
                        compensated,
                        orphaned,
                    }));
                }
            }
        }

        Ok(SaveReport { saved })
    }
}

fn not_found(question_id: Uuid) -> AppError {
    AppError::NotFound(format!("Draft question {} not found", question_id))
}

async fn save_question(
    api: &dyn QuizApi,
    quiz_id: Uuid,
    draft: &DraftQuestion,
) -> Result<SavedQuestion, StepFailure> {
    let mut pending = Vec::new();

    let body = NewQuestion {
        content: draft.content.clone(),
        question_type: draft.question_type,
        correct_choice: None,
    };
    let question = match api.create_question(quiz_id, &body).await {
        Ok(question) => question,
        Err(cause) => {
            return Err(StepFailure {
                step: SaveStep::CreateQuestion,
                cause,
                pending,
            })
        }
    };
    log::debug!("Created question {}", question.id);
    pending.push(Compensation::DeleteQuestion {
        quiz_id,
        question_id: question.id,
    });

    let mut choice_ids = Vec::with_capacity(draft.choices.len());
    for (index, choice) in draft.choices.iter().enumerate() {
        let body = ChoicePayload {
            content: choice.content.clone(),
        };
        match api.create_choice(question.id, &body).await {
            Ok(created) => {
                log::debug!("Created choice {} on question {}", created.id, question.id);
                choice_ids.push(created.id);
                pending.push(Compensation::DeleteChoice {
                    question_id: question.id,
                    choice_id: created.id,
                });
            }
            Err(cause) => {
                return Err(StepFailure {
                    step: SaveStep::CreateChoice { index },
                    cause,
                    pending,
                })
            }
        }
    }

    let correct_choice_id = draft
        .effective_correct_index()
        .and_then(|index| choice_ids.get(index).copied());
    if let Some(choice_id) = correct_choice_id {
        let patch = QuestionPatch::correct_choice(choice_id);
        if let Err(cause) = api.update_question(quiz_id, question.id, &patch).await {
            return Err(StepFailure {
                step: SaveStep::SetCorrectChoice,
                cause,
                pending,
            });
        }
    }

    Ok(SavedQuestion {
        local_id: draft.local_id,
        question_id: question.id,
        choice_ids,
        correct_choice_id,
    })
}

async fn compensate(
    api: &dyn QuizApi,
    pending: Vec<Compensation>,
) -> (Vec<Compensation>, Vec<Compensation>) {
    let mut done = Vec::new();
    let mut left = Vec::new();
    for action in pending.into_iter().rev() {
        match action.run(api).await {
            Ok(()) => {
                log::info!("Deleted {}", action);
                done.push(action);
            }
            Err(e) => {
                log::error!("Failed to delete {}: {}", action, e);
                left.push(action);
            }
        }
    }
    (done, left)
}
