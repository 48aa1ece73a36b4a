use uuid::Uuid;

use crate::{
    api::QuizApi,
    errors::{AppError, AppResult},
    models::{
        domain::Question,
        dto::request::{ChoicePayload, QuestionPatch},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableChoice {
    pub local_id: Uuid,
    /// `None` until the choice has been created on the backend.
    pub server_id: Option<i64>,
    pub content: String,
}

/// Edit session for one persisted question.
#[derive(Debug, Clone)]
pub struct QuestionEditor {
    quiz_id: Uuid,
    question_id: i64,
    content: String,
    choices: Vec<EditableChoice>,
    correct: Option<Uuid>,
}

impl QuestionEditor {
    pub async fn load(api: &dyn QuizApi, quiz_id: Uuid, question_id: i64) -> AppResult<Self> {
        log::info!("Loading question {} of quiz {}", question_id, quiz_id);
        let question = api.get_question(quiz_id, question_id).await?;
        Ok(Self::from_question(quiz_id, &question))
    }

    pub fn from_question(quiz_id: Uuid, question: &Question) -> Self {
        let choices: Vec<EditableChoice> = question
            .choices
            .iter()
            .map(|c| EditableChoice {
                local_id: Uuid::new_v4(),
                server_id: Some(c.id),
                content: c.content.clone(),
            })
            .collect();
        let correct = question
            .correct_choice_index()
            .map(|index| choices[index].local_id);

        Self {
            quiz_id,
            question_id: question.id,
            content: question.content.clone(),
            choices,
            correct,
        }
    }

    pub fn question_id(&self) -> i64 {
        self.question_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }

    pub fn choices(&self) -> &[EditableChoice] {
        &self.choices
    }

    /// Appends an unsaved choice and returns its index.
    pub fn add_choice(&mut self, content: &str) -> usize {
        self.choices.push(EditableChoice {
            local_id: Uuid::new_v4(),
            server_id: None,
            content: content.to_string(),
        });
        self.choices.len() - 1
    }

    pub fn set_choice_content(&mut self, index: usize, content: &str) -> AppResult<()> {
        self.choice_mut(index)?.content = content.to_string();
        Ok(())
    }

    pub fn select_correct(&mut self, index: usize) -> AppResult<()> {
        let local_id = self.choice_mut(index)?.local_id;
        self.correct = Some(local_id);
        Ok(())
    }

    pub fn correct_choice_index(&self) -> Option<usize> {
        let selected = self.correct?;
        self.choices.iter().position(|c| c.local_id == selected)
    }

    /// Removes a choice, deleting it on the backend first if it was saved.
    pub async fn delete_choice(
        &mut self,
        api: &dyn QuizApi,
        index: usize,
    ) -> AppResult<EditableChoice> {
        let choice = self.choice_mut(index)?;
        if let Some(choice_id) = choice.server_id {
            log::info!("Deleting choice {} of question {}", choice_id, self.question_id);
            api.delete_choice(self.question_id, choice_id).await?;
        }

        let removed = self.choices.remove(index);
        if self.correct == Some(removed.local_id) {
            self.correct = None;
        }
        Ok(removed)
    }

    /// PATCHes the content, writes every choice, then PATCHes the correct
    /// choice if one is selected. Ids of newly created choices are stored as
    /// soon as they arrive, so a retry after a failure does not duplicate them.
    pub async fn save(&mut self, api: &dyn QuizApi) -> AppResult<()> {
        self.validate()?;

        log::info!("Updating question {}", self.question_id);
        api.update_question(
            self.quiz_id,
            self.question_id,
            &QuestionPatch::content(&self.content),
        )
        .await?;

        for choice in self.choices.iter_mut() {
            let body = ChoicePayload {
                content: choice.content.clone(),
            };
            match choice.server_id {
                Some(choice_id) => {
                    log::debug!("Updating choice {}", choice_id);
                    api.update_choice(self.question_id, choice_id, &body).await?;
                }
                None => {
                    let created = api.create_choice(self.question_id, &body).await?;
                    log::debug!("Created choice {}", created.id);
                    choice.server_id = Some(created.id);
                }
            }
        }

        let correct_id = self
            .correct_choice_index()
            .and_then(|index| self.choices[index].server_id);
        if let Some(choice_id) = correct_id {
            api.update_question(
                self.quiz_id,
                self.question_id,
                &QuestionPatch::correct_choice(choice_id),
            )
            .await?;
        }
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("Question content is required".to_string()));
        }
        if let Some(index) = self.choices.iter().position(|c| c.content.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "Choice {} content is required",
                index + 1
            )));
        }
        Ok(())
    }

    fn choice_mut(&mut self, index: usize) -> AppResult<&mut EditableChoice> {
        let count = self.choices.len();
        self.choices.get_mut(index).ok_or_else(|| {
            AppError::Validation(format!(
                "Choice {} does not exist, the question has {} choice(s)",
                index + 1,
                count
            ))
        })
    }
}
