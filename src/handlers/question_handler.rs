use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    errors::{AppError, AppResult},
    services::{QuestionDrafts, QuestionEditor, QuizDetail, SaveError, SavePolicy},
};

/// One entry of a question file. `correct` is a 1-based choice number.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFileEntry {
    pub content: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub correct: Option<usize>,
}

pub fn read_question_file(path: &Path) -> AppResult<Vec<QuestionFileEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Validation(format!("Cannot read {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn drafts_from_entries(quiz_id: Uuid, entries: &[QuestionFileEntry]) -> AppResult<QuestionDrafts> {
    let mut drafts = QuestionDrafts::new(quiz_id);
    for entry in entries {
        let correct = match entry.correct {
            Some(0) => {
                return Err(AppError::Validation(
                    "Choices are numbered from 1".to_string(),
                ))
            }
            Some(number) => Some(number - 1),
            None => None,
        };
        drafts.add_filled_question(&entry.content, &entry.choices, correct)?;
    }
    Ok(drafts)
}

pub async fn add_questions(
    state: &AppState,
    quiz_id: Uuid,
    file: &Path,
    rollback_on_failure: bool,
) -> AppResult<()> {
    state.require_user().await?;
    let entries = read_question_file(file)?;
    let mut drafts = drafts_from_entries(quiz_id, &entries)?;
    let policy = if rollback_on_failure {
        SavePolicy::Compensate
    } else {
        SavePolicy::Abort
    };

    match drafts.save(state.api.as_ref(), policy).await {
        Ok(report) => {
            for saved in &report.saved {
                println!(
                    "Saved question {} with {} choice(s)",
                    saved.question_id,
                    saved.choice_ids.len()
                );
            }
            Ok(())
        }
        Err(SaveError::Aborted(failure)) => {
            if !failure.saved.is_empty() {
                eprintln!(
                    "{} question(s) were saved; remove them from the file before retrying",
                    failure.saved.len()
                );
            }
            Err(failure.into())
        }
        Err(SaveError::Invalid(err)) => Err(err),
    }
}

/// Changes requested for one saved question. Choice numbers are 1-based.
/// Edits and deletions count the loaded choices, `correct` counts the choices
/// left after deletions and additions.
#[derive(Debug, Default)]
pub struct QuestionChanges {
    pub content: Option<String>,
    pub choices: Vec<(usize, String)>,
    pub add_choices: Vec<String>,
    pub delete_choices: Vec<usize>,
    pub correct: Option<usize>,
}

impl QuestionChanges {
    /// Rejects any choice number that does not exist, before a request is made.
    pub fn check(&self, choice_count: usize) -> AppResult<()> {
        let mut deletions = self.delete_choices.clone();
        deletions.sort_unstable();
        deletions.dedup();

        let loaded = self.choices.iter().map(|(number, _)| *number).chain(deletions.iter().copied());
        for number in loaded {
            check_choice_number(number, choice_count)?;
        }

        if let Some(number) = self.correct {
            let remaining = choice_count - deletions.len() + self.add_choices.len();
            check_choice_number(number, remaining)?;
        }
        Ok(())
    }
}

fn check_choice_number(number: usize, count: usize) -> AppResult<()> {
    if number == 0 {
        return Err(AppError::Validation("Choices are numbered from 1".to_string()));
    }
    if number > count {
        return Err(AppError::Validation(format!(
            "Choice {} does not exist, the question has {} choice(s)",
            number, count
        )));
    }
    Ok(())
}

pub async fn edit_question(
    state: &AppState,
    quiz_id: Uuid,
    question_id: i64,
    changes: QuestionChanges,
) -> AppResult<()> {
    state.require_user().await?;
    let api = state.api.as_ref();
    let mut editor = QuestionEditor::load(api, quiz_id, question_id).await?;
    changes.check(editor.choices().len())?;

    if let Some(content) = &changes.content {
        editor.set_content(content);
    }
    for (number, text) in &changes.choices {
        editor.set_choice_content(number - 1, text)?;
    }

    let mut deletions = changes.delete_choices.clone();
    deletions.sort_unstable();
    deletions.dedup();
    for number in deletions.into_iter().rev() {
        let removed = editor.delete_choice(api, number - 1).await?;
        println!("Deleted choice '{}'", removed.content);
    }

    for text in &changes.add_choices {
        editor.add_choice(text);
    }
    if let Some(number) = changes.correct {
        editor.select_correct(number - 1)?;
    }

    editor.save(api).await?;
    println!("Updated question {}", editor.question_id());
    Ok(())
}

/// Deletes the question, then prints the quiz as refetched from the server.
pub async fn delete_question(state: &AppState, quiz_id: Uuid, question_id: i64) -> AppResult<()> {
    state.require_user().await?;
    let mut detail = QuizDetail::load(state.api.as_ref(), quiz_id).await?;
    detail.delete_question(state.api.as_ref(), question_id).await?;
    println!("Deleted question {}", question_id);
    println!("{}", detail);
    Ok(())
}
