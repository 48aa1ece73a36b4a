use uuid::Uuid;

use crate::{
    app_state::AppState,
    cli::{QuizArgs, QuizEditArgs},
    errors::AppResult,
    models::dto::request::QuizForm,
    services::QuizDetail,
};

impl From<QuizArgs> for QuizForm {
    fn from(args: QuizArgs) -> Self {
        QuizForm {
            title: args.title,
            description: args.description,
            password: args.password,
            start_time: args.start_time,
            duration_minutes: args.duration,
        }
    }
}

impl QuizEditArgs {
    /// Overlays the given flags on the form loaded from the server.
    pub fn apply(self, form: &mut QuizForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = Some(description);
        }
        if let Some(password) = self.password {
            form.password = Some(password);
        }
        if self.clear_start_time {
            form.start_time = None;
        } else if let Some(start) = self.start_time {
            form.start_time = Some(start);
        }
        if self.clear_duration {
            form.duration_minutes = None;
        } else if let Some(minutes) = self.duration {
            form.duration_minutes = Some(minutes);
        }
    }
}

pub async fn create_quiz(state: &AppState, args: QuizArgs) -> AppResult<()> {
    state.require_user().await?;
    let quiz = state.quiz_service.create_quiz(&QuizForm::from(args)).await?;
    println!("Created quiz '{}' ({})", quiz.title, quiz.id);
    println!("Add questions with: quizwhiz question add {} --file <questions.json>", quiz.id);
    Ok(())
}

pub async fn show_quiz(state: &AppState, quiz_id: Uuid, show_password: bool) -> AppResult<()> {
    state.require_user().await?;
    let mut detail = QuizDetail::load(state.api.as_ref(), quiz_id).await?;
    if show_password {
        detail.toggle_password();
    }
    println!("{}", detail);
    Ok(())
}

pub async fn edit_quiz(state: &AppState, quiz_id: Uuid, changes: QuizEditArgs) -> AppResult<()> {
    state.require_user().await?;
    let mut form = state.quiz_service.edit_form(quiz_id).await?;
    changes.apply(&mut form);
    let quiz = state.quiz_service.update_quiz(quiz_id, &form).await?;
    println!("Updated quiz '{}'", quiz.title);
    Ok(())
}

pub async fn delete_quiz(state: &AppState, quiz_id: Uuid) -> AppResult<()> {
    state.require_user().await?;
    state.quiz_service.delete_quiz(quiz_id).await?;
    println!("Deleted quiz {}", quiz_id);
    Ok(())
}
