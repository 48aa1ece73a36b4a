use uuid::Uuid;

use crate::{app_state::AppState, errors::AppResult, models::duration};

pub async fn join(
    state: &AppState,
    quiz_id: Uuid,
    password: Option<String>,
    info_only: bool,
) -> AppResult<()> {
    state.require_user().await?;
    let info = state.participation_service.join_info(quiz_id).await?;
    println!("{}", info.title);
    if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{}", description);
    }
    if let Some(limit) = info.duration.as_deref() {
        match duration::format_label(limit) {
            Ok(label) => println!("Time limit: {}", label),
            Err(e) => log::warn!("Unreadable duration '{}': {}", limit, e),
        }
    }
    if info.has_password {
        println!("This quiz requires a password");
    }
    if info_only {
        return Ok(());
    }

    let message = state.participation_service.join(quiz_id, password).await?;
    println!("{}", message);
    Ok(())
}

pub async fn start(state: &AppState, quiz_id: Uuid) -> AppResult<()> {
    state.require_user().await?;
    let submission = state.dashboard_service.find_submission(quiz_id).await?;
    let started = state.participation_service.start(quiz_id, submission.id).await?;
    println!("{}", started.message);
    if let Some(end_at) = started.end_at {
        println!("Ends at {}", end_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

pub async fn questions(state: &AppState, quiz_id: Uuid) -> AppResult<()> {
    state.require_user().await?;
    let submission = state.dashboard_service.find_submission(quiz_id).await?;
    let questions = state
        .participation_service
        .questions(quiz_id, submission.id)
        .await?;
    if questions.is_empty() {
        println!("No questions");
    }
    for (index, question) in questions.iter().enumerate() {
        println!("{}. {} [id {}]", index + 1, question.content, question.id);
        for choice in &question.choices {
            println!("   - {} [id {}]", choice.content, choice.id);
        }
    }
    Ok(())
}

pub async fn answer(state: &AppState, quiz_id: Uuid, question_id: i64, choice_id: i64) -> AppResult<()> {
    state.require_user().await?;
    let submission = state.dashboard_service.find_submission(quiz_id).await?;
    let message = state
        .participation_service
        .answer(quiz_id, submission.id, question_id, choice_id)
        .await?;
    println!("{}", message);
    Ok(())
}
