pub mod auth_handler;
pub mod dashboard_handler;
pub mod participation_handler;
pub mod question_handler;
pub mod quiz_handler;

use crate::{
    app_state::AppState,
    cli::{Command, QuestionCommand, QuizCommand},
    errors::AppResult,
    models::dto::request::{ProfileUpdate, RegisterForm},
};

/// Runs one parsed command against the backend.
pub async fn dispatch(state: &AppState, command: Command) -> AppResult<()> {
    match command {
        Command::Login { email, password } => auth_handler::login(state, email, password).await,
        Command::Register {
            name,
            email,
            username,
            password,
            password_confirmation,
        } => {
            let form = RegisterForm {
                name,
                email,
                username,
                password_confirmation: password_confirmation.unwrap_or_else(|| password.clone()),
                password,
            };
            auth_handler::register(state, form).await
        }
        Command::Logout => auth_handler::logout(state),
        Command::Profile {
            name,
            email,
            username,
        } => {
            let update = ProfileUpdate {
                name,
                email,
                username,
            };
            auth_handler::profile(state, update).await
        }
        Command::Dashboard => dashboard_handler::dashboard(state).await,
        Command::Quiz(QuizCommand::Create(args)) => quiz_handler::create_quiz(state, args).await,
        Command::Quiz(QuizCommand::Show {
            quiz_id,
            show_password,
        }) => quiz_handler::show_quiz(state, quiz_id, show_password).await,
        Command::Quiz(QuizCommand::Edit { quiz_id, changes }) => {
            quiz_handler::edit_quiz(state, quiz_id, changes).await
        }
        Command::Quiz(QuizCommand::Delete { quiz_id }) => {
            quiz_handler::delete_quiz(state, quiz_id).await
        }
        Command::Question(QuestionCommand::Add {
            quiz_id,
            file,
            rollback_on_failure,
        }) => question_handler::add_questions(state, quiz_id, &file, rollback_on_failure).await,
        Command::Question(QuestionCommand::Edit {
            quiz_id,
            question_id,
            content,
            choices,
            add_choices,
            delete_choices,
            correct,
        }) => {
            let changes = question_handler::QuestionChanges {
                content,
                choices,
                add_choices,
                delete_choices,
                correct,
            };
            question_handler::edit_question(state, quiz_id, question_id, changes).await
        }
        Command::Question(QuestionCommand::Delete {
            quiz_id,
            question_id,
        }) => question_handler::delete_question(state, quiz_id, question_id).await,
        Command::Join {
            quiz_id,
            password,
            info,
        } => participation_handler::join(state, quiz_id, password, info).await,
        Command::Start { quiz_id } => participation_handler::start(state, quiz_id).await,
        Command::Questions { quiz_id } => participation_handler::questions(state, quiz_id).await,
        Command::Answer {
            quiz_id,
            question_id,
            choice_id,
        } => participation_handler::answer(state, quiz_id, question_id, choice_id).await,
    }
}
