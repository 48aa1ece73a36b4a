use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "quizwhiz", version, about = "Create, manage and take QuizWhiz quizzes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "QUIZWHIZ_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Repeat the password [default: same as --password]
        #[arg(long)]
        password_confirmation: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show your profile, or update it when any field is given
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },

    /// Quizzes you created and quizzes you took
    Dashboard,

    #[command(subcommand)]
    Quiz(QuizCommand),

    #[command(subcommand)]
    Question(QuestionCommand),

    /// Show a quiz's join info, or join it
    Join {
        quiz_id: Uuid,
        #[arg(long)]
        password: Option<String>,
        /// Only print the quiz info
        #[arg(long)]
        info: bool,
    },

    /// Start the timed session of a joined quiz
    Start { quiz_id: Uuid },

    /// List the questions of a started quiz
    Questions { quiz_id: Uuid },

    /// Answer one question of a started quiz
    Answer {
        quiz_id: Uuid,
        question_id: i64,
        choice_id: i64,
    },
}

/// Quiz metadata
#[derive(Subcommand, Debug)]
pub enum QuizCommand {
    /// Create a quiz
    Create(QuizArgs),

    /// Show a quiz with its questions
    Show {
        quiz_id: Uuid,
        /// Print the access password in clear text
        #[arg(long)]
        show_password: bool,
    },

    /// Edit a quiz; unspecified fields keep their value
    Edit {
        quiz_id: Uuid,
        #[command(flatten)]
        changes: QuizEditArgs,
    },

    /// Delete a quiz
    Delete { quiz_id: Uuid },
}

#[derive(Args, Debug)]
pub struct QuizArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// RFC 3339 timestamp, e.g. 2024-09-01T08:30:00Z
    #[arg(long)]
    pub start_time: Option<DateTime<Utc>>,
    /// Time limit in minutes (1-180)
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub struct QuizEditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub start_time: Option<DateTime<Utc>>,
    #[arg(long)]
    pub duration: Option<f64>,
    /// Remove the start time
    #[arg(long, conflicts_with = "start_time")]
    pub clear_start_time: bool,
    /// Remove the time limit
    #[arg(long, conflicts_with = "duration")]
    pub clear_duration: bool,
}

/// Questions and choices. Choices are numbered from 1.
#[derive(Subcommand, Debug)]
pub enum QuestionCommand {
    /// Add questions from a JSON file: [{"content", "choices": [..], "correct": 1}]
    Add {
        quiz_id: Uuid,
        #[arg(long)]
        file: PathBuf,
        /// Delete what was created for a question whose save failed
        #[arg(long)]
        rollback_on_failure: bool,
    },

    /// Edit a saved question
    Edit {
        quiz_id: Uuid,
        question_id: i64,
        #[arg(long)]
        content: Option<String>,
        /// Replace a choice's text: N=TEXT
        #[arg(long = "choice", value_parser = parse_choice_edit)]
        choices: Vec<(usize, String)>,
        /// Append a choice
        #[arg(long = "add-choice")]
        add_choices: Vec<String>,
        /// Delete choice N
        #[arg(long = "delete-choice")]
        delete_choices: Vec<usize>,
        /// Mark choice N as correct, counted after deletions and additions
        #[arg(long)]
        correct: Option<usize>,
    },

    /// Delete a question
    Delete { quiz_id: Uuid, question_id: i64 },
}

fn parse_choice_edit(value: &str) -> Result<(usize, String), String> {
    let (number, text) = value
        .split_once('=')
        .ok_or_else(|| format!("expected N=TEXT, got '{}'", value))?;
    let number: usize = number
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a choice number", number))?;
    if number == 0 {
        return Err("choices are numbered from 1".to_string());
    }
    Ok((number, text.to_string()))
}
