use std::{fmt, sync::Arc};

use uuid::Uuid;

use crate::{
    api::QuizApi,
    errors::{AppError, AppResult},
    models::domain::{Dashboard, QuizSubmission},
};

pub const NO_CREATED_QUIZZES: &str = "You haven't created a quiz yet.";
pub const NO_PARTICIPATIONS: &str = "You haven't taken any quiz yet.";

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow<T> {
    Empty(&'static str),
    Entry(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRow {
    pub position: usize,
    pub quiz_id: Uuid,
    pub title: String,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipatedRow {
    pub position: usize,
    pub submission_id: Uuid,
    pub quiz_id: Uuid,
    pub title: String,
    pub question_count: usize,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub created: Vec<TableRow<CreatedRow>>,
    pub participated: Vec<TableRow<ParticipatedRow>>,
    pub total_score: f64,
    pub average_score: Option<f64>,
}

impl From<&Dashboard> for DashboardView {
    fn from(dashboard: &Dashboard) -> Self {
        let created = rows(&dashboard.created, NO_CREATED_QUIZZES, |position, quiz| {
            CreatedRow {
                position,
                quiz_id: quiz.id,
                title: quiz.title.clone(),
                question_count: quiz.question_count(),
            }
        });
        let participated = rows(&dashboard.participated, NO_PARTICIPATIONS, participated_row);

        let scores: Vec<f64> = dashboard.participated.iter().filter_map(|s| s.score).collect();
        let total_score: f64 = scores.iter().sum();
        let average_score = if scores.is_empty() {
            None
        } else {
            Some(total_score / scores.len() as f64)
        };

        DashboardView {
            created,
            participated,
            total_score,
            average_score,
        }
    }
}

fn participated_row(position: usize, submission: &QuizSubmission) -> ParticipatedRow {
    ParticipatedRow {
        position,
        submission_id: submission.id,
        quiz_id: submission.quiz.id,
        title: submission.quiz.title.clone(),
        question_count: submission.quiz.question_count(),
        score: submission.score,
    }
}

fn rows<T, R>(items: &[T], empty: &'static str, to_row: impl Fn(usize, &T) -> R) -> Vec<TableRow<R>> {
    if items.is_empty() {
        return vec![TableRow::Empty(empty)];
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| TableRow::Entry(to_row(index + 1, item)))
        .collect()
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) if score.fract() == 0.0 => format!("{:.0}", score),
        Some(score) => format!("{:.2}", score),
        None => "-".to_string(),
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created quizzes")?;
        writeln!(f, "{:<4} {:<36} {:<32} {:>9}", "#", "Id", "Title", "Questions")?;
        for row in &self.created {
            match row {
                TableRow::Empty(message) => writeln!(f, "  {}", message)?,
                TableRow::Entry(row) => writeln!(
                    f,
                    "{:<4} {:<36} {:<32} {:>9}",
                    row.position, row.quiz_id, row.title, row.question_count
                )?,
            }
        }

        writeln!(f)?;
        writeln!(f, "Participated quizzes")?;
        writeln!(f, "{:<4} {:<32} {:>9} {:>7}", "#", "Title", "Questions", "Score")?;
        for row in &self.participated {
            match row {
                TableRow::Empty(message) => writeln!(f, "  {}", message)?,
                TableRow::Entry(row) => writeln!(
                    f,
                    "{:<4} {:<32} {:>9} {:>7}",
                    row.position,
                    row.title,
                    row.question_count,
                    format_score(row.score)
                )?,
            }
        }

        if let Some(average) = self.average_score {
            writeln!(f)?;
            write!(
                f,
                "Total score: {}  Average: {:.2}",
                format_score(Some(self.total_score)),
                average
            )?;
        }
        Ok(())
    }
}

pub struct DashboardService {
    api: Arc<dyn QuizApi>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        Self { api }
    }

    /// Always refetches, nothing is cached between calls.
    pub async fn load(&self) -> AppResult<DashboardView> {
        log::info!("Fetching dashboard");
        let dashboard = self.api.user_quizzes().await?;
        log::debug!(
            "Dashboard has {} created and {} participated quizzes",
            dashboard.created.len(),
            dashboard.participated.len()
        );
        Ok(DashboardView::from(&dashboard))
    }

    /// The caller's submission for a quiz, used to address participation calls.
    pub async fn find_submission(&self, quiz_id: Uuid) -> AppResult<QuizSubmission> {
        let dashboard = self.api.user_quizzes().await?;
        dashboard
            .participated
            .into_iter()
            .find(|s| s.quiz.id == quiz_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "You have not joined quiz {} (quizwhiz join {})",
                    quiz_id, quiz_id
                ))
            })
    }
}
