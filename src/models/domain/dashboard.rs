use serde::{Deserialize, Serialize};

use crate::models::domain::{Quiz, QuizSubmission};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Dashboard {
    #[serde(default)]
    pub created: Vec<Quiz>,
    #[serde(default)]
    pub participated: Vec<QuizSubmission>,
}
