use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Uuid>,
    pub content: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub correct_choice: Option<i64>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub id: i64,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "mcq")]
    MultipleChoice,
}

impl Question {
    pub fn correct_choice_index(&self) -> Option<usize> {
        let correct = self.correct_choice?;
        self.choices.iter().position(|c| c.id == correct)
    }

    pub fn is_correct(&self, choice_id: i64) -> bool {
        self.correct_choice == Some(choice_id)
    }
}
