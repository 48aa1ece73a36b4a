#[cfg(test)]
pub mod tokens {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::auth::AccessClaims;

    /// Signs with a key the client never sees, like the real backend.
    pub fn token_for(user_id: i64, username: &str, expires_in: Duration) -> String {
        let now = Utc::now();
        let claims = AccessClaims {
            user_id,
            name: format!("{} Example", username),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            exp: (now + expires_in).timestamp(),
            iat: Some(now.timestamp()),
            jti: Some(format!("jti-{}", user_id)),
            token_type: Some("access".to_string()),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-only-signing-key"),
        )
        .expect("test token should encode")
    }

    pub fn token_expiring_in(expires_in: Duration) -> String {
        token_for(1, "testuser", expires_in)
    }
}

#[cfg(test)]
pub mod fixtures {
    use uuid::Uuid;

    use crate::models::domain::{Choice, Question, QuestionType, Quiz, QuizSubmission};

    pub fn quiz_id() -> Uuid {
        Uuid::parse_str("4f5c7d0e-8a43-4b0e-9d55-1b1f3a1de001").expect("valid uuid")
    }

    pub fn question(id: i64, choice_ids: &[i64], correct: Option<i64>) -> Question {
        Question {
            id,
            quiz: Some(quiz_id()),
            content: format!("Question {}", id),
            question_type: QuestionType::MultipleChoice,
            correct_choice: correct,
            choices: choice_ids
                .iter()
                .map(|&cid| Choice {
                    id: cid,
                    content: format!("Choice {}", cid),
                })
                .collect(),
        }
    }

    pub fn quiz(title: &str, questions: Vec<Question>) -> Quiz {
        Quiz {
            id: quiz_id(),
            title: title.to_string(),
            description: Some(String::new()),
            password: None,
            creator: Some(1),
            start_time: None,
            duration: None,
            questions,
        }
    }

    pub fn submission(title: &str, score: Option<f64>) -> QuizSubmission {
        QuizSubmission {
            id: Uuid::new_v4(),
            quiz: Quiz {
                id: Uuid::new_v4(),
                ..quiz(title, Vec::new())
            },
            score,
            state: Some("completed".to_string()),
            joined_at: None,
            started_at: None,
            finished_at: None,
            end_at: None,
            time_spent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, tokens::*};
    use chrono::Duration;

    #[test]
    fn test_fixture_question_shape() {
        let q = question(4, &[40, 41], Some(41));
        assert_eq!(q.choices.len(), 2);
        assert_eq!(q.correct_choice_index(), Some(1));
    }

    #[test]
    fn test_tokens_are_three_part_jwts() {
        let token = token_expiring_in(Duration::minutes(1));
        assert_eq!(token.split('.').count(), 3);
    }
}
