use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
}

impl User {
    pub fn new(id: i64, name: &str, email: &str, username: &str) -> Self {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            username: username.to_string(),
        }
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(1, "Test User", &format!("{}@example.com", username), username)
    }
}
