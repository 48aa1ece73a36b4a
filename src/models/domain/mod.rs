pub mod dashboard;
pub mod question;
pub mod quiz;
pub mod submission;
pub mod user;
pub use dashboard::Dashboard;
pub use question::{Choice, Question, QuestionType};
pub use quiz::Quiz;
pub use submission::QuizSubmission;
pub use user::User;
