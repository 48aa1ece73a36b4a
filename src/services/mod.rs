pub mod auth_service;
pub mod authoring_service;
pub mod dashboard_service;
pub mod participation_service;
pub mod question_editor;
pub mod quiz_detail;
pub mod quiz_service;

pub use auth_service::AuthService;
pub use authoring_service::{
    Compensation, DraftChoice, DraftQuestion, QuestionDrafts, SaveError, SaveFailure,
    SavePolicy, SaveReport, SaveStep, SavedQuestion,
};
pub use dashboard_service::{DashboardService, DashboardView, TableRow};
pub use participation_service::ParticipationService;
pub use question_editor::{EditableChoice, QuestionEditor};
pub use quiz_detail::QuizDetail;
pub use quiz_service::QuizService;
