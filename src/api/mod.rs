pub mod http_client;
pub mod http_helpers;
pub mod quiz_api;

pub use http_client::HttpQuizApi;
pub use quiz_api::QuizApi;

#[cfg(test)]
pub use quiz_api::MockQuizApi;
