use std::sync::Arc;

use crate::{
    api::{HttpQuizApi, QuizApi},
    auth::{AuthState, FileSessionStore, RouteGuard, SessionManager, SessionStore},
    config::Config,
    errors::AppResult,
    models::domain::User,
    services::{AuthService, DashboardService, ParticipationService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn QuizApi>,
    pub session: Arc<SessionManager>,
    pub auth_service: Arc<AuthService>,
    pub quiz_service: Arc<QuizService>,
    pub dashboard_service: Arc<DashboardService>,
    pub participation_service: Arc<ParticipationService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the HTTP client to a session persisted in the configured file.
    pub fn new(config: Config) -> AppResult<Self> {
        let config = Arc::new(config);
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_file));
        let session = Arc::new(SessionManager::new(store));
        let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(config.clone(), session.clone())?);
        Ok(Self::with_api(config, api, session))
    }

    pub fn with_api(config: Arc<Config>, api: Arc<dyn QuizApi>, session: Arc<SessionManager>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(api.clone(), session.clone())),
            quiz_service: Arc::new(QuizService::new(api.clone())),
            dashboard_service: Arc::new(DashboardService::new(api.clone())),
            participation_service: Arc::new(ParticipationService::new(api.clone())),
            api,
            session,
            config,
        }
    }

    /// Rehydrates the stored session. Guards created earlier resolve once this returns.
    pub fn init_session(&self) -> AuthState {
        self.session.init()
    }

    /// The logged-in user, or `Unauthorized` once the session check settles without one.
    pub async fn require_user(&self) -> AppResult<User> {
        RouteGuard::new(&self.session).require_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::MockQuizApi,
        auth::MemorySessionStore,
        errors::AppError,
        test_utils::tokens::token_for,
    };
    use chrono::Duration;

    fn state(store: MemorySessionStore) -> AppState {
        let session = Arc::new(SessionManager::new(Arc::new(store)));
        AppState::with_api(
            Arc::new(Config::test_config()),
            Arc::new(MockQuizApi::new()),
            session,
        )
    }

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_require_user_after_init() {
        let token = token_for(3, "erin", Duration::hours(1));
        let state = state(MemorySessionStore::with_token(&token));
        state.init_session();

        let user = state.require_user().await.unwrap();
        assert_eq!(user.username, "erin");
    }

    #[tokio::test]
    async fn test_require_user_without_session() {
        let state = state(MemorySessionStore::new());
        state.init_session();

        assert!(matches!(state.require_user().await, Err(AppError::Unauthorized(_))));
    }
}
