use std::sync::Arc;

use validator::Validate;

use crate::{
    api::QuizApi,
    auth::SessionManager,
    errors::AppResult,
    models::{
        domain::User,
        dto::request::{LoginForm, ProfileUpdate, RegisterForm},
    },
};

pub struct AuthService {
    api: Arc<dyn QuizApi>,
    session: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(api: Arc<dyn QuizApi>, session: Arc<SessionManager>) -> Self {
        Self { api, session }
    }

    /// Exchanges credentials for a token and stores the resulting session.
    pub async fn login(&self, form: &LoginForm) -> AppResult<User> {
        form.validate()?;
        log::info!("Logging in as {}", form.email);
        let pair = self.api.login(form).await?;
        self.session.login(&pair.access)
    }

    /// Creates the account. The caller still has to log in afterwards.
    pub async fn register(&self, form: &RegisterForm) -> AppResult<User> {
        let payload = form.to_payload()?;
        log::info!("Registering {}", payload.username);
        self.api.register(&payload).await
    }

    pub fn logout(&self) -> AppResult<()> {
        self.session.logout()
    }

    pub async fn profile(&self) -> AppResult<User> {
        self.api.get_profile().await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<User> {
        update.validate()?;
        self.api.update_profile(update).await
    }
}
