use secrecy::ExposeSecret;
use tokio::sync::watch;

use crate::{
    auth::{
        session::{AuthState, SessionManager},
        token,
    },
    errors::{AppError, AppResult},
    models::domain::User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pending,
    Authorized(User),
    Unauthorized,
}

/// Gate for commands that need a logged-in user.
///
/// Leaves `Pending` only when the session manager settles its initial check.
pub struct RouteGuard {
    rx: watch::Receiver<AuthState>,
}

impl RouteGuard {
    pub fn new(session: &SessionManager) -> Self {
        Self {
            rx: session.subscribe(),
        }
    }

    pub fn current(&self) -> GuardDecision {
        decide(&self.rx.borrow())
    }

    pub async fn resolve(&mut self) -> GuardDecision {
        match self.rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => decide(&state),
            Err(_) => {
                log::warn!("Session manager dropped before the auth check settled");
                GuardDecision::Unauthorized
            }
        }
    }

    pub async fn require_user(&mut self) -> AppResult<User> {
        match self.resolve().await {
            GuardDecision::Authorized(user) => Ok(user),
            _ => Err(AppError::Unauthorized(
                "Please log in first (quizwhiz login)".to_string(),
            )),
        }
    }
}

fn decide(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Pending => GuardDecision::Pending,
        AuthState::Anonymous => GuardDecision::Unauthorized,
        AuthState::Authenticated(session) => {
            if token::validate_token(Some(session.token.expose_secret())) {
                GuardDecision::Authorized(session.user.clone())
            } else {
                GuardDecision::Unauthorized
            }
        }
    }
}
