use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::{
    auth::{store::SessionStore, token},
    errors::{AppError, AppResult},
    models::domain::User,
};

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: SecretString,
}

#[derive(Debug, Clone)]
pub enum AuthState {
    /// The initial check has not settled yet.
    Pending,
    Authenticated(Session),
    Anonymous,
}

impl AuthState {
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthState::Pending)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Holds the current `{user, token}` and publishes every change.
///
/// Lifecycle: [`SessionManager::init`] once at start-up, then any number of
/// [`SessionManager::login`] / [`SessionManager::logout`] calls. Subscribers
/// observe [`AuthState::Pending`] until `init` settles.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Pending);
        Self { store, state }
    }

    /// Rehydrates the session from the store and settles the auth state.
    pub fn init(&self) -> AuthState {
        let next = match self.store.load() {
            Ok(Some(stored)) if token::validate_token(Some(&stored)) => {
                match token::decode_claims(&stored) {
                    Ok(claims) => {
                        log::info!("Restored session for {}", claims.username);
                        AuthState::Authenticated(Session {
                            user: claims.user(),
                            token: SecretString::from(stored),
                        })
                    }
                    Err(e) => {
                        log::warn!("Stored token could not be decoded: {}", e);
                        AuthState::Anonymous
                    }
                }
            }
            Ok(Some(_)) => {
                log::info!("Discarding expired session");
                if let Err(e) = self.store.clear() {
                    log::warn!("Failed to clear expired session: {}", e);
                }
                AuthState::Anonymous
            }
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                log::error!("Failed to load session: {}", e);
                AuthState::Anonymous
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Stores the session for a freshly issued access token.
    pub fn login(&self, access_token: &str) -> AppResult<User> {
        if !token::validate_token(Some(access_token)) {
            return Err(AppError::Unauthorized(
                "Received an expired or malformed access token".to_string(),
            ));
        }

        let claims = token::decode_claims(access_token)?;
        let user = claims.user();
        self.store.save(access_token)?;

        self.state.send_replace(AuthState::Authenticated(Session {
            user: user.clone(),
            token: SecretString::from(access_token.to_string()),
        }));
        log::info!("Logged in as {}", user.username);
        Ok(user)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.state.send_replace(AuthState::Anonymous);
        self.store.clear()?;
        log::info!("Logged out");
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_pending()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().session().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<SecretString> {
        self.state.borrow().session().map(|s| s.token.clone())
    }

    /// Token for the `Authorization` header of an authenticated request.
    pub fn bearer(&self) -> AppResult<String> {
        let token = self
            .token()
            .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))?;
        let raw = token.expose_secret();

        if !token::validate_token(Some(raw)) {
            return Err(AppError::Unauthorized("Session expired, log in again".to_string()));
        }
        Ok(raw.to_string())
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
