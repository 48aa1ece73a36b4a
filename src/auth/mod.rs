pub mod claims;
pub mod guard;
pub mod session;
pub mod store;
pub mod token;

pub use claims::AccessClaims;
pub use guard::{GuardDecision, RouteGuard};
pub use session::{AuthState, Session, SessionManager};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use token::{decode_claims, validate_token, validate_token_at};
