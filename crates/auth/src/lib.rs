//! `medimart-auth`: identity and role-based access boundary.
//!
//! Decoupled from any UI and from storage: verification and session
//! persistence are collaborator traits with in-memory implementations here.

pub mod authorize;
pub mod identity;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod session;
pub mod verifier;

pub use authorize::{AuthzError, authorize};
pub use identity::{ContactSnapshot, Identity, PhoneNumber};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::{NavTab, Role};
pub use session::{InMemorySessionStore, SESSION_STORAGE_KEY, SessionError, SessionStore};
pub use verifier::{AuthError, DEMO_VERIFICATION_CODE, DemoOtpVerifier, IdentityVerifier};
