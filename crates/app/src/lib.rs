//! `medimart-app`: the pieces a UI drives: sign-in, session restore,
//! the application store and the assistant, behind one facade.

use std::sync::Arc;

use thiserror::Error;

use medimart_ai::{AiError, AssistantReply, PharmacyAssistant, TextCompletion};
use medimart_auth::{
    AuthError, Identity, IdentityVerifier, NavTab, PhoneNumber, Principal, Role, SessionError,
    SessionStore,
};
use medimart_core::DomainError;
use medimart_infra::{AppConfig, AppStore, ConfigError, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error(transparent)]
    Input(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Assistant(#[from] AiError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Facade over one running storefront session.
pub struct App {
    store: AppStore,
    verifier: Arc<dyn IdentityVerifier>,
    sessions: Arc<dyn SessionStore>,
    assistant: PharmacyAssistant<Arc<dyn TextCompletion>>,
    current: Option<Identity>,
}

impl App {
    pub fn new(
        config: &AppConfig,
        store: AppStore,
        verifier: Arc<dyn IdentityVerifier>,
        sessions: Arc<dyn SessionStore>,
        completion: Arc<dyn TextCompletion>,
    ) -> Self {
        Self {
            store,
            verifier,
            sessions,
            assistant: PharmacyAssistant::new(completion)
                .with_business_name(config.business_name.clone()),
            current: None,
        }
    }

    /// Read the persisted session once at start-up.
    ///
    /// An unreadable record is discarded and the app starts signed out.
    pub fn restore_session(&mut self) -> Option<&Identity> {
        match self.sessions.load() {
            Ok(identity) => self.current = identity,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable session");
                if let Err(err) = self.sessions.clear() {
                    tracing::warn!(error = %err, "failed to clear session");
                }
                self.current = None;
            }
        }
        if let Some(identity) = &self.current {
            tracing::info!(user_id = %identity.id, role = %identity.role, "session restored");
        }
        self.current.as_ref()
    }

    /// Validate the phone number and start a verification challenge.
    pub fn request_code(&self, phone: &str, role: Role) -> AppResult<PhoneNumber> {
        let phone = PhoneNumber::parse(phone)?;
        self.verifier.request_code(&phone, role)?;
        Ok(phone)
    }

    /// Complete sign-in and persist the session record.
    pub fn verify_code(&mut self, phone: &PhoneNumber, code: &str) -> AppResult<&Identity> {
        let identity = self.verifier.verify_code(phone, code)?;
        self.sessions.save(&identity)?;
        tracing::info!(user_id = %identity.id, role = %identity.role, "signed in");
        Ok(&*self.current.insert(identity))
    }

    pub fn logout(&mut self) -> AppResult<()> {
        if let Some(identity) = self.current.take() {
            tracing::info!(user_id = %identity.id, "signed out");
        }
        self.sessions.clear()?;
        Ok(())
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    pub fn require_user(&self) -> AppResult<&Identity> {
        self.current.as_ref().ok_or(AppError::NotSignedIn)
    }

    pub fn principal(&self) -> AppResult<Principal> {
        self.require_user().map(Identity::principal)
    }

    /// Tabs for the signed-in role; empty when signed out.
    pub fn navigation(&self) -> Vec<NavTab> {
        self.current
            .as_ref()
            .map(|identity| identity.role.navigation())
            .unwrap_or_default()
    }

    pub fn landing_tab(&self) -> Option<NavTab> {
        self.current.as_ref().map(|identity| identity.role.landing_tab())
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AppStore {
        &mut self.store
    }

    /// Forward a customer question to the assistant.
    pub async fn ask(&self, query: &str) -> AppResult<AssistantReply> {
        Ok(self.assistant.ask(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use medimart_ai::{FALLBACK_REPLY, GenerationConfig};
    use medimart_auth::{DEMO_VERIFICATION_CODE, DemoOtpVerifier, InMemorySessionStore};
    use medimart_core::{FixedClock, IdGenerator, SequentialIdGenerator};
    use medimart_events::InMemoryEventBus;
    use medimart_infra::FileSessionStore;

    struct Offline;

    #[async_trait]
    impl TextCompletion for Offline {
        async fn complete(&self, _: &str, _: &GenerationConfig) -> Result<String, AiError> {
            Err(AiError::NotConfigured("offline".to_string()))
        }
    }

    fn app_with(sessions: Arc<dyn SessionStore>) -> App {
        let config = AppConfig::default();
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIdGenerator::new());
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let store = AppStore::with_demo_catalog(
            &config,
            ids.clone(),
            Arc::new(FixedClock::on(today)),
            Arc::new(InMemoryEventBus::new()),
        );
        App::new(
            &config,
            store,
            Arc::new(DemoOtpVerifier::new(ids)),
            sessions,
            Arc::new(Offline),
        )
    }

    fn sign_in(app: &mut App, role: Role) -> Identity {
        let phone = app.request_code("98765 43210", role).unwrap();
        app.verify_code(&phone, DEMO_VERIFICATION_CODE).unwrap().clone()
    }

    #[test]
    fn short_phone_is_rejected_before_any_challenge() {
        let app = app_with(Arc::new(InMemorySessionStore::new()));
        assert!(matches!(
            app.request_code("12345", Role::Customer),
            Err(AppError::Input(DomainError::Validation(_)))
        ));
    }

    #[test]
    fn wrong_code_keeps_user_signed_out() {
        let mut app = app_with(Arc::new(InMemorySessionStore::new()));
        let phone = app.request_code("9876543210", Role::Customer).unwrap();

        assert!(matches!(
            app.verify_code(&phone, "0000"),
            Err(AppError::Auth(AuthError::IncorrectCode))
        ));
        assert!(app.current_user().is_none());
        assert!(app.navigation().is_empty());
        assert!(matches!(app.principal(), Err(AppError::NotSignedIn)));
    }

    #[test]
    fn sign_in_persists_session_and_sets_navigation() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let mut app = app_with(sessions.clone());
        let identity = sign_in(&mut app, Role::Employee);

        assert_eq!(sessions.load().unwrap(), Some(identity));
        assert_eq!(app.landing_tab(), Some(NavTab::Dashboard));
        assert!(app.navigation().contains(&NavTab::Inventory));
        assert!(!app.navigation().contains(&NavTab::Employees));
    }

    #[test]
    fn session_survives_restart_and_logout_clears_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut first = app_with(Arc::new(FileSessionStore::new(&path)));
        let identity = sign_in(&mut first, Role::Customer);

        let mut second = app_with(Arc::new(FileSessionStore::new(&path)));
        assert_eq!(second.restore_session(), Some(&identity));
        assert_eq!(second.landing_tab(), Some(NavTab::Store));

        second.logout().unwrap();
        assert!(second.current_user().is_none());

        let mut third = app_with(Arc::new(FileSessionStore::new(&path)));
        assert!(third.restore_session().is_none());
    }

    #[test]
    fn corrupt_session_starts_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "[]").unwrap();

        let mut app = app_with(Arc::new(FileSessionStore::new(&path)));
        assert!(app.restore_session().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn assistant_falls_back_when_offline() {
        let app = app_with(Arc::new(InMemorySessionStore::new()));
        let reply = app.ask("Do you deliver to Gaya?").await.unwrap();
        assert!(reply.fallback);
        assert_eq!(reply.text, FALLBACK_REPLY);

        assert!(matches!(app.ask("  ").await, Err(AppError::Assistant(_))));
    }
}
