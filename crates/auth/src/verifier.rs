//! Identity-verification collaborator (phone + one-time code).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use medimart_core::IdGenerator;

use crate::{Identity, PhoneNumber, Role};

/// The code the demo verifier accepts for every phone number.
pub const DEMO_VERIFICATION_CODE: &str = "1234";

const DEMO_ADDRESS: &str = "Harsh Enterprises, Patna, Bihar";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no verification code was requested for this phone number")]
    NoPendingChallenge,

    #[error("incorrect verification code")]
    IncorrectCode,

    #[error("verification service unavailable: {0}")]
    Unavailable(String),
}

/// Sends and checks one-time verification codes.
pub trait IdentityVerifier: Send + Sync {
    /// Start a challenge for `phone`, remembering the role the user asked for.
    fn request_code(&self, phone: &PhoneNumber, role: Role) -> Result<(), AuthError>;

    /// Complete the challenge; returns the verified identity.
    fn verify_code(&self, phone: &PhoneNumber, code: &str) -> Result<Identity, AuthError>;
}

/// Demo verifier: no code is actually sent, [`DEMO_VERIFICATION_CODE`] always
/// verifies, and the identity is a canned profile for the requested role.
pub struct DemoOtpVerifier {
    ids: Arc<dyn IdGenerator>,
    pending: Mutex<HashMap<PhoneNumber, Role>>,
}

impl core::fmt::Debug for DemoOtpVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DemoOtpVerifier").finish_non_exhaustive()
    }
}

impl DemoOtpVerifier {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            ids,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn profile(role: Role) -> (&'static str, &'static str) {
        match role {
            Role::Admin => ("Harsh Admin", "admin@harshpharmacy.com"),
            Role::Employee => ("Demo Employee", "staff@harshpharmacy.com"),
            Role::Customer => ("Demo Customer", "customer@demo.com"),
        }
    }
}

impl IdentityVerifier for DemoOtpVerifier {
    fn request_code(&self, phone: &PhoneNumber, role: Role) -> Result<(), AuthError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| AuthError::Unavailable("challenge table poisoned".to_string()))?;
        pending.insert(phone.clone(), role);
        tracing::info!(phone = %phone, role = %role, "verification code requested");
        Ok(())
    }

    fn verify_code(&self, phone: &PhoneNumber, code: &str) -> Result<Identity, AuthError> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| AuthError::Unavailable("challenge table poisoned".to_string()))?;

        let role = *pending.get(phone).ok_or(AuthError::NoPendingChallenge)?;
        if code.trim() != DEMO_VERIFICATION_CODE {
            tracing::warn!(phone = %phone, "incorrect verification code");
            return Err(AuthError::IncorrectCode);
        }
        pending.remove(phone);

        let (name, email) = Self::profile(role);
        Ok(Identity {
            id: self.ids.next_user_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.clone(),
            role,
            is_verified: true,
            address: Some(DEMO_ADDRESS.to_string()),
        })
    }
}
