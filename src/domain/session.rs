//! Per-session state and the single-account demo gate.
//!
//! The credential check here is a placeholder that only decides which pages a
//! browser session sees. Passwords are kept in plain text, in memory, for the
//! lifetime of the session. It is not an authentication mechanism.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthError;
use super::profile::Profile;

/// The one account a session can register.
#[derive(Clone, PartialEq, Eq)]
pub struct DemoCredential {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for DemoCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoCredential")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Opaque key of a browser session, carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accept a cookie value only if it has the shape of a generated id.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(|uuid| Self(uuid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a browser session knows. Replaced as a whole on every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub profile: Option<Profile>,
    pub authenticated: bool,
    pub registered_credential: Option<DemoCredential>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SessionState {
    pub fn with_profile(&self, profile: Profile) -> SessionState {
        SessionState { profile: Some(profile), ..self.clone() }
    }

    /// Store the form's credential, replacing any previous one.
    pub fn register(&self, form: &RegistrationForm) -> Result<SessionState, AuthError> {
        if form.email.is_empty() || form.password.is_empty() || form.confirm_password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if form.password != form.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(SessionState {
            registered_credential: Some(DemoCredential {
                email: form.email.clone(),
                password: form.password.clone(),
            }),
            ..self.clone()
        })
    }

    pub fn login(&self, form: &LoginForm) -> Result<SessionState, AuthError> {
        if form.email.is_empty() || form.password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        let Some(stored) = &self.registered_credential else {
            return Err(AuthError::NoRegisteredAccount);
        };
        if stored.email != form.email || stored.password != form.password {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(SessionState {
            authenticated: true,
            user_email: Some(form.email.clone()),
            ..self.clone()
        })
    }

    /// Sign out, keeping the profile and the registered account.
    pub fn logout(&self) -> SessionState {
        SessionState { authenticated: false, user_email: None, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm { email: email.to_string(), password: password.to_string() }
    }

    #[test]
    fn initial_state_is_empty() {
        let state = SessionState::default();
        assert!(state.profile.is_none());
        assert!(!state.authenticated);
        assert!(state.registered_credential.is_none());
    }

    #[test]
    fn register_requires_every_field() {
        let err = SessionState::default().register(&registration("a@b.c", "pw", "")).unwrap_err();
        assert_eq!(err, AuthError::MissingFields);
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let err =
            SessionState::default().register(&registration("a@b.c", "pw", "other")).unwrap_err();
        assert_eq!(err, AuthError::PasswordMismatch);
    }

    #[test]
    fn register_does_not_sign_in() {
        let state = SessionState::default().register(&registration("a@b.c", "pw", "pw")).unwrap();
        assert!(!state.authenticated);
        assert_eq!(state.registered_credential.unwrap().email, "a@b.c");
    }

    #[test]
    fn second_registration_replaces_the_first() {
        let state = SessionState::default()
            .register(&registration("first@b.c", "pw", "pw"))
            .unwrap()
            .register(&registration("second@b.c", "pw2", "pw2"))
            .unwrap();
        assert_eq!(state.login(&login("first@b.c", "pw")), Err(AuthError::InvalidCredentials));
        assert!(state.login(&login("second@b.c", "pw2")).is_ok());
    }

    #[test]
    fn login_without_account_is_rejected() {
        let err = SessionState::default().login(&login("a@b.c", "pw")).unwrap_err();
        assert_eq!(err, AuthError::NoRegisteredAccount);
    }

    #[test]
    fn login_then_logout_round_trip() {
        let registered =
            SessionState::default().register(&registration("a@b.c", "pw", "pw")).unwrap();
        let signed_in = registered.login(&login("a@b.c", "pw")).unwrap();
        assert!(signed_in.authenticated);
        assert_eq!(signed_in.user_email.as_deref(), Some("a@b.c"));

        let signed_out = signed_in.logout();
        assert!(!signed_out.authenticated);
        assert!(signed_out.registered_credential.is_some());
    }

    #[test]
    fn session_ids_parse_only_uuid_values() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
        assert_eq!(SessionId::parse("not-a-session"), None);
    }

    #[test]
    fn debug_output_hides_password() {
        let credential = DemoCredential { email: "a@b.c".into(), password: "hunter2".into() };
        assert!(!format!("{:?}", credential).contains("hunter2"));
    }
}
