//! Sign-in state machine and the account creation placeholder.

use api::backend::Backend;
use api::error::RpcError;
use dioxus_logger::tracing::info;
use dioxus_logger::tracing::warn;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum AuthState {
    /// The sign-in prompt, with the reason the last attempt failed.
    LoggedOut { error: Option<String> },
    /// `unlock_user` is in flight.
    Authenticating { username: String },
    LoggedIn {
        username: String,
        exchanges: Vec<String>,
    },
}

impl Default for AuthState {
    fn default() -> Self {
        Self::LoggedOut { error: None }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("please enter a username")]
    MissingUsername,
    #[error("please enter a password")]
    MissingPassword,
}

/// Validated sign-in input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsError::MissingUsername);
        }
        if password.is_empty() {
            return Err(CredentialsError::MissingPassword);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Asks the backend to unlock the user's data. Returns the connected
/// exchanges.
pub async fn unlock<B: Backend>(backend: &B, credentials: &Credentials) -> Result<Vec<String>, RpcError> {
    backend
        .unlock_user(&credentials.username, &credentials.password)
        .await?
        .into_exchanges()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthFlow {
    state: AuthState,
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn shows_sign_in_prompt(&self) -> bool {
        self.state.is_logged_out()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedOut { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Validates the input and moves to Authenticating. Invalid input
    /// leaves the flow logged out.
    pub fn begin(&mut self, username: &str, password: &str) -> Result<Credentials, CredentialsError> {
        let credentials = Credentials::new(username, password)?;
        self.state = AuthState::Authenticating {
            username: credentials.username.clone(),
        };
        Ok(credentials)
    }

    /// Applies the outcome of [unlock]. Returns the exchanges to load when
    /// the user is now logged in.
    pub fn finish(&mut self, outcome: Result<Vec<String>, RpcError>) -> Option<Vec<String>> {
        let username = match &self.state {
            AuthState::Authenticating { username } => username.clone(),
            other => {
                warn!("sign-in result arrived while {:?}; ignored", other);
                return None;
            }
        };
        match outcome {
            Ok(exchanges) => {
                info!("{} signed in with {} exchanges", username, exchanges.len());
                self.state = AuthState::LoggedIn {
                    username,
                    exchanges: exchanges.clone(),
                };
                Some(exchanges)
            }
            Err(e) => {
                warn!("sign-in for {} failed: {}", username, e);
                self.state = AuthState::LoggedOut {
                    error: Some(e.user_message()),
                };
                None
            }
        }
    }

    pub fn logout(&mut self) {
        if let AuthState::LoggedIn { username, .. } = &self.state {
            info!("{} signed out", username);
        }
        self.state = AuthState::default();
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountError {
    #[error("please enter a username")]
    MissingUsername,
    #[error("please enter a password")]
    MissingPassword,
    #[error("the passwords do not match")]
    PasswordMismatch,
}

/// Input of the account creation form. No account is registered with the
/// backend yet; a valid draft only yields a confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountDraft {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl AccountDraft {
    /// Returns the confirmation text to show.
    pub fn validate(&self) -> Result<String, AccountError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(AccountError::MissingUsername);
        }
        if self.password.is_empty() {
            return Err(AccountError::MissingPassword);
        }
        if self.password != self.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }
        Ok(format!("Account {username} created. You can now sign in."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::load_settings;
    use api::mock::MockBackend;
    use api::prefs::display_preference::DisplayPreference;
    use serde_json::json;

    async fn attempt(
        backend: &MockBackend,
        flow: &mut AuthFlow,
        password: &str,
    ) -> Option<Vec<String>> {
        let credentials = flow.begin("alice", password).unwrap();
        assert!(flow.state().is_authenticating());
        let outcome = unlock(backend, &credentials).await;
        flow.finish(outcome)
    }

    #[tokio::test]
    async fn test_startup_shows_prompt_with_backend_currency() {
        let backend = MockBackend::new();
        backend.reply("get_settings", json!({"main_currency": "USD", "exchange_rates": {}}));

        let settings = load_settings(&backend, &DisplayPreference::default())
            .await
            .unwrap();
        assert_eq!(settings.currency_icon(), "$");
        assert!(AuthFlow::new().shows_sign_in_prompt());
    }

    #[tokio::test]
    async fn test_unlock_signs_in_with_exchanges() {
        let backend = MockBackend::new();
        backend.reply("unlock_user", json!({"result": true, "exchanges": ["kraken"]}));

        let mut flow = AuthFlow::new();
        let exchanges = attempt(&backend, &mut flow, "pw").await;
        assert_eq!(exchanges, Some(vec!["kraken".to_string()]));
        assert!(flow.is_logged_in());
        assert_eq!(
            backend.calls_to("unlock_user")[0].args,
            vec![json!("alice"), json!("pw")]
        );
    }

    #[tokio::test]
    async fn test_signed_in_without_exchanges_is_not_a_failure() {
        let backend = MockBackend::new();
        backend.reply("unlock_user", json!({"result": true, "exchanges": []}));

        let mut flow = AuthFlow::new();
        assert_eq!(attempt(&backend, &mut flow, "pw").await, Some(vec![]));
        assert!(flow.is_logged_in());
    }

    #[test]
    fn test_empty_credentials_stay_logged_out() {
        let mut flow = AuthFlow::new();
        assert_eq!(flow.begin(" ", "pw"), Err(CredentialsError::MissingUsername));
        assert_eq!(flow.begin("alice", ""), Err(CredentialsError::MissingPassword));
        assert!(flow.shows_sign_in_prompt());
    }

    #[tokio::test]
    async fn test_refused_unlock_returns_to_prompt() {
        let backend = MockBackend::new();
        backend.reply("unlock_user", json!({"result": false, "message": "wrong password"}));

        let mut flow = AuthFlow::new();
        assert_eq!(attempt(&backend, &mut flow, "nope").await, None);
        assert_eq!(flow.error(), Some("wrong password"));
        assert!(flow.shows_sign_in_prompt());
    }

    #[tokio::test]
    async fn test_transport_failure_returns_to_prompt() {
        let backend = MockBackend::new();
        let mut flow = AuthFlow::new();
        assert_eq!(attempt(&backend, &mut flow, "pw").await, None);
        assert!(flow.error().unwrap().contains("backend call failed"));
    }

    #[test]
    fn test_finish_outside_authenticating_is_ignored() {
        let mut flow = AuthFlow::new();
        assert_eq!(flow.finish(Ok(vec!["kraken".to_string()])), None);
        assert!(flow.shows_sign_in_prompt());
    }

    #[test]
    fn test_logout() {
        let mut flow = AuthFlow::new();
        flow.begin("alice", "pw").unwrap();
        flow.finish(Ok(vec![]));
        assert!(flow.is_logged_in());
        flow.logout();
        assert_eq!(flow.state(), &AuthState::LoggedOut { error: None });
    }

    #[test]
    fn test_account_draft() {
        let mut draft = AccountDraft {
            username: "bob".to_string(),
            password: "secret".to_string(),
            confirm_password: "secrte".to_string(),
        };
        assert_eq!(draft.validate(), Err(AccountError::PasswordMismatch));
        draft.confirm_password = "secret".to_string();
        assert!(draft.validate().unwrap().contains("bob"));
        draft.username.clear();
        assert_eq!(draft.validate(), Err(AccountError::MissingUsername));
    }
}
