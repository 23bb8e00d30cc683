//! Client-side authentication state.
//!
//! The session is an ordinary value owned by the caller and passed by
//! reference to whatever needs it. It starts in `Initializing` until the
//! stored token has been checked once against the auth service.

use super::entities::User;
use crate::util::persistence::{PersistError, TokenStore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Initializing,
    Anonymous,
    Authenticated { token: String, user: User },
}

#[derive(Debug)]
pub struct AuthSession {
    state: SessionState,
    store: TokenStore,
}

impl AuthSession {
    pub fn new(store: TokenStore) -> Self {
        Self {
            state: SessionState::Initializing,
            store,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Token left over from a previous run, if any.
    pub fn stored_token(&self) -> Option<String> {
        self.store.load()
    }

    /// Ends initialisation. `Some` means the stored token was confirmed by
    /// the auth service; `None` drops whatever was stored.
    pub fn finish_restore(&mut self, confirmed: Option<(String, User)>) {
        match confirmed {
            Some((token, user)) => {
                tracing::info!(user = %user.email, "session restored");
                self.state = SessionState::Authenticated { token, user };
            }
            None => {
                if let Err(err) = self.store.clear() {
                    tracing::warn!("failed to clear stored token: {err}");
                }
                self.state = SessionState::Anonymous;
            }
        }
    }

    pub fn login(&mut self, token: String, user: User) -> Result<(), PersistError> {
        self.store.save(&token)?;
        tracing::info!(user = %user.email, "logged in");
        self.state = SessionState::Authenticated { token, user };
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), PersistError> {
        self.state = SessionState::Anonymous;
        self.store.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            full_name: None,
            updated_at: None,
        }
    }

    fn session() -> (tempfile::TempDir, AuthSession) {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("session.json"));
        (dir, AuthSession::new(store))
    }

    #[test]
    fn starts_loading_and_anonymous_restore_clears() {
        let (_dir, mut session) = session();
        assert!(session.is_loading());
        assert!(!session.is_authenticated());

        session.finish_restore(None);
        assert!(!session.is_loading());
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert_eq!(session.stored_token(), None);
    }

    #[test]
    fn login_persists_and_logout_forgets() {
        let (_dir, mut session) = session();
        session.finish_restore(None);

        session.login("tok".to_string(), user()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("u-1"));
        assert_eq!(session.stored_token().as_deref(), Some("tok"));

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.stored_token(), None);
    }

    #[test]
    fn login_before_restore_replaces_the_stored_token() {
        let (_dir, mut session) = session();
        session.login("old".to_string(), user()).unwrap();
        let mut fresh = AuthSession::new(session.store.clone());
        assert_eq!(fresh.stored_token().as_deref(), Some("old"));

        fresh.login("new".to_string(), user()).unwrap();
        assert!(!fresh.is_loading());
        assert_eq!(fresh.stored_token().as_deref(), Some("new"));
    }

    #[test]
    fn confirmed_restore_authenticates() {
        let (_dir, mut session) = session();
        session.finish_restore(Some(("tok".to_string(), user())));
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().email, "ada@example.com");
    }
}
