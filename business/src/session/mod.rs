//! Session guard.
//!
//! A [`Session`] is built once at startup from a [`SessionStore`] and handed by
//! reference to whatever needs to know who is signed in. Authentication is
//! nothing more than "a token is present"; the token itself is opaque.

pub mod store;

use log::{error, info, warn};

pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore, StoreError};

use crate::types::CurrentUser;

/// Two-state authentication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("login rejected: invalid token")]
    InvalidToken,

    #[error("failed to persist session: {0}")]
    Persist(#[from] StoreError),
}

/// Outcome of gating a view on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<V> {
    /// Signed in: show the requested view.
    View(V),
    /// Not signed in: go to the login page instead.
    RedirectToLogin,
}

impl<V> Guarded<V> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::RedirectToLogin)
    }

    pub fn into_view(self) -> Option<V> {
        match self {
            Self::View(view) => Some(view),
            Self::RedirectToLogin => None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    store: Box<dyn SessionStore>,
    token: Option<String>,
    current_user: Option<CurrentUser>,
}

impl Session {
    /// Reads the persisted session, if any.
    ///
    /// An unreadable store is logged and treated as signed out; there is no
    /// error state at startup.
    pub fn initialize(store: impl SessionStore + 'static) -> Self {
        let persisted = store.load().unwrap_or_else(|e| {
            warn!("ignoring stored session: {e}");
            PersistedSession::default()
        });

        let token = persisted.token.filter(|t| !t.trim().is_empty());
        info!(
            "session initialized ({})",
            if token.is_some() {
                "authenticated"
            } else {
                "unauthenticated"
            }
        );

        Self {
            store: Box::new(store),
            token,
            current_user: persisted.user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    /// Stores `token` and marks the session authenticated. The cached profile
    /// is left as it is.
    ///
    /// A blank token is rejected and leaves both memory and storage untouched.
    pub fn login(&mut self, token: &str) -> Result<(), SessionError> {
        let user = self.current_user.clone();
        self.sign_in_as(token, user)
    }

    /// Replaces token and profile in one write, as a fresh sign-in does.
    ///
    /// `user == None` drops any profile cached by an earlier sign-in. On error
    /// nothing changes, in memory or in storage.
    pub fn sign_in_as(
        &mut self,
        token: &str,
        user: Option<CurrentUser>,
    ) -> Result<(), SessionError> {
        if token.trim().is_empty() {
            error!("Invalid token received. Token was not saved.");
            return Err(SessionError::InvalidToken);
        }

        let next = PersistedSession {
            token: Some(token.to_owned()),
            user,
        };
        self.store.save(&next)?;
        self.token = next.token;
        self.current_user = next.user;
        Ok(())
    }

    /// Caches and persists the signed-in user's profile.
    pub fn set_current_user(&mut self, user: CurrentUser) -> Result<(), SessionError> {
        let next = PersistedSession {
            token: self.token.clone(),
            user: Some(user),
        };
        self.store.save(&next)?;
        self.current_user = next.user;
        Ok(())
    }

    /// Forgets token and profile, in memory and in storage.
    ///
    /// Safe to call when already signed out. Memory is cleared even when the
    /// store fails, so the running process never stays signed in.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.token = None;
        self.current_user = None;
        self.store.clear()?;
        Ok(())
    }

    /// Yields `view` when signed in, a redirect otherwise.
    pub fn guard<V>(&self, view: V) -> Guarded<V> {
        if self.is_authenticated() {
            Guarded::View(view)
        } else {
            Guarded::RedirectToLogin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me() -> CurrentUser {
        CurrentUser {
            id: 7,
            email: "me@example.com".to_owned(),
            name: Some("Me".to_owned()),
        }
    }

    #[test]
    fn test_initialize_without_token_is_unauthenticated() {
        let session = Session::initialize(MemorySessionStore::new());
        assert_eq!(session.status(), AuthStatus::Unauthenticated);
        assert!(session.token().is_none());
    }

    #[test]
    fn test_initialize_with_persisted_token() {
        let store = MemorySessionStore::with(PersistedSession {
            token: Some("persisted".to_owned()),
            user: Some(me()),
        });
        let session = Session::initialize(store);

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("persisted"));
        assert_eq!(session.current_user(), Some(&me()));
    }

    #[test]
    fn test_profile_without_token_is_not_authenticated() {
        let store = MemorySessionStore::with(PersistedSession {
            token: None,
            user: Some(me()),
        });
        let session = Session::initialize(store);

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_some());
    }

    #[test]
    fn test_login_persists_token() {
        let store = MemorySessionStore::new();
        let mut session = Session::initialize(store.clone());

        session.login("abc").unwrap();

        assert!(session.is_authenticated());
        assert_eq!(store.snapshot().token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_login_with_blank_token_is_rejected() {
        let store = MemorySessionStore::new();
        let mut session = Session::initialize(store.clone());

        for blank in ["", "   "] {
            let err = session.login(blank).unwrap_err();
            assert!(matches!(err, SessionError::InvalidToken));
        }

        assert!(!session.is_authenticated());
        assert_eq!(store.snapshot(), PersistedSession::default());
    }

    #[test]
    fn test_blank_login_keeps_existing_session() {
        let mut session = Session::initialize(MemorySessionStore::new());
        session.login("first").unwrap();

        assert!(session.login("").is_err());
        assert_eq!(session.token(), Some("first"));
    }

    #[test]
    fn test_logout_clears_token_and_profile() {
        let store = MemorySessionStore::new();
        let mut session = Session::initialize(store.clone());
        session.login("abc").unwrap();
        session.set_current_user(me()).unwrap();
        assert_eq!(store.snapshot().user, Some(me()));

        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
        assert_eq!(store.snapshot(), PersistedSession::default());

        // Idempotent.
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_authenticated_tracks_last_successful_login() {
        let mut session = Session::initialize(MemorySessionStore::new());
        let steps: [(&str, Option<&str>); 7] = [
            ("login", Some("a")),
            ("logout", None),
            ("logout", None),
            ("login", Some("")),
            ("login", Some("b")),
            ("login", Some("")),
            ("login", Some("c")),
        ];

        let mut expected = false;
        for (op, token) in steps {
            match (op, token) {
                ("login", Some(t)) => {
                    if session.login(t).is_ok() {
                        expected = true;
                    }
                }
                _ => {
                    session.logout().unwrap();
                    expected = false;
                }
            }
            assert_eq!(session.is_authenticated(), expected, "after {op} {token:?}");
        }
    }

    #[test]
    fn test_login_keeps_token_verbatim() {
        let store = MemorySessionStore::new();
        let mut session = Session::initialize(store.clone());

        session.login(" padded token ").unwrap();

        assert_eq!(session.token(), Some(" padded token "));
        assert_eq!(store.snapshot().token.as_deref(), Some(" padded token "));
    }

    #[test]
    fn test_sign_in_as_replaces_previous_profile() {
        let store = MemorySessionStore::new();
        let mut session = Session::initialize(store.clone());
        session.sign_in_as("first", Some(me())).unwrap();

        session.sign_in_as("second", None).unwrap();

        assert_eq!(session.token(), Some("second"));
        assert!(session.current_user().is_none());
        assert_eq!(
            store.snapshot(),
            PersistedSession {
                token: Some("second".to_owned()),
                user: None,
            }
        );
    }

    #[test]
    fn test_sign_in_as_failure_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every save fail.
        let path = dir.path().join("session.json");
        std::fs::create_dir(&path).unwrap();
        let mut session = Session::initialize(FileSessionStore::new(&path));

        let err = session.sign_in_as("abc", Some(me())).unwrap_err();

        assert!(matches!(err, SessionError::Persist(_)));
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn test_guard() {
        let mut session = Session::initialize(MemorySessionStore::new());
        assert_eq!(session.guard("home"), Guarded::RedirectToLogin);

        session.login("abc").unwrap();
        assert_eq!(session.guard("home"), Guarded::View("home"));
        assert_eq!(session.guard("home").into_view(), Some("home"));

        session.logout().unwrap();
        assert!(session.guard("home").is_redirect());
    }
}
