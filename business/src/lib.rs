//! Business layer of the HomeComfort admin console.
//!
//! Front ends own a [`Session`] and a [`UserTableController`] and drive them
//! from user input; everything that talks to the backend lives here.

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod route;
pub mod session;
pub mod types;
pub mod users;

pub use api::{Api, ApiError, ApiResult};
pub use auth::{AuthError, Credentials, LoginPrefill, RegistrationForm, register, sign_in};
pub use config::{API_URL_ENV, BusinessConfig, ConfigError, DEFAULT_API_BASE_URL};
pub use route::Route;
pub use session::{
    AuthStatus, FileSessionStore, Guarded, MemorySessionStore, PersistedSession, Session,
    SessionError, SessionStore, StoreError,
};
pub use types::{CurrentUser, LastLogin, UserRecord, UserStatus};
pub use users::{
    ActionError, ActionOutcome, BulkAction, BulkActionState, Navigation, SelectionError,
    UserTableController, UserTableState,
};
