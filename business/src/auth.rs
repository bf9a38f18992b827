//! Sign-in and create-account flows.
//!
//! These are the form submissions of the login and register pages without any
//! layout: validate the fields, call the backend, and on success update the
//! [`Session`] or hand back the values to prefill the login form with.

use log::{error, info};

use crate::api::{Api, ApiError};
use crate::route::Route;
use crate::session::{Session, SessionError};
use crate::types::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Values the login page starts with after a successful registration.
pub type LoginPrefill = Credentials;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This email is already in use. Please try another.")]
    EmailInUse,

    #[error("An error occurred during registration. Please try again.")]
    RegistrationFailed(#[source] ApiError),

    #[error("An error occurred. Please try again.")]
    Unavailable(#[source] ApiError),

    #[error("failed to store session: {0}")]
    Session(#[from] SessionError),
}

fn require(value: &str, field: &'static str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Submits the sign-in form.
///
/// Only a `"Success"` reply carrying a token signs the session in; the
/// returned profile replaces whatever was cached before. On any failure the
/// session is left exactly as it was.
pub async fn sign_in(
    api: &Api,
    session: &mut Session,
    credentials: &Credentials,
) -> Result<Route, AuthError> {
    require(&credentials.email, "email")?;
    require(&credentials.password, "password")?;

    let request = LoginRequest {
        email: credentials.email.trim().to_owned(),
        password: credentials.password.clone(),
    };

    let reply = api.login(&request).await.map_err(|e| {
        error!("Login error: {e}");
        AuthError::Unavailable(e)
    })?;

    let Some(token) = reply.accepted_token() else {
        info!("login for {} rejected (status {:?})", request.email, reply.status);
        return Err(AuthError::InvalidCredentials);
    };

    // A reply without `User` still replaces the profile of any earlier account.
    session.sign_in_as(token, reply.user.clone())?;
    info!("signed in as {}", request.email);

    Ok(Route::Home)
}

/// Submits the create-account form.
///
/// On success returns the credentials to prefill the login page with.
pub async fn register(api: &Api, form: &RegistrationForm) -> Result<LoginPrefill, AuthError> {
    require(&form.username, "username")?;
    require(&form.email, "email")?;
    require(&form.password, "password")?;

    let request = RegisterRequest {
        username: form.username.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password.clone(),
    };

    match api.register(&request).await {
        Ok(()) => {
            info!("registered {}", request.email);
            Ok(Credentials::new(request.email, request.password))
        }
        Err(e) if e.status() == Some(409) => Err(AuthError::EmailInUse),
        Err(e) => {
            error!("registration failed: {e}");
            Err(AuthError::RegistrationFailed(e))
        }
    }
}
