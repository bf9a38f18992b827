//! Wire types for the HomeComfort REST API.
//!
//! Each endpoint has an explicit decoding contract here; anything that does
//! not fit is rejected by `api.rs` as a malformed response instead of being
//! passed on half-filled.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Account status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Blocked => f.write_str("Blocked"),
        }
    }
}

/// Last sign-in time of a user.
///
/// The backend sends `null` for users who never signed in, and older rows may
/// carry strings that are not timestamps; both decode to [`LastLogin::Never`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LastLogin {
    #[default]
    Never,
    At(DateTime<Utc>),
}

impl LastLogin {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Never => None,
            Self::At(at) => Some(*at),
        }
    }
}

impl fmt::Display for LastLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::At(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        }
    }
}

impl<'de> Deserialize<'de> for LastLogin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|at| Self::At(at.with_timezone(&Utc)))
            .unwrap_or(Self::Never))
    }
}

impl Serialize for LastLogin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Never => serializer.serialize_none(),
            Self::At(at) => serializer.serialize_some(&at.to_rfc3339()),
        }
    }
}

/// One row of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub last_login: LastLogin,
    pub status: UserStatus,
}

/// Profile of the signed-in user, as returned in the `User` field of `/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Reply of `POST /login`.
///
/// Only `Status == "Success"` together with a token counts as a sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "User", default)]
    pub user: Option<CurrentUser>,
}

impl LoginResponse {
    pub const SUCCESS: &'static str = "Success";

    /// The token, if this reply is a successful sign-in.
    pub fn accepted_token(&self) -> Option<&str> {
        if self.status != Self::SUCCESS {
            return None;
        }
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body shared by the three bulk endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdsRequest {
    pub ids: Vec<i64>,
}

/// Optional acknowledgement returned by bulk endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub message: Option<String>,
}
