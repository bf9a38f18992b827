//! HomeComfort REST API client.
//!
//! Notes:
//! - Every call goes through [`Api`], which pairs a [`BusinessConfig`] with a
//!   shared HTTP [`Client`].
//! - Authorized calls take the opaque session token as a parameter; this module
//!   never reads or writes session state.
//! - Non-2xx replies become [`ApiError::Status`]; bodies that do not match the
//!   endpoint's contract become [`ApiError::Malformed`].

use log::{error, info};

use crate::config::BusinessConfig;
use crate::http::{Client, HttpError, Response};
use crate::types::{
    ActionReply, IdsRequest, LoginRequest, LoginResponse, RegisterRequest, UserRecord,
};

/// Failure talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to `{endpoint}` failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: HttpError,
    },

    #[error("`{endpoint}` returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("malformed response from `{endpoint}`: {source}")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request for `{endpoint}`: {source}")]
    Encode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of the reply, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A typed API result.
pub type ApiResult<T> = Result<T, ApiError>;

pub const LOGIN: &str = "login";
pub const REGISTER: &str = "register";
pub const USERS: &str = "users";
pub const USERS_BLOCK: &str = "users/block";
pub const USERS_UNBLOCK: &str = "users/unblock";
pub const USERS_DELETE: &str = "users/delete";

#[derive(Debug, Clone, Default)]
pub struct Api {
    config: BusinessConfig,
    client: Client,
}

impl Api {
    pub fn new(config: BusinessConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    /// POST `/login`
    /// Body: `{ "email": "...", "password": "..." }`
    ///
    /// The reply is decoded even when `Status` is not `"Success"`; judging it is
    /// up to the caller.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        info!("POST /{LOGIN} for {}", request.email);
        let response = self.post_json(LOGIN, request, None).await?;
        expect_success(LOGIN, &response)?;
        decode(LOGIN, &response)
    }

    /// POST `/register`
    /// Body: `{ "username": "...", "email": "...", "password": "..." }`
    ///
    /// A 409 reply surfaces as `ApiError::Status { status: 409, .. }`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        info!("POST /{REGISTER} for {}", request.email);
        let response = self.post_json(REGISTER, request, None).await?;
        expect_success(REGISTER, &response)
    }

    /// GET `/users`
    pub async fn list_users(&self, token: &str) -> ApiResult<Vec<UserRecord>> {
        let response = self
            .client
            .get(self.config.endpoint(USERS))
            .bearer(token)
            .send()
            .await
            .map_err(|source| transport(USERS, source))?;

        expect_success(USERS, &response)?;
        decode(USERS, &response)
    }

    /// POST to one of the bulk endpoints (`users/block`, `users/unblock`,
    /// `users/delete`).
    /// Body: `{ "ids": [..] }`
    ///
    /// The backend may answer with an empty body or with `{ "message": ".." }`;
    /// both count as success when the status is 2xx.
    pub async fn post_ids(
        &self,
        endpoint: &'static str,
        token: &str,
        ids: &[i64],
    ) -> ApiResult<ActionReply> {
        let body = IdsRequest { ids: ids.to_vec() };
        let response = self.post_json(endpoint, &body, Some(token)).await?;
        expect_success(endpoint, &response)?;
        Ok(response.json().unwrap_or_default())
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &'static str,
        body: &T,
        token: Option<&str>,
    ) -> ApiResult<Response> {
        let mut request = self.client.post(self.config.endpoint(endpoint));
        if let Some(token) = token {
            request = request.bearer(token);
        }

        request
            .json(body)
            .map_err(|source| ApiError::Encode { endpoint, source })?
            .send()
            .await
            .map_err(|source| transport(endpoint, source))
    }
}

fn transport(endpoint: &'static str, source: HttpError) -> ApiError {
    error!("request to /{endpoint} failed: {source}");
    ApiError::Transport { endpoint, source }
}

fn expect_success(endpoint: &'static str, response: &Response) -> ApiResult<()> {
    if response.is_success() {
        Ok(())
    } else {
        error!("/{endpoint} returned status {}", response.status);
        Err(ApiError::Status {
            endpoint,
            status: response.status,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &'static str,
    response: &Response,
) -> ApiResult<T> {
    response.json().map_err(|source| {
        error!("/{endpoint} sent an unexpected body: {source}");
        ApiError::Malformed { endpoint, source }
    })
}
