//! Client for the auth microservice, plus the startup session check.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::http::{build_client, handle_response, parse_base_url, ServiceError};
use super::user::UserClient;
use crate::config::Config;
use crate::domain::{AuthSession, User};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    #[serde(default)]
    pub session: Option<SessionTokens>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

impl From<AuthUser> for User {
    fn from(value: AuthUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
            full_name: None,
            updated_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    user: Option<AuthUser>,
}

#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            base_url: parse_base_url(&config.auth_url)?,
        })
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ServiceError> {
        self.post_credentials("auth/register", email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ServiceError> {
        self.post_credentials("auth/login", email, password).await
    }

    /// Resolves the user behind a bearer token. `None` when the service
    /// answers without a user.
    pub async fn me(&self, token: &str) -> Result<Option<AuthUser>, ServiceError> {
        let url = self.base_url.join("auth/me")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body: MeResponse = handle_response(response).await?;
        Ok(body.user)
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ServiceError> {
        let url = self.base_url.join(path)?;
        tracing::debug!("POST {url}");
        let response = self
            .http
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        handle_response(response).await
    }
}

/// Completes the session's initialising state: one `me` check for the
/// stored token, then a best-effort profile merge. Any failure of the `me`
/// check leaves the session anonymous and drops the stored token.
pub async fn restore_session(session: &mut AuthSession, auth: &AuthClient, users: &UserClient) {
    let Some(token) = session.stored_token() else {
        session.finish_restore(None);
        return;
    };

    let auth_user = match auth.me(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("auth service returned no user for stored token");
            session.finish_restore(None);
            return;
        }
        Err(err) if err.is_unauthorized() => {
            tracing::info!("stored session expired: {err}");
            session.finish_restore(None);
            return;
        }
        Err(err) => {
            tracing::warn!("could not verify stored session: {err}");
            session.finish_restore(None);
            return;
        }
    };

    let user = match users.get_profile(&auth_user.id, &token).await {
        Ok(profile) => User::from(auth_user).merge_profile(profile),
        Err(err) => {
            tracing::warn!("profile not found, using auth data only: {err}");
            User::from(auth_user)
        }
    };

    session.finish_restore(Some((token, user)));
}
