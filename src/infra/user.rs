use reqwest::{Client, Url};
use serde::Serialize;

use super::http::{build_client, handle_response, parse_base_url, ServiceError};
use crate::config::Config;
use crate::domain::UserProfile;

#[derive(Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Client for the user-profile microservice.
#[derive(Clone)]
pub struct UserClient {
    http: Client,
    base_url: Url,
}

impl UserClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_client(config.request_timeout)?,
            base_url: parse_base_url(&config.user_url)?,
        })
    }

    pub async fn get_profile(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<UserProfile, ServiceError> {
        let url = self.profile_url(user_id)?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        handle_response(response).await
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
        token: &str,
    ) -> Result<UserProfile, ServiceError> {
        let url = self.profile_url(user_id)?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        handle_response(response).await
    }

    fn profile_url(&self, user_id: &str) -> Result<Url, ServiceError> {
        let mut url = self.base_url.join("user/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(user_id);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_escapes_user_id() {
        let client = UserClient::new(&Config::default()).unwrap();
        assert_eq!(
            client.profile_url("u-1").unwrap().as_str(),
            "http://localhost:3002/user/u-1"
        );
        assert_eq!(
            client.profile_url("a/b").unwrap().as_str(),
            "http://localhost:3002/user/a%2Fb"
        );
    }

    #[test]
    fn update_skips_empty_fields() {
        let body = serde_json::to_string(&ProfileUpdate::default()).unwrap();
        assert_eq!(body, "{}");
    }
}
