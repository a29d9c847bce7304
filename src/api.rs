// API client module: a small blocking HTTP client for the two Slack Web
// API methods this tool needs, `users.profile.get` and `users.profile.set`.
// The `ProfileApi` trait is the seam the rest of the crate talks to, so the
// status logic can be exercised without a network.

use crate::error::AppError;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://slack.com/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const PROFILE_GET: &str = "users.profile.get";
const PROFILE_SET: &str = "users.profile.set";

/// The caller's profile as returned by `users.profile.get`. Slack sends a
/// lot more; only the status related fields are kept.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub display_name: String,
    pub real_name: String,
    pub status_text: String,
    pub status_emoji: String,
    pub status_expiration: i64,
}

impl Profile {
    /// Name shown in the header: display name, or the real name when the
    /// user never set one.
    pub fn user_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.real_name
        } else {
            &self.display_name
        }
    }
}

/// Status fields written by `users.profile.set`. An expiration of `0`
/// means the status never clears on its own.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub status_text: String,
    pub status_emoji: String,
    pub status_expiration: i64,
}

/// Remote profile operations.
pub trait ProfileApi {
    fn get_profile(&self) -> Result<Profile, AppError>;
    fn set_profile(&self, update: &ProfileUpdate) -> Result<(), AppError>;
}

/// Slack Web API client holding a reqwest blocking client, the base URL
/// and the user token every call is authorized with.
#[derive(Clone)]
pub struct SlackClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct ProfileGetResponse {
    ok: bool,
    error: Option<String>,
    profile: Option<Profile>,
}

#[derive(Deserialize)]
struct ProfileSetResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Serialize)]
struct ProfileSetRequest<'a> {
    profile: &'a ProfileUpdate,
}

impl SlackClient {
    /// Create a client for `base_url` (without trailing slash).
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SlackClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Create a client against `SLACK_API_URL`, or the public Slack API
    /// when the variable is unset.
    pub fn from_env(token: &str) -> Result<Self> {
        let base_url = std::env::var("SLACK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        SlackClient::new(token, &base_url)
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Send the request and decode the JSON body. Slack reports most
    /// failures as HTTP 200 with `ok: false`, which the callers check.
    fn call<T: DeserializeOwned>(&self, method: &'static str, req: RequestBuilder) -> Result<T, AppError> {
        log::debug!("calling {method}");
        let res = req
            .bearer_auth(&self.token)
            .send()
            .map_err(|source| AppError::Http { method, source })?;
        if !res.status().is_success() {
            return Err(AppError::HttpStatus {
                method,
                status: res.status(),
            });
        }
        res.json().map_err(|source| AppError::Http { method, source })
    }
}

fn api_error(method: &'static str, error: Option<String>) -> AppError {
    AppError::Api {
        method,
        code: error.unwrap_or_else(|| "unknown_error".into()),
    }
}

impl ProfileApi for SlackClient {
    fn get_profile(&self) -> Result<Profile, AppError> {
        let req = self.client.get(self.url(PROFILE_GET));
        let resp: ProfileGetResponse = self.call(PROFILE_GET, req)?;
        if !resp.ok {
            return Err(api_error(PROFILE_GET, resp.error));
        }
        Ok(resp.profile.unwrap_or_default())
    }

    fn set_profile(&self, update: &ProfileUpdate) -> Result<(), AppError> {
        let req = self
            .client
            .post(self.url(PROFILE_SET))
            .json(&ProfileSetRequest { profile: update });
        let resp: ProfileSetResponse = self.call(PROFILE_SET, req)?;
        if !resp.ok {
            return Err(api_error(PROFILE_SET, resp.error));
        }
        log::info!(
            "status set to {:?} {} (expiration {})",
            update.status_text,
            update.status_emoji,
            update.status_expiration
        );
        Ok(())
    }
}
