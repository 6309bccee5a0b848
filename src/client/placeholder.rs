use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::directory::models::User;

/// The fixed mock-user endpoint the directory is seeded from.
pub const DEFAULT_USERS_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything that can go wrong fetching the user list. Unreachable host,
/// timeout and non-2xx status all count as Network; a body that isn't a
/// JSON array of users is Parse.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("user endpoint unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed user list payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Stable tag carried in error responses so the page can label the
    /// failure without parsing display strings.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Parse(_) => "parse",
        }
    }
}

/// Client for the remote user source. One GET per call, no retries, no
/// pagination, no caching.
#[derive(Debug, Clone)]
pub struct UserApiClient {
    client: Client,
    endpoint: String,
}

impl UserApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetches the current user list, preserving the order the endpoint
    /// returned it in.
    pub async fn fetch_users(&self) -> Result<Vec<User>, FetchError> {
        let body = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let users = serde_json::from_str(&body)?;
        Ok(users)
    }
}
