//! Access-token supply for the calendar API.
//!
//! Credential acquisition (service accounts, OAuth refresh) is out of scope
//! here; the gateway only needs a bearer token at request time.

use async_trait::async_trait;
use frontdesk_domain::Result;

/// Supplies a bearer token for calendar API requests.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, for deployments where token refresh happens out of process
/// and for tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
