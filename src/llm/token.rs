use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Supplies the bearer token for a Vertex AI request. Asked once per call.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// A fixed token, e.g. the output of `gcloud auth print-access-token`.
/// Never refreshed, so it stops working once it expires.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Application Default Credentials: the metadata server on Cloud Run or GCE,
/// `GOOGLE_APPLICATION_CREDENTIALS`, or the gcloud user login.
///
/// `gcp_auth` caches the token and refreshes it shortly before expiry.
pub struct DefaultCredentials {
    provider: Arc<dyn gcp_auth::TokenProvider>,
}

impl DefaultCredentials {
    pub async fn discover() -> Result<Self> {
        let provider = gcp_auth::provider().await?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl TokenSource for DefaultCredentials {
    async fn token(&self) -> Result<String> {
        let token = self.provider.token(&[CLOUD_PLATFORM_SCOPE]).await?;
        Ok(token.as_str().to_string())
    }
}
