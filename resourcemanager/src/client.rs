use std::ops::Deref;

use token_source::{NoopTokenSourceProvider, TokenSourceProvider};

use crate::http::resource_manager_client::ResourceManagerClient;

#[derive(Debug)]
pub struct ClientConfig {
    pub http: reqwest::Client,
    pub endpoint: String,
    pub token_source_provider: Box<dyn TokenSourceProvider>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: reqwest::Client::default(),
            endpoint: "https://cloudresourcemanager.googleapis.com".to_string(),
            token_source_provider: Box::new(NoopTokenSourceProvider {}),
        }
    }
}

#[cfg(feature = "auth")]
pub use google_cloud_auth;

#[cfg(feature = "auth")]
impl ClientConfig {
    pub async fn with_auth(self) -> Result<Self, google_cloud_auth::error::Error> {
        let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new(Self::auth_config()).await?;
        Ok(self.with_token_source(ts).await)
    }

    pub async fn with_credentials(
        self,
        credentials: google_cloud_auth::credentials::CredentialsFile,
    ) -> Result<Self, google_cloud_auth::error::Error> {
        let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new_with_credentials(
            Self::auth_config(),
            Box::new(credentials),
        )
        .await?;
        Ok(self.with_token_source(ts).await)
    }

    async fn with_token_source(mut self, ts: google_cloud_auth::token::DefaultTokenSourceProvider) -> Self {
        self.token_source_provider = Box::new(ts);
        self
    }

    fn auth_config() -> google_cloud_auth::project::Config<'static> {
        google_cloud_auth::project::Config::default()
            .with_scopes(&crate::http::resource_manager_client::SCOPES)
    }
}

pub struct Client {
    resource_manager_client: ResourceManagerClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    /// New client.
    pub fn new(config: ClientConfig) -> Self {
        let ts = config.token_source_provider.token_source();
        let http = reqwest_middleware::ClientBuilder::new(config.http).build();
        Self {
            resource_manager_client: ResourceManagerClient::new(ts, config.endpoint.as_str(), http),
        }
    }
}

impl Deref for Client {
    type Target = ResourceManagerClient;

    fn deref(&self) -> &Self::Target {
        &self.resource_manager_client
    }
}
