use std::sync::Arc;

use reqwest_middleware::RequestBuilder;

use token_source::TokenSource;

use crate::http::iam::Policy;
use crate::http::{check_response_status, folders, organizations, projects, Error};

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/cloud-platform.read-only",
];

#[derive(Debug, Clone)]
pub struct ResourceManagerClient {
    ts: Arc<dyn TokenSource>,
    endpoint: String,
    http: reqwest_middleware::ClientWithMiddleware,
}

impl ResourceManagerClient {
    pub(crate) fn new(
        ts: Arc<dyn TokenSource>,
        endpoint: &str,
        http: reqwest_middleware::ClientWithMiddleware,
    ) -> Self {
        Self {
            ts,
            endpoint: endpoint.to_string(),
            http,
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub(crate) fn http(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http
    }

    /// Gets the IAM access control policy for the project.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_project_iam_policy(
        &self,
        req: &projects::get_iam_policy::GetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = projects::get_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    /// Replaces the IAM access control policy for the project.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn set_project_iam_policy(
        &self,
        req: &projects::set_iam_policy::SetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = projects::set_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    /// Gets the IAM access control policy for the folder.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_folder_iam_policy(
        &self,
        req: &folders::get_iam_policy::GetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = folders::get_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    /// Replaces the IAM access control policy for the folder.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn set_folder_iam_policy(
        &self,
        req: &folders::set_iam_policy::SetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = folders::set_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    /// Gets the IAM access control policy for the organization.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn get_organization_iam_policy(
        &self,
        req: &organizations::get_iam_policy::GetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = organizations::get_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    /// Replaces the IAM access control policy for the organization.
    #[cfg_attr(feature = "trace", tracing::instrument(skip_all))]
    pub async fn set_organization_iam_policy(
        &self,
        req: &organizations::set_iam_policy::SetIamPolicyRequest,
    ) -> Result<Policy, Error> {
        let builder = organizations::set_iam_policy::build(self.endpoint(), self.http(), req);
        self.send(builder).await
    }

    async fn with_headers(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        let token = self.ts.token().await.map_err(Error::TokenSource)?;
        Ok(builder
            .header("X-Goog-Api-Client", "rust")
            .header(reqwest::header::USER_AGENT, "google-cloud-resourcemanager")
            .header(reqwest::header::AUTHORIZATION, token))
    }

    async fn send<T>(&self, builder: RequestBuilder) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let request = self.with_headers(builder).await?;
        let response = request.send().await?;
        let response = check_response_status(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::iam::{GetPolicyOptions, Policy};
    use crate::http::{folders, organizations, projects};

    #[ctor::ctor]
    fn init() {
        let filter = tracing_subscriber::filter::EnvFilter::from_default_env();
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    const ENDPOINT: &str = "https://cloudresourcemanager.googleapis.com";

    fn http() -> reqwest_middleware::ClientWithMiddleware {
        reqwest_middleware::ClientBuilder::new(reqwest::Client::new()).build()
    }

    #[test]
    fn test_build_project_iam_policy_requests() {
        let client = http();
        let get = projects::get_iam_policy::GetIamPolicyRequest {
            project_id: "my-project".to_string(),
            options: Some(GetPolicyOptions {
                requested_policy_version: Some(1),
            }),
        };
        let request = projects::get_iam_policy::build(ENDPOINT, &client, &get).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://cloudresourcemanager.googleapis.com/v1/projects/my-project:getIamPolicy"
        );
        assert_eq!(request.method(), reqwest::Method::POST);

        let set = projects::set_iam_policy::SetIamPolicyRequest {
            project_id: "my-project".to_string(),
            policy: Policy::default(),
            update_mask: None,
        };
        let request = projects::set_iam_policy::build(ENDPOINT, &client, &set).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://cloudresourcemanager.googleapis.com/v1/projects/my-project:setIamPolicy"
        );
    }

    #[test]
    fn test_build_folder_iam_policy_requests() {
        let client = http();
        let get = folders::get_iam_policy::GetIamPolicyRequest {
            folder: "1234567".to_string(),
            options: None,
        };
        let request = folders::get_iam_policy::build(ENDPOINT, &client, &get).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://cloudresourcemanager.googleapis.com/v2/folders/1234567:getIamPolicy"
        );

        let set = folders::set_iam_policy::SetIamPolicyRequest {
            folder: "1234567".to_string(),
            policy: Policy::default(),
            update_mask: None,
        };
        let request = folders::set_iam_policy::build(ENDPOINT, &client, &set).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://cloudresourcemanager.googleapis.com/v2/folders/1234567:setIamPolicy"
        );
    }

    #[test]
    fn test_build_organization_iam_policy_requests() {
        let client = http();
        let get = organizations::get_iam_policy::GetIamPolicyRequest {
            organization: "7654321".to_string(),
            options: None,
        };
        let request = organizations::get_iam_policy::build(ENDPOINT, &client, &get).build().unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://cloudresourcemanager.googleapis.com/v1/organizations/7654321:getIamPolicy"
        );
    }
}
