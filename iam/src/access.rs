use std::sync::Arc;

use async_trait::async_trait;

use google_cloud_resourcemanager::client::Client;
use google_cloud_resourcemanager::http::iam::Policy;
use google_cloud_resourcemanager::http::{folders, organizations, projects};

use crate::error::Error;
use crate::scope::Scope;

/// The transport capability the resource handlers need: fetch and replace one
/// scope's policy. Nothing else of the Resource Manager surface leaks in, so
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait PolicyAccess: Send + Sync {
    /// Fetches the current policy of `scope`. Every read-modify-write cycle
    /// reads fresh; policies are never cached across operations.
    async fn get_iam_policy(&self, scope: &Scope) -> Result<Policy, Error>;

    /// Replaces the policy of `scope`. The policy must carry the etag of the
    /// read it was derived from; the service rejects a stale etag. Returns the
    /// stored policy with its renewed etag.
    async fn set_iam_policy(&self, scope: &Scope, policy: &Policy) -> Result<Policy, Error>;
}

#[async_trait]
impl<T: PolicyAccess + ?Sized> PolicyAccess for Arc<T> {
    async fn get_iam_policy(&self, scope: &Scope) -> Result<Policy, Error> {
        (**self).get_iam_policy(scope).await
    }

    async fn set_iam_policy(&self, scope: &Scope, policy: &Policy) -> Result<Policy, Error> {
        (**self).set_iam_policy(scope, policy).await
    }
}

#[async_trait]
impl PolicyAccess for Client {
    async fn get_iam_policy(&self, scope: &Scope) -> Result<Policy, Error> {
        let result = match scope {
            Scope::Project(id) => {
                self.get_project_iam_policy(&projects::get_iam_policy::GetIamPolicyRequest {
                    project_id: id.clone(),
                    options: None,
                })
                .await
            }
            Scope::Folder(id) => {
                self.get_folder_iam_policy(&folders::get_iam_policy::GetIamPolicyRequest {
                    folder: id.clone(),
                    options: None,
                })
                .await
            }
            Scope::Organization(id) => {
                self.get_organization_iam_policy(&organizations::get_iam_policy::GetIamPolicyRequest {
                    organization: id.clone(),
                    options: None,
                })
                .await
            }
        };
        result.map_err(|source| Error::policy(scope, source))
    }

    async fn set_iam_policy(&self, scope: &Scope, policy: &Policy) -> Result<Policy, Error> {
        let result = match scope {
            Scope::Project(id) => {
                self.set_project_iam_policy(&projects::set_iam_policy::SetIamPolicyRequest {
                    project_id: id.clone(),
                    policy: policy.clone(),
                    update_mask: None,
                })
                .await
            }
            Scope::Folder(id) => {
                self.set_folder_iam_policy(&folders::set_iam_policy::SetIamPolicyRequest {
                    folder: id.clone(),
                    policy: policy.clone(),
                    update_mask: None,
                })
                .await
            }
            Scope::Organization(id) => {
                self.set_organization_iam_policy(&organizations::set_iam_policy::SetIamPolicyRequest {
                    organization: id.clone(),
                    policy: policy.clone(),
                    update_mask: None,
                })
                .await
            }
        };
        result.map_err(|source| Error::policy(scope, source))
    }
}
