use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::iam::Policy;
use crate::http::Escape;

/// Request message for `projects.setIamPolicy`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    /// Required. The project id, e.g. `my-project`, without the `projects/` prefix.
    #[serde(skip_serializing)]
    pub project_id: String,
    /// REQUIRED: The complete policy to be applied to the project. The policy must
    /// carry the etag of the policy it was derived from or the write is rejected.
    pub policy: Policy,
    /// OPTIONAL: A FieldMask specifying which fields of the policy to modify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &SetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/v1/projects/{}:setIamPolicy", base_url, req.project_id.escape());
    client.post(url).json(&req)
}
