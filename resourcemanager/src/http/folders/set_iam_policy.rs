use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::iam::Policy;
use crate::http::Escape;

/// Request message for `folders.setIamPolicy`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    /// Required. The folder number, e.g. `1234567`, without the `folders/` prefix.
    #[serde(skip_serializing)]
    pub folder: String,
    /// REQUIRED: The complete policy to be applied to the folder.
    pub policy: Policy,
    /// OPTIONAL: A FieldMask specifying which fields of the policy to modify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &SetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/v2/folders/{}:setIamPolicy", base_url, req.folder.escape());
    client.post(url).json(&req)
}
