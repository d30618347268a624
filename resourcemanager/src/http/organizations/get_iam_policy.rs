use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::iam::GetPolicyOptions;
use crate::http::Escape;

/// Request message for `organizations.getIamPolicy`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetIamPolicyRequest {
    /// Required. The organization number, e.g. `1234567`, without the `organizations/` prefix.
    #[serde(skip_serializing)]
    pub organization: String,
    /// OPTIONAL: A GetPolicyOptions object for specifying options to `getIamPolicy`.
    pub options: Option<GetPolicyOptions>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/v1/organizations/{}:getIamPolicy", base_url, req.organization.escape());
    client.post(url).json(&req)
}
