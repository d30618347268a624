use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::iam::GetPolicyOptions;
use crate::http::Escape;

/// Request message for `projects.getIamPolicy`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetIamPolicyRequest {
    /// Required. The project id, e.g. `my-project`, without the `projects/` prefix.
    #[serde(skip_serializing)]
    pub project_id: String,
    /// OPTIONAL: A GetPolicyOptions object for specifying options to `getIamPolicy`.
    pub options: Option<GetPolicyOptions>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/v1/projects/{}:getIamPolicy", base_url, req.project_id.escape());
    client.post(url).json(&req)
}
