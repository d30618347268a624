//! # google-cloud-resourcemanager
//!
//! Google Cloud Platform Resource Manager IAM Client library.
//!
//! * [About Resource Manager](https://cloud.google.com/resource-manager/)
//! * [IAM policy reference](https://cloud.google.com/iam/docs/reference/rest/v1/Policy)
//!
//! ## Quick Start
//!
//! ### Authentication
//!
//! The function `with_auth()` will try and read the credentials from a file specified in the
//! environment variable `GOOGLE_APPLICATION_CREDENTIALS`, `GOOGLE_APPLICATION_CREDENTIALS_JSON` or
//! from a metadata server.
//!
//! ```
//! use google_cloud_resourcemanager::client::{Client, ClientConfig};
//!
//! async fn run() {
//!     let config = ClientConfig::default().with_auth().await.unwrap();
//!     let client = Client::new(config);
//! }
//! ```
//!
//! ### Usage
//!
//! The client exposes the per-scope `getIamPolicy` / `setIamPolicy` operations of the
//! Cloud Resource Manager API for projects, folders and organizations.
//!
//! ```
//! use google_cloud_resourcemanager::client::Client;
//! use google_cloud_resourcemanager::http::projects::get_iam_policy::GetIamPolicyRequest;
//!
//! async fn run(client: Client) {
//!     let policy = client
//!         .get_project_iam_policy(&GetIamPolicyRequest {
//!             project_id: "my-project".to_string(),
//!             ..Default::default()
//!         })
//!         .await;
//! }
//! ```
pub mod client;
pub mod http;
