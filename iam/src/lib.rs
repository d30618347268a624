//! # google-cloud-iam
//!
//! Google Cloud Platform IAM policy resource library.
//!
//! Declarative create/read/update/delete/import handlers for project, folder
//! and organization IAM policies, role bindings, single members and audit
//! configs. Every mutation runs the same cycle: acquire the named lock for
//! the target, fetch the remote policy fresh, merge the declared fragment in
//! memory, and write the result back carrying the etag of that read, so the
//! service detects anything that changed underneath.
//!
//! Handlers are generic over [`access::PolicyAccess`], the narrow fetch/replace
//! capability, implemented for `gcloud-resourcemanager`'s client. The named
//! locks come from `gcloud-lock`; one registry is created at startup and
//! shared by every handler so unrelated resources that target the same role
//! serialize instead of losing each other's writes.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use google_cloud_iam::resource::{IamMember, IamMemberHandler};
//! use google_cloud_iam::scope::Scope;
//! use google_cloud_lock::MutexKV;
//! use google_cloud_resourcemanager::client::{Client, ClientConfig};
//!
//! async fn run() {
//!     let config = ClientConfig::default().with_auth().await.unwrap();
//!     let handler = IamMemberHandler::new(Client::new(config), Arc::new(MutexKV::new()));
//!
//!     let desired = IamMember {
//!         scope: Scope::project("my-project"),
//!         role: "roles/viewer".to_string(),
//!         member: "user:alice@example.com".to_string(),
//!     };
//!     let state = handler.create(&desired).await.unwrap();
//! }
//! ```
pub mod access;
pub mod error;
pub mod merge;
pub mod resource;
pub mod scope;
