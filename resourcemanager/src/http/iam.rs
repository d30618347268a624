/// An Identity and Access Management (IAM) policy, which specifies access
/// controls for Google Cloud resources.
///
/// A `Policy` is a collection of `bindings`. A `binding` binds one or more
/// `members`, or principals, to a single `role`.
///
/// **JSON example:**
///
///     {
///       "bindings": [
///         {
///           "role": "roles/resourcemanager.organizationAdmin",
///           "members": [
///             "user:mike@example.com",
///             "group:admins@example.com",
///             "serviceAccount:my-project-id@appspot.gserviceaccount.com"
///           ]
///         }
///       ],
///       "etag": "BwWWja0YfJA=",
///       "version": 1
///     }
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Specifies the format of the policy. Valid values are `0`, `1`, and `3`.
    #[serde(default)]
    pub version: i32,
    /// Associates a list of `members`, or principals, with a `role`.
    /// A policy carries at most one binding per role.
    ///
    /// The service omits the field for an empty policy; an empty list is
    /// always serialized on write since writing `[]` revokes every binding.
    #[serde(default)]
    pub bindings: Vec<Binding>,
    /// Specifies cloud audit logging configuration for this policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_configs: Option<Vec<AuditConfig>>,
    /// `etag` is used for optimistic concurrency control as a way to prevent
    /// simultaneous updates of a policy from overwriting each other. The value
    /// is opaque: it is compared by the service, never interpreted locally,
    /// and a `setIamPolicy` call must echo the etag of the policy read it is
    /// based on or the write is rejected.
    #[serde(default)]
    pub etag: String,
}

/// Associates `members`, or principals, with a `role`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Role that is assigned to the list of `members`.
    /// For example, `roles/viewer`, `roles/editor`, or `roles/owner`.
    pub role: String,
    /// The principals requesting access for a Google Cloud resource, e.g.
    /// `user:{emailid}`, `serviceAccount:{emailid}`, `group:{emailid}`,
    /// `domain:{domain}`, `allUsers` or `allAuthenticatedUsers`.
    ///
    /// Order is irrelevant; the set is deduplicated.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Specifies the audit configuration for a service.
///
/// An `AuditConfig` must have one or more `AuditLogConfigs`. `service` is
/// `allServices` or a specific service name such as `storage.googleapis.com`;
/// a policy carries at most one `AuditConfig` per service.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuditConfig {
    /// Specifies a service that will be enabled for audit logging.
    pub service: String,
    /// The configuration for logging of each type of permission.
    #[serde(default)]
    pub audit_log_configs: Vec<AuditLogConfig>,
}

/// Provides the configuration for logging a type of permissions.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogConfig {
    /// The log type that this config enables: `ADMIN_READ`, `DATA_WRITE` or `DATA_READ`.
    pub log_type: String,
    /// Specifies the identities that do not cause logging for this type of permission.
    /// Follows the same format of `Binding.members`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exempted_members: Vec<String>,
}

/// Encapsulates settings provided to `getIamPolicy`.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetPolicyOptions {
    /// Optional. The maximum policy version that will be used to format the policy.
    /// Valid values are 0, 1, and 3.
    pub requested_policy_version: Option<i32>,
}

#[cfg(test)]
mod tests {
    use crate::http::iam::Policy;

    #[test]
    fn test_deserialize_empty_policy() {
        // the service omits bindings and audit configs when nothing is granted
        let policy: Policy = serde_json::from_str(r#"{"version":1,"etag":"BwWW="}"#).unwrap();
        assert_eq!(policy.version, 1);
        assert_eq!(policy.etag, "BwWW=");
        assert!(policy.bindings.is_empty());
        assert!(policy.audit_configs.is_none());
    }

    #[test]
    fn test_serialize_cleared_bindings() {
        let policy = Policy {
            version: 1,
            etag: "BwWW=".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&policy).unwrap();
        // an explicit empty list must go on the wire, and absent audit configs must not
        assert_eq!(body["bindings"], serde_json::json!([]));
        assert!(body.get("auditConfigs").is_none());
    }
}
