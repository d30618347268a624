use std::collections::{BTreeMap, BTreeSet};

use google_cloud_resourcemanager::http::iam::{AuditConfig, AuditLogConfig, Binding};

/// Combines the bindings fetched from a remote policy with locally declared
/// fragments.
///
/// Existing entries are folded in first so remote members are never lost; a
/// fragment naming a role that already exists unions its members into that
/// role. Duplicate-role entries in the input (legacy or out-of-band edits) are
/// tolerated and collapse into one. The output carries one binding per role
/// with roles and members sorted, so the same logical set serializes
/// identically on every run. A role whose member set ends up empty is dropped:
/// the service does not round-trip empty bindings.
pub fn merge_bindings(existing: &[Binding], additions: &[Binding]) -> Vec<Binding> {
    let mut roles: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for binding in existing.iter().chain(additions) {
        roles
            .entry(binding.role.clone())
            .or_default()
            .extend(binding.members.iter().cloned());
    }
    roles
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(role, members)| Binding {
            role,
            members: members.into_iter().collect(),
        })
        .collect()
}

/// Replaces the binding for `binding.role` wholesale, leaving every other role
/// untouched. An empty member list removes the role.
pub fn set_binding(existing: &[Binding], binding: &Binding) -> Vec<Binding> {
    let kept: Vec<Binding> = existing.iter().filter(|b| b.role != binding.role).cloned().collect();
    merge_bindings(&kept, std::slice::from_ref(binding))
}

/// Removes `role` entirely. Removing an absent role is a no-op.
pub fn remove_binding(existing: &[Binding], role: &str) -> Vec<Binding> {
    let kept: Vec<Binding> = existing.iter().filter(|b| b.role != role).cloned().collect();
    merge_bindings(&kept, &[])
}

/// Removes exactly `member` from `role`, leaving every other member of the
/// role and every other role untouched. The binding is dropped once its last
/// member is removed.
pub fn remove_member(existing: &[Binding], role: &str, member: &str) -> Vec<Binding> {
    let mut merged = merge_bindings(existing, &[]);
    for binding in &mut merged {
        if binding.role == role {
            binding.members.retain(|m| m != member);
        }
    }
    merged.retain(|binding| !binding.members.is_empty());
    merged
}

/// Combines audit configs the way [`merge_bindings`] combines bindings, one
/// level deeper: configs are keyed by service, their log configs by log type,
/// and exemption lists are unioned. A log type without exemptions is kept,
/// unlike an empty binding, since it still enables that log type.
pub fn merge_audit_configs(existing: &[AuditConfig], additions: &[AuditConfig]) -> Vec<AuditConfig> {
    let mut services: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for config in existing.iter().chain(additions) {
        let log_configs = services.entry(config.service.clone()).or_default();
        for log_config in &config.audit_log_configs {
            log_configs
                .entry(log_config.log_type.clone())
                .or_default()
                .extend(log_config.exempted_members.iter().cloned());
        }
    }
    services
        .into_iter()
        .map(|(service, log_configs)| AuditConfig {
            service,
            audit_log_configs: log_configs
                .into_iter()
                .map(|(log_type, exempted_members)| AuditLogConfig {
                    log_type,
                    exempted_members: exempted_members.into_iter().collect(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use google_cloud_resourcemanager::http::iam::{AuditConfig, AuditLogConfig, Binding};

    use crate::merge::{merge_audit_configs, merge_bindings, remove_binding, remove_member, set_binding};

    fn binding(role: &str, members: &[&str]) -> Binding {
        Binding {
            role: role.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_merge_unions_without_clobbering() {
        let existing = vec![binding("roles/viewer", &["user:a@x.com", "user:b@x.com"])];
        let additions = vec![binding("roles/viewer", &["user:c@x.com"])];

        let merged = merge_bindings(&existing, &additions);
        assert_eq!(
            merged,
            vec![binding("roles/viewer", &["user:a@x.com", "user:b@x.com", "user:c@x.com"])]
        );
    }

    #[test]
    fn test_merge_collapses_duplicate_roles() {
        // out-of-band edits can leave more than one entry per role
        let existing = vec![
            binding("roles/editor", &["user:a@x.com"]),
            binding("roles/editor", &["user:b@x.com"]),
        ];
        let additions = vec![binding("roles/editor", &["user:a@x.com"])];

        let merged = merge_bindings(&existing, &additions);
        assert_eq!(merged, vec![binding("roles/editor", &["user:a@x.com", "user:b@x.com"])]);
    }

    #[test]
    fn test_merge_adds_new_roles_and_sorts() {
        let existing = vec![binding("roles/viewer", &["user:b@x.com", "user:a@x.com"])];
        let additions = vec![binding("roles/editor", &["user:c@x.com"])];

        let merged = merge_bindings(&existing, &additions);
        assert_eq!(
            merged,
            vec![
                binding("roles/editor", &["user:c@x.com"]),
                binding("roles/viewer", &["user:a@x.com", "user:b@x.com"]),
            ]
        );
    }

    #[test]
    fn test_merge_is_deterministic_across_input_orderings() {
        let a = vec![
            binding("roles/viewer", &["user:b@x.com", "user:a@x.com"]),
            binding("roles/editor", &["user:c@x.com"]),
        ];
        let b = vec![
            binding("roles/editor", &["user:c@x.com"]),
            binding("roles/viewer", &["user:a@x.com", "user:b@x.com"]),
        ];
        assert_eq!(merge_bindings(&a, &[]), merge_bindings(&b, &[]));
    }

    #[test]
    fn test_set_binding_replaces_one_role() {
        let existing = vec![
            binding("roles/viewer", &["user:a@x.com", "user:b@x.com"]),
            binding("roles/editor", &["user:c@x.com"]),
        ];
        let replaced = set_binding(&existing, &binding("roles/viewer", &["user:d@x.com"]));
        assert_eq!(
            replaced,
            vec![
                binding("roles/editor", &["user:c@x.com"]),
                binding("roles/viewer", &["user:d@x.com"]),
            ]
        );
    }

    #[test]
    fn test_remove_binding_is_idempotent() {
        let existing = vec![binding("roles/viewer", &["user:a@x.com"])];
        let removed = remove_binding(&existing, "roles/editor");
        assert_eq!(removed, existing);
        assert!(remove_binding(&removed, "roles/viewer").is_empty());
    }

    #[test]
    fn test_remove_member_is_precise() {
        let existing = vec![
            binding("roles/viewer", &["user:a@x.com", "user:b@x.com"]),
            binding("roles/editor", &["user:a@x.com"]),
        ];
        let removed = remove_member(&existing, "roles/viewer", "user:a@x.com");
        assert_eq!(
            removed,
            vec![
                binding("roles/editor", &["user:a@x.com"]),
                binding("roles/viewer", &["user:b@x.com"]),
            ]
        );
    }

    #[test]
    fn test_remove_last_member_drops_binding() {
        let existing = vec![binding("roles/viewer", &["user:a@x.com"])];
        assert!(remove_member(&existing, "roles/viewer", "user:a@x.com").is_empty());
    }

    #[test]
    fn test_merge_audit_configs_unions_per_service_and_log_type() {
        let existing = vec![AuditConfig {
            service: "storage.googleapis.com".to_string(),
            audit_log_configs: vec![AuditLogConfig {
                log_type: "DATA_READ".to_string(),
                exempted_members: vec!["user:a@x.com".to_string()],
            }],
        }];
        let additions = vec![AuditConfig {
            service: "storage.googleapis.com".to_string(),
            audit_log_configs: vec![
                AuditLogConfig {
                    log_type: "DATA_READ".to_string(),
                    exempted_members: vec!["user:b@x.com".to_string()],
                },
                AuditLogConfig {
                    log_type: "ADMIN_READ".to_string(),
                    exempted_members: vec![],
                },
            ],
        }];

        let merged = merge_audit_configs(&existing, &additions);
        assert_eq!(
            merged,
            vec![AuditConfig {
                service: "storage.googleapis.com".to_string(),
                audit_log_configs: vec![
                    AuditLogConfig {
                        log_type: "ADMIN_READ".to_string(),
                        exempted_members: vec![],
                    },
                    AuditLogConfig {
                        log_type: "DATA_READ".to_string(),
                        exempted_members: vec!["user:a@x.com".to_string(), "user:b@x.com".to_string()],
                    },
                ],
            }]
        );
    }
}
