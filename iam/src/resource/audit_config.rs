use std::sync::Arc;

use google_cloud_lock::MutexKV;
use google_cloud_resourcemanager::http::iam::{AuditConfig, AuditLogConfig};

use crate::access::PolicyAccess;
use crate::error::Error;
use crate::merge::merge_audit_configs;
use crate::resource::split_scope;
use crate::scope::Scope;

/// One service's audit logging configuration on one scope.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct IamAuditConfig {
    pub scope: Scope,
    /// `allServices` or a specific service such as `storage.googleapis.com`.
    pub service: String,
    pub audit_log_configs: Vec<AuditLogConfig>,
}

impl IamAuditConfig {
    /// The import/state identifier, `<scope>/<service>`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.scope, self.service)
    }

    /// Parses `<scope>/<service>`; service names never contain a slash.
    pub fn from_id(id: &str) -> Result<Self, Error> {
        let (scope, service) = split_scope(id)?;
        if service.contains('/') {
            return Err(Error::InvalidId(id.to_string()));
        }
        Ok(Self {
            scope,
            service: service.to_string(),
            audit_log_configs: Vec::new(),
        })
    }

    fn fragment(&self) -> AuditConfig {
        AuditConfig {
            service: self.service.clone(),
            audit_log_configs: self.audit_log_configs.clone(),
        }
    }

    fn mutex_key(&self) -> String {
        format!("iam-{}-{}", self.scope, self.service)
    }
}

/// Create/Read/Update/Delete/Import for the audit-config resource.
pub struct IamAuditConfigHandler<S> {
    store: S,
    locks: Arc<MutexKV>,
}

impl<S: PolicyAccess> IamAuditConfigHandler<S> {
    pub fn new(store: S, locks: Arc<MutexKV>) -> Self {
        Self { store, locks }
    }

    /// Merges the declared log configs into the service's audit config and
    /// confirms with a read.
    pub async fn create(&self, desired: &IamAuditConfig) -> Result<Option<IamAuditConfig>, Error> {
        {
            let _guard = self.locks.lock(&desired.mutex_key()).await;
            let remote = self
                .store
                .get_iam_policy(&desired.scope)
                .await
                .map_err(|e| e.with_target(&desired.service))?;
            let existing = remote.audit_configs.clone().unwrap_or_default();
            let mut updated = remote.clone();
            updated.audit_configs = Some(merge_audit_configs(&existing, &[desired.fragment()]));
            self.store
                .set_iam_policy(&desired.scope, &updated)
                .await
                .map_err(|e| e.with_target(&desired.service))?;
        }
        self.read(desired).await
    }

    /// Projects the service's remote audit config into the declared one; an
    /// absent service (or scope) returns `None`.
    pub async fn read(&self, declared: &IamAuditConfig) -> Result<Option<IamAuditConfig>, Error> {
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.with_target(&declared.service)),
        };
        let configs = merge_audit_configs(&remote.audit_configs.unwrap_or_default(), &[]);
        Ok(configs
            .into_iter()
            .find(|c| c.service == declared.service)
            .map(|c| IamAuditConfig {
                scope: declared.scope.clone(),
                service: c.service,
                audit_log_configs: c.audit_log_configs,
            }))
    }

    /// Replaces the service's audit config wholesale; other services stay untouched.
    pub async fn update(&self, desired: &IamAuditConfig) -> Result<Option<IamAuditConfig>, Error> {
        {
            let _guard = self.locks.lock(&desired.mutex_key()).await;
            let remote = self
                .store
                .get_iam_policy(&desired.scope)
                .await
                .map_err(|e| e.with_target(&desired.service))?;
            let existing = remote.audit_configs.clone().unwrap_or_default();
            let kept: Vec<AuditConfig> = existing.iter().filter(|c| c.service != desired.service).cloned().collect();
            let mut updated = remote.clone();
            updated.audit_configs = Some(merge_audit_configs(&kept, &[desired.fragment()]));
            self.store
                .set_iam_policy(&desired.scope, &updated)
                .await
                .map_err(|e| e.with_target(&desired.service))?;
        }
        self.read(desired).await
    }

    /// Removes the service's audit config. An already-absent service (or
    /// scope) deletes successfully without a write.
    pub async fn delete(&self, declared: &IamAuditConfig) -> Result<(), Error> {
        let _guard = self.locks.lock(&declared.mutex_key()).await;
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.with_target(&declared.service)),
        };
        let existing = remote.audit_configs.clone().unwrap_or_default();
        if !existing.iter().any(|c| c.service == declared.service) {
            return Ok(());
        }
        let remaining: Vec<AuditConfig> = existing.iter().filter(|c| c.service != declared.service).cloned().collect();
        let mut updated = remote.clone();
        updated.audit_configs = if remaining.is_empty() {
            None
        } else {
            Some(merge_audit_configs(&remaining, &[]))
        };
        self.store
            .set_iam_policy(&declared.scope, &updated)
            .await
            .map_err(|e| e.with_target(&declared.service))?;
        Ok(())
    }

    /// Re-derives the declared fragment from `id` and reads it.
    pub async fn import(&self, id: &str) -> Result<Option<IamAuditConfig>, Error> {
        let declared = IamAuditConfig::from_id(id)?;
        self.read(&declared).await
    }
}
