use std::str::FromStr;
use std::sync::Arc;

use google_cloud_lock::MutexKV;
use google_cloud_resourcemanager::http::iam::{AuditConfig, Binding, Policy};

use crate::access::PolicyAccess;
use crate::error::Error;
use crate::merge::{merge_audit_configs, merge_bindings};
use crate::scope::Scope;

/// The declared authoritative policy for one scope.
///
/// Unlike the binding and member resources this one does not merge: apply
/// replaces the remote policy wholesale.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct IamPolicy {
    pub scope: Scope,
    pub bindings: Vec<Binding>,
    /// Presence-tagged: `None` leaves the remote audit configs untouched,
    /// `Some` replaces them.
    pub audit_configs: Option<Vec<AuditConfig>>,
    /// When `Some(true)`, the policy captured right before the first write is
    /// restored on delete instead of clearing the bindings. Only `true` is
    /// accepted; leave unset for clear-on-delete.
    pub restore_policy: Option<bool>,
}

/// What the host persists between operations: the applied policy plus the
/// optional restore snapshot.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct IamPolicyState {
    pub scope: Scope,
    pub policy: Policy,
    pub restore: Option<Policy>,
}

impl IamPolicy {
    /// The import/state identifier: the canonical scope, e.g. `projects/my-project`.
    pub fn id(&self) -> String {
        self.scope.to_string()
    }

    fn validate(&self) -> Result<(), Error> {
        if self.restore_policy == Some(false) {
            return Err(Error::InvalidInput("restore_policy may only be set to true".to_string()));
        }
        Ok(())
    }
}

fn mutex_key(scope: &Scope) -> String {
    format!("iam-{scope}")
}

/// Create/Read/Update/Delete/Import for the whole-policy resource.
pub struct IamPolicyHandler<S> {
    store: S,
    locks: Arc<MutexKV>,
}

impl<S: PolicyAccess> IamPolicyHandler<S> {
    pub fn new(store: S, locks: Arc<MutexKV>) -> Self {
        Self { store, locks }
    }

    /// Replaces the scope's policy with the declared one, snapshotting the
    /// policy it overwrote when a restore was requested.
    pub async fn create(&self, desired: &IamPolicy) -> Result<IamPolicyState, Error> {
        desired.validate()?;
        let (written, previous) = self.apply(desired).await?;
        Ok(IamPolicyState {
            scope: desired.scope.clone(),
            policy: written,
            restore: desired.restore_policy.map(|_| previous),
        })
    }

    /// The full remote policy, or `None` when the scope is gone.
    pub async fn read(&self, scope: &Scope) -> Result<Option<Policy>, Error> {
        match self.store.get_iam_policy(scope).await {
            Ok(policy) => Ok(Some(policy)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The same whole-replacement cycle as create; the restore snapshot taken
    /// at create time is carried forward from the prior state.
    pub async fn update(&self, desired: &IamPolicy, prior: &IamPolicyState) -> Result<IamPolicyState, Error> {
        desired.validate()?;
        let (written, _) = self.apply(desired).await?;
        Ok(IamPolicyState {
            scope: desired.scope.clone(),
            policy: written,
            restore: prior.restore.clone(),
        })
    }

    /// Clears the scope's bindings, or writes the restore snapshot back when
    /// one was captured. Etag and any audit configs not owned by the snapshot
    /// come from a read taken right before the write.
    pub async fn delete(&self, state: &IamPolicyState) -> Result<(), Error> {
        let _guard = self.locks.lock(&mutex_key(&state.scope)).await;
        let remote = match self.store.get_iam_policy(&state.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        let mut updated = remote;
        match &state.restore {
            Some(previous) => {
                updated.bindings = merge_bindings(&previous.bindings, &[]);
                if let Some(audit_configs) = &previous.audit_configs {
                    updated.audit_configs = Some(merge_audit_configs(audit_configs, &[]));
                }
            }
            None => updated.bindings = Vec::new(),
        }
        tracing::debug!("clearing iam policy for {}", state.scope);
        self.store.set_iam_policy(&state.scope, &updated).await?;
        Ok(())
    }

    /// Re-derives the scope from `id` and reads the live policy.
    pub async fn import(&self, id: &str) -> Result<Option<IamPolicyState>, Error> {
        let scope = Scope::from_str(id)?;
        Ok(self.read(&scope).await?.map(|policy| IamPolicyState {
            scope: scope.clone(),
            policy,
            restore: None,
        }))
    }

    async fn apply(&self, desired: &IamPolicy) -> Result<(Policy, Policy), Error> {
        let _guard = self.locks.lock(&mutex_key(&desired.scope)).await;
        let remote = self.store.get_iam_policy(&desired.scope).await?;
        let mut updated = remote.clone();
        updated.bindings = merge_bindings(&desired.bindings, &[]);
        if let Some(audit_configs) = &desired.audit_configs {
            updated.audit_configs = Some(merge_audit_configs(audit_configs, &[]));
        }
        tracing::debug!("replacing iam policy for {}", desired.scope);
        let written = self.store.set_iam_policy(&desired.scope, &updated).await?;
        Ok((written, remote))
    }
}
