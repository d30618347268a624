use std::sync::Arc;

use google_cloud_lock::MutexKV;
use google_cloud_resourcemanager::http::iam::Binding;

use crate::access::PolicyAccess;
use crate::error::Error;
use crate::merge::{merge_bindings, remove_binding, set_binding};
use crate::resource::split_scope;
use crate::scope::Scope;

/// One role's full member list on one scope.
///
/// Authoritative for its role on update, but create only unions its members
/// in, so bindings created by other parties survive the first apply.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct IamBinding {
    pub scope: Scope,
    pub role: String,
    pub members: Vec<String>,
}

impl IamBinding {
    /// The import/state identifier, `<scope>/<role>`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.scope, self.role)
    }

    /// Parses `<scope>/<role>`; the members are filled in by the next read.
    pub fn from_id(id: &str) -> Result<Self, Error> {
        let (scope, role) = split_scope(id)?;
        Ok(Self {
            scope,
            role: role.to_string(),
            members: Vec::new(),
        })
    }

    fn fragment(&self) -> Binding {
        Binding {
            role: self.role.clone(),
            members: self.members.clone(),
        }
    }

    fn mutex_key(&self) -> String {
        format!("iam-{}-{}", self.scope, self.role)
    }
}

/// Create/Read/Update/Delete/Import for the binding-granularity resource.
pub struct IamBindingHandler<S> {
    store: S,
    locks: Arc<MutexKV>,
}

impl<S: PolicyAccess> IamBindingHandler<S> {
    pub fn new(store: S, locks: Arc<MutexKV>) -> Self {
        Self { store, locks }
    }

    /// Unions the declared members into the role's binding and confirms with a read.
    pub async fn create(&self, desired: &IamBinding) -> Result<Option<IamBinding>, Error> {
        {
            let _guard = self.locks.lock(&desired.mutex_key()).await;
            let remote = self
                .store
                .get_iam_policy(&desired.scope)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
            let mut updated = remote.clone();
            updated.bindings = merge_bindings(&remote.bindings, &[desired.fragment()]);
            tracing::debug!("merging binding for {} on {}", desired.role, desired.scope);
            self.store
                .set_iam_policy(&desired.scope, &updated)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
        }
        self.read(desired).await
    }

    /// Projects the role's remote member list into the declared binding.
    ///
    /// Members granted or revoked out of band show up here rather than
    /// failing the operation; an absent role returns `None`.
    pub async fn read(&self, declared: &IamBinding) -> Result<Option<IamBinding>, Error> {
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.with_target(&declared.role)),
        };
        // collapse duplicate-role entries before projecting
        let bindings = merge_bindings(&remote.bindings, &[]);
        Ok(bindings.into_iter().find(|b| b.role == declared.role).map(|b| IamBinding {
            scope: declared.scope.clone(),
            role: b.role,
            members: b.members,
        }))
    }

    /// Replaces the role's member list wholesale; other roles stay untouched.
    pub async fn update(&self, desired: &IamBinding) -> Result<Option<IamBinding>, Error> {
        {
            let _guard = self.locks.lock(&desired.mutex_key()).await;
            let remote = self
                .store
                .get_iam_policy(&desired.scope)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
            let mut updated = remote.clone();
            updated.bindings = set_binding(&remote.bindings, &desired.fragment());
            self.store
                .set_iam_policy(&desired.scope, &updated)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
        }
        self.read(desired).await
    }

    /// Removes the role's binding entirely. An already-absent role (or scope)
    /// deletes successfully without a write.
    pub async fn delete(&self, declared: &IamBinding) -> Result<(), Error> {
        let _guard = self.locks.lock(&declared.mutex_key()).await;
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.with_target(&declared.role)),
        };
        if !remote.bindings.iter().any(|b| b.role == declared.role) {
            return Ok(());
        }
        let mut updated = remote.clone();
        updated.bindings = remove_binding(&remote.bindings, &declared.role);
        self.store
            .set_iam_policy(&declared.scope, &updated)
            .await
            .map_err(|e| e.with_target(&declared.role))?;
        Ok(())
    }

    /// Re-derives the declared fragment from `id` and reads it.
    pub async fn import(&self, id: &str) -> Result<Option<IamBinding>, Error> {
        let declared = IamBinding::from_id(id)?;
        self.read(&declared).await
    }
}
