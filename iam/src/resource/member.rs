use std::sync::Arc;

use google_cloud_lock::MutexKV;
use google_cloud_resourcemanager::http::iam::Binding;

use crate::access::PolicyAccess;
use crate::error::Error;
use crate::merge::{merge_bindings, remove_member};
use crate::resource::split_scope;
use crate::scope::Scope;

/// One member's grant of one role on one scope.
///
/// The finest-grained IAM resource: many independent instances can each own
/// one member of the same role without stomping each other.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct IamMember {
    pub scope: Scope,
    pub role: String,
    pub member: String,
}

impl IamMember {
    /// The import/state identifier, `<scope>/<role>/<member>`.
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.scope, self.role, self.member)
    }

    /// Parses `<scope>/<role>/<member>`.
    ///
    /// The member is the final slash-free segment, so the role keeps its
    /// internal slashes (`roles/viewer`, `projects/x/roles/custom`).
    pub fn from_id(id: &str) -> Result<Self, Error> {
        let (scope, rest) = split_scope(id)?;
        let (role, member) = rest.rsplit_once('/').ok_or_else(|| Error::InvalidId(id.to_string()))?;
        // every role form carries a slash (`roles/viewer`, `.../roles/custom`),
        // which is what tells a member id apart from a binding id
        if !role.contains('/') || member.is_empty() {
            return Err(Error::InvalidId(id.to_string()));
        }
        Ok(Self {
            scope,
            role: role.to_string(),
            member: member.to_string(),
        })
    }

    fn fragment(&self) -> Binding {
        Binding {
            role: self.role.clone(),
            members: vec![self.member.clone()],
        }
    }

    // shared with the binding resource so everything touching one role serializes
    fn mutex_key(&self) -> String {
        format!("iam-{}-{}", self.scope, self.role)
    }
}

/// Create/Read/Update/Delete/Import for the member-granularity resource.
pub struct IamMemberHandler<S> {
    store: S,
    locks: Arc<MutexKV>,
}

impl<S: PolicyAccess> IamMemberHandler<S> {
    pub fn new(store: S, locks: Arc<MutexKV>) -> Self {
        Self { store, locks }
    }

    /// Merges the member into its role's binding and confirms with a read.
    pub async fn create(&self, desired: &IamMember) -> Result<Option<IamMember>, Error> {
        {
            let _guard = self.locks.lock(&desired.mutex_key()).await;
            let remote = self
                .store
                .get_iam_policy(&desired.scope)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
            let mut updated = remote.clone();
            updated.bindings = merge_bindings(&remote.bindings, &[desired.fragment()]);
            tracing::debug!("granting {} to {} on {}", desired.role, desired.member, desired.scope);
            self.store
                .set_iam_policy(&desired.scope, &updated)
                .await
                .map_err(|e| e.with_target(&desired.role))?;
        }
        self.read(desired).await
    }

    /// Projects the remote policy onto the declared member.
    ///
    /// Returns `None` when the scope, the role or the member is gone, so the
    /// caller marks its state absent instead of failing.
    pub async fn read(&self, declared: &IamMember) -> Result<Option<IamMember>, Error> {
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.with_target(&declared.role)),
        };
        let present = remote
            .bindings
            .iter()
            .any(|b| b.role == declared.role && b.members.contains(&declared.member));
        Ok(present.then(|| declared.clone()))
    }

    /// Re-asserts the grant. The identity fields are immutable, so this is the
    /// same merge cycle as [`IamMemberHandler::create`].
    pub async fn update(&self, desired: &IamMember) -> Result<Option<IamMember>, Error> {
        self.create(desired).await
    }

    /// Removes exactly this member from its role.
    ///
    /// An already-absent member (or scope) deletes successfully without a write.
    pub async fn delete(&self, declared: &IamMember) -> Result<(), Error> {
        let _guard = self.locks.lock(&declared.mutex_key()).await;
        let remote = match self.store.get_iam_policy(&declared.scope).await {
            Ok(policy) => policy,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e.with_target(&declared.role)),
        };
        let present = remote
            .bindings
            .iter()
            .any(|b| b.role == declared.role && b.members.contains(&declared.member));
        if !present {
            return Ok(());
        }
        let mut updated = remote.clone();
        updated.bindings = remove_member(&remote.bindings, &declared.role, &declared.member);
        tracing::debug!("revoking {} from {} on {}", declared.role, declared.member, declared.scope);
        self.store
            .set_iam_policy(&declared.scope, &updated)
            .await
            .map_err(|e| e.with_target(&declared.role))?;
        Ok(())
    }

    /// Re-derives the declared fragment from `id` and reads it.
    pub async fn import(&self, id: &str) -> Result<Option<IamMember>, Error> {
        let declared = IamMember::from_id(id)?;
        self.read(&declared).await
    }
}

#[cfg(test)]
mod tests {
    use crate::resource::member::IamMember;
    use crate::scope::Scope;

    #[test]
    fn test_id_round_trip() {
        let member = IamMember {
            scope: Scope::folder("1234567"),
            role: "roles/viewer".to_string(),
            member: "user:alice@example.com".to_string(),
        };
        assert_eq!(member.id(), "folders/1234567/roles/viewer/user:alice@example.com");
        assert_eq!(IamMember::from_id(&member.id()).unwrap(), member);
    }

    #[test]
    fn test_from_id_keeps_custom_role_slashes() {
        let member = IamMember::from_id("projects/my-project/projects/my-project/roles/custom/user:a@x.com").unwrap();
        assert_eq!(member.scope, Scope::project("my-project"));
        assert_eq!(member.role, "projects/my-project/roles/custom");
        assert_eq!(member.member, "user:a@x.com");
    }

    #[test]
    fn test_from_id_rejects_malformed_ids() {
        assert!(IamMember::from_id("projects/my-project").is_err());
        assert!(IamMember::from_id("projects/my-project/roles/viewer").is_err());
        assert!(IamMember::from_id("tenants/42/roles/viewer/user:a@x.com").is_err());
        assert!(IamMember::from_id("projects/my-project//user:a@x.com").is_err());
    }
}
