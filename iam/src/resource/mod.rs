use std::str::FromStr;

use crate::error::Error;
use crate::scope::Scope;

pub mod audit_config;
pub mod binding;
pub mod member;
pub mod policy;

pub use audit_config::{IamAuditConfig, IamAuditConfigHandler};
pub use binding::{IamBinding, IamBindingHandler};
pub use member::{IamMember, IamMemberHandler};
pub use policy::{IamPolicy, IamPolicyHandler, IamPolicyState};

/// Splits the two-segment scope prefix off a composite id, returning the
/// scope and the remainder after it.
pub(crate) fn split_scope(id: &str) -> Result<(Scope, &str), Error> {
    let invalid = || Error::InvalidId(id.to_string());
    let mut segments = id.splitn(3, '/');
    let kind = segments.next().ok_or_else(invalid)?;
    let scope_id = segments.next().ok_or_else(invalid)?;
    let rest = segments.next().filter(|rest| !rest.is_empty()).ok_or_else(invalid)?;
    let scope = Scope::from_str(&format!("{kind}/{scope_id}")).map_err(|_| invalid())?;
    Ok((scope, rest))
}
