use crate::scope::Scope;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error from the Resource Manager transport, with the resource it targeted.
    #[error("iam policy request for {target} failed: {source}")]
    Policy {
        target: String,
        #[source]
        source: google_cloud_resourcemanager::http::Error,
    },

    /// A resource id that does not parse as `<scope>`, `<scope>/<role>` or
    /// `<scope>/<role>/<member>`.
    #[error("invalid iam resource id: {0}")]
    InvalidId(String),

    /// Input rejected before any remote call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn policy(scope: &Scope, source: google_cloud_resourcemanager::http::Error) -> Self {
        Error::Policy {
            target: scope.to_string(),
            source,
        }
    }

    /// Appends the role or service an operation was acting on to the error's
    /// target, so a transport failure names what was being changed, not just
    /// which scope it belongs to.
    pub(crate) fn with_target(mut self, discriminant: &str) -> Self {
        if let Error::Policy { target, .. } = &mut self {
            target.push('/');
            target.push_str(discriminant);
        }
        self
    }

    /// Whether the underlying transport reported the target scope or policy as absent.
    ///
    /// Read and delete paths translate this into "resource no longer exists"
    /// instead of failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Policy { source, .. } if source.is_not_found())
    }

    /// Whether a write was rejected because the etag it carried is stale.
    ///
    /// The engine never retries this locally; the caller re-runs the whole
    /// cycle, which re-reads a fresh etag.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Policy { source, .. } if source.is_conflict())
    }
}
