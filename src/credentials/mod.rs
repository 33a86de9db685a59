pub mod store;

pub use store::FileCredentialStore;

use crate::error::Result;
use crate::utils::VariableContext;
use std::fmt;

/// Access key material for signing requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AccessKey {
    #[cfg(test)]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Who is asking for a credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    pub job: Option<String>,
}

impl ResolutionContext {
    #[cfg(test)]
    pub fn for_job(job: impl Into<String>) -> Self {
        Self {
            job: Some(job.into()),
        }
    }

    /// Context of a pipeline run, identified by its `JOB_NAME` variable.
    pub fn from_variables(variables: &VariableContext) -> Self {
        Self {
            job: variables
                .get("JOB_NAME")
                .map(str::trim)
                .filter(|job| !job.is_empty())
                .map(str::to_string),
        }
    }
}

/// Maps an opaque credential id to access key material.
///
/// Implementations must not cache: every call reflects the store as it is now.
pub trait CredentialResolver {
    fn resolve(&self, credential_id: &str, context: &ResolutionContext) -> Result<AccessKey>;
}
