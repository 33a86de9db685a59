use super::{AccessKey, CredentialResolver, ResolutionContext};
use crate::error::{EbrError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CREDENTIALS_FILE: &str = ".ebrelease/credentials.toml";

#[derive(Debug, Default, Deserialize)]
struct CredentialFile {
    #[serde(default, rename = "credential")]
    credentials: Vec<StoredCredential>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredCredential {
    id: String,
    #[serde(default)]
    description: Option<String>,
    access_key_id: String,
    secret_access_key: String,
    #[serde(default)]
    session_token: Option<String>,
    /// Jobs allowed to use this credential; empty means every job.
    #[serde(default)]
    jobs: Vec<String>,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("jobs", &self.jobs)
            .finish()
    }
}

impl StoredCredential {
    fn allows(&self, context: &ResolutionContext) -> bool {
        if self.jobs.is_empty() {
            return true;
        }
        match context.job.as_deref() {
            Some(job) => self.jobs.iter().any(|allowed| allowed == job),
            None => false,
        }
    }
}

/// Credential store backed by a TOML file of `[[credential]]` entries.
///
/// The file is read again on every lookup.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `(label, id)` pairs for every stored credential.
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let file = self.read()?;
        Ok(file
            .credentials
            .into_iter()
            .map(|c| {
                let label = c
                    .description
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| c.id.clone());
                (label, c.id)
            })
            .collect())
    }

    fn read(&self) -> Result<CredentialFile> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            EbrError::CredentialResolution(format!(
                "Failed to read credential store '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            EbrError::CredentialResolution(format!(
                "Failed to parse credential store '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl CredentialResolver for FileCredentialStore {
    fn resolve(&self, credential_id: &str, context: &ResolutionContext) -> Result<AccessKey> {
        let file = self.read()?;

        let stored = file
            .credentials
            .into_iter()
            .find(|c| c.id == credential_id)
            .ok_or_else(|| {
                EbrError::CredentialResolution(format!("Unknown credential '{credential_id}'"))
            })?;

        if !stored.allows(context) {
            return Err(EbrError::CredentialResolution(format!(
                "Credential '{}' is not available to job '{}'",
                credential_id,
                context.job.as_deref().unwrap_or("<none>")
            )));
        }

        if stored.access_key_id.trim().is_empty() || stored.secret_access_key.trim().is_empty() {
            return Err(EbrError::CredentialResolution(format!(
                "Credential '{credential_id}' has no key material"
            )));
        }

        tracing::debug!(credential_id, access_key_id = %stored.access_key_id, "resolved credential");

        Ok(AccessKey {
            access_key_id: stored.access_key_id,
            secret_access_key: stored.secret_access_key,
            session_token: stored.session_token.filter(|t| !t.trim().is_empty()),
        })
    }
}
