use crate::beanstalk::{BeanstalkApi, BeanstalkConnector, Region};
use crate::credentials::{CredentialResolver, FileCredentialStore, ResolutionContext};
use crate::error::Result;
use serde::Serialize;
use std::sync::Arc;

/// One entry of a selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOption {
    pub label: String,
    pub value: String,
}

impl ListOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is also its value.
    pub fn same(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    pub fn blank() -> Self {
        Self::new("", "")
    }
}

fn with_blank(options: impl IntoIterator<Item = ListOption>) -> Vec<ListOption> {
    std::iter::once(ListOption::blank()).chain(options).collect()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Produces the choices offered while configuring a release.
///
/// Remote failures never escape: an unreachable service yields an empty list.
pub struct OptionLister<'a> {
    resolver: &'a dyn CredentialResolver,
    connector: &'a dyn BeanstalkConnector,
    context: ResolutionContext,
}

impl<'a> OptionLister<'a> {
    pub fn new(
        resolver: &'a dyn CredentialResolver,
        connector: &'a dyn BeanstalkConnector,
        context: ResolutionContext,
    ) -> Self {
        Self {
            resolver,
            connector,
            context,
        }
    }

    pub fn regions() -> Vec<ListOption> {
        with_blank(
            Region::all()
                .iter()
                .map(|region| ListOption::new(region.description(), region.code())),
        )
    }

    pub fn credentials(store: &FileCredentialStore) -> Vec<ListOption> {
        match store.list() {
            Ok(entries) => with_blank(
                entries
                    .into_iter()
                    .map(|(label, id)| ListOption::new(label, id)),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "could not list credentials");
                Vec::new()
            }
        }
    }

    pub fn applications(&self, credential_id: &str, region: &str) -> Vec<ListOption> {
        if is_blank(credential_id) || is_blank(region) {
            return vec![ListOption::blank()];
        }

        let listed = self.connect(credential_id, region).and_then(|beanstalk| {
            beanstalk.describe_applications().map(|apps| {
                apps.into_iter()
                    .map(|app| ListOption::same(app.application_name))
                    .collect::<Vec<_>>()
            })
        });

        self.or_empty("applications", listed)
    }

    pub fn environments(
        &self,
        credential_id: &str,
        region: &str,
        application_name: &str,
    ) -> Vec<ListOption> {
        if is_blank(credential_id) || is_blank(region) || is_blank(application_name) {
            return vec![ListOption::blank()];
        }

        let listed = self.connect(credential_id, region).and_then(|beanstalk| {
            beanstalk.describe_environments(application_name).map(|envs| {
                envs.into_iter()
                    .map(|env| ListOption::new(env.environment_name, env.environment_id))
                    .collect::<Vec<_>>()
            })
        });

        self.or_empty("environments", listed)
    }

    fn connect(&self, credential_id: &str, region: &str) -> Result<Arc<dyn BeanstalkApi>> {
        let access_key = self.resolver.resolve(credential_id, &self.context)?;
        let region = Region::from_name(region.trim())?;
        self.connector.connect(access_key, region)
    }

    fn or_empty(&self, what: &str, listed: Result<Vec<ListOption>>) -> Vec<ListOption> {
        match listed {
            Ok(options) => with_blank(options),
            Err(err) => {
                tracing::warn!(error = %err, "could not list {}", what);
                Vec::new()
            }
        }
    }
}
