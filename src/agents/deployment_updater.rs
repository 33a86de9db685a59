use crate::beanstalk::{
    BeanstalkConnector, EnvironmentUpdateOutcome, Region, UpdateEnvironmentRequest,
};
use crate::config::DeploymentRequest;
use crate::credentials::{CredentialResolver, ResolutionContext};
use crate::error::Result;
use crate::messages;
use crate::utils::{VariableContext, VariableExpander};
use std::io::Write;

/// Environment status reported right after an update has been accepted.
pub const UPDATING_STATUS: &str = "Updating";

const HTTP_OK: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The environment accepted the version and is rolling it out.
    Updating,
    /// No uploaded version carries the expanded label.
    VersionNotFound,
    /// The service answered but did not take the update.
    Rejected,
}

impl UpdateOutcome {
    pub fn is_success(self) -> bool {
        self == UpdateOutcome::Updating
    }
}

/// An update only counts when the status code, the transitional status and the
/// echoed label all agree.
pub fn classify_update(outcome: &EnvironmentUpdateOutcome, expected_label: &str) -> UpdateOutcome {
    if outcome.http_status_code == HTTP_OK
        && outcome.environment_status == UPDATING_STATUS
        && outcome.returned_version_label == expected_label
    {
        UpdateOutcome::Updating
    } else {
        UpdateOutcome::Rejected
    }
}

/// DeploymentUpdater switches one environment to an uploaded application version.
pub struct DeploymentUpdater<'a> {
    resolver: &'a dyn CredentialResolver,
    connector: &'a dyn BeanstalkConnector,
    expander: VariableExpander,
}

impl<'a> DeploymentUpdater<'a> {
    pub fn new(
        resolver: &'a dyn CredentialResolver,
        connector: &'a dyn BeanstalkConnector,
    ) -> Result<Self> {
        Ok(Self {
            resolver,
            connector,
            expander: VariableExpander::new()?,
        })
    }

    /// Run one update attempt and reduce it to pass/fail.
    ///
    /// The two expected failures are written to `log` and returned as `false`;
    /// credential, region and service errors are returned as `Err`.
    pub fn attempt_update(
        &self,
        request: &DeploymentRequest,
        variables: &VariableContext,
        log: &mut dyn Write,
    ) -> Result<bool> {
        let version_label = self.expander.expand(&request.version_label, variables);
        tracing::debug!(
            template = %request.version_label,
            expanded = %version_label,
            "expanded version label"
        );

        let outcome = self.update_to(request, &version_label, variables)?;
        match outcome {
            UpdateOutcome::Updating => {}
            UpdateOutcome::VersionNotFound => writeln!(log, "{}", messages::VERSION_NOT_FOUND)?,
            UpdateOutcome::Rejected => writeln!(log, "{}", messages::UPDATE_ERROR)?,
        }

        tracing::info!(
            environment = %request.environment_id,
            version = %version_label,
            ?outcome,
            "release attempt finished"
        );
        Ok(outcome.is_success())
    }

    fn update_to(
        &self,
        request: &DeploymentRequest,
        version_label: &str,
        variables: &VariableContext,
    ) -> Result<UpdateOutcome> {
        let context = ResolutionContext::from_variables(variables);
        let access_key = self.resolver.resolve(&request.credential_id, &context)?;
        let region = Region::from_name(&request.region)?;
        let beanstalk = self.connector.connect(access_key, region)?;

        let found = !version_label.is_empty()
            && beanstalk
                .describe_application_versions(
                    &request.application_name,
                    &[version_label.to_string()],
                )?
                .iter()
                .any(|version| version.version_label == version_label);

        if !found {
            return Ok(UpdateOutcome::VersionNotFound);
        }

        let update = UpdateEnvironmentRequest {
            application_name: request.application_name.clone(),
            environment_id: request.environment_id.clone(),
            version_label: version_label.to_string(),
        };
        let response = beanstalk.update_environment(&update)?;
        tracing::debug!(
            status = response.http_status_code,
            environment_status = %response.environment_status,
            returned_label = %response.returned_version_label,
            "environment update answered"
        );

        Ok(classify_update(&response, version_label))
    }
}
