pub mod client;
pub mod factory;
pub mod region;

pub use client::BeanstalkClient;
pub use factory::{BeanstalkConnector, ClientFactory};
pub use region::Region;

use crate::error::Result;

/// An uploaded application version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationVersion {
    pub version_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEnvironmentRequest {
    pub application_name: String,
    pub environment_id: String,
    pub version_label: String,
}

/// What the service answered to an environment update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentUpdateOutcome {
    pub http_status_code: u16,
    pub environment_status: String,
    pub returned_version_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDescription {
    pub application_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescription {
    pub environment_id: String,
    pub environment_name: String,
}

/// The Elastic Beanstalk operations this tool relies on.
pub trait BeanstalkApi {
    /// Versions of `application_name`, restricted to `version_labels` when non-empty.
    fn describe_application_versions(
        &self,
        application_name: &str,
        version_labels: &[String],
    ) -> Result<Vec<ApplicationVersion>>;

    fn update_environment(
        &self,
        request: &UpdateEnvironmentRequest,
    ) -> Result<EnvironmentUpdateOutcome>;

    fn describe_applications(&self) -> Result<Vec<ApplicationDescription>>;

    fn describe_environments(&self, application_name: &str)
    -> Result<Vec<EnvironmentDescription>>;
}
