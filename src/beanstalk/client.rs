use super::{
    ApplicationDescription, ApplicationVersion, BeanstalkApi, EnvironmentDescription,
    EnvironmentUpdateOutcome, Region, UpdateEnvironmentRequest,
};
use crate::aws::{QueryClient, member_params};
use crate::credentials::AccessKey;
use crate::error::{EbrError, Result};
use quick_xml::de::from_str;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const SERVICE: &str = "elasticbeanstalk";
const API_VERSION: &str = "2010-12-01";

/// Elastic Beanstalk client speaking the Query API.
pub struct BeanstalkClient {
    query: QueryClient,
}

impl BeanstalkClient {
    pub fn new(http: Client, access_key: AccessKey, region: Region) -> Result<Self> {
        let endpoint = Url::parse(&region.endpoint(SERVICE)).map_err(|e| {
            EbrError::Configuration(format!("Invalid endpoint for region {region}: {e}"))
        })?;
        Ok(Self::with_endpoint(http, access_key, region, endpoint))
    }

    /// Client for a non-default endpoint, signed for `region`.
    pub fn with_endpoint(http: Client, access_key: AccessKey, region: Region, endpoint: Url) -> Self {
        Self {
            query: QueryClient::new(http, endpoint, region.code(), SERVICE, API_VERSION, access_key),
        }
    }
}

impl BeanstalkApi for BeanstalkClient {
    fn describe_application_versions(
        &self,
        application_name: &str,
        version_labels: &[String],
    ) -> Result<Vec<ApplicationVersion>> {
        let mut params = vec![("ApplicationName".to_string(), application_name.to_string())];
        params.extend(member_params("VersionLabels", version_labels));

        let response = self.query.call("DescribeApplicationVersions", &params)?;
        parse_application_versions(&response.body)
    }

    fn update_environment(
        &self,
        request: &UpdateEnvironmentRequest,
    ) -> Result<EnvironmentUpdateOutcome> {
        let params = vec![
            ("ApplicationName".to_string(), request.application_name.clone()),
            ("EnvironmentId".to_string(), request.environment_id.clone()),
            ("VersionLabel".to_string(), request.version_label.clone()),
        ];

        let response = self.query.call("UpdateEnvironment", &params)?;
        parse_update_environment(response.status, &response.body)
    }

    fn describe_applications(&self) -> Result<Vec<ApplicationDescription>> {
        let response = self.query.call("DescribeApplications", &[])?;
        parse_applications(&response.body)
    }

    fn describe_environments(
        &self,
        application_name: &str,
    ) -> Result<Vec<EnvironmentDescription>> {
        let params = vec![("ApplicationName".to_string(), application_name.to_string())];
        let response = self.query.call("DescribeEnvironments", &params)?;
        parse_environments(&response.body)
    }
}

fn parse_xml<T: DeserializeOwned>(action: &str, body: &str) -> Result<T> {
    from_str(body)
        .map_err(|e| EbrError::ResponseParsing(format!("{action} response: {e}")))
}

pub(crate) fn parse_application_versions(body: &str) -> Result<Vec<ApplicationVersion>> {
    let doc: DescribeApplicationVersionsResponse = parse_xml("DescribeApplicationVersions", body)?;
    Ok(doc
        .result
        .application_versions
        .members
        .into_iter()
        .map(|member| ApplicationVersion {
            version_label: member.version_label.unwrap_or_default(),
        })
        .collect())
}

pub(crate) fn parse_update_environment(
    http_status_code: u16,
    body: &str,
) -> Result<EnvironmentUpdateOutcome> {
    let doc: UpdateEnvironmentResponse = parse_xml("UpdateEnvironment", body)?;
    Ok(EnvironmentUpdateOutcome {
        http_status_code,
        environment_status: doc.result.status.unwrap_or_default(),
        returned_version_label: doc.result.version_label.unwrap_or_default(),
    })
}

pub(crate) fn parse_applications(body: &str) -> Result<Vec<ApplicationDescription>> {
    let doc: DescribeApplicationsResponse = parse_xml("DescribeApplications", body)?;
    Ok(doc
        .result
        .applications
        .members
        .into_iter()
        .filter_map(|member| member.application_name)
        .map(|application_name| ApplicationDescription { application_name })
        .collect())
}

pub(crate) fn parse_environments(body: &str) -> Result<Vec<EnvironmentDescription>> {
    let doc: DescribeEnvironmentsResponse = parse_xml("DescribeEnvironments", body)?;
    Ok(doc
        .result
        .environments
        .members
        .into_iter()
        .filter_map(|member| {
            let environment_id = member.environment_id?;
            Some(EnvironmentDescription {
                environment_name: member
                    .environment_name
                    .unwrap_or_else(|| environment_id.clone()),
                environment_id,
            })
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct Members<T> {
    #[serde(rename = "member", default = "Vec::new")]
    members: Vec<T>,
}

impl<T> Default for Members<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DescribeApplicationVersionsResponse {
    #[serde(rename = "DescribeApplicationVersionsResult")]
    result: DescribeApplicationVersionsResult,
}

#[derive(Debug, Deserialize)]
struct DescribeApplicationVersionsResult {
    #[serde(rename = "ApplicationVersions", default)]
    application_versions: Members<ApplicationVersionMember>,
}

#[derive(Debug, Deserialize)]
struct ApplicationVersionMember {
    #[serde(rename = "VersionLabel", default)]
    version_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateEnvironmentResponse {
    #[serde(rename = "UpdateEnvironmentResult")]
    result: UpdateEnvironmentResult,
}

#[derive(Debug, Deserialize)]
struct UpdateEnvironmentResult {
    #[serde(rename = "VersionLabel", default)]
    version_label: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeApplicationsResponse {
    #[serde(rename = "DescribeApplicationsResult")]
    result: DescribeApplicationsResult,
}

#[derive(Debug, Deserialize)]
struct DescribeApplicationsResult {
    #[serde(rename = "Applications", default)]
    applications: Members<ApplicationMember>,
}

#[derive(Debug, Deserialize)]
struct ApplicationMember {
    #[serde(rename = "ApplicationName", default)]
    application_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DescribeEnvironmentsResponse {
    #[serde(rename = "DescribeEnvironmentsResult")]
    result: DescribeEnvironmentsResult,
}

#[derive(Debug, Deserialize)]
struct DescribeEnvironmentsResult {
    #[serde(rename = "Environments", default)]
    environments: Members<EnvironmentMember>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentMember {
    #[serde(rename = "EnvironmentId", default)]
    environment_id: Option<String>,
    #[serde(rename = "EnvironmentName", default)]
    environment_name: Option<String>,
}
