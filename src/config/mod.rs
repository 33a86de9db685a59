pub mod proxy;
pub mod validation;

pub use proxy::{ProxyConfigProvider, ProxySettings};
pub use validation::Validation;

use crate::error::{EbrError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "ebrelease.toml";

/// Contents of `ebrelease.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub release: ReleaseSection,
    #[serde(default)]
    pub proxy: Option<ProxySettings>,
}

/// `[release]` table. Every field may be overridden on the command line.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReleaseSection {
    pub credential_id: Option<String>,
    pub region: Option<String>,
    pub application_name: Option<String>,
    pub environment_id: Option<String>,
    pub version_label: Option<String>,
}

impl ReleaseSection {
    /// Field-by-field merge, values from `overrides` win.
    pub fn merged_with(&self, overrides: &ReleaseSection) -> ReleaseSection {
        fn pick(over: &Option<String>, base: &Option<String>) -> Option<String> {
            over.clone().or_else(|| base.clone())
        }

        ReleaseSection {
            credential_id: pick(&overrides.credential_id, &self.credential_id),
            region: pick(&overrides.region, &self.region),
            application_name: pick(&overrides.application_name, &self.application_name),
            environment_id: pick(&overrides.environment_id, &self.environment_id),
            version_label: pick(&overrides.version_label, &self.version_label),
        }
    }

    /// Identifiers are trimmed; the version label template is kept as written.
    pub fn to_request(&self) -> DeploymentRequest {
        fn identifier(value: &Option<String>) -> String {
            value.as_deref().map(str::trim).unwrap_or_default().to_string()
        }

        DeploymentRequest {
            credential_id: identifier(&self.credential_id),
            region: identifier(&self.region),
            application_name: identifier(&self.application_name),
            environment_id: identifier(&self.environment_id),
            version_label: self.version_label.clone().unwrap_or_default(),
        }
    }
}

impl ReleaseConfig {
    /// Load the config file.
    ///
    /// A missing file is only an error when the path was given explicitly.
    pub fn load<P: AsRef<Path>>(path: P, explicit: bool) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            if explicit {
                return Err(EbrError::Configuration(format!(
                    "Config file '{}' not found",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl ProxyConfigProvider for ReleaseConfig {
    fn proxy(&self) -> Option<ProxySettings> {
        self.proxy
            .clone()
            .filter(|proxy| !proxy.host.trim().is_empty())
    }
}

/// Everything one release needs. The version label is still a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub credential_id: String,
    pub region: String,
    pub application_name: String,
    pub environment_id: String,
    pub version_label: String,
}

impl DeploymentRequest {
    /// Per-field validation results, in declaration order.
    pub fn validate(&self) -> Vec<(&'static str, Validation)> {
        vec![
            (
                "credential_id",
                validation::check_credential_id(&self.credential_id),
            ),
            ("region", validation::check_region(&self.region)),
            (
                "application_name",
                validation::check_application_name(&self.application_name),
            ),
            (
                "environment_id",
                validation::check_environment_id(&self.environment_id),
            ),
            (
                "version_label",
                validation::check_version_label(&self.version_label),
            ),
        ]
    }

    /// Fail with the first invalid field.
    pub fn ensure_valid(&self) -> Result<()> {
        for (field, result) in self.validate() {
            if let Validation::Error(message) = result {
                return Err(EbrError::Configuration(format!("{field}: {message}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::beanstalk::Region;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
[release]
credential_id = "deploy"
region = "eu-west-1"
application_name = "shop"
environment_id = "e-abc123"
version_label = "v1.${BUILD_NUMBER}"

[proxy]
host = "proxy.internal"
port = 3128
username = "ci"
password = "secret"
"#;

    #[test]
    fn parses_release_and_proxy_sections() {
        let config = ReleaseConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.release.application_name.as_deref(), Some("shop"));
        let proxy = config.proxy().unwrap();
        assert_eq!(proxy.host, "proxy.internal");
        assert_eq!(proxy.port, 3128);
    }

    #[test]
    fn blank_proxy_host_means_no_proxy() {
        let config = ReleaseConfig::parse("[proxy]\nhost = \"\"\nport = 80\n").unwrap();
        assert!(config.proxy().is_none());
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = ReleaseConfig::parse("[release]\nregoin = \"eu-west-1\"\n").unwrap_err();
        assert!(matches!(err, EbrError::Toml(_)));
    }

    #[test]
    fn command_line_values_override_file_values() {
        let config = ReleaseConfig::parse(SAMPLE).unwrap();
        let overrides = ReleaseSection {
            environment_id: Some("e-other".to_string()),
            ..Default::default()
        };
        let request = config.release.merged_with(&overrides).to_request();
        assert_eq!(request.environment_id, "e-other");
        assert_eq!(request.application_name, "shop");
        assert_eq!(request.version_label, "v1.${BUILD_NUMBER}");
    }

    #[test]
    fn request_identifiers_are_trimmed() {
        let section = ReleaseSection {
            credential_id: Some(" deploy ".to_string()),
            region: Some("eu-west-1 ".to_string()),
            application_name: Some("\tshop".to_string()),
            environment_id: Some("e-abc123\n".to_string()),
            version_label: Some("v1.2.3".to_string()),
        };
        let request = section.to_request();

        assert_eq!(request.credential_id, "deploy");
        assert_eq!(request.region, "eu-west-1");
        assert_eq!(request.application_name, "shop");
        assert_eq!(request.environment_id, "e-abc123");
        assert!(request.ensure_valid().is_ok());
        assert!(Region::from_name(&request.region).is_ok());
    }

    #[test]
    fn missing_default_file_is_empty_config() {
        let dir = tempdir().unwrap();
        let config = ReleaseConfig::load(dir.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(config.release, ReleaseSection::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = ReleaseConfig::load(dir.path().join("nope.toml"), true).unwrap_err();
        assert!(matches!(err, EbrError::Configuration(_)));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, SAMPLE).unwrap();
        let config = ReleaseConfig::load(&path, true).unwrap();
        assert_eq!(config.release.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn validation_reports_every_blank_field() {
        let request = DeploymentRequest {
            application_name: "shop".to_string(),
            ..Default::default()
        };
        let failing: Vec<_> = request
            .validate()
            .into_iter()
            .filter(|(_, result)| !result.is_ok())
            .map(|(field, _)| field)
            .collect();
        assert_eq!(
            failing,
            vec!["credential_id", "region", "environment_id", "version_label"]
        );
    }

    #[test]
    fn ensure_valid_names_first_failing_field() {
        let request = ReleaseConfig::parse(SAMPLE).unwrap().release.to_request();
        assert!(request.ensure_valid().is_ok());

        let blank_label = DeploymentRequest {
            version_label: "  ".to_string(),
            ..request
        };
        match blank_label.ensure_valid().unwrap_err() {
            EbrError::Configuration(message) => assert!(message.starts_with("version_label")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
