use crate::error::{EbrError, Result};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Outbound HTTP proxy applied to every remote call.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxySettings {
    /// Proxy URL without credentials; those are applied as basic auth.
    pub fn url(&self) -> Result<Url> {
        let host = self.host.trim();
        let raw = if host.contains("://") {
            format!("{}:{}", host.trim_end_matches('/'), self.port)
        } else {
            format!("http://{}:{}", host, self.port)
        };

        Url::parse(&raw)
            .map_err(|e| EbrError::Configuration(format!("Invalid proxy '{}': {}", raw, e)))
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match self.username.as_deref() {
            Some(user) if !user.is_empty() => {
                Some((user, self.password.as_deref().unwrap_or_default()))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Source of process-wide proxy settings, passed to whatever builds HTTP clients.
pub trait ProxyConfigProvider {
    fn proxy(&self) -> Option<ProxySettings>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(host: &str) -> ProxySettings {
        ProxySettings {
            host: host.to_string(),
            port: 3128,
            username: Some("ci".to_string()),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn bare_host_defaults_to_http() {
        let url = settings("proxy.internal").url().unwrap();
        assert_eq!(url.as_str(), "http://proxy.internal:3128/");
    }

    #[test]
    fn keeps_explicit_scheme() {
        let url = settings("https://proxy.internal").url().unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.port(), Some(3128));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", settings("proxy.internal"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn credentials_require_username() {
        let mut proxy = settings("proxy.internal");
        assert_eq!(proxy.credentials(), Some(("ci", "hunter2")));
        proxy.username = None;
        assert_eq!(proxy.credentials(), None);
    }
}
