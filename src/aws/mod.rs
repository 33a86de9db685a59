pub mod signer;

use crate::config::ProxySettings;
use crate::credentials::AccessKey;
use crate::error::{EbrError, Result};
use jiff::Timestamp;
use reqwest::blocking::Client;
use serde::Deserialize;
use signer::SigningScope;
use std::io::Read;
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// Build the blocking HTTP client used for every AWS call of one invocation.
pub fn build_http_client(proxy: Option<&ProxySettings>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("ebrelease/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy) = proxy {
        let url = proxy.url()?;
        tracing::debug!(proxy = %url, "routing requests through proxy");

        let mut outbound = reqwest::Proxy::all(url.as_str())
            .map_err(|e| EbrError::Configuration(format!("Invalid proxy: {}", e)))?;
        if let Some((user, password)) = proxy.credentials() {
            outbound = outbound.basic_auth(user, password);
        }
        builder = builder.proxy(outbound);
    }

    builder
        .build()
        .map_err(|e| EbrError::Transport(format!("Failed to build HTTP client: {}", e)))
}

/// Successful (2xx) response of a Query API call.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub status: u16,
    pub body: String,
}

/// Signed client for an AWS Query protocol endpoint (`Action=...&Version=...`).
pub struct QueryClient {
    http: Client,
    endpoint: Url,
    signing_region: String,
    service: &'static str,
    api_version: &'static str,
    access_key: AccessKey,
}

impl QueryClient {
    pub fn new(
        http: Client,
        endpoint: Url,
        signing_region: impl Into<String>,
        service: &'static str,
        api_version: &'static str,
        access_key: AccessKey,
    ) -> Self {
        Self {
            http,
            endpoint,
            signing_region: signing_region.into(),
            service,
            api_version,
            access_key,
        }
    }

    /// POST one action. Non-2xx responses are returned as [`EbrError::Service`].
    pub fn call(&self, action: &str, params: &[(String, String)]) -> Result<QueryResponse> {
        let body = encode_form(action, self.api_version, params);

        let scope = SigningScope {
            region: &self.signing_region,
            service: self.service,
        };
        let signed = signer::sign_request(
            "POST",
            &self.endpoint,
            &[("content-type", FORM_CONTENT_TYPE)],
            body.as_bytes(),
            &self.access_key,
            &scope,
            Timestamp::now(),
        )?;

        tracing::debug!(action, endpoint = %self.endpoint, "sending request");

        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header("content-type", FORM_CONTENT_TYPE)
            .body(body);
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let text = read_limited(response, MAX_RESPONSE_BYTES)?;

        tracing::debug!(action, status, "received response");

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }

        Ok(QueryResponse { status, body: text })
    }
}

/// Read a response body, refusing anything larger than `limit` bytes.
fn read_limited(reader: impl Read, limit: u64) -> Result<String> {
    let mut text = String::new();
    reader
        .take(limit + 1)
        .read_to_string(&mut text)
        .map_err(|e| EbrError::Transport(format!("Failed to read response: {e}")))?;

    if text.len() as u64 > limit {
        return Err(EbrError::ResponseParsing(format!(
            "Response exceeded {} byte limit",
            limit
        )));
    }
    Ok(text)
}

fn encode_form(action: &str, api_version: &str, params: &[(String, String)]) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("Action", action);
    form.append_pair("Version", api_version);
    for (name, value) in params {
        form.append_pair(name, value);
    }
    form.finish()
}

/// `Name.member.N` parameters for a list argument.
pub fn member_params(name: &str, values: &[String]) -> Vec<(String, String)> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| (format!("{}.member.{}", name, i + 1), value.clone()))
        .collect()
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error")]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "Code", default)]
    code: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
}

/// Turn an AWS error document into [`EbrError::Service`].
pub fn parse_error(status: u16, body: &str) -> EbrError {
    match quick_xml::de::from_str::<ErrorResponse>(body) {
        Ok(doc) => EbrError::Service {
            status,
            code: doc.error.code.unwrap_or_else(|| "Unknown".to_string()),
            message: doc.error.message.unwrap_or_default(),
        },
        Err(_) => {
            let mut message: String = body.trim().chars().take(200).collect();
            if message.is_empty() {
                message = "empty response body".to_string();
            }
            EbrError::Service {
                status,
                code: "Unknown".to_string(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_action_version_and_members() {
        let mut params = vec![("ApplicationName".to_string(), "my shop".to_string())];
        params.extend(member_params("VersionLabels", &["v1.2.3".to_string()]));
        let body = encode_form("DescribeApplicationVersions", "2010-12-01", &params);
        assert_eq!(
            body,
            "Action=DescribeApplicationVersions&Version=2010-12-01\
             &ApplicationName=my+shop&VersionLabels.member.1=v1.2.3"
        );
    }

    #[test]
    fn parses_service_error_document() {
        let body = r#"<ErrorResponse xmlns="https://elasticbeanstalk.amazonaws.com/docs/2010-12-01/">
  <Error>
    <Type>Sender</Type>
    <Code>InvalidParameterValue</Code>
    <Message>No Application Version named 'v9' found.</Message>
  </Error>
  <RequestId>5b1f5b1e-0000-0000-0000-000000000000</RequestId>
</ErrorResponse>"#;
        match parse_error(400, body) {
            EbrError::Service {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "InvalidParameterValue");
                assert!(message.contains("'v9'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparsable_error_keeps_body_excerpt() {
        match parse_error(502, "Bad Gateway") {
            EbrError::Service { code, message, .. } => {
                assert_eq!(code, "Unknown");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_body_within_limit() {
        let body = read_limited("<DescribeApplicationsResponse/>".as_bytes(), 64).unwrap();
        assert_eq!(body, "<DescribeApplicationsResponse/>");
    }

    #[test]
    fn rejects_oversized_body() {
        let oversized = "x".repeat(65);
        let err = read_limited(oversized.as_bytes(), 64).unwrap_err();
        assert!(matches!(err, EbrError::ResponseParsing(_)));
        assert!(read_limited("x".repeat(64).as_bytes(), 64).is_ok());
    }

    #[test]
    fn builds_client_with_proxy() {
        let proxy = ProxySettings {
            host: "proxy.internal".to_string(),
            port: 8080,
            username: Some("ci".to_string()),
            password: Some("secret".to_string()),
        };
        assert!(build_http_client(Some(&proxy)).is_ok());
        assert!(build_http_client(None).is_ok());
    }
}
