use crate::aws::{QueryClient, build_http_client};
use crate::config::{ProxyConfigProvider, Validation};
use crate::credentials::{AccessKey, CredentialResolver, ResolutionContext};
use crate::error::{EbrError, Result};
use crate::messages;
use serde::Deserialize;
use url::Url;

const IAM_ENDPOINT: &str = "https://iam.amazonaws.com/";
const IAM_SIGNING_REGION: &str = "us-east-1";
const API_VERSION: &str = "2010-05-08";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IamUser {
    pub http_status_code: u16,
    pub user_name: Option<String>,
    pub arn: Option<String>,
}

/// Minimal IAM client, used to prove that a credential works.
pub struct IamClient {
    query: QueryClient,
}

impl IamClient {
    pub fn new(access_key: AccessKey, proxy: &dyn ProxyConfigProvider) -> Result<Self> {
        let http = build_http_client(proxy.proxy().as_ref())?;
        let endpoint = Url::parse(IAM_ENDPOINT)
            .map_err(|e| EbrError::Configuration(format!("Invalid IAM endpoint: {e}")))?;
        Ok(Self {
            query: QueryClient::new(http, endpoint, IAM_SIGNING_REGION, "iam", API_VERSION, access_key),
        })
    }

    /// The user owning the access key.
    pub fn get_user(&self) -> Result<IamUser> {
        let response = self.query.call("GetUser", &[])?;
        parse_get_user(response.status, &response.body)
    }
}

/// Resolve `credential_id` and ask IAM who it belongs to.
pub fn check_credential(
    resolver: &dyn CredentialResolver,
    credential_id: &str,
    context: &ResolutionContext,
    proxy: &dyn ProxyConfigProvider,
) -> Validation {
    if credential_id.trim().is_empty() {
        return Validation::error(messages::MISSING_VALUE);
    }

    let user = resolver
        .resolve(credential_id, context)
        .and_then(|key| IamClient::new(key, proxy))
        .and_then(|iam| iam.get_user());

    match user {
        Ok(user) if user.http_status_code == 200 => {
            tracing::debug!(user = ?user.user_name, arn = ?user.arn, "credential check passed");
            Validation::Ok
        }
        Ok(user) => {
            tracing::debug!(status = user.http_status_code, "credential check rejected");
            Validation::error(messages::CREDENTIAL_NOT_FOUND)
        }
        Err(err) => {
            tracing::debug!(error = %err, "credential check failed");
            Validation::error(messages::CREDENTIAL_NOT_FOUND)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetUserResponse {
    #[serde(rename = "GetUserResult")]
    result: GetUserResult,
}

#[derive(Debug, Deserialize)]
struct GetUserResult {
    #[serde(rename = "User")]
    user: UserMember,
}

#[derive(Debug, Deserialize)]
struct UserMember {
    #[serde(rename = "UserName", default)]
    user_name: Option<String>,
    #[serde(rename = "Arn", default)]
    arn: Option<String>,
}

fn parse_get_user(http_status_code: u16, body: &str) -> Result<IamUser> {
    let doc: GetUserResponse = quick_xml::de::from_str(body)
        .map_err(|e| EbrError::ResponseParsing(format!("GetUser response: {e}")))?;
    Ok(IamUser {
        http_status_code,
        user_name: doc.result.user.user_name,
        arn: doc.result.user.arn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleaseConfig;

    struct MissingCredentials;

    impl CredentialResolver for MissingCredentials {
        fn resolve(&self, credential_id: &str, _context: &ResolutionContext) -> Result<AccessKey> {
            Err(EbrError::CredentialResolution(format!(
                "Unknown credential '{credential_id}'"
            )))
        }
    }

    #[test]
    fn parses_get_user_response() {
        let body = r#"<GetUserResponse xmlns="https://iam.amazonaws.com/doc/2010-05-08/">
  <GetUserResult>
    <User>
      <UserId>AIDACKCEVSQ6C2EXAMPLE</UserId>
      <Path>/</Path>
      <UserName>deployer</UserName>
      <Arn>arn:aws:iam::123456789012:user/deployer</Arn>
      <CreateDate>2013-10-02T17:01:44Z</CreateDate>
    </User>
  </GetUserResult>
  <ResponseMetadata>
    <RequestId>7a62c49f-347e-4fc4-9331-6e8eEXAMPLE</RequestId>
  </ResponseMetadata>
</GetUserResponse>"#;
        let user = parse_get_user(200, body).unwrap();
        assert_eq!(user.user_name.as_deref(), Some("deployer"));
        assert_eq!(user.arn.as_deref(), Some("arn:aws:iam::123456789012:user/deployer"));
    }

    #[test]
    fn blank_credential_is_missing_value() {
        let result = check_credential(&MissingCredentials, " ", &ResolutionContext::default(), &ReleaseConfig::default());
        assert_eq!(result, Validation::Error(messages::MISSING_VALUE.to_string()));
    }

    #[test]
    fn unresolvable_credential_is_not_found() {
        let result = check_credential(
            &MissingCredentials,
            "deploy",
            &ResolutionContext::default(),
            &ReleaseConfig::default(),
        );
        assert_eq!(
            result,
            Validation::Error(messages::CREDENTIAL_NOT_FOUND.to_string())
        );
    }
}
