//! AWS Signature Version 4 for Query API requests.

use crate::credentials::AccessKey;
use crate::error::{EbrError, Result};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    SignableBody, SignableRequest, SigningError, SigningParams, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use jiff::Timestamp;
use std::time::SystemTime;
use url::Url;

/// Region and service name a request is signed for.
pub struct SigningScope<'a> {
    pub region: &'a str,
    pub service: &'a str,
}

/// Sign one request and return the headers to add to it: `authorization`,
/// `x-amz-date`, and `x-amz-security-token` for temporary keys.
///
/// `headers` are the extra headers to cover besides `host`, which is taken
/// from `url`.
pub fn sign_request(
    method: &str,
    url: &Url,
    headers: &[(&str, &str)],
    body: &[u8],
    access_key: &AccessKey,
    scope: &SigningScope<'_>,
    time: Timestamp,
) -> Result<Vec<(String, String)>> {
    let identity: Identity = Credentials::new(
        access_key.access_key_id.clone(),
        access_key.secret_access_key.clone(),
        access_key.session_token.clone(),
        None,
        "ebrelease-credential-store",
    )
    .into();

    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(scope.region)
        .name(scope.service)
        .time(SystemTime::from(time))
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| EbrError::Configuration(format!("Invalid signing parameters: {e}")))?
        .into();

    let signable = SignableRequest::new(
        method,
        url.as_str(),
        headers.iter().copied(),
        SignableBody::Bytes(body),
    )
    .map_err(signing_error)?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(signing_error)?
        .into_parts();

    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}

fn signing_error(err: SigningError) -> EbrError {
    EbrError::Configuration(format!("Failed to sign request: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Key, scope and time shared by the AWS SigV4 test suite.
    fn example_key() -> AccessKey {
        AccessKey::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
    }

    fn suite_scope() -> SigningScope<'static> {
        SigningScope {
            region: "us-east-1",
            service: "service",
        }
    }

    fn suite_time() -> Timestamp {
        "2015-08-30T12:36:00Z".parse().unwrap()
    }

    fn suite_url() -> Url {
        Url::parse("https://example.amazonaws.com/").unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn signs_get_vanilla() {
        let signed = sign_request(
            "GET",
            &suite_url(),
            &[],
            b"",
            &example_key(),
            &suite_scope(),
            suite_time(),
        )
        .unwrap();

        assert_eq!(header(&signed, "x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(
            header(&signed, "authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=host;x-amz-date, \
                 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
            )
        );
    }

    #[test]
    fn signs_form_post() {
        let signed = sign_request(
            "POST",
            &suite_url(),
            &[("content-type", "application/x-www-form-urlencoded")],
            b"Param1=value1",
            &example_key(),
            &suite_scope(),
            suite_time(),
        )
        .unwrap();

        assert_eq!(
            header(&signed, "authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date, \
                 Signature=ff11897932ad3f4e8b18135d722051e5ac45fc38421b1da7b9d196a0fe09473a"
            )
        );
    }

    #[test]
    fn temporary_keys_send_security_token() {
        let mut key = example_key();
        key.session_token = Some("session-token".to_string());

        let signed = sign_request(
            "POST",
            &suite_url(),
            &[("content-type", "application/x-www-form-urlencoded")],
            b"Action=GetUser&Version=2010-05-08",
            &key,
            &suite_scope(),
            suite_time(),
        )
        .unwrap();

        assert_eq!(header(&signed, "x-amz-security-token"), Some("session-token"));
        assert!(header(&signed, "authorization").is_some());
    }

    #[test]
    fn permanent_keys_send_no_security_token() {
        let signed = sign_request(
            "GET",
            &suite_url(),
            &[],
            b"",
            &example_key(),
            &suite_scope(),
            suite_time(),
        )
        .unwrap();

        assert_eq!(header(&signed, "x-amz-security-token"), None);
    }
}
