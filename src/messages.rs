//! User-facing messages written to the pipeline log.

pub const DISPLAY_NAME: &str = "Release application version to Elastic Beanstalk";

pub const VERSION_NOT_FOUND: &str = "Application version not found";

pub const UPDATE_ERROR: &str = "Environment update error";

pub const MISSING_VALUE: &str = "Missing value";

pub const CREDENTIAL_NOT_FOUND: &str = "Credential not found or not usable";

pub const UNKNOWN_REGION: &str = "Unknown region";
