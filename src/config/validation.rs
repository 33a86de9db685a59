use crate::beanstalk::Region;
use crate::messages;
use std::fmt;

/// Outcome of checking a single configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ok,
    Error(String),
}

impl Validation {
    pub fn error(message: impl Into<String>) -> Self {
        Validation::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Ok)
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Ok => f.write_str("ok"),
            Validation::Error(message) => f.write_str(message),
        }
    }
}

pub fn check_not_blank(value: &str) -> Validation {
    if value.trim().is_empty() {
        return Validation::error(messages::MISSING_VALUE);
    }
    Validation::Ok
}

pub fn check_credential_id(value: &str) -> Validation {
    check_not_blank(value)
}

pub fn check_region(value: &str) -> Validation {
    if !check_not_blank(value).is_ok() {
        return Validation::error(messages::MISSING_VALUE);
    }
    match Region::from_name(value.trim()) {
        Ok(_) => Validation::Ok,
        Err(_) => Validation::error(format!("{}: {}", messages::UNKNOWN_REGION, value.trim())),
    }
}

pub fn check_application_name(value: &str) -> Validation {
    check_not_blank(value)
}

pub fn check_environment_id(value: &str) -> Validation {
    check_not_blank(value)
}

pub fn check_version_label(value: &str) -> Validation {
    check_not_blank(value)
}
