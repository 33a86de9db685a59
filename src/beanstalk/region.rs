use crate::error::{EbrError, Result};
use std::fmt;

/// A public AWS region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    code: &'static str,
    description: &'static str,
}

const REGIONS: &[Region] = &[
    Region::new("us-gov-west-1", "AWS GovCloud (US)"),
    Region::new("us-gov-east-1", "AWS GovCloud (US-East)"),
    Region::new("us-east-1", "US East (N. Virginia)"),
    Region::new("us-east-2", "US East (Ohio)"),
    Region::new("us-west-1", "US West (N. California)"),
    Region::new("us-west-2", "US West (Oregon)"),
    Region::new("eu-west-1", "EU (Ireland)"),
    Region::new("eu-west-2", "EU (London)"),
    Region::new("eu-west-3", "EU (Paris)"),
    Region::new("eu-central-1", "EU (Frankfurt)"),
    Region::new("eu-central-2", "EU (Zurich)"),
    Region::new("eu-north-1", "EU (Stockholm)"),
    Region::new("eu-south-1", "EU (Milan)"),
    Region::new("eu-south-2", "EU (Spain)"),
    Region::new("ap-east-1", "Asia Pacific (Hong Kong)"),
    Region::new("ap-south-1", "Asia Pacific (Mumbai)"),
    Region::new("ap-south-2", "Asia Pacific (Hyderabad)"),
    Region::new("ap-southeast-1", "Asia Pacific (Singapore)"),
    Region::new("ap-southeast-2", "Asia Pacific (Sydney)"),
    Region::new("ap-southeast-3", "Asia Pacific (Jakarta)"),
    Region::new("ap-southeast-4", "Asia Pacific (Melbourne)"),
    Region::new("ap-northeast-1", "Asia Pacific (Tokyo)"),
    Region::new("ap-northeast-2", "Asia Pacific (Seoul)"),
    Region::new("ap-northeast-3", "Asia Pacific (Osaka)"),
    Region::new("sa-east-1", "South America (Sao Paulo)"),
    Region::new("cn-north-1", "China (Beijing)"),
    Region::new("cn-northwest-1", "China (Ningxia)"),
    Region::new("ca-central-1", "Canada (Central)"),
    Region::new("ca-west-1", "Canada West (Calgary)"),
    Region::new("me-central-1", "Middle East (UAE)"),
    Region::new("me-south-1", "Middle East (Bahrain)"),
    Region::new("af-south-1", "Africa (Cape Town)"),
    Region::new("il-central-1", "Israel (Tel Aviv)"),
];

impl Region {
    const fn new(code: &'static str, description: &'static str) -> Self {
        Self { code, description }
    }

    pub fn all() -> &'static [Region] {
        REGIONS
    }

    pub fn from_name(name: &str) -> Result<Region> {
        REGIONS
            .iter()
            .copied()
            .find(|region| region.code == name)
            .ok_or_else(|| EbrError::Configuration(format!("Unknown region '{name}'")))
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    fn dns_suffix(&self) -> &'static str {
        if self.code.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }

    /// Regional endpoint for a service, e.g. `https://elasticbeanstalk.eu-west-1.amazonaws.com/`.
    pub fn endpoint(&self, service: &str) -> String {
        format!("https://{}.{}.{}/", service, self.code, self.dns_suffix())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_region() {
        let region = Region::from_name("eu-west-1").unwrap();
        assert_eq!(region.description(), "EU (Ireland)");
        assert_eq!(
            region.endpoint("elasticbeanstalk"),
            "https://elasticbeanstalk.eu-west-1.amazonaws.com/"
        );
    }

    #[test]
    fn china_regions_use_cn_suffix() {
        let region = Region::from_name("cn-north-1").unwrap();
        assert_eq!(
            region.endpoint("elasticbeanstalk"),
            "https://elasticbeanstalk.cn-north-1.amazonaws.com.cn/"
        );
    }

    #[test]
    fn unknown_region_is_configuration_error() {
        let err = Region::from_name("EU-WEST-1").unwrap_err();
        assert!(matches!(err, EbrError::Configuration(_)));
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = Region::all().iter().map(|r| r.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Region::all().len());
    }
}
