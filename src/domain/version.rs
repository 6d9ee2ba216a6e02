//! Gluon firmware version strings, e.g. `0.14f-20170411`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

static MINOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\d*)").expect("valid minor regex"));
static BUILD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]*$").expect("valid build regex"));

/// Parsed firmware release: `<major>.<minor><build>-<yyyymmdd>`.
///
/// Parsing only extracts the parts, it does not validate that e.g. `major`
/// is numeric. The original string is kept and rendered by `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
    major: String,
    minor: String,
    build: String,
    builddate: NaiveDate,
}

impl Version {
    pub fn parse(version: &str) -> DomainResult<Self> {
        let invalid = |reason: &str| DomainError::InvalidVersion {
            version: version.to_string(),
            reason: reason.to_string(),
        };

        let (major, _) = version
            .split_once('.')
            .ok_or_else(|| invalid("missing '.' separator"))?;

        let minor = MINOR_REGEX
            .captures(version)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| invalid("missing minor part"))?;

        // build letters sit directly in front of the last dash
        let (head, _) = version
            .rsplit_once('-')
            .ok_or_else(|| invalid("missing '-' before build date"))?;
        let build = BUILD_REGEX
            .find(head)
            .map_or("", |m| m.as_str())
            .to_string();

        let date_start = version
            .char_indices()
            .rev()
            .nth(7)
            .map(|(idx, _)| idx)
            .ok_or_else(|| invalid("too short for a build date"))?;
        let builddate = NaiveDate::parse_from_str(&version[date_start..], "%Y%m%d")
            .map_err(|e| invalid(&format!("bad build date: {e}")))?;

        Ok(Self {
            raw: version.to_string(),
            major: major.to_string(),
            minor,
            build,
            builddate,
        })
    }

    /// Text before the first `.`.
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Digits directly following the first `.`.
    pub fn minor(&self) -> &str {
        &self.minor
    }

    /// Letter code preceding the final `-`, may be empty.
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Build date with day precision.
    pub fn builddate(&self) -> NaiveDate {
        self.builddate
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_release_without_build_letters_when_parsing_then_build_is_empty() {
        let version = Version::parse("0.14-20170411").unwrap();
        assert_eq!(version.minor(), "14");
        assert_eq!(version.build(), "");
    }

    #[test]
    fn given_multiple_dashes_when_parsing_then_build_taken_before_last_dash() {
        let version = Version::parse("2.1-exp-beta-20200101").unwrap();
        assert_eq!(version.major(), "2");
        assert_eq!(version.build(), "beta");
        assert_eq!(
            version.builddate(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }
}
