//! Tests for firmware version parsing

use chrono::NaiveDate;
use rstest::rstest;

use meshtk::domain::{DomainError, Version};

#[test]
fn given_gluon_release_when_parsing_then_extracts_all_parts() {
    let version = Version::parse("0.14f-20170411").unwrap();

    assert_eq!(version.major(), "0");
    assert_eq!(version.minor(), "14");
    assert_eq!(version.build(), "f");
    assert_eq!(
        version.builddate(),
        NaiveDate::from_ymd_opt(2017, 4, 11).unwrap()
    );
    assert_eq!(version.to_string(), "0.14f-20170411");
}

#[rstest]
#[case("1.2ab-20180102", "1", "2", "ab", (2018, 1, 2))]
#[case("2017.1.5-20170612", "2017", "1", "", (2017, 6, 12))]
#[case("v0.16b-20191231", "v0", "16", "b", (2019, 12, 31))]
fn given_release_variants_when_parsing_then_extracts_parts(
    #[case] raw: &str,
    #[case] major: &str,
    #[case] minor: &str,
    #[case] build: &str,
    #[case] date: (i32, u32, u32),
) {
    let version: Version = raw.parse().unwrap();

    assert_eq!(version.major(), major);
    assert_eq!(version.minor(), minor);
    assert_eq!(version.build(), build);
    assert_eq!(
        version.builddate(),
        NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap()
    );
}

#[rstest]
#[case("experimental")]
#[case("0.14f")]
#[case("0.14f-2017")]
#[case("0.14f-20171341")]
#[case("")]
fn given_malformed_release_when_parsing_then_fails(#[case] raw: &str) {
    let result = Version::parse(raw);

    assert!(
        matches!(result, Err(DomainError::InvalidVersion { .. })),
        "{raw:?} should not parse: {result:?}"
    );
}
