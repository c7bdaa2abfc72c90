//! Precedence tests for the passcode extraction chain.

use crate::sms::domain::{ExtractionStrategy, OtpExtractor, SmsDomainError};
use rstest::{fixture, rstest};

#[fixture]
fn extractor() -> OtpExtractor {
    OtpExtractor::standard().expect("built-in patterns compile")
}

#[rstest]
#[case("Your code: 4821, also 99999", "4821", "labelled")]
#[case("Use 482-193 or code: 77812", "77812", "labelled")]
#[case("Verification code: 845123. Do not share.", "845123", "labelled")]
#[case("OTP 123 expires soon", "123", "labelled")]
#[case("otp:   90210 for login", "90210", "labelled")]
#[case("Your login PIN is 556677", "556677", "bare_digits")]
#[case("Ref 123-456 then 998877", "998877", "bare_digits")]
#[case("Confirm with 381-902", "381-902", "hyphenated")]
fn first_satisfied_strategy_wins(
    extractor: OtpExtractor,
    #[case] body: &str,
    #[case] expected_code: &str,
    #[case] expected_strategy: &str,
) {
    let otp = extractor.extract(body).expect("passcode should be found");
    assert_eq!(otp.code(), expected_code);
    assert_eq!(otp.strategy(), expected_strategy);
}

#[rstest]
#[case("Welcome to the network")]
#[case("Code: 12")]
#[case("Account 123456789 credited")]
fn bodies_without_passcodes_yield_none(extractor: OtpExtractor, #[case] body: &str) {
    assert_eq!(extractor.extract(body), None);
}

#[rstest]
fn standard_chain_is_ordered(extractor: OtpExtractor) {
    let names: Vec<_> = extractor.strategy_names().collect();
    assert_eq!(names, ["labelled", "bare_digits", "hyphenated"]);
}

#[test]
fn custom_chain_respects_list_order() {
    let extractor = OtpExtractor::new(vec![
        ExtractionStrategy::new("hyphenated", r"(\d{3}-\d{3})").expect("valid pattern"),
        ExtractionStrategy::new("bare_digits", r"\b(\d{4,8})\b").expect("valid pattern"),
    ]);

    let otp = extractor
        .extract("pin 4821 or 381-902")
        .expect("passcode should be found");
    assert_eq!(otp.code(), "381-902");
}

#[test]
fn invalid_pattern_is_reported_with_strategy_name() {
    let result = ExtractionStrategy::new("broken", r"(\d{3");
    assert!(matches!(
        result,
        Err(SmsDomainError::InvalidPattern { name: "broken", .. })
    ));
}
