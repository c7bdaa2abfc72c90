//! Destination address masking for outbound notifications.

/// Replacement for the hidden middle span.
const MASK: &str = "****";

/// Shorter values are returned unchanged.
const MIN_MASKABLE_LENGTH: usize = 4;

/// Masks the middle of an address, keeping `ceil(len / 3)` characters at
/// each end.
///
/// Length is counted in characters, not bytes.
#[must_use]
pub fn mask_destination(value: &str) -> String {
    let characters: Vec<char> = value.chars().collect();
    let length = characters.len();
    if length < MIN_MASKABLE_LENGTH {
        return value.to_owned();
    }

    let visible = length.div_ceil(3);
    let head = characters.iter().take(visible);
    let tail = characters.iter().skip(length.saturating_sub(visible));

    let mut masked = String::with_capacity(value.len() + MASK.len());
    masked.extend(head);
    masked.push_str(MASK);
    masked.extend(tail);
    masked
}

#[cfg(test)]
mod tests {
    use super::mask_destination;
    use rstest::rstest;

    #[rstest]
    #[case("1234567890", "1234****7890")]
    #[case("8801712345678", "88017****45678")]
    #[case("12345", "12****45")]
    #[case("1234", "12****34")]
    #[case("555", "555")]
    #[case("", "")]
    fn masks_middle_span(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mask_destination(input), expected);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(mask_destination("ÄÖÜßÄÖ"), "ÄÖ****ÄÖ");
    }
}
