//! Property tests for answer validation

use adaptive_quiz::{validate_number, validate_text};
use proptest::prelude::*;

proptest! {
    #[test]
    fn text_ignores_case(answer in "[a-zA-Z0-9 ._-]{0,24}") {
        prop_assert!(validate_text(&answer, &answer.to_uppercase()));
        prop_assert!(validate_text(&answer.to_lowercase(), &answer));
    }

    #[test]
    fn text_ignores_separators(answer in "[a-z0-9 ._-]{0,24}", separator in "[ ._-]") {
        let swapped: String = answer
            .chars()
            .map(|c| if " ._-".contains(c) { separator.chars().next().unwrap_or(' ') } else { c })
            .collect();
        prop_assert!(validate_text(&answer, &swapped));
        let padded = format!("  {}{}", answer, separator);
        prop_assert!(validate_text(&answer, &padded));
    }

    #[test]
    fn text_distinguishes_letters(answer in "[a-z]{1,12}", extra in "[a-z0-9]") {
        let longer = format!("{}{}", answer, extra);
        prop_assert!(!validate_text(&answer, &longer));
    }

    #[test]
    fn number_ignores_padding_zeros(integer in 0u32..100_000, fraction in "[0-9]{0,4}[1-9]") {
        let expected = format!("{}.{}", integer, fraction);
        let zero_padded = format!("00{},{}000", integer, fraction);
        let spaced = format!(" {}.{} ", integer, fraction);
        prop_assert!(validate_number(&expected, &zero_padded));
        prop_assert!(validate_number(&expected, &spaced));
    }

    #[test]
    fn number_rejects_other_values(a in 0u32..100_000, b in 0u32..100_000) {
        prop_assume!(a != b);
        prop_assert!(!validate_number(&a.to_string(), &b.to_string()));
    }
}
