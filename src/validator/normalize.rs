//! String normalization shared by the answer validators

/// Characters that carry no meaning in a free-text answer
pub const TEXT_SEPARATORS: [char; 4] = [' ', '-', '_', '.'];

/// Decimal marks accepted in numeric answers; all are treated as `.`
pub const DECIMAL_MARKS: [char; 2] = ['.', ','];

/// Case-fold a string.
///
/// Uppercasing first makes expansions such as `ß` -> `SS` fold to the same
/// string as their uppercase spelling.
pub fn fold_case(input: &str) -> String {
    input.to_uppercase().to_lowercase()
}

/// Normalize a free-text answer: trim, case-fold and drop separators.
///
/// Letters and digits are kept untouched, so `"this answer"` and
/// `"this_answer"` collapse together while `"this0answer"` does not.
pub fn normalize_text(input: &str) -> String {
    fold_case(input.trim())
        .chars()
        .filter(|c| !TEXT_SEPARATORS.contains(c))
        .collect()
}

/// A numeric answer split into its significant integer and fraction digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberParts {
    /// Integer digits without leading zeros (empty for zero)
    pub integer: String,
    /// Fraction digits without trailing zeros (empty when there are none)
    pub fraction: String,
}

/// Split a numeric answer into normalized integer and fraction parts.
///
/// Digits are compared as case-folded text so hexadecimal-looking answers
/// such as `"aB3.bF1"` keep their letters. Returns `None` when the answer
/// contains more than one decimal mark.
pub fn split_number(input: &str) -> Option<NumberParts> {
    let folded: String = fold_case(input.trim())
        .chars()
        .map(|c| if DECIMAL_MARKS.contains(&c) { '.' } else { c })
        .collect();

    let mut pieces = folded.split('.');
    let integer = pieces.next().unwrap_or("");
    let fraction = pieces.next().unwrap_or("");
    if pieces.next().is_some() {
        return None;
    }

    Some(NumberParts {
        integer: integer.trim_start_matches('0').to_string(),
        fraction: fraction.trim_end_matches('0').to_string(),
    })
}
