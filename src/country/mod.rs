//! Country code to flag emoji conversion.

/// Offset from an ASCII uppercase letter to its Unicode regional-indicator
/// symbol (`'A'` -> U+1F1E6).
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

/// Common 3-letter ISO codes whose first two letters are not the matching
/// 2-letter code.
const THREE_TO_TWO: &[(&str, &str)] = &[
    ("USA", "US"),
    ("CAN", "CA"),
    ("GBR", "GB"),
    ("FRA", "FR"),
    ("DEU", "DE"),
];

/// Converts a 2- or 3-letter ISO country code into a flag emoji.
///
/// Input is case-insensitive. 3-letter codes go through a small lookup
/// table; codes absent from the table are truncated to their first two
/// letters, which is lossy and may render the wrong flag for exotic codes.
/// An empty code returns an empty string rather than an error.
pub fn country_code_to_emoji(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }

    let mut code = code.to_uppercase();

    if code.len() == 3 {
        code = THREE_TO_TWO
            .iter()
            .find(|(three, _)| *three == code)
            .map(|(_, two)| (*two).to_string())
            .unwrap_or_else(|| code.chars().take(2).collect());
    }

    code.chars()
        .filter_map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}
