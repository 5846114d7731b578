//! Recipient number validation. Only the North American numbering plan
//! (country code 1, ten digit national numbers) is in scope.

const COUNTRY_CODE: char = '1';
const NATIONAL_NUMBER_LEN: usize = 10;

/// Canonicalizes `raw` to `+1XXXXXXXXXX`.
///
/// Accepts a bare ten digit number, an eleven digit number starting with
/// the country code, or a `+` prefixed form of either, with arbitrary
/// punctuation and whitespace in between. Returns `None` for anything else.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.chars().any(|c| c.is_alphabetic()) {
        return None;
    }

    let digits = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>();

    let national = match digits.len() {
        NATIONAL_NUMBER_LEN => digits.as_str(),
        len if len == NATIONAL_NUMBER_LEN + 1 && digits.starts_with(COUNTRY_CODE) => &digits[1..],
        _ => return None,
    };

    Some(format!("+{}{}", COUNTRY_CODE, national))
}

/// Whether `raw` is a number reminders can be sent to
pub fn is_in_scope(raw: &str) -> bool {
    normalize(raw).is_some()
}

/// User facing explanation for numbers rejected by `is_in_scope`
pub const OUT_OF_SCOPE_MESSAGE: &str =
    "Please enter a valid 10-digit US or Canadian phone number, e.g. (555) 123-4567";

/// Finds the first in-scope phone number in free text such as a calendar
/// event title or description.
pub fn extract_phone(text: &str) -> Option<String> {
    let is_phone_char = |c: char| c.is_ascii_digit() || "+-(). ".contains(c);

    text.split(|c: char| !is_phone_char(c))
        .filter(|candidate| candidate.chars().any(|c| c.is_ascii_digit()))
        .find_map(normalize)
}
