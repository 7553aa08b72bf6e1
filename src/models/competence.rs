// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Competence period (`MM/YYYY`) formatting and format checks.

/// Maximum number of digits kept from user input (`MM` + `YYYY`).
const MAX_DIGITS: usize = 6;

/// Normalize free-form input into the incremental `MM/YYYY` shape.
///
/// Every non-digit is dropped, the digits are truncated to six, and a `/` is
/// re-inserted after the second digit once a third digit exists. Applied on
/// every keystroke, so the displayed value is always the formatted one.
///
/// # Examples
///
/// ```
/// use extratos::models::competence::format_competence;
///
/// assert_eq!(format_competence("1"), "1");
/// assert_eq!(format_competence("123"), "12/3");
/// assert_eq!(format_competence("03/2024"), "03/2024");
/// assert_eq!(format_competence("ab0320241999"), "03/2024");
/// ```
pub fn format_competence(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();

    if digits.len() <= 2 {
        digits
    } else {
        format!("{}/{}", &digits[..2], &digits[2..])
    }
}

/// Return true when `value` is a complete competence: month `01`-`12`, `/`, four digits.
pub fn is_valid_competence(value: &str) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };

    let month_ok = month.len() == 2
        && month.chars().all(|c| c.is_ascii_digit())
        && matches!(month.parse::<u8>(), Ok(1..=12));
    let year_ok = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());

    month_ok && year_ok
}

/// Advisory format check shown next to the competence input.
///
/// Only reports once the value reaches full length (7 chars), so partially
/// typed values are never flagged.
pub fn competence_format_issue(value: &str) -> bool {
    value.chars().count() >= 7 && !is_valid_competence(value)
}
