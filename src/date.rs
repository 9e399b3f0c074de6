//! Calendar-date predicate used to detect where an incident line starts.

use chrono::NaiveDate;

/// `MM/DD/YYYY`, the leading date of every incident line.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Returns `true` iff `token` parses as a date under [`DEFAULT_DATE_FORMAT`].
pub fn is_valid_date(token: &str) -> bool {
    is_valid_date_with(token, DEFAULT_DATE_FORMAT)
}

/// Returns `true` iff the whole of `token` parses as a date under `format`
/// (a chrono `strftime`-style pattern). Trailing input, out-of-range fields
/// and malformed patterns all yield `false`.
///
/// `%Y` must be exactly four digits and `%m`/`%d` digits only. chrono alone
/// would also take `24`, `0024` or `+2024` as a year.
pub fn is_valid_date_with(token: &str, format: &str) -> bool {
    NaiveDate::parse_from_str(token, format).is_ok() && fields_are_strict(token, format)
}

fn fields_are_strict(token: &str, format: &str) -> bool {
    let specs: Vec<&str> = format
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '%')
        .collect();
    let fields: Vec<&str> = token.split(|c: char| !c.is_ascii_alphanumeric()).collect();
    if specs.len() != fields.len() {
        return false;
    }

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    specs.iter().zip(&fields).all(|(spec, field)| match *spec {
        "%Y" => field.len() == 4 && digits(field),
        "%m" | "%d" => digits(field),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_dates() {
        assert!(is_valid_date("01/01/2024"));
        assert!(is_valid_date("12/31/1999"));
        assert!(is_valid_date("02/29/2024"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(!is_valid_date("13/01/2024"));
        assert!(!is_valid_date("00/10/2024"));
        assert!(!is_valid_date("02/30/2024"));
        assert!(!is_valid_date("02/29/2023"));
    }

    #[test]
    fn rejects_wrong_arity_and_non_numeric() {
        assert!(!is_valid_date("01/01"));
        assert!(!is_valid_date("01/01/2024/05"));
        assert!(!is_valid_date("aa/bb/cccc"));
        assert!(!is_valid_date("Norman"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn year_must_have_four_digits() {
        assert!(!is_valid_date("01/01/24"));
        assert!(!is_valid_date("01/01/024"));
        assert!(!is_valid_date("01/01/+2024"));
        assert!(!is_valid_date("01/01/-2024"));
        assert!(!is_valid_date("+1/01/2024"));
        assert!(!is_valid_date("01/01/20245"));
        assert!(is_valid_date("01/01/0024"));
    }

    #[test]
    fn single_digit_month_and_day_are_accepted() {
        assert!(is_valid_date("1/1/2024"));
        assert!(is_valid_date("3/15/2024"));
    }

    #[test]
    fn rejects_trailing_characters() {
        assert!(!is_valid_date("01/01/2024x"));
        assert!(!is_valid_date("01/01/2024 12:00"));
    }

    #[test]
    fn custom_format() {
        assert!(is_valid_date_with("2024-01-31", "%Y-%m-%d"));
        assert!(!is_valid_date_with("01/31/2024", "%Y-%m-%d"));
        assert!(!is_valid_date_with("24-01-31", "%Y-%m-%d"));
    }
}
