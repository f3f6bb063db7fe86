//! Shared DTO helpers used across multiple endpoints.

use chrono::NaiveDate;

use crate::error::TallyError;

/// Parses a `YYYY-MM-DD` date from a request body.
///
/// # Errors
///
/// Returns [`TallyError::InvalidDate`] if `raw` is not a valid calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TallyError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| TallyError::InvalidDate(format!("{raw:?}: {e}")))
}

/// Parses an optional date field; `None` and blank strings mean "keep".
///
/// # Errors
///
/// Returns [`TallyError::InvalidDate`] for a non-blank invalid date.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, TallyError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date(" 2024-06-01 ").ok(), NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn rejects_invalid_dates() {
        assert!(matches!(
            parse_date("2024-02-30"),
            Err(TallyError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date("01.06.2024"),
            Err(TallyError::InvalidDate(_))
        ));
    }

    #[test]
    fn blank_optional_date_keeps_current() {
        assert!(matches!(parse_optional_date(None), Ok(None)));
        assert!(matches!(parse_optional_date(Some("  ")), Ok(None)));
        assert!(parse_optional_date(Some("2024-13-01")).is_err());
    }
}
