use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

const COMMON_DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S",    // Common format without timezone
  "%Y-%m-%dT%H:%M:%S",    // ISO-8601 without timezone
  "%Y-%m-%d %H:%M",       // Minutes precision
  "%Y-%m-%dT%H:%M",       // ISO-8601, minutes precision
  "%Y-%m-%d %H:%M:%S%.f", // Fractional seconds
];

const COMMON_DATETIME_TZ_FORMATS: &[&str] = &[
  "%Y-%m-%d %H:%M:%S %z", // Common format with timezone
  "%Y-%m-%d %H:%M:%S%z",
  "%Y-%m-%d %H:%M %z",
];

const COMMON_DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d", // Date only
  "%Y/%m/%d",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
  #[error("date is missing")]
  Missing,

  #[error("date is empty")]
  Empty,

  #[error("date is null")]
  Null,

  #[error("unrecognized date {0:?}")]
  Unrecognized(String),
}

/// Parse a post or config date.
///
/// Dates without an offset are taken as UTC, and a bare date means
/// midnight UTC of that day.
pub fn parse_date(
  date_str: impl AsRef<str>,
) -> Result<DateTime<FixedOffset>, DateError> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return Err(DateError::Empty);
  }

  // YAML `date:` with no value comes through as the literal "null"
  if date_str == "null" {
    return Err(DateError::Null);
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Ok(parsed);
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(date_str) {
    return Ok(parsed);
  }

  for fmt in COMMON_DATETIME_TZ_FORMATS {
    if let Ok(parsed) = DateTime::parse_from_str(date_str, fmt) {
      return Ok(parsed);
    }
  }

  for fmt in COMMON_DATETIME_FORMATS {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_str, fmt) {
      return Ok(parsed.and_utc().fixed_offset());
    }
  }

  for fmt in COMMON_DATE_FORMATS {
    if let Ok(parsed) = NaiveDate::parse_from_str(date_str, fmt) {
      let midnight = parsed.and_time(Default::default());
      return Ok(midnight.and_utc().fixed_offset());
    }
  }

  Err(DateError::Unrecognized(date_str.to_owned()))
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use test_case::test_case;

  use super::*;

  fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    Utc
      .with_ymd_and_hms(y, m, d, h, min, 0)
      .unwrap()
      .fixed_offset()
  }

  #[test_case("2020-01-01", utc(2020, 1, 1, 0, 0); "date only")]
  #[test_case("2020/01/01", utc(2020, 1, 1, 0, 0); "slashed date")]
  #[test_case("2021-06-01 08:30:00", utc(2021, 6, 1, 8, 30); "naive datetime")]
  #[test_case("2021-06-01T08:30", utc(2021, 6, 1, 8, 30); "iso minutes")]
  #[test_case("2021-06-01T10:30:00+02:00", utc(2021, 6, 1, 8, 30); "rfc3339")]
  #[test_case("Tue, 1 Jun 2021 08:30:00 GMT", utc(2021, 6, 1, 8, 30); "rfc2822")]
  #[test_case("2021-06-01 10:30:00 +0200", utc(2021, 6, 1, 8, 30); "with offset")]
  fn parses_supported_formats(input: &str, expected: DateTime<FixedOffset>) {
    assert_eq!(parse_date(input).unwrap(), expected);
  }

  #[test]
  fn keeps_source_offset() {
    let parsed = parse_date("2021-06-01T10:30:00+02:00").unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
  }

  #[test_case("", DateError::Empty; "empty")]
  #[test_case("   ", DateError::Empty; "blank")]
  #[test_case("null", DateError::Null; "null literal")]
  fn rejects_missing_dates(input: &str, expected: DateError) {
    assert_eq!(parse_date(input), Err(expected));
  }

  #[test_case("yesterday"; "word")]
  #[test_case("2021-13-01"; "bad month")]
  #[test_case("2021-02-30"; "bad day")]
  fn rejects_garbage(input: &str) {
    assert!(matches!(parse_date(input), Err(DateError::Unrecognized(_))));
  }
}
