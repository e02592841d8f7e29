//! Calendar-correct age computation.

use chrono::{DateTime, Datelike, NaiveDate};

/// Age in whole years as of the local date.
pub fn compute_age(birthdate: Option<&str>) -> Option<i32> {
    compute_age_on(birthdate, chrono::Local::now().date_naive())
}

/// Age in whole years on `today`.
///
/// Returns `None` when the birthdate is missing, unparseable, or after `today`.
pub fn compute_age_on(birthdate: Option<&str>, today: NaiveDate) -> Option<i32> {
    let born = parse_date(birthdate?)?;
    if born > today {
        return None;
    }

    let mut age = today.year() - born.year();
    // Birthday not reached yet this year. Comparing (month, day) pairs keeps
    // Feb 29 birthdays a year younger until Mar 1 on non-leap years.
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a timestamp whose first ten
/// characters are a date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }

    let (date_part, rest) = (value.get(..10)?, value.get(10..)?);
    if rest.starts_with('T') || rest.starts_with(' ') {
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    None
}
