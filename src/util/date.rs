//! Signed-year date strings.
//!
//! Dates are stored as `[-]YYYY[Y...]-MM-DD`. A leading `-` marks a BC year;
//! BC years are padded to six digits, AD years to four. The codec is lenient:
//! malformed input never aborts, it yields whatever components could be read.

use chrono::Local;

/// Day-of-month used when a date is proposed from a month-granularity scalar.
const SCALAR_DAY: i64 = 15;

/// Calendar components of a timeline date. `year` is the magnitude; the era
/// is carried by `is_bc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub is_bc: bool,
}

impl DateParts {
    pub fn new(year: i64, month: i64, day: i64, is_bc: bool) -> Self {
        DateParts {
            year,
            month,
            day,
            is_bc,
        }
    }

    /// Year with the era applied (BC years are negative).
    pub fn signed_year(&self) -> i64 {
        if self.is_bc { self.year.saturating_neg() } else { self.year }
    }

    /// Today's local date.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        parse_date(&now.format("%Y-%m-%d").to_string()).or(DateParts::new(1970, 1, 1, false))
    }
}

/// Best-effort result of [`parse_date`]. Components that could not be read
/// are `None` so the caller can keep its previous values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedDate {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub is_bc: bool,
}

impl ParsedDate {
    /// Fill missing components from `prior`. The era always comes from the
    /// parsed string.
    pub fn or(self, prior: DateParts) -> DateParts {
        DateParts {
            year: self.year.unwrap_or(prior.year),
            month: self.month.unwrap_or(prior.month),
            day: self.day.unwrap_or(prior.day),
            is_bc: self.is_bc,
        }
    }
}

/// Split a date string into components.
pub fn parse_date(date: &str) -> ParsedDate {
    let (is_bc, rest) = match date.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, date),
    };

    let mut parts = rest.split('-');
    let mut component = |name: &str| -> Option<i64> {
        let raw = parts.next()?;
        match raw.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(date, component = name, raw, error = %e, "malformed date component");
                None
            }
        }
    };

    let year = component("year");
    let month = component("month");
    let day = component("day");

    ParsedDate {
        year,
        month,
        day,
        is_bc,
    }
}

/// Build a canonical date string. Month is clamped to 1..=12 and day to
/// 1..=31; out-of-range input is silently corrected.
pub fn format_parts(parts: &DateParts) -> String {
    let width = if parts.is_bc { 6 } else { 4 };
    let sign = if parts.is_bc { "-" } else { "" };
    format!(
        "{}{:0width$}-{:02}-{:02}",
        sign,
        parts.year.unsigned_abs(),
        parts.month.clamp(1, 12),
        parts.day.clamp(1, 31),
        width = width
    )
}

/// Month-granularity scalar used for ordering and interpolation. Saturates
/// at the `i64` range for very long years.
pub fn to_scalar(date: &str) -> i64 {
    let parts = parse_date(date).or(DateParts::new(0, 1, 1, false));
    parts
        .signed_year()
        .saturating_mul(12)
        .saturating_add(parts.month.saturating_sub(1))
}

/// Inverse of [`to_scalar`]. The day is pinned to the 15th.
pub fn from_scalar(scalar: i64) -> String {
    let signed_year = scalar.div_euclid(12);
    let month = scalar.rem_euclid(12) + 1;
    format_parts(&DateParts::new(
        signed_year.abs(),
        month,
        SCALAR_DAY,
        signed_year < 0,
    ))
}

/// Full sort key: signed year, month, day.
pub fn sort_key(date: &str) -> (i64, i64, i64) {
    let parts = parse_date(date).or(DateParts::new(0, 1, 1, false));
    (parts.signed_year(), parts.month, parts.day)
}

/// Human-readable date: `前221年`, `2000年3月15日`.
///
/// January 1st is shown as year-only. Strings that cannot be fully read are
/// returned as-is.
pub fn display_date(date: &str) -> String {
    let parsed = parse_date(date);
    let (Some(year), Some(month), Some(day)) = (parsed.year, parsed.month, parsed.day) else {
        return date.to_string();
    };
    let prefix = if parsed.is_bc { "前" } else { "" };
    if month == 1 && day == 1 {
        format!("{}{}年", prefix, year)
    } else {
        format!("{}{}年{}月{}日", prefix, year, month, day)
    }
}

/// Today's date as a canonical date string.
pub fn today_string() -> String {
    format_parts(&DateParts::today())
}
