//! Write-time validation errors and shared field checks.

use crate::model::EntityKind;
use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum length for short text columns (usernames, bylines, symbols, ...).
pub const MAX_CHAR_FIELD_LEN: usize = 255;

/// Maximum calendar year a stored timestamp may carry (four-digit years only).
pub const MAX_TIMESTAMP_YEAR: i32 = 9999;

// `localhost` is the one dotless domain accepted.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@(?:localhost|[^@\s]+\.[^@\s]+)$").expect("valid email regex")
});
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+[^\s]*$").expect("valid url regex"));

/// Invariant violation detected before or during a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entity id is the nil UUID.
    NilId(EntityKind),
    /// Author byline is neither the full name nor the username.
    BylineMismatch {
        byline: String,
        full_name: String,
        username: String,
    },
    /// Required text field is empty after trim.
    EmptyField {
        entity: EntityKind,
        field: &'static str,
    },
    /// Text field exceeds its column limit (in chars).
    FieldTooLong {
        entity: EntityKind,
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidEmail(String),
    InvalidUrl {
        field: &'static str,
        value: String,
    },
    /// Decimal does not fit `max_digits` / `decimal_places`.
    DecimalOutOfRange {
        field: &'static str,
        value: Decimal,
        max_digits: u32,
        decimal_places: u32,
    },
    /// Timestamp year falls outside `0..=9999`.
    TimestampOutOfRange {
        field: &'static str,
        value: DateTime<Utc>,
    },
    /// A unique key already exists in storage.
    Duplicate {
        entity: EntityKind,
        columns: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId(entity) => write!(f, "{entity} id must not be nil"),
            Self::BylineMismatch {
                byline,
                full_name,
                username,
            } => write!(
                f,
                "byline `{byline}` must match either real name `{full_name}` or username `{username}`"
            ),
            Self::EmptyField { entity, field } => write!(f, "{entity}.{field} must not be empty"),
            Self::FieldTooLong {
                entity,
                field,
                max,
                actual,
            } => write!(
                f,
                "{entity}.{field} is {actual} chars long; at most {max} allowed"
            ),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::InvalidUrl { field, value } => write!(f, "invalid url `{value}` in {field}"),
            Self::DecimalOutOfRange {
                field,
                value,
                max_digits,
                decimal_places,
            } => write!(
                f,
                "{field} value {value} exceeds {max_digits} digits with {decimal_places} decimal places"
            ),
            Self::TimestampOutOfRange { field, value } => write!(
                f,
                "{field} timestamp {value} is outside years 0..={MAX_TIMESTAMP_YEAR}"
            ),
            Self::Duplicate { entity, columns } => {
                write!(f, "duplicate {entity} for unique key ({columns})")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_id(entity: EntityKind, id: Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId(entity));
    }
    Ok(())
}

pub(crate) fn require_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { entity, field });
    }
    Ok(())
}

pub(crate) fn require_short_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    require_text(entity, field, value)?;
    limit_length(entity, field, value)
}

pub(crate) fn limit_length(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > MAX_CHAR_FIELD_LEN {
        return Err(ValidationError::FieldTooLong {
            entity,
            field,
            max: MAX_CHAR_FIELD_LEN,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

pub(crate) fn require_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !URL_RE.is_match(value) {
        return Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn require_timestamp(
    field: &'static str,
    value: &DateTime<Utc>,
) -> Result<(), ValidationError> {
    if !(0..=MAX_TIMESTAMP_YEAR).contains(&value.year()) {
        return Err(ValidationError::TimestampOutOfRange {
            field,
            value: *value,
        });
    }
    Ok(())
}

/// Checks a decimal against a fixed-point column shape.
///
/// Trailing zeros do not count against `decimal_places`, so `1.500` fits
/// two decimal places.
pub(crate) fn require_decimal(
    field: &'static str,
    value: Decimal,
    max_digits: u32,
    decimal_places: u32,
) -> Result<(), ValidationError> {
    let normalized = value.normalize();
    let whole = normalized.trunc().abs();
    let whole_digits = if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    };

    if normalized.scale() > decimal_places || whole_digits > max_digits - decimal_places {
        return Err(ValidationError::DecimalOutOfRange {
            field,
            value,
            max_digits,
            decimal_places,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        require_decimal, require_email, require_timestamp, require_url, ValidationError,
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn email_check_requires_local_part_and_domain() {
        assert!(require_email("writer@fool.com").is_ok());
        assert!(matches!(
            require_email("writer.fool.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(require_email("writer@localhost").is_ok());
        assert!(require_email("writer@intranet").is_err());
    }

    #[test]
    fn timestamp_check_allows_four_digit_years_only() {
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(require_timestamp("publish_at", &last).is_ok());

        let first = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap();
        assert!(require_timestamp("publish_at", &first).is_ok());

        let too_late = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(matches!(
            require_timestamp("publish_at", &too_late),
            Err(ValidationError::TimestampOutOfRange {
                field: "publish_at",
                ..
            })
        ));

        let before_epoch_zero = Utc.with_ymd_and_hms(-1, 1, 1, 0, 0, 0).unwrap();
        assert!(require_timestamp("publish_at", &before_epoch_zero).is_err());
    }

    #[test]
    fn url_check_accepts_http_and_https_only() {
        assert!(require_url("website", "https://www.fool.com/investing/").is_ok());
        assert!(require_url("website", "http://g.foolcdn.com/avatar/small.ashx").is_ok());
        assert!(require_url("website", "ftp://fool.com").is_err());
        assert!(require_url("website", "https://").is_err());
    }

    #[test]
    fn decimal_check_enforces_whole_and_fraction_digits() {
        let fits = Decimal::from_str("12345678.90").unwrap();
        assert!(require_decimal("current_price", fits, 10, 2).is_ok());

        let trailing_zeros = Decimal::from_str("1.500").unwrap();
        assert!(require_decimal("current_price", trailing_zeros, 10, 2).is_ok());

        let too_precise = Decimal::from_str("1.234").unwrap();
        assert!(require_decimal("current_price", too_precise, 10, 2).is_err());

        let too_large = Decimal::from_str("-123456789.1").unwrap();
        assert!(require_decimal("change", too_large, 10, 2).is_err());
    }
}
