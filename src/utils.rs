use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ValidationError;

pub fn validate_string_length(
    value: &str,
    field_name: &'static str,
    max_length: usize,
) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty(field_name));
    }
    // Limits are in characters, matching the backend's column lengths.
    if value.chars().count() > max_length {
        return Err(ValidationError::TooLong {
            field: field_name,
            max: max_length,
        });
    }
    Ok(())
}

/// Minimum character count only; the content itself is not inspected.
pub fn validate_min_length(
    value: &str,
    field_name: &'static str,
    min_length: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min_length {
        return Err(ValidationError::TooShort {
            field: field_name,
            min: min_length,
        });
    }
    Ok(())
}

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty("Date"));
    }

    let format = time::format_description::parse("[year]-[month]-[day]")
        .map_err(|_| ValidationError::InvalidDate)?;

    time::Date::parse(value.trim(), &format).map_err(|_| ValidationError::InvalidDate)?;

    Ok(())
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn validate_time(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty("Time"));
    }

    let pattern = if value.len() > 5 {
        "[hour]:[minute]:[second]"
    } else {
        "[hour]:[minute]"
    };
    let format =
        time::format_description::parse(pattern).map_err(|_| ValidationError::InvalidTime)?;

    time::Time::parse(value, &format).map_err(|_| ValidationError::InvalidTime)?;

    Ok(())
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::now_utc().unix_timestamp().to_string())
}

pub fn case_insensitive_contains(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}
