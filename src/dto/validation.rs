//! Validation helpers for DTOs.

use std::{borrow::Cow, collections::BTreeMap};

use time::{Date, Time};
use validator::{ValidationError, ValidationErrors};

use crate::formats;

/// Rejects a field absent from the payload (or sent as `null`).
pub fn required<T>(value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        err
    })
}

/// Required, non-blank text of at most `max` characters.
pub fn required_text(value: Option<String>, max: usize) -> Result<String, ValidationError> {
    let value = required(value)?;
    validate_not_blank(&value)?;
    validate_max_chars(&value, max)?;
    Ok(value)
}

/// Record a failed field check under `field`, keeping the value otherwise.
pub fn check<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<T, ValidationError>,
) -> Option<T> {
    result.map_err(|e| errors.add(field, e)).ok()
}

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}

/// Caps the character count (not bytes) of a text field.
pub fn validate_max_chars(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        let mut err = ValidationError::new("max_length");
        err.message = Some(format!("Ensure this field has no more than {max} characters.").into());
        err.add_param(Cow::Borrowed("max"), &max);
        return Err(err);
    }
    Ok(())
}

/// Parse a calendar date written as `YYYY-MM-DD`.
pub fn parse_date_field(value: &str) -> Result<Date, ValidationError> {
    formats::parse_date(value).map_err(|_| {
        let mut err = ValidationError::new("date_format");
        err.message =
            Some("Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".into());
        err
    })
}

/// Parse a time of day written as `hh:mm[:ss]`.
pub fn parse_time_field(value: &str) -> Result<Time, ValidationError> {
    formats::parse_time(value).map_err(|_| {
        let mut err = ValidationError::new("time_format");
        err.message =
            Some("Time has wrong format. Use one of these formats instead: hh:mm[:ss].".into());
        err
    })
}

/// Field error reported when a referenced row does not exist.
pub fn invalid_pk(field: &'static str, pk: i64) -> ValidationErrors {
    let mut err = ValidationError::new("does_not_exist");
    err.message = Some(format!("Invalid pk \"{pk}\" - object does not exist.").into());
    err.add_param(Cow::Borrowed("pk"), &pk);

    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}

/// Flatten validation errors into `{field: [messages]}`.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => err.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("Chess").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn length_is_counted_in_chars() {
        assert!(validate_max_chars(&"é".repeat(50), 50).is_ok());
        assert!(validate_max_chars(&"a".repeat(51), 50).is_err());
    }

    #[test]
    fn date_and_time_formats() {
        assert!(parse_date_field("2024-02-29").is_ok());
        assert!(parse_date_field("2023-02-29").is_err());
        assert!(parse_date_field("29/02/2024").is_err());
        assert!(parse_time_field("19:30").is_ok());
        assert!(parse_time_field("19:30:15").is_ok());
        let err = parse_time_field("7pm").unwrap_err();
        assert_eq!(err.code, "time_format");
    }

    #[test]
    fn missing_values_are_required() {
        assert_eq!(required(Some(3)).unwrap(), 3);
        let err = required::<i32>(None).unwrap_err();
        assert_eq!(err.code, "required");

        let mut errors = ValidationErrors::new();
        assert_eq!(check(&mut errors, "title", required_text(None, 50)), None);
        assert_eq!(
            check(&mut errors, "maker", required_text(Some("Staunton".into()), 50)),
            Some("Staunton".to_owned())
        );
        assert_eq!(
            field_errors(&errors).get("title"),
            Some(&vec!["This field is required.".to_owned()])
        );
        assert!(!field_errors(&errors).contains_key("maker"));
    }

    #[test]
    fn invalid_pk_is_keyed_by_field() {
        let fields = field_errors(&invalid_pk("game_type", 42));
        assert_eq!(
            fields.get("game_type"),
            Some(&vec!["Invalid pk \"42\" - object does not exist.".to_owned()])
        );
    }
}
