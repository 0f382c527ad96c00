//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every request validation failure becomes an `invalid_request` error whose
//! `details` name the offending wire `field` and a stable `code`.

use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    EntityId, Error, IdValidationError, LabelValidationError, PasswordError,
    RecipeValidationError, UserValidationError,
};

/// Validation error codes raised by the adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    ReadOnlyField,
    BlankField,
    TooLong,
    InvalidEmail,
    InvalidImage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::ReadOnlyField => "read_only_field",
            ErrorCode::BlankField => "blank_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidImage => "invalid_image",
        }
    }
}

/// Newtype wrapper for wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

pub(crate) fn invalid_field(
    field: FieldName,
    code: ErrorCode,
    message: impl Into<String>,
) -> Error {
    field_error(field.as_str(), code.as_str(), message)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField.as_str(),
        format!("missing required field: {field}"),
    )
}

/// Deserialize a field so that an explicit `null` reads as `Some(None)`,
/// apart from an absent field. Pair with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn read_only_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ErrorCode::ReadOnlyField.as_str(),
        format!("{field} is read-only"),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

fn invalid_uuid_index_error(field: FieldName, index: usize, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must contain valid UUIDs")).with_details(json!({
        "field": field,
        "index": index,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

/// Require a field that serde left as `None`.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse one typed identifier.
pub(crate) fn parse_id<I: EntityId>(value: &str, field: FieldName) -> Result<I, Error> {
    I::parse(value).map_err(|_: IdValidationError| invalid_uuid_error(field, value))
}

/// Parse a list of typed identifiers, reporting the first bad index.
pub(crate) fn parse_id_list<I: EntityId>(
    values: &[String],
    field: FieldName,
) -> Result<Vec<I>, Error> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            I::parse(value).map_err(|_| invalid_uuid_index_error(field, index, value))
        })
        .collect()
}

/// Parse a comma-separated id list from a query parameter. Blank input and
/// empty segments are ignored.
pub(crate) fn parse_id_csv<I: EntityId>(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Vec<I>, Error> {
    let values: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    parse_id_list(&values, field)
}

pub(crate) fn recipe_error(err: &RecipeValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn label_name_error(err: &LabelValidationError) -> Error {
    let code = match err {
        LabelValidationError::BlankName => ErrorCode::BlankField,
        LabelValidationError::NameTooLong { .. } => ErrorCode::TooLong,
    };
    field_error("name", code.as_str(), err.to_string())
}

pub(crate) fn user_name_error(err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::NameTooLong { .. } => ErrorCode::TooLong,
    };
    field_error("name", code.as_str(), err.to_string())
}

pub(crate) fn password_error(err: PasswordError) -> Error {
    match err {
        PasswordError::Empty => field_error(
            "password",
            ErrorCode::BlankField.as_str(),
            "password must not be empty",
        ),
        PasswordError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagId;
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    fn id_lists_report_the_first_bad_index() {
        let values = vec![
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
            "nope".to_owned(),
        ];
        let err = parse_id_list::<TagId>(&values, FieldName::new("tags")).expect_err("bad id");

        assert_eq!(detail(&err, "field"), Some(&json!("tags")));
        assert_eq!(detail(&err, "index"), Some(&json!(1)));
        assert_eq!(detail(&err, "code"), Some(&json!("invalid_uuid")));
    }

    #[rstest]
    #[case(None, 0)]
    #[case(Some(""), 0)]
    #[case(Some(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ,"), 1)]
    #[case(
        Some("3fa85f64-5717-4562-b3fc-2c963f66afa6,9b2f7c1e-8d4a-4f5b-a6c7-1e2d3f4a5b6c"),
        2
    )]
    fn csv_ids_skip_blank_segments(#[case] raw: Option<&str>, #[case] expected: usize) {
        let ids = parse_id_csv::<TagId>(raw, FieldName::new("tags")).expect("valid ids");
        assert_eq!(ids.len(), expected);
    }

    #[rstest]
    #[case(RecipeValidationError::BlankTitle, "title", "blank_field")]
    #[case(RecipeValidationError::MalformedPrice, "price", "invalid_price")]
    #[case(RecipeValidationError::InvalidLink, "link", "invalid_link")]
    fn recipe_errors_name_their_field(
        #[case] err: RecipeValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = recipe_error(&err);
        assert_eq!(detail(&mapped, "field"), Some(&json!(field)));
        assert_eq!(detail(&mapped, "code"), Some(&json!(code)));
    }

    #[rstest]
    fn missing_and_read_only_fields_carry_codes() {
        let missing = missing_field_error(FieldName::new("title"));
        let read_only = read_only_field_error(FieldName::new("id"));

        assert_eq!(detail(&missing, "code"), Some(&json!("missing_field")));
        assert_eq!(detail(&read_only, "field"), Some(&json!("id")));
        assert_eq!(detail(&read_only, "code"), Some(&json!("read_only_field")));
    }
}
