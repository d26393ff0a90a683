//! The `{success, data|errors|message}` wrapper every API response is sent in.

use crate::service::validation::ValidationErrors;
use axum::{Json, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            errors: None,
            message: None,
        }
    }
}

impl Envelope<()> {
    pub fn acknowledge(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            errors: None,
            message: Some(message.into()),
        }
    }

    pub const fn invalid(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            data: None,
            errors: Some(errors),
            message: None,
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::data(data)))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::data(data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::student::StudentField;
    use serde_json::json;

    #[test]
    fn only_the_populated_member_is_serialised() {
        let data = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(data, json!({"success": true, "data": [1, 2]}));

        let message = serde_json::to_value(Envelope::failure("Student not found")).unwrap();
        assert_eq!(
            message,
            json!({"success": false, "message": "Student not found"})
        );

        let errors = serde_json::to_value(Envelope::invalid(ValidationErrors::taken(
            StudentField::Email,
        )))
        .unwrap();
        assert_eq!(
            errors,
            json!({"success": false, "errors": {"email": ["The email has already been taken."]}})
        );
    }
}
