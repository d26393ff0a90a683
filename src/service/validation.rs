//! Input rules for student records.
//!
//! Input is normalised first: strings are trimmed and an empty string counts as `null`.
//! On create every required field has to be present. On update each rule only applies to
//! keys that were sent.

use crate::{
    data::{
        StudentStore,
        student::{NewStudent, StudentField, StudentPatch},
    },
    error::{InvalidSnafu, RosterResult},
};
use email_address::EmailAddress;
use serde::Serialize;
use serde_json::{Map, Value};
use snafu::{OptionExt, ensure};
use std::collections::BTreeMap;

/// Field key to every message that field failed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: StudentField, message: String) {
        self.0.entry(field.key()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: StudentField) -> Option<&[String]> {
        self.0.get(field.key()).map(Vec::as_slice)
    }

    pub fn first(&self, field: StudentField) -> Option<&str> {
        self.get(field)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    pub fn has(&self, field: StudentField) -> bool {
        self.0.contains_key(field.key())
    }

    pub fn required(field: StudentField) -> Self {
        let mut errors = Self::default();
        errors.add(field, format!("The {} field is required.", field.label()));
        errors
    }

    pub fn taken(field: StudentField) -> Self {
        let mut errors = Self::default();
        errors.add(field, format!("The {} has already been taken.", field.label()));
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

type FieldValues = BTreeMap<StudentField, Option<String>>;

enum Normalised {
    Null,
    Text(String),
    NotAString,
}

fn normalise(value: &Value) -> Normalised {
    match value {
        Value::Null => Normalised::Null,
        Value::String(s) => match s.trim() {
            "" => Normalised::Null,
            trimmed => Normalised::Text(trimmed.to_string()),
        },
        _ => Normalised::NotAString,
    }
}

/// Runs every rule that does not need the store.
pub fn check(input: &Map<String, Value>, mode: Mode) -> (FieldValues, ValidationErrors) {
    let mut values = FieldValues::new();
    let mut errors = ValidationErrors::default();

    for field in StudentField::ALL {
        let label = field.label();
        let Some(raw) = input.get(field.key()) else {
            if mode == Mode::Create && field.is_required() {
                errors.add(field, format!("The {label} field is required."));
            }
            continue;
        };

        match normalise(raw) {
            Normalised::Null if field.is_required() => {
                errors.add(field, format!("The {label} field is required."));
            }
            Normalised::Null => {
                values.insert(field, None);
            }
            Normalised::NotAString if field == StudentField::Email => {
                errors.add(field, format!("The {label} field must be a valid email address."));
            }
            Normalised::NotAString => {
                errors.add(field, format!("The {label} field must be a string."));
            }
            Normalised::Text(text) => {
                let mut passed = true;

                if field == StudentField::Email && !EmailAddress::is_valid(&text) {
                    errors.add(field, format!("The {label} field must be a valid email address."));
                    passed = false;
                }
                let max = field.max_len();
                if text.chars().count() > max {
                    errors.add(
                        field,
                        format!("The {label} field must not be greater than {max} characters."),
                    );
                    passed = false;
                }

                if passed {
                    values.insert(field, Some(text));
                }
            }
        }
    }

    (values, errors)
}

async fn check_unique_email(
    values: &FieldValues,
    except: Option<i64>,
    store: &dyn StudentStore,
    errors: &mut ValidationErrors,
) -> RosterResult<()> {
    if errors.has(StudentField::Email) {
        return Ok(());
    }
    let Some(Some(email)) = values.get(&StudentField::Email) else {
        return Ok(());
    };

    if store.email_taken(email, except).await? {
        let field = StudentField::Email;
        errors.add(field, format!("The {} has already been taken.", field.label()));
    }
    Ok(())
}

fn take_required(values: &mut FieldValues, field: StudentField) -> RosterResult<String> {
    values
        .remove(&field)
        .flatten()
        .context(InvalidSnafu {
            errors: ValidationErrors::required(field),
        })
}

pub async fn validate_new(
    input: &Map<String, Value>,
    store: &dyn StudentStore,
) -> RosterResult<NewStudent> {
    let (mut values, mut errors) = check(input, Mode::Create);
    check_unique_email(&values, None, store, &mut errors).await?;
    ensure!(errors.is_empty(), InvalidSnafu { errors });

    let first_name = take_required(&mut values, StudentField::FirstName)?;
    let last_name = take_required(&mut values, StudentField::LastName)?;
    let email = take_required(&mut values, StudentField::Email)?;
    let mut take = |field| values.remove(&field).flatten();

    Ok(NewStudent {
        first_name,
        last_name,
        email,
        gender: take(StudentField::Gender),
        phone_number: take(StudentField::PhoneNumber),
        address: take(StudentField::Address),
        grade_level: take(StudentField::GradeLevel),
        major: take(StudentField::Major),
        academic_status: take(StudentField::AcademicStatus),
    })
}

pub async fn validate_patch(
    input: &Map<String, Value>,
    id: i64,
    store: &dyn StudentStore,
) -> RosterResult<StudentPatch> {
    let (values, mut errors) = check(input, Mode::Update);
    check_unique_email(&values, Some(id), store, &mut errors).await?;
    ensure!(errors.is_empty(), InvalidSnafu { errors });

    Ok(StudentPatch::from(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::memory_store::MemoryStudentStore, error::RosterError};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    fn ann() -> Map<String, Value> {
        object(json!({"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"}))
    }

    #[test]
    fn create_requires_names_and_email() {
        let (_, errors) = check(&Map::new(), Mode::Create);
        assert_eq!(
            errors.first(StudentField::FirstName),
            Some("The first name field is required.")
        );
        assert_eq!(
            errors.first(StudentField::LastName),
            Some("The last name field is required.")
        );
        assert_eq!(
            errors.first(StudentField::Email),
            Some("The email field is required.")
        );
        assert!(!errors.has(StudentField::Major));
    }

    #[test]
    fn update_only_checks_sent_keys() {
        let (values, errors) = check(&object(json!({"major": "CS"})), Mode::Update);
        assert!(errors.is_empty());
        assert_eq!(values.len(), 1);
        assert_eq!(values[&StudentField::Major].as_deref(), Some("CS"));
    }

    #[test]
    fn update_rejects_clearing_required_fields() {
        let (_, errors) = check(
            &object(json!({"firstName": null, "lastName": "  "})),
            Mode::Update,
        );
        assert!(errors.has(StudentField::FirstName));
        assert!(errors.has(StudentField::LastName));
    }

    #[test]
    fn strings_are_trimmed_and_blank_means_null() {
        let mut input = ann();
        input.insert("firstName".into(), json!("  Ann "));
        input.insert("address".into(), json!(""));
        let (values, errors) = check(&input, Mode::Create);

        assert!(errors.is_empty());
        assert_eq!(values[&StudentField::FirstName].as_deref(), Some("Ann"));
        assert_eq!(values[&StudentField::Address], None);
    }

    #[test]
    fn length_type_and_format_rules() {
        let mut input = ann();
        input.insert("email".into(), json!("not-an-email"));
        input.insert("phoneNumber".into(), json!("0".repeat(21)));
        input.insert("gradeLevel".into(), json!(11));
        input.insert("major".into(), json!("é".repeat(100)));
        let (_, errors) = check(&input, Mode::Create);

        assert_eq!(
            errors.first(StudentField::Email),
            Some("The email field must be a valid email address.")
        );
        assert_eq!(
            errors.first(StudentField::PhoneNumber),
            Some("The phone number field must not be greater than 20 characters.")
        );
        assert_eq!(
            errors.first(StudentField::GradeLevel),
            Some("The grade level field must be a string.")
        );
        assert!(!errors.has(StudentField::Major));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut input = ann();
        input.insert("id".into(), json!(99));
        input.insert("favouriteColour".into(), json!("blue"));
        let (values, errors) = check(&input, Mode::Create);

        assert!(errors.is_empty());
        assert_eq!(values.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_on_email() {
        let store = MemoryStudentStore::default();
        let first = validate_new(&ann(), &store).await.unwrap();
        let saved = store.insert_into_database(first).await.unwrap();

        let Err(RosterError::Invalid { errors }) = validate_new(&ann(), &store).await else {
            panic!("duplicate email should not validate");
        };
        assert_eq!(
            errors.get(StudentField::Email),
            Some(["The email has already been taken.".to_string()].as_slice())
        );

        let own_email = object(json!({"email": "ann@x.com", "major": "CS"}));
        let patch = validate_patch(&own_email, saved.id, &store).await.unwrap();
        assert_eq!(patch.email(), Some("ann@x.com"));
    }
}
