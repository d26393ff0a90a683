//! Student operations shared by the JSON API and the HTML pages: validate, then touch the store.

use crate::{
    data::{StudentStore, student::Student},
    error::{MissingStudentSnafu, RosterResult},
};
use serde_json::{Map, Value};
use snafu::OptionExt;

pub mod validation;

/// Ids that are not integers can never match a row, so they are reported as missing.
fn parse_id(raw: &str) -> RosterResult<i64> {
    raw.trim()
        .parse()
        .ok()
        .context(MissingStudentSnafu { id: raw })
}

pub async fn list_students(store: &dyn StudentStore) -> RosterResult<Vec<Student>> {
    store.get_all().await
}

pub async fn find_student(store: &dyn StudentStore, id: &str) -> RosterResult<Student> {
    let parsed = parse_id(id)?;
    store
        .get_by_id(parsed)
        .await?
        .context(MissingStudentSnafu { id })
}

pub async fn create_student(
    store: &dyn StudentStore,
    input: &Map<String, Value>,
) -> RosterResult<Student> {
    let to_be_added = validation::validate_new(input, store).await?;
    let student = store.insert_into_database(to_be_added).await?;
    info!(id = student.id, "Created student");
    Ok(student)
}

/// The record has to exist before its input is validated, so a bad id is a 404 rather than a 422.
pub async fn update_student(
    store: &dyn StudentStore,
    id: &str,
    input: &Map<String, Value>,
) -> RosterResult<Student> {
    let existing = find_student(store, id).await?;
    let patch = validation::validate_patch(input, existing.id, store).await?;
    if patch.is_empty() {
        return Ok(existing);
    }

    let student = store
        .update_in_database(existing.id, patch)
        .await?
        .context(MissingStudentSnafu { id })?;
    info!(id = student.id, "Updated student");
    Ok(student)
}

pub async fn delete_student(store: &dyn StudentStore, id: &str) -> RosterResult<()> {
    let parsed = parse_id(id)?;
    let removed = store.remove_from_database(parsed).await?;
    snafu::ensure!(removed, MissingStudentSnafu { id });
    info!(id = parsed, "Deleted student");
    Ok(())
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

    #[tokio::test]
    async fn missing_and_malformed_ids_are_not_found() {
        let store = MemoryStudentStore::default();
        for id in ["42", "abc", "-1", ""] {
            assert!(matches!(
                find_student(&store, id).await,
                Err(RosterError::MissingStudent { .. })
            ));
            assert!(matches!(
                update_student(&store, id, &Map::new()).await,
                Err(RosterError::MissingStudent { .. })
            ));
            assert!(matches!(
                delete_student(&store, id).await,
                Err(RosterError::MissingStudent { .. })
            ));
        }
    }

    #[tokio::test]
    async fn rejected_creates_persist_nothing() {
        let store = MemoryStudentStore::default();
        let missing_email = object(json!({"firstName": "Ann", "lastName": "Lee"}));
        assert!(create_student(&store, &missing_email).await.is_err());
        assert!(list_students(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_leaves_unsent_fields_alone() {
        let store = MemoryStudentStore::default();
        let created = create_student(
            &store,
            &object(json!({
                "firstName": "Ann",
                "lastName": "Lee",
                "email": "ann@x.com",
                "gradeLevel": "10",
            })),
        )
        .await
        .unwrap();

        let id = created.id.to_string();
        let updated = update_student(&store, &id, &object(json!({"major": "CS"})))
            .await
            .unwrap();
        assert_eq!(updated.major.as_deref(), Some("CS"));
        assert_eq!(updated.grade_level.as_deref(), Some("10"));
        assert_eq!(updated.first_name, created.first_name);

        let cleared = update_student(&store, &id, &object(json!({"gradeLevel": null})))
            .await
            .unwrap();
        assert_eq!(cleared.grade_level, None);
        assert_eq!(cleared.major.as_deref(), Some("CS"));
    }

    #[tokio::test]
    async fn deleted_students_are_gone() {
        let store = MemoryStudentStore::default();
        let created = create_student(
            &store,
            &object(json!({"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"})),
        )
        .await
        .unwrap();
        let id = created.id.to_string();

        delete_student(&store, &id).await.unwrap();
        assert!(matches!(
            find_student(&store, &id).await,
            Err(RosterError::MissingStudent { .. })
        ));
    }
}
