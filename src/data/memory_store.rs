use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentField, StudentPatch},
    },
    error::{RosterError, RosterResult},
    service::validation::ValidationErrors,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

/// Keeps every record in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    table: RwLock<Table>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Student>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && Some(row.id) != except)
    }
}

fn duplicate_email() -> RosterError {
    RosterError::Invalid {
        errors: ValidationErrors::taken(StudentField::Email),
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn get_all(&self) -> RosterResult<Vec<Student>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> RosterResult<Option<Student>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> RosterResult<bool> {
        Ok(self.table.read().await.email_taken(email, except))
    }

    async fn insert_into_database(&self, to_be_added: NewStudent) -> RosterResult<Student> {
        let mut table = self.table.write().await;
        if table.email_taken(&to_be_added.email, None) {
            return Err(duplicate_email());
        }

        table.last_id += 1;
        let student = to_be_added.into_student(table.last_id, OffsetDateTime::now_utc());
        table.rows.insert(student.id, student.clone());
        Ok(student)
    }

    async fn update_in_database(
        &self,
        id: i64,
        patch: StudentPatch,
    ) -> RosterResult<Option<Student>> {
        let mut table = self.table.write().await;
        if let Some(email) = patch.email() {
            if table.email_taken(email, Some(id)) {
                return Err(duplicate_email());
            }
        }

        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(row);
        row.updated_at = OffsetDateTime::now_utc();
        Ok(Some(row.clone()))
    }

    async fn remove_from_database(&self, id: i64) -> RosterResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
