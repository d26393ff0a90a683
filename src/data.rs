use crate::{
    data::student::{NewStudent, Student, StudentPatch},
    error::RosterResult,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod memory_store;
pub mod postgres_store;
pub mod student;

/// Backing storage for student records.
///
/// Implementations must keep `email` unique: an insert or update that would duplicate an
/// email fails with [`crate::error::RosterError::Invalid`] naming the `email` field.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    /// All records, ordered by id.
    async fn get_all(&self) -> RosterResult<Vec<Student>>;
    async fn get_by_id(&self, id: i64) -> RosterResult<Option<Student>>;
    /// Whether any record other than `except` already uses `email`.
    async fn email_taken(&self, email: &str, except: Option<i64>) -> RosterResult<bool>;
    async fn insert_into_database(&self, to_be_added: NewStudent) -> RosterResult<Student>;
    /// `Ok(None)` when no record has that id.
    async fn update_in_database(&self, id: i64, patch: StudentPatch)
    -> RosterResult<Option<Student>>;
    /// `Ok(false)` when no record has that id.
    async fn remove_from_database(&self, id: i64) -> RosterResult<bool>;

    async fn close(&self) {}
}
