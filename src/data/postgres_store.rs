use crate::{
    config::DbConfig,
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentField, StudentPatch},
    },
    error::{MakeQuerySnafu, MigrateSnafu, OpenDatabaseSnafu, RosterError, RosterResult},
    service::validation::ValidationErrors,
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, QueryBuilder, postgres::PgPoolOptions};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, gender, phone_number, address, grade_level, major, academic_status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
}

impl PostgresStudentStore {
    pub async fn connect(options: PgPoolOptions, db_config: &DbConfig) -> RosterResult<Self> {
        let pool = options
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }
}

fn select_students() -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(STUDENT_COLUMNS).push(" FROM public.students");
    builder
}

/// The unique index on `email` is the last line of defence against two concurrent writers.
fn query_error(source: sqlx::Error) -> RosterError {
    match &source {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            RosterError::Invalid {
                errors: ValidationErrors::taken(StudentField::Email),
            }
        }
        _ => RosterError::MakeQuery { source },
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn get_all(&self) -> RosterResult<Vec<Student>> {
        let mut builder = select_students();
        builder.push(" ORDER BY id");

        builder
            .build_query_as::<Student>()
            .fetch_all(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn get_by_id(&self, id: i64) -> RosterResult<Option<Student>> {
        let mut builder = select_students();
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build_query_as::<Student>()
            .fetch_optional(&self.pool)
            .await
            .context(MakeQuerySnafu)
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> RosterResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM public.students WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .context(MakeQuerySnafu)
    }

    async fn insert_into_database(&self, to_be_added: NewStudent) -> RosterResult<Student> {
        let NewStudent {
            first_name,
            last_name,
            email,
            gender,
            phone_number,
            address,
            grade_level,
            major,
            academic_status,
        } = to_be_added;

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO public.students (first_name, last_name, email, gender, phone_number, address, grade_level, major, academic_status) ",
        );
        builder.push_values(
            [(
                first_name,
                last_name,
                email,
                gender,
                phone_number,
                address,
                grade_level,
                major,
                academic_status,
            )],
            |mut row, values| {
                row.push_bind(values.0)
                    .push_bind(values.1)
                    .push_bind(values.2)
                    .push_bind(values.3)
                    .push_bind(values.4)
                    .push_bind(values.5)
                    .push_bind(values.6)
                    .push_bind(values.7)
                    .push_bind(values.8);
            },
        );
        builder.push(" RETURNING ").push(STUDENT_COLUMNS);

        builder
            .build_query_as::<Student>()
            .fetch_one(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn update_in_database(
        &self,
        id: i64,
        patch: StudentPatch,
    ) -> RosterResult<Option<Student>> {
        if patch.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE public.students SET ");
        let mut assignments = builder.separated(", ");
        for (field, value) in patch {
            assignments
                .push(field.column())
                .push_unseparated(" = ")
                .push_bind_unseparated(value);
        }
        assignments.push("updated_at = now()");
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(STUDENT_COLUMNS);

        builder
            .build_query_as::<Student>()
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn remove_from_database(&self, id: i64) -> RosterResult<bool> {
        let result = sqlx::query("DELETE FROM public.students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context(MakeQuerySnafu)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn student_with_email(email: &str) -> NewStudent {
        NewStudent {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: email.into(),
            gender: None,
            phone_number: None,
            address: None,
            grade_level: None,
            major: None,
            academic_status: None,
        }
    }

    #[tokio::test]
    #[ignore = "needs a live postgres configured through DB_* variables"]
    async fn unique_violations_become_validation_errors() {
        let _ = dotenvy::dotenv();
        let db_config = DbConfig::new().expect("DB_* variables");
        let options = PgPoolOptions::new().max_connections(2);
        let store = PostgresStudentStore::connect(options, &db_config)
            .await
            .expect("connect");

        let stamp = OffsetDateTime::now_utc().unix_timestamp_nanos();
        let email = format!("ann-{stamp}@x.com");
        let other_email = format!("bob-{stamp}@x.com");

        let ann = store
            .insert_into_database(student_with_email(&email))
            .await
            .unwrap();
        let bob = store
            .insert_into_database(student_with_email(&other_email))
            .await
            .unwrap();

        assert_eq!(store.get_by_id(ann.id).await.unwrap(), Some(ann.clone()));
        assert!(store.get_all().await.unwrap().contains(&bob));

        let Err(RosterError::Invalid { errors }) =
            store.insert_into_database(student_with_email(&email)).await
        else {
            panic!("duplicate insert should be rejected as invalid");
        };
        assert!(errors.has(StudentField::Email));

        let patch = StudentPatch::from(std::collections::BTreeMap::from([(
            StudentField::Email,
            Some(email.clone()),
        )]));
        let Err(RosterError::Invalid { errors }) = store.update_in_database(bob.id, patch).await
        else {
            panic!("duplicate update should be rejected as invalid");
        };
        assert!(errors.has(StudentField::Email));

        assert!(store.remove_from_database(ann.id).await.unwrap());
        assert!(store.remove_from_database(bob.id).await.unwrap());
        store.close().await;
    }
}
