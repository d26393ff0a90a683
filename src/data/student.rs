use maud::{Escaper, Render};
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Write};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub grade_level: Option<String>,
    pub major: Option<String>,
    pub academic_status: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Every user-editable attribute of a [`Student`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentField {
    FirstName,
    LastName,
    Email,
    Gender,
    PhoneNumber,
    Address,
    GradeLevel,
    Major,
    AcademicStatus,
}

impl StudentField {
    pub const ALL: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Gender,
        Self::PhoneNumber,
        Self::Address,
        Self::GradeLevel,
        Self::Major,
        Self::AcademicStatus,
    ];

    /// Name on the wire, in JSON bodies and in HTML forms.
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Gender => "gender",
            Self::PhoneNumber => "phoneNumber",
            Self::Address => "address",
            Self::GradeLevel => "gradeLevel",
            Self::Major => "major",
            Self::AcademicStatus => "academicStatus",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Gender => "gender",
            Self::PhoneNumber => "phone_number",
            Self::Address => "address",
            Self::GradeLevel => "grade_level",
            Self::Major => "major",
            Self::AcademicStatus => "academic_status",
        }
    }

    /// Human name used inside validation messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "email",
            Self::Gender => "gender",
            Self::PhoneNumber => "phone number",
            Self::Address => "address",
            Self::GradeLevel => "grade level",
            Self::Major => "major",
            Self::AcademicStatus => "academic status",
        }
    }

    pub const fn max_len(self) -> usize {
        match self {
            Self::FirstName | Self::LastName | Self::Email | Self::Address => 255,
            Self::Major => 100,
            Self::Gender | Self::GradeLevel | Self::AcademicStatus => 50,
            Self::PhoneNumber => 20,
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(self, Self::FirstName | Self::LastName | Self::Email)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl Student {
    pub fn value(&self, field: StudentField) -> Option<&str> {
        match field {
            StudentField::FirstName => Some(self.first_name.as_str()),
            StudentField::LastName => Some(self.last_name.as_str()),
            StudentField::Email => Some(self.email.as_str()),
            StudentField::Gender => self.gender.as_deref(),
            StudentField::PhoneNumber => self.phone_number.as_deref(),
            StudentField::Address => self.address.as_deref(),
            StudentField::GradeLevel => self.grade_level.as_deref(),
            StudentField::Major => self.major.as_deref(),
            StudentField::AcademicStatus => self.academic_status.as_deref(),
        }
    }

    /// Required fields ignore `None`, they can never be cleared.
    pub fn set(&mut self, field: StudentField, value: Option<String>) {
        match (field, value) {
            (StudentField::FirstName, Some(value)) => self.first_name = value,
            (StudentField::LastName, Some(value)) => self.last_name = value,
            (StudentField::Email, Some(value)) => self.email = value,
            (StudentField::FirstName | StudentField::LastName | StudentField::Email, None) => {}
            (StudentField::Gender, value) => self.gender = value,
            (StudentField::PhoneNumber, value) => self.phone_number = value,
            (StudentField::Address, value) => self.address = value,
            (StudentField::GradeLevel, value) => self.grade_level = value,
            (StudentField::Major, value) => self.major = value,
            (StudentField::AcademicStatus, value) => self.academic_status = value,
        }
    }

    pub fn is_active(&self) -> bool {
        self.academic_status.as_deref() == Some("active")
    }
}

impl Render for Student {
    fn render_to(&self, buffer: &mut String) {
        //writing into a `String` cannot fail
        let _ = write!(Escaper::new(buffer), "{} {}", self.first_name, self.last_name);
    }
}

/// A validated set of values for a student that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub grade_level: Option<String>,
    pub major: Option<String>,
    pub academic_status: Option<String>,
}

impl NewStudent {
    pub fn into_student(self, id: i64, now: OffsetDateTime) -> Student {
        Student {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            gender: self.gender,
            phone_number: self.phone_number,
            address: self.address,
            grade_level: self.grade_level,
            major: self.major,
            academic_status: self.academic_status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated changes for an existing student. Fields that are absent stay untouched,
/// a `None` value clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch(BTreeMap<StudentField, Option<String>>);

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get(&StudentField::Email).and_then(Option::as_deref)
    }

    pub fn apply_to(self, student: &mut Student) {
        for (field, value) in self {
            student.set(field, value);
        }
    }
}

impl From<BTreeMap<StudentField, Option<String>>> for StudentPatch {
    fn from(values: BTreeMap<StudentField, Option<String>>) -> Self {
        Self(values)
    }
}

impl IntoIterator for StudentPatch {
    type Item = (StudentField, Option<String>);
    type IntoIter = std::collections::btree_map::IntoIter<StudentField, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
