use crate::{
    data::student::{Student, StudentField},
    error::{RosterError, RosterResult},
    maud_conveniences::{
        alert_danger, card, form_submit_button, select_form_element, simple_form_element,
        subtitle, title,
    },
    routes::{hx_redirect, is_htmx, page_error},
    service::{self, validation::ValidationErrors},
    state::RosterState,
};
use axum::{
    Form,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Response},
    response::{IntoResponse, Redirect},
};
use maud::{Markup, html};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

const GENERAL_ERROR: &str = "An error occurred while saving the student. Please try again.";

const GENDER_OPTIONS: [(&str, &str); 5] = [
    ("", "Select Gender"),
    ("Male", "Male"),
    ("Female", "Female"),
    ("Other", "Other"),
    ("Prefer not to say", "Prefer not to say"),
];

const STATUS_OPTIONS: [(&str, &str); 6] = [
    ("", "Select Status"),
    ("active", "Active"),
    ("graduated", "Graduated"),
    ("on leave", "On Leave"),
    ("withdrawn", "Withdrawn"),
    ("suspended", "Suspended"),
];

enum FormMode {
    Create,
    Edit(String),
}

impl FormMode {
    fn action(&self) -> String {
        match self {
            Self::Create => "/students".to_string(),
            Self::Edit(id) => format!("/students/{id}"),
        }
    }

    const fn heading(&self) -> &'static str {
        match self {
            Self::Create => "Add New Student",
            Self::Edit(_) => "Edit Student",
        }
    }
}

#[derive(Default)]
struct FormValues(BTreeMap<StudentField, String>);

impl FormValues {
    fn blank() -> Self {
        let mut values = Self::default();
        values
            .0
            .insert(StudentField::AcademicStatus, "active".to_string());
        values
    }

    fn get(&self, field: StudentField) -> &str {
        self.0.get(&field).map_or("", String::as_str)
    }
}

impl From<&Student> for FormValues {
    fn from(student: &Student) -> Self {
        Self(
            StudentField::ALL
                .into_iter()
                .filter_map(|field| Some((field, student.value(field)?.to_string())))
                .collect(),
        )
    }
}

impl From<&HashMap<String, String>> for FormValues {
    fn from(submitted: &HashMap<String, String>) -> Self {
        Self(
            submitted
                .iter()
                .filter_map(|(key, value)| Some((StudentField::from_key(key)?, value.clone())))
                .collect(),
        )
    }
}

/// Form posts go through the same rules as JSON bodies.
fn as_json_input(submitted: HashMap<String, String>) -> Map<String, Value> {
    submitted
        .into_iter()
        .filter(|(key, _)| StudentField::from_key(key).is_some())
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

fn render_form(
    mode: &FormMode,
    values: &FormValues,
    errors: &ValidationErrors,
    general_error: Option<&str>,
) -> Markup {
    let action = mode.action();
    let text = |field: StudentField, label: &'static str, ty: Option<&'static str>| {
        simple_form_element(
            field.key(),
            label,
            ty,
            field.is_required(),
            values.get(field),
            errors.first(field),
        )
    };
    let select = |field: StudentField, label: &'static str, options: &[(&'static str, &'static str)]| {
        select_form_element(field.key(), label, options, values.get(field), errors.first(field))
    };

    html! {
        form id="student_form" method="post" action=(action) hx-post=(action) hx-target="this" hx-swap="outerHTML" {
            @if let Some(general_error) = general_error {
                (alert_danger(general_error))
            }

            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (text(StudentField::FirstName, "First Name *", None))
                (text(StudentField::LastName, "Last Name *", None))
                (text(StudentField::Email, "Email *", Some("email")))
                (text(StudentField::PhoneNumber, "Phone Number", None))
                (text(StudentField::Address, "Address", None))
                (select(StudentField::Gender, "Gender", GENDER_OPTIONS.as_slice()))
            }

            div class="mt-4" {
                (subtitle("Academic Information"))
            }
            (select(StudentField::AcademicStatus, "Academic Status", STATUS_OPTIONS.as_slice()))
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-4" {
                (text(StudentField::GradeLevel, "Grade Level/Year", None))
                (text(StudentField::Major, "Major/Program", None))
            }

            div class="flex items-center justify-between mt-4" {
                a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {"Cancel"}
                (form_submit_button("Save Student", "Saving..."))
            }
        }
    }
}

fn render_page(state: &RosterState, mode: &FormMode, values: &FormValues) -> Markup {
    state.render(card(
        title(mode.heading()),
        render_form(mode, values, &ValidationErrors::default(), None),
    ))
}

pub async fn get_create_form(State(state): State<RosterState>) -> Markup {
    render_page(&state, &FormMode::Create, &FormValues::blank())
}

pub async fn get_edit_form(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> Response<Body> {
    match service::find_student(&*state, &id).await {
        Ok(student) => {
            render_page(&state, &FormMode::Edit(id), &FormValues::from(&student)).into_response()
        }
        Err(e) => page_error(&state, &e, "Failed to fetch student details"),
    }
}

/// Success leaves the form for the list. Anything else re-renders the form with what was
/// submitted, annotated per field for validation failures or with a general banner otherwise.
fn respond_to_submission(
    state: &RosterState,
    headers: &HeaderMap,
    mode: &FormMode,
    submitted: &HashMap<String, String>,
    outcome: RosterResult<Student>,
) -> Response<Body> {
    let htmx = is_htmx(headers);

    let form = match outcome {
        Ok(_) if htmx => return hx_redirect("/"),
        Ok(_) => return Redirect::to("/").into_response(),
        Err(RosterError::Invalid { errors }) => {
            render_form(mode, &FormValues::from(submitted), &errors, None)
        }
        Err(e) => {
            error!(?e, "Error saving student");
            render_form(
                mode,
                &FormValues::from(submitted),
                &ValidationErrors::default(),
                Some(GENERAL_ERROR),
            )
        }
    };

    if htmx {
        form.into_response()
    } else {
        state.render(card(title(mode.heading()), form)).into_response()
    }
}

pub async fn post_create_form(
    State(state): State<RosterState>,
    headers: HeaderMap,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response<Body> {
    let outcome = service::create_student(&*state, &as_json_input(submitted.clone())).await;
    respond_to_submission(&state, &headers, &FormMode::Create, &submitted, outcome)
}

pub async fn post_edit_form(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(submitted): Form<HashMap<String, String>>,
) -> Response<Body> {
    let outcome = service::update_student(&*state, &id, &as_json_input(submitted.clone())).await;
    respond_to_submission(&state, &headers, &FormMode::Edit(id), &submitted, outcome)
}
