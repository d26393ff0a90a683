use crate::{
    data::student::Student,
    maud_conveniences::{alert_danger, card, render_table, spinner, status_badge, title},
    routes::flash_error,
    service,
    state::RosterState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::Response,
    response::IntoResponse,
};
use maud::{Markup, html};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this student?";

pub async fn get_student_list(State(state): State<RosterState>) -> Markup {
    state.render(card(
        html! {
            (title("Student List"))
            a href="/students/create" class="bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" {"Add Student"}
        },
        html! {
            div id="student_table" hx-get="/internal/students" hx-trigger="load" {
                (spinner())
            }
        },
    ))
}

pub async fn internal_get_student_table(State(state): State<RosterState>) -> Markup {
    match service::list_students(&*state).await {
        Ok(students) => render_student_table(&students),
        Err(e) => {
            error!(?e, "Error fetching students");
            alert_danger("Failed to fetch students")
        }
    }
}

fn render_student_table(students: &[Student]) -> Markup {
    if students.is_empty() {
        return html! {
            p class="text-center" {"No students found"}
        };
    }

    let rows: Vec<[Markup; 7]> = students
        .iter()
        .map(|student| {
            [
                html! {(student.id)},
                html! {(student)},
                html! {(student.email)},
                html! {(student.grade_level.as_deref().unwrap_or("-"))},
                html! {(student.major.as_deref().unwrap_or("-"))},
                status_badge(student.academic_status.as_deref(), student.is_active()),
                html! {
                    div class="flex flex-row space-x-2" {
                        a href={"/students/" (student.id)} class="bg-slate-600 hover:bg-slate-800 py-1 px-2 rounded text-sm" {"View"}
                        a href={"/students/" (student.id) "/edit"} class="bg-yellow-600 hover:bg-yellow-800 py-1 px-2 rounded text-sm" {"Edit"}
                        button hx-delete={"/internal/students/" (student.id)} hx-confirm=(DELETE_CONFIRMATION) hx-target="closest tr" hx-swap="outerHTML" class="bg-red-600 hover:bg-red-800 py-1 px-2 rounded text-sm" {
                            "Delete"
                        }
                    }
                },
            ]
        })
        .collect();

    render_table(
        ["ID", "Name", "Email", "Grade Level", "Major", "Status", "Actions"],
        rows,
    )
}

/// An empty body swaps the row out of the table.
pub async fn internal_delete_student_row(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> Response<Body> {
    match service::delete_student(&*state, &id).await {
        Ok(()) => ().into_response(),
        Err(e) => {
            warn!(?e, "Error deleting student");
            flash_error("Failed to delete student")
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{json_request, memory_app, send, send_raw};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn page_loads_the_table_lazily() {
        let app = memory_app();
        let (status, _, page) = send_raw(&app, json_request(Method::GET, "/", &json!(null))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains("Student List"));
        assert!(page.contains(r#"hx-get="/internal/students""#));
    }

    #[tokio::test]
    async fn table_lists_students_or_says_there_are_none() {
        let app = memory_app();
        let (_, _, empty) = send_raw(
            &app,
            json_request(Method::GET, "/internal/students", &json!(null)),
        )
        .await;
        assert!(empty.contains("No students found"));

        send(
            &app,
            json_request(
                Method::POST,
                "/api/students",
                &json!({"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com", "academicStatus": "active"}),
            ),
        )
        .await;
        let (_, _, table) = send_raw(
            &app,
            json_request(Method::GET, "/internal/students", &json!(null)),
        )
        .await;
        assert!(table.contains("Ann Lee"));
        assert!(table.contains("ann@x.com"));
        assert!(table.contains("bg-green-600"));
        assert!(table.contains(r#"hx-delete="/internal/students/1""#));
        assert!(table.contains("Are you sure you want to delete this student?"));
    }

    #[tokio::test]
    async fn deleting_a_row() {
        let app = memory_app();
        send(
            &app,
            json_request(
                Method::POST,
                "/api/students",
                &json!({"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"}),
            ),
        )
        .await;

        let (status, headers, body) = send_raw(
            &app,
            json_request(Method::DELETE, "/internal/students/1", &json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert!(headers.get("hx-retarget").is_none());

        let (status, headers, body) = send_raw(
            &app,
            json_request(Method::DELETE, "/internal/students/1", &json!(null)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["hx-retarget"], "#flash");
        assert!(body.contains("Failed to delete student"));
    }
}
