use crate::{
    data::student::Student,
    maud_conveniences::{card, status_badge, subtitle, title},
    routes::{flash_error, hx_redirect, page_error, student_list::DELETE_CONFIRMATION},
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

pub async fn get_student_detail(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> Response<Body> {
    match service::find_student(&*state, &id).await {
        Ok(student) => state.render(render_student(&student)).into_response(),
        Err(e) => page_error(&state, &e, "Failed to fetch student details"),
    }
}

fn info_row(heading: &'static str, value: Markup) -> Markup {
    html! {
        tr {
            th class="py-2 pr-4 text-left text-gray-300" {(heading)}
            td class="py-2 text-gray-200" {(value)}
        }
    }
}

fn or_dash(value: Option<&str>) -> Markup {
    html! {(value.unwrap_or("-"))}
}

fn render_student(student: &Student) -> Markup {
    let heading = html! {
        (title("Student Detail"))
        div class="flex flex-row space-x-2" {
            a href="/" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {"Back to List"}
            a href={"/students/" (student.id) "/edit"} class="bg-yellow-600 hover:bg-yellow-800 font-bold py-2 px-4 rounded" {"Edit"}
            button hx-delete={"/students/" (student.id)} hx-confirm=(DELETE_CONFIRMATION) class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {"Delete"}
        }
    };

    let body = html! {
        div class="grid grid-cols-1 md:grid-cols-2 gap-8" {
            div {
                (subtitle("Personal Information"))
                table class="w-full" {
                    tbody {
                        (info_row("ID", html! {(student.id)}))
                        (info_row("Name", html! {(student)}))
                        (info_row("Email", html! {(student.email)}))
                        (info_row("Phone", or_dash(student.phone_number.as_deref())))
                        (info_row("Gender", or_dash(student.gender.as_deref())))
                    }
                }
            }
            div {
                (subtitle("Academic Information"))
                table class="w-full" {
                    tbody {
                        (info_row("Grade Level", or_dash(student.grade_level.as_deref())))
                        (info_row("Major", or_dash(student.major.as_deref())))
                        (info_row("Status", status_badge(student.academic_status.as_deref(), student.is_active())))
                    }
                }
            }
        }
        div class="mt-4" {
            (subtitle("Address"))
            p {
                @if let Some(address) = &student.address {
                    (address)
                } @else {
                    "No address information available"
                }
            }
        }
    };

    card(heading, body)
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> Response<Body> {
    match service::delete_student(&*state, &id).await {
        Ok(()) => hx_redirect("/"),
        Err(e) => {
            warn!(?e, "Error deleting student");
            flash_error("Failed to delete student")
        }
    }
}
