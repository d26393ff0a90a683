use crate::{
    error::RosterError,
    maud_conveniences::{alert_danger, alert_warning},
    state::RosterState,
};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Response, StatusCode},
    response::{Html, IntoResponse},
    routing::{delete, get, post},
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

pub mod api;
pub mod student_detail;
pub mod student_form;
pub mod student_list;

const BODY_LIMIT: usize = 64 * 1024;

pub fn router(state: RosterState) -> Router {
    let api = Router::new()
        .route(
            "/students",
            get(api::list_students).post(api::create_student),
        )
        .route(
            "/students/{id}",
            get(api::get_student)
                .put(api::update_student)
                .patch(api::update_student)
                .delete(api::delete_student),
        )
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(student_list::get_student_list))
        .route("/students", post(student_form::post_create_form))
        .route("/students/create", get(student_form::get_create_form))
        .route(
            "/students/{id}",
            get(student_detail::get_student_detail)
                .post(student_form::post_edit_form)
                .delete(student_detail::delete_student),
        )
        .route("/students/{id}/edit", get(student_form::get_edit_form))
        .route(
            "/internal/students",
            get(student_list::internal_get_student_table),
        )
        .route(
            "/internal/students/{id}",
            delete(student_list::internal_delete_student_row),
        )
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Sends the browser to `location` once htmx sees the response.
pub fn hx_redirect(location: &'static str) -> Response<Body> {
    (StatusCode::OK, [("hx-redirect", location)]).into_response()
}

/// Puts `message` into the page banner instead of wherever the request was targeted.
pub fn flash_error(message: &'static str) -> Response<Body> {
    (
        StatusCode::OK,
        [("hx-retarget", "#flash"), ("hx-reswap", "innerHTML")],
        Html(alert_danger(message).into_string()),
    )
        .into_response()
}

/// Full page for an error: a warning for a missing student, `fallback` for anything else.
pub fn page_error(state: &RosterState, error: &RosterError, fallback: &'static str) -> Response<Body> {
    let status = error.status_code();
    let banner = match error {
        RosterError::MissingStudent { .. } => alert_warning("Student not found"),
        _ => {
            error!(?error, "Error rendering page");
            alert_danger(fallback)
        }
    };

    (status, state.render(banner)).into_response()
}

#[cfg(test)]
pub mod testing {
    use super::router;
    use crate::{data::memory_store::MemoryStudentStore, state::RosterState};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{HeaderMap, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use std::{fmt::Write, sync::Arc};
    use tower::ServiceExt;

    pub fn memory_app() -> Router {
        router(RosterState::from_store(Arc::new(
            MemoryStudentStore::default(),
        )))
    }

    pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        if body.is_null() {
            builder.body(Body::empty()).unwrap()
        } else {
            builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        }
    }

    fn url_encode(s: &str) -> String {
        let mut out = String::new();
        for byte in s.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    out.push(char::from(byte));
                }
                b' ' => out.push('+'),
                _ => write!(out, "%{byte:02X}").unwrap(),
            }
        }
        out
    }

    pub fn form_request(
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        htmx: bool,
    ) -> Request<Body> {
        let body = fields
            .iter()
            .map(|(key, value)| format!("{}={}", url_encode(key), url_encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        builder.body(Body::from(body)).unwrap()
    }

    pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = send_raw(app, request).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}
