//! JSON endpoints under `/api`. Every response, including failures, is an [`Envelope`].

use crate::{
    data::student::Student,
    envelope::{self, Envelope},
    error::{JsonBodySnafu, RosterResult},
    service,
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Map, Value};
use snafu::ResultExt;

type JsonResponse<T> = (StatusCode, Json<Envelope<T>>);
type JsonBody = Result<Option<Json<Map<String, Value>>>, JsonRejection>;

/// A request without a JSON content type reads as an empty object.
fn body(payload: JsonBody) -> RosterResult<Map<String, Value>> {
    let payload = payload.context(JsonBodySnafu)?;
    Ok(payload.map(|Json(map)| map).unwrap_or_default())
}

pub async fn list_students(State(state): State<RosterState>) -> RosterResult<JsonResponse<Vec<Student>>> {
    let students = service::list_students(&*state).await?;
    Ok(envelope::ok(students))
}

pub async fn create_student(
    State(state): State<RosterState>,
    payload: JsonBody,
) -> RosterResult<JsonResponse<Student>> {
    let input = body(payload)?;
    let student = service::create_student(&*state, &input).await?;
    Ok(envelope::created(student))
}

pub async fn get_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<JsonResponse<Student>> {
    let student = service::find_student(&*state, &id).await?;
    Ok(envelope::ok(student))
}

pub async fn update_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    payload: JsonBody,
) -> RosterResult<JsonResponse<Student>> {
    let input = body(payload)?;
    let student = service::update_student(&*state, &id, &input).await?;
    Ok(envelope::ok(student))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<JsonResponse<()>> {
    service::delete_student(&*state, &id).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::acknowledge("Student deleted successfully")),
    ))
}
