use crate::{envelope::Envelope, service::validation::ValidationErrors};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::num::ParseIntError;

pub type RosterResult<T> = Result<T, RosterError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unknown store backend {:?}, expected `postgres` or `memory`", found))]
    UnknownStore { found: String },
    #[snafu(display("Student not found"))]
    MissingStudent { id: String },
    #[snafu(display("The given data was invalid"))]
    Invalid { errors: ValidationErrors },
    #[snafu(display("{}", source.body_text()))]
    JsonBody { source: JsonRejection },
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const UE: StatusCode = StatusCode::UNPROCESSABLE_ENTITY; //failed validation

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::BadEnvVar { .. } | Self::ParseNumber { .. } | Self::UnknownStore { .. } => ISE,
            Self::MissingStudent { .. } => NF,
            Self::Invalid { .. } => UE,
            Self::JsonBody { source } => source.status(),
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            debug!(?self, %status_code, "Request rejected");
        }

        let body = match self {
            Self::Invalid { errors } => Envelope::invalid(errors),
            other => Envelope::failure(other.to_string()),
        };
        (status_code, Json(body)).into_response()
    }
}
