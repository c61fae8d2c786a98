//! The response envelope builder.
//!
//! Every outcome — success or failure, single record or page — is wrapped in
//! the same JSON shape: `{"status", "status_code", "msg", "data"}`. Paginated
//! responses add `count` and `next`/`previous` navigation links. The envelope
//! is purely presentational: status codes are chosen by the caller's
//! classification of the outcome, never invented here.

use axum::{
  Json,
  extract::rejection::{JsonRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use rolodex_core::{Error, query::Page};

// ─── Shapes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Envelope {
  pub status:      &'static str,
  pub status_code: u16,
  pub msg:         String,
  pub data:        Value,
}

/// Envelope for paginated list results.
#[derive(Debug, Serialize)]
pub struct PageEnvelope {
  pub next:        Option<String>,
  pub previous:    Option<String>,
  pub count:       u64,
  pub msg:         String,
  pub status:      &'static str,
  pub status_code: u16,
  pub data:        Value,
}

// ─── Builders ────────────────────────────────────────────────────────────────

pub fn success(
  code: StatusCode,
  msg: impl Into<String>,
  data: impl Serialize,
) -> Response {
  wrap("success", code, msg.into(), to_value(data))
}

pub fn failure(
  code: StatusCode,
  msg: impl Into<String>,
  data: impl Serialize,
) -> Response {
  wrap("failure", code, msg.into(), to_value(data))
}

pub fn paginated<T: Serialize>(
  code: StatusCode,
  msg: impl Into<String>,
  page: &Page<T>,
  next: Option<String>,
  previous: Option<String>,
) -> Response {
  let envelope = PageEnvelope {
    next,
    previous,
    count: page.total,
    msg: msg.into(),
    status: "success",
    status_code: code.as_u16(),
    data: to_value(&page.items),
  };
  (code, Json(envelope)).into_response()
}

fn wrap(
  status: &'static str,
  code: StatusCode,
  msg: String,
  data: Value,
) -> Response {
  let envelope = Envelope { status, status_code: code.as_u16(), msg, data };
  (code, Json(envelope)).into_response()
}

fn to_value(data: impl Serialize) -> Value {
  serde_json::to_value(data).unwrap_or(Value::Null)
}

// ─── Boundary rejections ─────────────────────────────────────────────────────

/// A request body that did not deserialise.
pub fn bad_json(rejection: &JsonRejection) -> Response {
  failure(
    StatusCode::BAD_REQUEST,
    "invalid data",
    json!({ "error": rejection.body_text() }),
  )
}

/// Query parameters that did not deserialise.
pub fn bad_query(rejection: &QueryRejection) -> Response {
  failure(
    StatusCode::BAD_REQUEST,
    "invalid query parameters",
    json!({ "error": rejection.body_text() }),
  )
}

// ─── Error classification ────────────────────────────────────────────────────

/// Newtype carrying a core error out of a handler; the `IntoResponse`
/// implementation picks the HTTP analog and failure envelope.
pub struct Failure(pub Error);

impl From<Error> for Failure {
  fn from(err: Error) -> Self { Self(err) }
}

/// `{"<field>": ["<message>"]}` — the field-level error detail shape.
fn field_errors(field: impl Into<String>, message: impl Into<String>) -> Value {
  let mut detail = serde_json::Map::new();
  detail
    .insert(field.into(), Value::Array(vec![Value::String(message.into())]));
  Value::Object(detail)
}

impl IntoResponse for Failure {
  fn into_response(self) -> Response {
    match self.0 {
      Error::Validation { field, message } => failure(
        StatusCode::BAD_REQUEST,
        "invalid data",
        field_errors(field, message),
      ),
      Error::MissingField(field) => failure(
        StatusCode::BAD_REQUEST,
        "invalid data",
        field_errors(field, "this field is required."),
      ),
      Error::NotFound { kind, id } => failure(
        StatusCode::NOT_FOUND,
        format!("{kind} does not exist"),
        json!({ "error": format!("{kind} {id} does not exist") }),
      ),
      Error::AlreadyDeleted { .. } => {
        failure(StatusCode::BAD_REQUEST, "already deleted", json!({}))
      }
      Error::NotExists { id, .. } => failure(
        StatusCode::BAD_REQUEST,
        format!("{id} does not exist"),
        json!({}),
      ),
      Error::OutOfRange { page, pages } => failure(
        StatusCode::NOT_FOUND,
        "invalid page",
        json!({
          "error": format!("page {page} is out of range (last page is {pages})")
        }),
      ),
      // The lifecycle service rewords constraint errors before they get
      // here; this arm is a backstop for direct store callers.
      Error::ConstraintViolation { field } => failure(
        StatusCode::BAD_REQUEST,
        "invalid data",
        field_errors(field, "must be unique."),
      ),
      Error::Storage(message) => {
        tracing::error!(%message, "store failure");
        failure(
          StatusCode::INTERNAL_SERVER_ERROR,
          "internal server error",
          json!({}),
        )
      }
    }
  }
}
