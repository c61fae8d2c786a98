//! Handlers for `/api/contacts` endpoints.
//!
//! Same verb-to-operation binding as the contact-book handlers; the list
//! additionally filters on `email`.

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::Response,
};
use serde_json::json;

use rolodex_core::{
  entity::ContactPayload,
  query::PageProfile,
  store::{ContactFilter, EntityStore},
};

use crate::{
  AppState,
  auth::Caller,
  envelope::{self, Failure},
  pagination::{self, ListParams},
};

/// `GET /api/contacts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Query(params) = match params {
    Ok(query) => query,
    Err(rejection) => return Ok(envelope::bad_query(&rejection)),
  };
  let filter = ContactFilter {
    name:            params.name.clone(),
    email:           params.email.clone(),
    search:          params.search.clone(),
    contact_book_id: None,
    include_deleted: params.include_deleted,
  };
  let request = params.request(PageProfile::STANDARD);
  let page = state.lifecycle.list_contacts(filter, request).await?;
  let (next, previous) = pagination::links("/api/contacts", &params, &page);
  Ok(envelope::paginated(StatusCode::OK, "contacts", &page, next, previous))
}

/// `POST /api/contacts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  body: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let contact = state.lifecycle.create_contact(payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::CREATED, "contact created", contact))
}

/// `GET /api/contacts/{id}`
pub async fn retrieve<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let contact = state.lifecycle.retrieve_contact(id).await?;
  Ok(envelope::success(StatusCode::OK, "success", contact))
}

/// `PUT /api/contacts/{id}` — full replacement.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  body: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let contact =
    state.lifecycle.update_contact(id, payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::ACCEPTED, "contact updated", contact))
}

/// `PATCH /api/contacts/{id}` — sparse patch.
pub async fn partial_update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  body: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let contact = state.lifecycle.patch_contact(id, payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::ACCEPTED, "contact updated", contact))
}

/// `DELETE /api/contacts/{id}` — soft delete this contact only.
pub async fn soft_delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  state.lifecycle.soft_delete_contact(id, &caller.0).await?;
  Ok(envelope::success(
    StatusCode::ACCEPTED,
    format!("contact {id} deleted"),
    json!({}),
  ))
}

/// `DELETE /api/contacts/{id}/purge` — hard delete.
pub async fn hard_delete<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  state.lifecycle.hard_delete_contact(id).await?;
  Ok(envelope::success(
    StatusCode::ACCEPTED,
    format!("contact {id} removed"),
    json!({}),
  ))
}
