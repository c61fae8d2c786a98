//! Handlers for `/api/contact-books` endpoints.
//!
//! | Method   | Path | Op |
//! |----------|------|----|
//! | `GET`    | `/api/contact-books` | list |
//! | `POST`   | `/api/contact-books` | create |
//! | `GET`    | `/api/contact-books/{id}` | retrieve |
//! | `PUT`    | `/api/contact-books/{id}` | full update |
//! | `PATCH`  | `/api/contact-books/{id}` | partial update |
//! | `DELETE` | `/api/contact-books/{id}` | soft delete (cascades) |
//! | `DELETE` | `/api/contact-books/{id}/purge` | hard delete |
//! | `GET`    | `/api/contact-books/{id}/contacts` | owned contacts, large pages |

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
  entity::BookPayload,
  query::PageProfile,
  store::{BookFilter, ContactFilter, EntityStore},
};

use crate::{
  AppState,
  auth::Caller,
  envelope::{self, Failure},
  pagination::{self, ListParams},
};

/// `GET /api/contact-books`
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
  let filter = BookFilter {
    name:            params.name.clone(),
    search:          params.search.clone(),
    include_deleted: params.include_deleted,
  };
  let request = params.request(PageProfile::STANDARD);
  let page = state.lifecycle.list_books(filter, request).await?;
  let (next, previous) =
    pagination::links("/api/contact-books", &params, &page);
  Ok(envelope::paginated(StatusCode::OK, "contact books", &page, next, previous))
}

/// `POST /api/contact-books`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  body: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let book = state.lifecycle.create_book(payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::CREATED, "contact book created", book))
}

/// `GET /api/contact-books/{id}`
pub async fn retrieve<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let book = state.lifecycle.retrieve_book(id).await?;
  Ok(envelope::success(StatusCode::OK, "success", book))
}

/// `PUT /api/contact-books/{id}` — full replacement.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  body: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let book = state.lifecycle.update_book(id, payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::ACCEPTED, "contact book updated", book))
}

/// `PATCH /api/contact-books/{id}` — sparse patch.
pub async fn partial_update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  body: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  let Json(payload) = match body {
    Ok(body) => body,
    Err(rejection) => return Ok(envelope::bad_json(&rejection)),
  };
  let book = state.lifecycle.patch_book(id, payload, &caller.0).await?;
  Ok(envelope::success(StatusCode::ACCEPTED, "contact book updated", book))
}

/// `DELETE /api/contact-books/{id}` — soft delete, cascading to contacts.
pub async fn soft_delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  state.lifecycle.soft_delete_book(id, &caller.0).await?;
  Ok(envelope::success(
    StatusCode::ACCEPTED,
    format!("contact book {id} deleted"),
    json!({}),
  ))
}

/// `DELETE /api/contact-books/{id}/purge` — hard delete.
pub async fn hard_delete<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  Path(id): Path<i64>,
) -> Result<Response, Failure>
where
  S: EntityStore + 'static,
{
  state.lifecycle.hard_delete_book(id).await?;
  Ok(envelope::success(
    StatusCode::ACCEPTED,
    format!("contact book {id} removed"),
    json!({}),
  ))
}

/// `GET /api/contact-books/{id}/contacts` — owned contacts on the
/// large-result pagination profile (built for bulk export).
pub async fn contacts<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  Path(id): Path<i64>,
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
    contact_book_id: None, // pinned to `id` by the lifecycle service
    include_deleted: params.include_deleted,
  };
  let request = params.request(PageProfile::LARGE);
  let page =
    state.lifecycle.list_book_contacts(id, filter, request).await?;
  let (next, previous) = pagination::links(
    &format!("/api/contact-books/{id}/contacts"),
    &params,
    &page,
  );
  Ok(envelope::paginated(StatusCode::OK, "contacts", &page, next, previous))
}
