//! JSON REST API for Rolodex.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rolodex_core::store::EntityStore`]. Requests authenticate with opaque
//! tokens issued by `POST /api/login`; every other route rejects absent or
//! unknown tokens before any core logic runs. Verb-to-operation binding is
//! enforced by the router — an unbound verb gets 405 without reaching a
//! handler.

pub mod auth;
pub mod envelope;
pub mod handlers;
pub mod pagination;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get},
};
use serde::Deserialize;

use rolodex_core::{lifecycle::Lifecycle, store::EntityStore};

use auth::{AuthConfig, SessionStore};
use handlers::{books, contacts};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: EntityStore> {
  pub lifecycle: Arc<Lifecycle<S>>,
  pub auth:      Arc<AuthConfig>,
  pub sessions:  Arc<SessionStore>,
}

impl<S: EntityStore> AppState<S> {
  pub fn new(store: S, auth: AuthConfig) -> Self {
    Self {
      lifecycle: Arc::new(Lifecycle::new(store)),
      auth:      Arc::new(auth),
      sessions:  Arc::new(SessionStore::default()),
    }
  }
}

// Manual impl: `S` itself need not be `Clone` behind the `Arc`s.
impl<S: EntityStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      lifecycle: Arc::clone(&self.lifecycle),
      auth:      Arc::clone(&self.auth),
      sessions:  Arc::clone(&self.sessions),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: EntityStore + 'static,
{
  Router::new()
    .route("/api/login", axum::routing::post(auth::login::<S>))
    .route("/api/logout", delete(auth::logout::<S>))
    .route(
      "/api/contact-books",
      get(books::list::<S>).post(books::create::<S>),
    )
    .route(
      "/api/contact-books/{id}",
      get(books::retrieve::<S>)
        .put(books::update::<S>)
        .patch(books::partial_update::<S>)
        .delete(books::soft_delete::<S>),
    )
    .route("/api/contact-books/{id}/purge", delete(books::hard_delete::<S>))
    .route("/api/contact-books/{id}/contacts", get(books::contacts::<S>))
    .route(
      "/api/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/api/contacts/{id}",
      get(contacts::retrieve::<S>)
        .put(contacts::update::<S>)
        .patch(contacts::partial_update::<S>)
        .delete(contacts::soft_delete::<S>),
    )
    .route("/api/contacts/{id}/purge", delete(contacts::hard_delete::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
