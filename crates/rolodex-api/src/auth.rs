//! Token authentication: login verifies an argon2 password hash and issues an
//! opaque bearer token; subsequent requests present it as
//! `Authorization: Token <hex>`.
//!
//! Tokens are 32 random bytes, hex-encoded for the client. Only their SHA-256
//! digests are kept server-side, so the session table never holds a usable
//! credential.

use std::{collections::HashMap, sync::RwLock};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{FromRequestParts, State, rejection::JsonRejection},
  http::{HeaderMap, StatusCode, header, request::Parts},
  response::Response,
};
use rand_core::{OsRng, RngCore as _};
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest as _, Sha256};

use rolodex_core::{entity::CallerIdentity, store::EntityStore};

use crate::{AppState, envelope};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

// ─── Session table ───────────────────────────────────────────────────────────

/// In-process session table mapping token digests to usernames.
#[derive(Default)]
pub struct SessionStore {
  sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
  /// Mint a fresh token for `username` and return it. The caller sees the
  /// token exactly once; only its digest is retained.
  pub fn issue(&self, username: &str) -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    self
      .sessions
      .write()
      .expect("session table poisoned")
      .insert(digest(&token), username.to_owned());
    token
  }

  /// Resolve a presented token to the identity it was issued for.
  pub fn resolve(&self, token: &str) -> Option<String> {
    self
      .sessions
      .read()
      .expect("session table poisoned")
      .get(&digest(token))
      .cloned()
  }

  /// Remove a token. Returns whether it was present.
  pub fn revoke(&self, token: &str) -> bool {
    self
      .sessions
      .write()
      .expect("session table poisoned")
      .remove(&digest(token))
      .is_some()
  }
}

fn digest(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

// ─── Verification ────────────────────────────────────────────────────────────

pub fn verify_password(
  config: &AuthConfig,
  username: &str,
  password: &str,
) -> bool {
  if username != config.username {
    return false;
  }
  let Ok(parsed) = PasswordHash::new(&config.password_hash) else {
    return false;
  };
  Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// The token string from an `Authorization: Token <hex>` header, if any.
pub fn request_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Token ")
}

fn unauthorized() -> Response {
  envelope::failure(
    StatusCode::UNAUTHORIZED,
    "authentication required",
    json!({ "error": "invalid or missing token" }),
  )
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's signature means the request carried a valid token;
/// wraps the resolved caller identity.
pub struct Caller(pub CallerIdentity);

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: EntityStore + 'static,
{
  type Rejection = Response;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = request_token(&parts.headers).ok_or_else(unauthorized)?;
    let username = state.sessions.resolve(token).ok_or_else(unauthorized)?;
    Ok(Caller(CallerIdentity::new(username)))
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: Option<String>,
  pub password: Option<String>,
}

/// `POST /api/login` — body: `{"username": "...", "password": "..."}`.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Response
where
  S: EntityStore + 'static,
{
  let Ok(Json(body)) = body else {
    return envelope::failure(
      StatusCode::BAD_REQUEST,
      "login unsuccessful",
      json!({}),
    );
  };
  let (Some(username), Some(password)) = (body.username, body.password) else {
    return envelope::failure(
      StatusCode::BAD_REQUEST,
      "login unsuccessful",
      json!({}),
    );
  };
  if !verify_password(&state.auth, &username, &password) {
    return envelope::failure(
      StatusCode::UNAUTHORIZED,
      "login unsuccessful",
      json!({}),
    );
  }
  let token = state.sessions.issue(&username);
  envelope::success(
    StatusCode::OK,
    "login successful",
    json!({ "token": token }),
  )
}

/// `DELETE /api/logout` — revokes the presented token.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Response
where
  S: EntityStore + 'static,
{
  match request_token(&headers) {
    Some(token) if state.sessions.revoke(token) => {
      envelope::success(StatusCode::OK, "logout successful", json!({}))
    }
    _ => unauthorized(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};

  fn config(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AuthConfig { username: "user".into(), password_hash: hash }
  }

  #[test]
  fn password_verification() {
    let cfg = config("secret");
    assert!(verify_password(&cfg, "user", "secret"));
    assert!(!verify_password(&cfg, "user", "wrong"));
    assert!(!verify_password(&cfg, "other", "secret"));
  }

  #[test]
  fn issued_tokens_resolve_until_revoked() {
    let sessions = SessionStore::default();
    let token = sessions.issue("user");

    assert_eq!(sessions.resolve(&token).as_deref(), Some("user"));
    assert!(sessions.revoke(&token));
    assert!(sessions.resolve(&token).is_none());
    // Revoking twice is a no-op.
    assert!(!sessions.revoke(&token));
  }

  #[test]
  fn tokens_are_unique_per_issue() {
    let sessions = SessionStore::default();
    assert_ne!(sessions.issue("user"), sessions.issue("user"));
  }

  #[test]
  fn request_token_requires_the_token_scheme() {
    let mut headers = HeaderMap::new();
    assert!(request_token(&headers).is_none());

    headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
    assert!(request_token(&headers).is_none());

    headers.insert(header::AUTHORIZATION, "Token abc".parse().unwrap());
    assert_eq!(request_token(&headers), Some("abc"));
  }
}
