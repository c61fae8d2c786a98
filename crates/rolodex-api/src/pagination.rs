//! List-request parameters and navigation-link building.

use serde::Deserialize;

use rolodex_core::query::{Page, PageProfile, PageRequest};

/// Query parameters accepted by every list endpoint.
///
/// `ordering` is accepted for interface compatibility, but `-id` is the only
/// valid ordering key — results are always newest-first regardless of what
/// is requested. `email` is ignored by book listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
  pub page:            Option<u64>,
  pub page_size:       Option<u64>,
  pub name:            Option<String>,
  pub email:           Option<String>,
  pub search:          Option<String>,
  pub ordering:        Option<String>,
  #[serde(default)]
  pub include_deleted: bool,
}

impl ListParams {
  pub fn request(&self, profile: PageProfile) -> PageRequest {
    PageRequest::resolve(profile, self.page, self.page_size)
  }
}

/// Build `next`/`previous` links for `page`, preserving the request's filter
/// parameters. A link is omitted when there is no page in that direction.
pub fn links<T>(
  path: &str,
  params: &ListParams,
  page: &Page<T>,
) -> (Option<String>, Option<String>) {
  let next =
    page.has_next().then(|| link(path, params, page.page + 1, page.size));
  let previous =
    page.has_previous().then(|| link(path, params, page.page - 1, page.size));
  (next, previous)
}

fn link(path: &str, params: &ListParams, page: u64, size: u64) -> String {
  let mut query = vec![format!("page={page}"), format!("page_size={size}")];
  if let Some(name) = &params.name {
    query.push(format!("name={}", escape(name)));
  }
  if let Some(email) = &params.email {
    query.push(format!("email={}", escape(email)));
  }
  if let Some(search) = &params.search {
    query.push(format!("search={}", escape(search)));
  }
  if params.include_deleted {
    query.push("include_deleted=true".into());
  }
  format!("{path}?{}", query.join("&"))
}

/// Percent-encode a query-string value (everything outside the unreserved
/// set).
fn escape(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for byte in value.bytes() {
    match byte {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
        out.push(byte as char)
      }
      other => out.push_str(&format!("%{other:02X}")),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page(page: u64, size: u64, total: u64) -> Page<i64> {
    Page { items: vec![], total, page, size }
  }

  #[test]
  fn middle_page_links_both_ways() {
    let params = ListParams::default();
    let (next, previous) = links("/api/contact-books", &params, &page(2, 10, 25));
    assert_eq!(next.as_deref(), Some("/api/contact-books?page=3&page_size=10"));
    assert_eq!(
      previous.as_deref(),
      Some("/api/contact-books?page=1&page_size=10")
    );
  }

  #[test]
  fn edge_pages_omit_their_missing_link() {
    let params = ListParams::default();

    let (next, previous) = links("/api/contacts", &params, &page(1, 10, 25));
    assert!(next.is_some());
    assert!(previous.is_none());

    let (next, previous) = links("/api/contacts", &params, &page(3, 10, 25));
    assert!(next.is_none());
    assert!(previous.is_some());
  }

  #[test]
  fn links_preserve_filters_with_escaping() {
    let params = ListParams {
      name: Some("Team A&B".into()),
      include_deleted: true,
      ..Default::default()
    };
    let (next, _) = links("/api/contact-books", &params, &page(1, 10, 25));
    assert_eq!(
      next.as_deref(),
      Some(
        "/api/contact-books?page=2&page_size=10&name=Team%20A%26B&include_deleted=true"
      )
    );
  }
}
