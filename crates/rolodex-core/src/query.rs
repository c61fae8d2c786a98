//! The query/pagination engine: page profiles, clamping, and page math.
//!
//! Pages are 1-indexed. Oversized `page_size` requests are clamped to the
//! profile ceiling rather than rejected; a page number past the end of the
//! result set is an [`Error::OutOfRange`]. Page 1 of an empty result set is
//! valid (an empty first page is not "past the end").

use serde::Serialize;

use crate::{Error, Result};

// ─── Profiles ────────────────────────────────────────────────────────────────

/// Size defaults and ceilings for a family of list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProfile {
  pub default_size: u64,
  pub max_size:     u64,
}

impl PageProfile {
  /// Standard list endpoints.
  pub const STANDARD: Self = Self { default_size: 10, max_size: 1000 };
  /// Large-result endpoints (bulk listing of one book's contacts).
  pub const LARGE: Self = Self { default_size: 1000, max_size: 10000 };
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A resolved page request: 1-indexed page number plus effective page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u64,
  pub size: u64,
}

impl PageRequest {
  /// Resolve raw request parameters against a profile.
  ///
  /// Absent or zero `size` falls back to the profile default; anything above
  /// the ceiling is clamped. The page number is taken as-is and bounds-checked
  /// later against the total count.
  pub fn resolve(
    profile: PageProfile,
    page: Option<u64>,
    size: Option<u64>,
  ) -> Self {
    let size = match size {
      Some(0) | None => profile.default_size,
      Some(n) => n.min(profile.max_size),
    };
    Self { page: page.unwrap_or(1), size }
  }

  pub fn offset(&self) -> u64 { self.page.saturating_sub(1) * self.size }

  /// Number of pages a result set of `total` items spans under this size.
  /// An empty set still has one (empty) page.
  pub fn pages_for(&self, total: u64) -> u64 { total.div_ceil(self.size).max(1) }

  /// Fail with [`Error::OutOfRange`] unless this page exists for `total`.
  pub fn check_bounds(&self, total: u64) -> Result<()> {
    let pages = self.pages_for(total);
    if self.page == 0 || self.page > pages {
      return Err(Error::OutOfRange { page: self.page, pages });
    }
    Ok(())
  }
}

// ─── Result page ─────────────────────────────────────────────────────────────

/// One page of a filtered, id-descending result set, plus the total count.
///
/// A page is a snapshot: it is not restartable, and callers re-query for
/// fresh data rather than resuming iteration.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
  pub page:  u64,
  pub size:  u64,
}

impl<T> Page<T> {
  pub fn pages(&self) -> u64 { self.total.div_ceil(self.size).max(1) }

  pub fn has_next(&self) -> bool { self.page < self.pages() }

  pub fn has_previous(&self) -> bool { self.page > 1 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn size_defaults_and_clamps() {
    let std = PageProfile::STANDARD;
    assert_eq!(PageRequest::resolve(std, None, None).size, 10);
    assert_eq!(PageRequest::resolve(std, None, Some(0)).size, 10);
    assert_eq!(PageRequest::resolve(std, None, Some(15)).size, 15);
    // Beyond the ceiling clamps, never errors.
    assert_eq!(PageRequest::resolve(std, None, Some(4000)).size, 1000);

    let large = PageProfile::LARGE;
    assert_eq!(PageRequest::resolve(large, None, None).size, 1000);
    assert_eq!(PageRequest::resolve(large, None, Some(20000)).size, 10000);
  }

  #[test]
  fn twenty_five_items_at_fifteen_per_page() {
    let req = PageRequest::resolve(PageProfile::STANDARD, None, Some(15));
    assert_eq!(req.pages_for(25), 2);
    assert_eq!(req.offset(), 0);

    let second = PageRequest { page: 2, size: 15 };
    assert_eq!(second.offset(), 15);
    assert!(second.check_bounds(25).is_ok());

    let third = PageRequest { page: 3, size: 15 };
    assert!(matches!(
      third.check_bounds(25),
      Err(Error::OutOfRange { page: 3, pages: 2 })
    ));
  }

  #[test]
  fn empty_first_page_is_valid() {
    let req = PageRequest { page: 1, size: 10 };
    assert!(req.check_bounds(0).is_ok());
    assert!(PageRequest { page: 2, size: 10 }.check_bounds(0).is_err());
  }

  #[test]
  fn page_zero_is_out_of_range() {
    assert!(PageRequest { page: 0, size: 10 }.check_bounds(5).is_err());
  }

  #[test]
  fn navigation_flags() {
    let page = Page { items: vec![1, 2], total: 25, page: 2, size: 10 };
    assert!(page.has_next());
    assert!(page.has_previous());

    let last = Page { items: vec![1], total: 25, page: 3, size: 10 };
    assert!(!last.has_next());
    assert!(last.has_previous());

    let only = Page::<i64> { items: vec![], total: 0, page: 1, size: 10 };
    assert!(!only.has_next());
    assert!(!only.has_previous());
  }
}
