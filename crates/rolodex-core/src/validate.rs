//! Field validation: names and the permissive email grammar.
//!
//! Values are trimmed before validation and stored trimmed. Lengths are
//! counted in characters, not bytes (names accept arbitrary UTF-8).

use crate::{Error, Result};

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 254;

/// Trim and validate a display name: non-blank, at most 255 characters.
pub fn name(field: &'static str, raw: &str) -> Result<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(field, "this field may not be blank."));
  }
  if trimmed.chars().count() > NAME_MAX {
    return Err(Error::validation(
      field,
      format!("ensure this field has no more than {NAME_MAX} characters."),
    ));
  }
  Ok(trimmed.to_owned())
}

/// Trim and validate an email address.
///
/// The grammar is permissive rather than full RFC 5322: an ASCII dot-atom
/// local part (internationalized local parts are rejected), then `@`, then
/// either a bracketed address literal or two-plus dot-separated labels.
pub fn email(raw: &str) -> Result<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(Error::validation("email", "this field may not be blank."));
  }
  if trimmed.chars().count() > EMAIL_MAX {
    return Err(Error::validation(
      "email",
      format!("ensure this field has no more than {EMAIL_MAX} characters."),
    ));
  }
  if !well_formed(trimmed) {
    return Err(Error::validation("email", "enter a valid email address."));
  }
  Ok(trimmed.to_owned())
}

fn well_formed(address: &str) -> bool {
  if !address.is_ascii() {
    return false;
  }
  let Some((local, domain)) = address.split_once('@') else {
    return false;
  };
  // split_once takes the first `@`; a second one would survive in `domain`.
  !domain.contains('@') && local_part(local) && domain_part(domain)
}

/// Dot-atom: atoms of atext separated by single dots.
fn local_part(local: &str) -> bool {
  !local.is_empty()
    && !local.starts_with('.')
    && !local.ends_with('.')
    && !local.contains("..")
    && local.chars().all(is_atext_or_dot)
}

fn is_atext_or_dot(c: char) -> bool {
  c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c)
}

fn domain_part(domain: &str) -> bool {
  // Bracketed address literal, e.g. `[127.0.0.1]` or an IPv6 form.
  if let Some(inner) =
    domain.strip_prefix('[').and_then(|d| d.strip_suffix(']'))
  {
    return !inner.is_empty()
      && inner
        .chars()
        .all(|c| c.is_ascii_hexdigit() || c == '.' || c == ':');
  }

  // Hostname: at least two labels (bare `@domain` is rejected).
  let labels: Vec<&str> = domain.split('.').collect();
  labels.len() >= 2 && labels.into_iter().all(label)
}

fn label(label: &str) -> bool {
  !label.is_empty()
    && !label.starts_with('-')
    && !label.ends_with('-')
    && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_trims_and_accepts_bounds() {
    assert_eq!(name("name", "  Team A  ").unwrap(), "Team A");
    assert!(name("name", &"a".repeat(255)).is_ok());
    assert!(name("name", &"a".repeat(256)).is_err());
  }

  #[test]
  fn name_rejects_blank() {
    assert!(name("name", "").is_err());
    assert!(name("name", "         ").is_err());
  }

  #[test]
  fn name_counts_characters_not_bytes() {
    // 255 multi-byte characters is still within bounds.
    assert!(name("name", &"ä".repeat(255)).is_ok());
  }

  #[test]
  fn email_accepts_common_forms() {
    for ok in [
      "email@domain.com",
      "firstname.lastname@domain.com",
      "email@subdomain.domain.com",
      "firstname+lastname@domain.com",
      "email@123.123.123.123",
      "email@[123.123.123.123]",
      "1234567890@domain.com",
      "email@domain-one.com",
      "_______@domain.com",
      "email@domain.name",
      "email@domain.co.jp",
      "firstname-lastname@domain.com",
      "email@domain.web",
      "email@111.222.333.44444",
    ] {
      assert!(email(ok).is_ok(), "rejected valid address {ok:?}");
    }
  }

  #[test]
  fn email_rejects_malformed_forms() {
    for bad in [
      "plainaddress",
      "#@%^%#$@#$@#.com",
      "@domain.com",
      "Joe Smith <email@domain.com>",
      "email.domain.com",
      "email@domain@domain.com",
      ".email@domain.com",
      "email.@domain.com",
      "email..email@domain.com",
      "あいうえお@domain.com",
      "email@domain.com (Joe Smith)",
      "email@domain",
      "email@-domain.com",
      "email@domain..com",
    ] {
      assert!(email(bad).is_err(), "accepted invalid address {bad:?}");
    }
  }

  #[test]
  fn email_enforces_length_ceiling() {
    let long = format!("{}@domain.com", "a".repeat(EMAIL_MAX));
    assert!(email(&long).is_err());
  }
}
