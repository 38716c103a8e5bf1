//! Field-level validation shared by the HTTP boundary and the repositories.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
    .expect("valid email regex")
});

/// Reject empty or whitespace-only values for a required field.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::invalid(format!("{field} must not be empty")));
  }
  Ok(())
}

pub fn is_valid_email(value: &str) -> bool { EMAIL_RE.is_match(value) }

pub fn require_email(field: &str, value: &str) -> Result<()> {
  if !is_valid_email(value) {
    return Err(Error::invalid(format!(
      "{field} is not a valid email address: {value:?}"
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_common_addresses() {
    for ok in ["ann@x.com", "first.last+tag@example.co.uk", "a_b@sub-domain.io"] {
      assert!(is_valid_email(ok), "{ok} should be valid");
    }
  }

  #[test]
  fn rejects_malformed_addresses() {
    for bad in ["", "ann", "ann@", "@x.com", "ann@@x.com", "ann x@x.com", "ann@-x.com"] {
      assert!(!is_valid_email(bad), "{bad} should be invalid");
    }
  }

  #[test]
  fn blank_values_are_rejected() {
    assert!(require_non_empty("firstname", "Ann").is_ok());
    let err = require_non_empty("firstname", "   ").unwrap_err();
    assert!(matches!(err, Error::ValidationFailed(ref m) if m.contains("firstname")));
  }
}
