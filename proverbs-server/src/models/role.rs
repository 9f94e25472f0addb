//! Role name validation
//!
//! Slug format: lowercase alphanumeric with hyphens/underscores

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for role names (matches the column width)
const MAX_ROLE_NAME_LEN: usize = 50;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("invalid slug regex"));

/// Validated role name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleName(String);

impl RoleName {
    /// Create a role name, validating slug format.
    ///
    /// # Example
    /// ```
    /// use proverbs_server::models::RoleName;
    ///
    /// assert!(RoleName::new("admin").is_ok());
    /// assert!(RoleName::new("Admin").is_err()); // uppercase
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "role name" });
        }

        if s.len() > MAX_ROLE_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "role name",
                max: MAX_ROLE_NAME_LEN,
            });
        }

        if !SLUG_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "role name",
                reason: "must be lowercase alphanumeric with hyphens/underscores, starting with alphanumeric",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(RoleName::new("admin").is_ok());
        assert!(RoleName::new("report-viewer").is_ok());
        assert!(RoleName::new("level_2").is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        assert!(matches!(
            RoleName::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            RoleName::new("-admin").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            RoleName::new(&"a".repeat(51)).unwrap_err(),
            ValidationError::TooLong { max: 50, .. }
        ));
    }
}
