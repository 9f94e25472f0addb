//! Account field validation - username, email, password

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 32;
const MAX_EMAIL_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Letters, digits and `_ . -`, starting with a letter or digit.
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("invalid username regex"));

/// One `@`, no whitespace, a dotted domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("invalid email regex")
});

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username.
    ///
    /// # Rules
    /// - 3 to 32 characters, surrounding whitespace trimmed
    /// - ASCII letters, digits, `_`, `.`, `-`
    /// - Must start with a letter or digit
    ///
    /// # Example
    /// ```
    /// use proverbs_server::models::Username;
    ///
    /// assert!(Username::new("solomon").is_ok());
    /// assert!(Username::new("so").is_err());       // too short
    /// assert!(Username::new("-solomon").is_err()); // starts with dash
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if s.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if s.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }
        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "only letters, digits, '_', '.' and '-' are allowed, starting with a letter or digit",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated, lower-cased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "not a valid email address",
            });
        }
        Ok(Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Plaintext password that passed the length policy.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate length. Whitespace is significant and not trimmed.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        let len = s.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if len > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Validate a password together with its confirmation field.
    pub fn confirmed(password: &str, confirmation: &str) -> Result<Self, ValidationError> {
        let password = Self::new(password)?;
        if password.0 != confirmation {
            return Err(ValidationError::Mismatch {
                field: "password confirmation",
            });
        }
        Ok(password)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("abc").is_ok());
        assert!(Username::new("king.solomon").is_ok());
        assert!(Username::new("agur_son-of-jakeh").is_ok());
        assert_eq!(Username::new("  lemuel ").unwrap().as_str(), "lemuel");
    }

    #[test]
    fn username_length_bounds() {
        assert!(matches!(
            Username::new("ab").unwrap_err(),
            ValidationError::TooShort { min: 3, .. }
        ));
        assert!(Username::new(&"a".repeat(32)).is_ok());
        assert!(matches!(
            Username::new(&"a".repeat(33)).unwrap_err(),
            ValidationError::TooLong { max: 32, .. }
        ));
    }

    #[test]
    fn username_rejects_bad_characters() {
        for bad in ["with space", "_leading", "semi;colon", "ümlaut"] {
            assert!(
                matches!(Username::new(bad), Err(ValidationError::InvalidFormat { .. })),
                "{} should be rejected",
                bad
            );
        }
        assert!(matches!(
            Username::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn email_is_lowercased() {
        let email = Email::new(" Wisdom@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "wisdom@example.com");
    }

    #[test]
    fn email_rejects_malformed() {
        for bad in ["plain", "a@b", "a@@b.com", "a b@c.com", "@example.com", "a@.com"] {
            assert!(Email::new(bad).is_err(), "{} should be rejected", bad);
        }
        assert!(matches!(
            Email::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn password_policy() {
        assert!(matches!(
            Password::new("short").unwrap_err(),
            ValidationError::TooShort { min: 8, .. }
        ));
        assert!(Password::new("long enough").is_ok());
        assert!(Password::new(&"x".repeat(129)).is_err());
    }

    #[test]
    fn password_confirmation() {
        assert!(Password::confirmed("correct horse", "correct horse").is_ok());
        assert!(matches!(
            Password::confirmed("correct horse", "battery staple").unwrap_err(),
            ValidationError::Mismatch { .. }
        ));
    }

    #[test]
    fn password_debug_is_masked() {
        let p = Password::new("super secret").unwrap();
        assert_eq!(format!("{:?}", p), "Password(***)");
    }
}
