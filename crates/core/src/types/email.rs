//! Email address type used by the admin authenticator.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors parsing an [`Email`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    #[error("email domain cannot be empty")]
    EmptyDomain,
}

/// A structurally valid email address.
///
/// Only the shape is checked (`local@domain`); deliverability is the
/// identity service's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an email, trimming surrounding whitespace and lowercasing.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, has no `@`, or has an empty
    /// local part or domain.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let value = input.trim().to_lowercase();
        if value.is_empty() {
            return Err(EmailError::Empty);
        }
        let at = value.find('@').ok_or(EmailError::MissingAtSymbol)?;
        if at == 0 {
            return Err(EmailError::EmptyLocalPart);
        }
        if at == value.len() - 1 {
            return Err(EmailError::EmptyDomain);
        }
        Ok(Self(value))
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let email = Email::parse("  Dona@Jangada.REST ").expect("valid email");
        assert_eq!(email.as_str(), "dona@jangada.rest");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Email::parse("").is_err());
        assert!(Email::parse("sem-arroba").is_err());
        assert!(Email::parse("@dominio.com").is_err());
        assert!(Email::parse("local@").is_err());
    }
}
