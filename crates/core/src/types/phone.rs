//! Phone number type for WhatsApp and SMS delivery.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with a country prefix.
    #[error("phone number must start with '+' and a country code")]
    MissingCountryCode,
    /// The number contains a non-digit character after the prefix.
    #[error("phone number may only contain digits after the '+'")]
    InvalidCharacter,
    /// The number of digits is outside the E.164 range.
    #[error("phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// An international phone number in E.164 form (`+` followed by digits).
///
/// The WhatsApp Business API addresses recipients by E.164 number, so
/// validation happens once at the boundary and the stored value is passed
/// through unchanged.
///
/// ## Examples
///
/// ```
/// use dukkan_core::Phone;
///
/// assert!(Phone::parse("+201001234567").is_ok());
/// assert!(Phone::parse("01001234567").is_err()); // missing country code
/// assert!(Phone::parse("+2010x1234").is_err());  // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digit count for an E.164 number.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum digit count for an E.164 number.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// Spaces and dashes are stripped before validation so user-entered
    /// numbers like `+20 100 123-4567` are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, missing the `+` prefix,
    /// contains non-digit characters, or has an out-of-range digit count.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let cleaned: String = s.chars().filter(|c| *c != ' ' && *c != '-').collect();

        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = cleaned
            .strip_prefix('+')
            .ok_or(PhoneError::MissingCountryCode)?;

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(cleaned))
    }

    /// Returns the phone number as a string slice, including the `+`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(Phone::parse("+201001234567").is_ok());
        assert!(Phone::parse("+966501234567").is_ok());
        assert!(Phone::parse("+20 100 123 4567").is_ok());
        assert!(Phone::parse("+20-100-123-4567").is_ok());
    }

    #[test]
    fn test_parse_strips_separators() {
        let phone = Phone::parse("+20 100 123-4567").unwrap();
        assert_eq!(phone.as_str(), "+201001234567");
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            Phone::parse("201001234567"),
            Err(PhoneError::MissingCountryCode)
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Phone::parse("+2010x1234567"),
            Err(PhoneError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_length_bounds() {
        assert!(matches!(
            Phone::parse("+1234567"),
            Err(PhoneError::InvalidLength { .. })
        ));
        assert!(matches!(
            Phone::parse("+1234567890123456"),
            Err(PhoneError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse(" - "), Err(PhoneError::Empty)));
    }
}
