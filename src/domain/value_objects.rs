//! Fixed-width digit codes used in the barcode payload.
//!
//! Each newtype guarantees its digit width at construction time, so the
//! payload assembler can concatenate without re-checking:
//!
//! ```rust,ignore
//! let reference = RefCode::sanitize("12")?;       // "1200"
//! let size = AttributeCode::parse("07")?;
//! // assemble_payload(&reference, &size, ...)     ✗ Compile error!
//! ```

use crate::utils::{has_digits, sanitize_digits};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! fixed_digit_code {
    ($(#[$meta:meta])* $name:ident, $width:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const WIDTH: usize = $width;

            /// Accepts exactly `WIDTH` ASCII digits.
            pub fn parse(raw: &str) -> Result<Self, ValidationError> {
                check_digits(stringify!($name), raw, Self::WIDTH)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(code: $name) -> String {
                code.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                check_digits(stringify!($name), &raw, Self::WIDTH)?;
                Ok(Self(raw))
            }
        }
    };
}

fixed_digit_code!(
    /// Four-digit reference code, the first block of the payload.
    RefCode,
    4
);

fixed_digit_code!(
    /// Four-digit base code, the second block of the payload.
    BaseCode,
    4
);

fixed_digit_code!(
    /// Two-digit code for one attribute value (a size or a color).
    AttributeCode,
    2
);

fixed_digit_code!(
    /// The twelve-digit payload before the check digit.
    Sku12,
    12
);

impl RefCode {
    /// Applies the digit sanitization rule to free-form input.
    ///
    /// # Errors
    /// Returns `Err` when the input carries no digit at all.
    pub fn sanitize(raw: &str) -> Result<Self, ValidationError> {
        sanitize_fixed("RefCode", raw, Self::WIDTH).map(Self)
    }
}

impl BaseCode {
    /// Applies the digit sanitization rule to free-form input.
    ///
    /// # Errors
    /// Returns `Err` when the input carries no digit at all.
    pub fn sanitize(raw: &str) -> Result<Self, ValidationError> {
        sanitize_fixed("BaseCode", raw, Self::WIDTH).map(Self)
    }
}

impl AttributeCode {
    /// Code used when a value cannot be resolved or the axis is unbound.
    pub fn fallback() -> Self {
        Self("00".to_string())
    }

    /// Sanitizes any string into a two-digit code; never fails.
    pub fn sanitize(raw: &str) -> Self {
        Self(sanitize_digits(raw, Self::WIDTH))
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == "00"
    }
}

impl Sku12 {
    /// Joins the four fixed-width blocks; the widths add up to twelve.
    pub fn from_blocks(
        reference: &RefCode,
        base: &BaseCode,
        size: &AttributeCode,
        color: &AttributeCode,
    ) -> Self {
        let mut payload = String::with_capacity(Self::WIDTH);
        for block in [reference.as_str(), base.as_str(), size.as_str(), color.as_str()] {
            payload.push_str(block);
        }
        Self(payload)
    }
}

/// Reference and base codes of one product, both already sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCodes {
    pub reference: RefCode,
    pub base: BaseCode,
}

impl ReferenceCodes {
    /// Sanitizes both raw inputs.
    ///
    /// # Errors
    /// Returns the first failing field.
    pub fn sanitize(reference_raw: &str, base_raw: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            reference: RefCode::sanitize(reference_raw)?,
            base: BaseCode::sanitize(base_raw)?,
        })
    }
}

fn sanitize_fixed(field: &'static str, raw: &str, width: usize) -> Result<String, ValidationError> {
    if !has_digits(raw) {
        return Err(ValidationError::NoDigits {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(sanitize_digits(raw, width))
}

fn check_digits(field: &'static str, raw: &str, width: usize) -> Result<(), ValidationError> {
    if let Some(character) = raw.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ValidationError::InvalidCharacter { field, character });
    }
    if raw.len() != width {
        return Err(ValidationError::WrongLength {
            field,
            expected: width,
            actual: raw.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Validation Errors
// ============================================================================

/// Errors raised when constructing a digit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Input has no digit to build a code from.
    NoDigits { field: &'static str, raw: String },

    /// Input does not have the exact digit width.
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Input contains a non-digit character.
    InvalidCharacter {
        field: &'static str,
        character: char,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoDigits { field, raw } => {
                write!(f, "{} has no digits: {:?}", field, raw)
            }
            ValidationError::WrongLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{} must have {} digits (actual: {})",
                field, expected, actual
            ),
            ValidationError::InvalidCharacter { field, character } => {
                write!(f, "{} contains non-digit character: '{}'", field, character)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sanitization() {
        assert_eq!(RefCode::sanitize("12").unwrap().as_str(), "1200");
        assert_eq!(RefCode::sanitize("123456").unwrap().as_str(), "1234");
        assert_eq!(BaseCode::sanitize("b-0042").unwrap().as_str(), "0042");
        assert!(RefCode::sanitize("").is_err());
        assert!(BaseCode::sanitize("abc").is_err());
    }

    #[test]
    fn test_attribute_code_parse() {
        assert!(AttributeCode::parse("07").is_ok());
        assert_eq!(
            AttributeCode::parse("7"),
            Err(ValidationError::WrongLength {
                field: "AttributeCode",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            AttributeCode::parse("a7"),
            Err(ValidationError::InvalidCharacter {
                field: "AttributeCode",
                character: 'a'
            })
        );
        assert!(AttributeCode::fallback().is_fallback());
        assert_eq!(AttributeCode::sanitize("5x").as_str(), "50");
    }

    #[test]
    fn test_sku12_parse() {
        assert!(Sku12::parse("400638133393").is_ok());
        assert!(Sku12::parse("40063813339").is_err());
    }

    #[test]
    fn test_serde_serialization() {
        let code = AttributeCode::parse("42").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"42\"");

        let back: AttributeCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<AttributeCode>("\"420\"").is_err());
    }
}
