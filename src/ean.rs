//! EAN-13 payload assembly and check digit.
//!
//! Payload layout: `[ref:4][base:4][size:2][color:2]`, followed by one check
//! digit. Positions are counted 1..12 from the left; even positions weigh 3,
//! odd positions weigh 1.

use crate::domain::{AttributeCode, BaseCode, RefCode, Sku12};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const EAN13_LEN: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ean13Error {
    #[error("EAN-13 must have 13 digits (actual: {actual})")]
    WrongLength { actual: usize },

    #[error("EAN-13 contains non-digit character '{character}' at position {position}")]
    NonDigit { character: char, position: usize },

    #[error("EAN-13 check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

/// A thirteen-digit code whose last digit is a valid check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ean13(String);

impl Ean13 {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The twelve-digit payload.
    pub fn payload(&self) -> &str {
        &self.0[..12]
    }

    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[12] - b'0'
    }
}

impl fmt::Display for Ean13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ean13 {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Ean13> for String {
    fn from(code: Ean13) -> String {
        code.0
    }
}

impl TryFrom<String> for Ean13 {
    type Error = Ean13Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        validate_ean13(&raw)
    }
}

/// Concatenates the four blocks into the twelve-digit payload.
pub fn assemble_payload(
    reference: &RefCode,
    base: &BaseCode,
    size: &AttributeCode,
    color: &AttributeCode,
) -> Sku12 {
    Sku12::from_blocks(reference, base, size, color)
}

/// Check digit over a validated payload.
pub fn check_digit(payload: &Sku12) -> u8 {
    weighted_check_digit(payload.as_str().bytes().map(|b| b - b'0'))
}

fn weighted_check_digit(digits: impl Iterator<Item = u8>) -> u8 {
    let sum: u32 = digits
        .enumerate()
        .map(|(idx, digit)| {
            let weight = if (idx + 1) % 2 == 0 { 3 } else { 1 };
            u32::from(digit) * weight
        })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// Appends the check digit to a payload.
pub fn append_check_digit(payload: &Sku12) -> Ean13 {
    let mut code = String::with_capacity(EAN13_LEN);
    code.push_str(payload.as_str());
    code.push(char::from(b'0' + check_digit(payload)));
    Ean13(code)
}

pub fn encode(
    reference: &RefCode,
    base: &BaseCode,
    size: &AttributeCode,
    color: &AttributeCode,
) -> Ean13 {
    append_check_digit(&assemble_payload(reference, base, size, color))
}

/// Parses a code and checks length, digits and check digit.
pub fn validate_ean13(raw: &str) -> Result<Ean13, Ean13Error> {
    if let Some((position, character)) = raw
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit())
    {
        return Err(Ean13Error::NonDigit {
            character,
            position: position + 1,
        });
    }
    if raw.len() != EAN13_LEN {
        return Err(Ean13Error::WrongLength { actual: raw.len() });
    }
    let digits = raw.as_bytes();
    let expected = weighted_check_digit(digits[..12].iter().map(|b| b - b'0'));
    let found = digits[12] - b'0';
    if expected != found {
        return Err(Ean13Error::CheckDigitMismatch { expected, found });
    }
    Ok(Ean13(raw.to_string()))
}

/// True when `raw` is a well-formed EAN-13 with a matching check digit.
pub fn verify(raw: &str) -> bool {
    validate_ean13(raw).is_ok()
}
