//! Attribute value → two-digit code resolution.
//!
//! Precedence, first match wins:
//! 1. the axis' override map
//! 2. the built-in dictionary (`size` tries letters, then numbers)
//! 3. the fallback code `"00"`

use crate::dictionary::{AttributeDictionary, AttributeFamily};
use crate::domain::AttributeCode;
use crate::overrides::OverrideMap;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

/// Which table family a value is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AxisKind {
    /// Letter table, then numeric table.
    Size,
    SizeLetter,
    SizeNumber,
    Color,
}

impl AxisKind {
    pub fn is_size(&self) -> bool {
        !matches!(self, AxisKind::Color)
    }

    fn families(&self) -> &'static [AttributeFamily] {
        match self {
            AxisKind::Size => &[AttributeFamily::LetterSize, AttributeFamily::NumberSize],
            AxisKind::SizeLetter => &[AttributeFamily::LetterSize],
            AxisKind::SizeNumber => &[AttributeFamily::NumberSize],
            AxisKind::Color => &[AttributeFamily::Color],
        }
    }
}

/// Where a resolved code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CodeSource {
    Override,
    Dictionary,
    /// The value already was a two-digit code.
    RawCode,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: AttributeCode,
    pub source: CodeSource,
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        self.source == CodeSource::Fallback
    }
}

/// Composes the dictionary with per-axis override maps.
///
/// Holds only shared borrows: resolving never changes the dictionary or the
/// caller's overrides, so identical inputs always yield identical codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeResolver<'a> {
    dictionary: &'a AttributeDictionary,
    size_overrides: &'a OverrideMap,
    color_overrides: &'a OverrideMap,
}

impl<'a> CodeResolver<'a> {
    pub fn new(
        dictionary: &'a AttributeDictionary,
        size_overrides: &'a OverrideMap,
        color_overrides: &'a OverrideMap,
    ) -> Self {
        Self {
            dictionary,
            size_overrides,
            color_overrides,
        }
    }

    /// Resolver over the built-in dictionary.
    pub fn builtin(size_overrides: &'a OverrideMap, color_overrides: &'a OverrideMap) -> Self {
        Self::new(
            AttributeDictionary::builtin(),
            size_overrides,
            color_overrides,
        )
    }

    pub fn dictionary(&self) -> &'a AttributeDictionary {
        self.dictionary
    }

    fn overrides(&self, kind: AxisKind) -> &'a OverrideMap {
        if kind.is_size() {
            self.size_overrides
        } else {
            self.color_overrides
        }
    }

    /// Code for `raw`, `"00"` when nothing matches.
    pub fn resolve(&self, kind: AxisKind, raw: &str) -> AttributeCode {
        self.resolve_detailed(kind, raw).code
    }

    /// Like [`resolve`](Self::resolve), also reporting which layer answered.
    pub fn resolve_detailed(&self, kind: AxisKind, raw: &str) -> Resolution {
        let value = raw.trim();

        if let Some(code) = self.overrides(kind).get(value) {
            return Resolution {
                code: code.clone(),
                source: CodeSource::Override,
            };
        }

        if kind == AxisKind::Color {
            if let Ok(code) = AttributeCode::parse(value) {
                return Resolution {
                    code,
                    source: CodeSource::RawCode,
                };
            }
        }

        let from_dictionary = kind.families().iter().find_map(|family| {
            self.dictionary
                .lookup(*family, value)
                .and_then(|record| AttributeCode::parse(&record.code).ok())
        });
        if let Some(code) = from_dictionary {
            return Resolution {
                code,
                source: CodeSource::Dictionary,
            };
        }

        tracing::debug!(axis = %kind, value = %value, "no code found, using fallback");
        Resolution {
            code: AttributeCode::fallback(),
            source: CodeSource::Fallback,
        }
    }

    /// True when `value` is a known name for the axis, in the overrides or
    /// the dictionary. Raw codes do not count.
    pub fn knows(&self, kind: AxisKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        self.overrides(kind).contains(value)
            || kind
                .families()
                .iter()
                .any(|family| self.dictionary.contains_name(*family, value))
    }
}
