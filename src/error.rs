//! Error and diagnostic types for variant-code generation
//!
//! This module provides:
//! - Diagnostic kinds with stable machine codes and categories
//! - Severity levels separating fatal conditions from warnings
//! - A builder for attaching details and suggestions
//! - The typed error returned when a build outcome is converted to a `Result`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, EnumIter};
use thiserror::Error;

// =============================================================================
// DIAGNOSTIC KINDS
// =============================================================================

/// Conditions reported on a build result
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, EnumIter,
)]
pub enum DiagnosticKind {
    /// Reference or base code has no digits to build from
    InvalidReferenceCode,
    /// The Parameter list is empty
    NoParametersDefined,
    /// Every declared Parameter has an empty value list
    NoEncodableCombinations,
    /// A Size or Color value fell back to code "00"
    UnresolvedAttributeValue,
    /// Three or more Parameters declared; only Size and Color are encoded
    ExtraAxesIgnoredForEncoding,
    /// Two distinct Size/Color pairs produced the same barcode
    DuplicateEncodedCode,
    /// The cartesian product is larger than the configured bound
    CombinationLimitExceeded,
}

impl DiagnosticKind {
    /// Stable snake_case identifier for machine consumers
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidReferenceCode => "invalid_reference_code",
            DiagnosticKind::NoParametersDefined => "no_parameters_defined",
            DiagnosticKind::NoEncodableCombinations => "no_encodable_combinations",
            DiagnosticKind::UnresolvedAttributeValue => "unresolved_attribute_value",
            DiagnosticKind::ExtraAxesIgnoredForEncoding => "extra_axes_ignored_for_encoding",
            DiagnosticKind::DuplicateEncodedCode => "duplicate_encoded_code",
            DiagnosticKind::CombinationLimitExceeded => "combination_limit_exceeded",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::InvalidReferenceCode | DiagnosticKind::CombinationLimitExceeded => {
                Severity::Error
            }
            DiagnosticKind::UnresolvedAttributeValue | DiagnosticKind::DuplicateEncodedCode => {
                Severity::Warning
            }
            DiagnosticKind::NoParametersDefined
            | DiagnosticKind::NoEncodableCombinations
            | DiagnosticKind::ExtraAxesIgnoredForEncoding => Severity::Info,
        }
    }

    /// Group name for summaries
    pub fn category(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidReferenceCode => "validation_error",
            DiagnosticKind::CombinationLimitExceeded => "resource_limit",
            DiagnosticKind::NoParametersDefined | DiagnosticKind::NoEncodableCombinations => {
                "empty_input"
            }
            DiagnosticKind::UnresolvedAttributeValue | DiagnosticKind::DuplicateEncodedCode => {
                "encoding_quality"
            }
            DiagnosticKind::ExtraAxesIgnoredForEncoding => "encoding_scope",
        }
    }

    /// True for kinds that stop row generation
    pub fn halts_build(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::InvalidReferenceCode
                | DiagnosticKind::NoParametersDefined
                | DiagnosticKind::NoEncodableCombinations
                | DiagnosticKind::CombinationLimitExceeded
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

// =============================================================================
// DIAGNOSTIC
// =============================================================================

/// One structured condition attached to a build result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            severity: kind.severity(),
            message: message.into(),
            details: BTreeMap::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn builder(kind: DiagnosticKind) -> DiagnosticBuilder {
        DiagnosticBuilder::new(kind)
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, suggestion)?;
        }
        Ok(())
    }
}

/// Builder for diagnostics carrying details and suggestions
pub struct DiagnosticBuilder {
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder {
    fn new(kind: DiagnosticKind) -> Self {
        Self {
            diagnostic: Diagnostic::new(kind, ""),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.diagnostic.message = message.into();
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.diagnostic
            .details
            .insert(key.into(), value.to_string());
        self
    }

    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.diagnostic.suggestions.push(suggestion.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diagnostic
    }
}

// =============================================================================
// TYPED ERRORS
// =============================================================================

/// Fatal build conditions, for callers that prefer `Result` over diagnostics
#[derive(Debug, Error)]
pub enum VariantError {
    #[error("combination limit exceeded: {combinations} rows requested, limit is {limit}")]
    CombinationLimitExceeded { combinations: String, limit: usize },

    #[error("{kind}: {message}")]
    Halted {
        kind: DiagnosticKind,
        message: String,
    },
}

impl VariantError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            VariantError::CombinationLimitExceeded { .. } => {
                DiagnosticKind::CombinationLimitExceeded
            }
            VariantError::Halted { kind, .. } => *kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_are_unique_and_snake_case() {
        let mut codes: Vec<&str> = DiagnosticKind::iter().map(|k| k.code()).collect();
        assert!(codes.iter().all(|c| c.chars().all(|ch| ch.is_ascii_lowercase() || ch == '_')));
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn severities_match_fatality() {
        assert_eq!(DiagnosticKind::InvalidReferenceCode.severity(), Severity::Error);
        assert_eq!(DiagnosticKind::UnresolvedAttributeValue.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::ExtraAxesIgnoredForEncoding.severity(), Severity::Info);
        assert!(DiagnosticKind::NoParametersDefined.halts_build());
        assert!(!DiagnosticKind::ExtraAxesIgnoredForEncoding.halts_build());
    }

    #[test]
    fn categories_group_kinds() {
        assert_eq!(DiagnosticKind::InvalidReferenceCode.category(), "validation_error");
        assert_eq!(DiagnosticKind::CombinationLimitExceeded.category(), "resource_limit");
        assert_eq!(
            DiagnosticKind::NoParametersDefined.category(),
            DiagnosticKind::NoEncodableCombinations.category()
        );
        assert_eq!(
            DiagnosticKind::UnresolvedAttributeValue.category(),
            DiagnosticKind::DuplicateEncodedCode.category()
        );
        assert_eq!(DiagnosticKind::ExtraAxesIgnoredForEncoding.category(), "encoding_scope");
    }

    #[test]
    fn variant_error_reports_its_kind() {
        let err = VariantError::CombinationLimitExceeded {
            combinations: "12".into(),
            limit: 10,
        };
        assert_eq!(err.kind(), DiagnosticKind::CombinationLimitExceeded);

        let err = VariantError::Halted {
            kind: DiagnosticKind::NoParametersDefined,
            message: "no parameters defined".into(),
        };
        assert_eq!(err.kind(), DiagnosticKind::NoParametersDefined);
        assert!(err.to_string().contains("no parameters defined"));
    }

    #[test]
    fn builder_collects_details() {
        let diagnostic = Diagnostic::builder(DiagnosticKind::UnresolvedAttributeValue)
            .message("color value 'Fucsia' has no code")
            .detail("axis", "color")
            .detail("value", "Fucsia")
            .suggestion("add an override line such as Fucsia=NN")
            .build();

        assert_eq!(diagnostic.code, "unresolved_attribute_value");
        assert_eq!(diagnostic.detail("value"), Some("Fucsia"));
        assert!(diagnostic.to_string().contains("1. add an override line"));
        assert!(!diagnostic.is_error());
    }

    #[test]
    fn diagnostic_serializes_with_stable_code() {
        let diagnostic = Diagnostic::new(DiagnosticKind::NoParametersDefined, "no parameters defined");
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "no_parameters_defined");
        assert_eq!(json["severity"], "info");
        assert!(json.get("details").is_none());
    }
}
