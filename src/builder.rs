//! Variant table construction.
//!
//! `build` runs the whole pipeline for one product: reference sanitization,
//! axis classification, combination enumeration, code resolution and EAN-13
//! encoding. Every condition, fatal or not, is attached to the returned
//! [`BuildOutcome`] as a [`Diagnostic`].

use crate::analysis::{AxisAssignment, AxisClassifier, CombinationEngine};
use crate::dictionary::AttributeDictionary;
use crate::domain::{AttributeCode, ReferenceCodes, ValidationError};
use crate::ean;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::model::{Axis, AxisRole, BuildOutcome, BuildSummary, Parameter, VariantRow};
use crate::overrides::OverrideMap;
use crate::resolver::{AxisKind, CodeResolver};
use crate::utils::{PLACEHOLDER_VALUE, is_placeholder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_MAX_COMBINATIONS: usize = 10_000;
pub const MAX_COMBINATIONS_CEILING: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Upper bound on generated rows, within `1..=1_000_000`.
    pub max_combinations: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_combinations: DEFAULT_MAX_COMBINATIONS,
        }
    }
}

impl BuildOptions {
    pub fn with_max_combinations(max_combinations: usize) -> Self {
        Self {
            max_combinations: max_combinations.clamp(1, MAX_COMBINATIONS_CEILING),
        }
    }
}

/// Builds variant rows against one dictionary.
#[derive(Debug, Clone, Copy)]
pub struct VariantTableBuilder<'d> {
    dictionary: &'d AttributeDictionary,
    options: BuildOptions,
}

impl Default for VariantTableBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantTableBuilder<'static> {
    pub fn new() -> Self {
        Self::with_dictionary(AttributeDictionary::builtin())
    }
}

impl<'d> VariantTableBuilder<'d> {
    pub fn with_dictionary(dictionary: &'d AttributeDictionary) -> Self {
        Self {
            dictionary,
            options: BuildOptions::default(),
        }
    }

    pub fn options(mut self, options: BuildOptions) -> Self {
        self.options = BuildOptions::with_max_combinations(options.max_combinations);
        self
    }

    pub fn max_combinations(&self) -> usize {
        self.options.max_combinations
    }

    #[tracing::instrument(
        skip_all,
        fields(
            parameters = parameters.len(),
            reference = %reference_raw,
            base = %base_raw,
        )
    )]
    pub fn build(
        &self,
        parameters: &[Parameter],
        reference_raw: &str,
        base_raw: &str,
        size_overrides: &OverrideMap,
        color_overrides: &OverrideMap,
    ) -> BuildOutcome {
        let codes = match ReferenceCodes::sanitize(reference_raw, base_raw) {
            Ok(codes) => codes,
            Err(err) => {
                tracing::warn!(error = %err, "reference codes rejected");
                return BuildOutcome::halted(invalid_reference(&err));
            }
        };

        if parameters.is_empty() {
            return BuildOutcome::halted(Diagnostic::new(
                DiagnosticKind::NoParametersDefined,
                "no parameters defined",
            ));
        }

        let axes = Axis::snapshot(parameters);
        if axes.iter().all(Axis::is_empty) {
            return BuildOutcome::halted(
                Diagnostic::builder(DiagnosticKind::NoEncodableCombinations)
                    .message("every parameter has an empty value list")
                    .detail("parameters", axes.len())
                    .suggestion("add at least one value to a parameter")
                    .build(),
            );
        }

        let engine = CombinationEngine::from_axes(&axes);
        let limit = self.options.max_combinations;
        match engine.len() {
            Some(len) if len <= limit => {}
            _ => {
                let requested = engine.describe_len();
                tracing::warn!(requested = %requested, limit, "combination limit exceeded");
                return BuildOutcome::halted(
                    Diagnostic::builder(DiagnosticKind::CombinationLimitExceeded)
                        .message(format!(
                            "{} combinations requested, limit is {}",
                            requested, limit
                        ))
                        .detail("combinations", &requested)
                        .detail("limit", limit)
                        .suggestion("remove values or raise max_combinations")
                        .build(),
                );
            }
        }

        let resolver = CodeResolver::new(self.dictionary, size_overrides, color_overrides);
        let assignment = AxisClassifier::new(resolver).classify(&axes);

        let mut diagnostics = Vec::new();
        if axes.len() >= 3 {
            diagnostics.push(extra_axes(&axes, &assignment));
        }

        let mut size_codes = AxisCodes::new(AxisKind::Size);
        let mut color_codes = AxisCodes::new(AxisKind::Color);
        let mut seen: HashMap<String, (String, String)> = HashMap::new();
        let mut duplicates: IndexMap<String, Vec<(String, String)>> = IndexMap::new();

        let mut rows = Vec::with_capacity(engine.len().unwrap_or(0));
        for tuple in &engine {
            let size_value = pick(&tuple, assignment.size_index());
            let color_value = pick(&tuple, assignment.color_index());
            let size_code = size_codes.code_for(&resolver, size_value);
            let color_code = color_codes.code_for(&resolver, color_value);

            let sku12 = ean::assemble_payload(&codes.reference, &codes.base, &size_code, &color_code);
            let ean13 = ean::append_check_digit(&sku12);

            let pair = (size_value.to_string(), color_value.to_string());
            match seen.get(ean13.as_str()) {
                Some(first) if *first != pair => {
                    let entry = duplicates
                        .entry(ean13.to_string())
                        .or_insert_with(|| vec![first.clone()]);
                    if !entry.contains(&pair) {
                        entry.push(pair);
                    }
                }
                Some(_) => {}
                None => {
                    seen.insert(ean13.to_string(), pair);
                }
            }

            rows.push(VariantRow {
                tuple: axes
                    .iter()
                    .zip(&tuple)
                    .map(|(axis, value)| (axis.key.clone(), (*value).to_string()))
                    .collect(),
                sku12,
                ean13,
            });
        }

        diagnostics.extend(size_codes.unresolved_diagnostics());
        diagnostics.extend(color_codes.unresolved_diagnostics());
        for (code, pairs) in &duplicates {
            tracing::warn!(ean13 = %code, pairs = pairs.len(), "distinct size/color pairs share a barcode");
            diagnostics.push(duplicate_code(code, pairs));
        }

        let summary = BuildSummary {
            reference: codes.reference.clone(),
            base: codes.base.clone(),
            size_parameter: assignment.size_index().map(|i| axes[i].key.clone()),
            color_parameter: assignment.color_index().map(|i| axes[i].key.clone()),
            size_codes: assignment
                .size_index()
                .map(|_| size_codes.into_summary())
                .unwrap_or_default(),
            color_codes: assignment
                .color_index()
                .map(|_| color_codes.into_summary())
                .unwrap_or_default(),
            context_axes: assignment.context_count(),
            row_count: rows.len(),
        };

        tracing::info!(
            rows = summary.row_count,
            size = summary.size_parameter.as_deref().unwrap_or(PLACEHOLDER_VALUE),
            color = summary.color_parameter.as_deref().unwrap_or(PLACEHOLDER_VALUE),
            diagnostics = diagnostics.len(),
            "variant table built"
        );

        BuildOutcome {
            rows,
            diagnostics,
            summary: Some(summary),
        }
    }
}

/// Builds with the built-in dictionary and default options.
pub fn build(
    parameters: &[Parameter],
    reference_raw: &str,
    base_raw: &str,
    size_overrides: &OverrideMap,
    color_overrides: &OverrideMap,
) -> BuildOutcome {
    VariantTableBuilder::new().build(
        parameters,
        reference_raw,
        base_raw,
        size_overrides,
        color_overrides,
    )
}

fn pick<'t>(tuple: &[&'t str], index: Option<usize>) -> &'t str {
    index
        .and_then(|i| tuple.get(i).copied())
        .unwrap_or(PLACEHOLDER_VALUE)
}

/// Per-axis memo of value → code, plus the values that needed the fallback.
struct AxisCodes {
    kind: AxisKind,
    codes: IndexMap<String, AttributeCode>,
    unresolved: Vec<String>,
}

impl AxisCodes {
    fn new(kind: AxisKind) -> Self {
        Self {
            kind,
            codes: IndexMap::new(),
            unresolved: Vec::new(),
        }
    }

    fn code_for(&mut self, resolver: &CodeResolver<'_>, value: &str) -> AttributeCode {
        if is_placeholder(value) {
            return AttributeCode::fallback();
        }
        if let Some(code) = self.codes.get(value) {
            return code.clone();
        }
        let resolution = resolver.resolve_detailed(self.kind, value);
        if resolution.is_fallback() {
            self.unresolved.push(value.to_string());
        }
        self.codes.insert(value.to_string(), resolution.code.clone());
        resolution.code
    }

    fn axis_label(&self) -> &'static str {
        if self.kind.is_size() { "size" } else { "color" }
    }

    fn unresolved_diagnostics(&self) -> Vec<Diagnostic> {
        let axis = self.axis_label();
        self.unresolved
            .iter()
            .map(|value| {
                Diagnostic::builder(DiagnosticKind::UnresolvedAttributeValue)
                    .message(format!("{} value '{}' has no code, using 00", axis, value))
                    .detail("axis", axis)
                    .detail("value", value)
                    .suggestion(format!("add an override line such as {}=NN", value))
                    .build()
            })
            .collect()
    }

    fn into_summary(self) -> IndexMap<String, String> {
        self.codes
            .into_iter()
            .map(|(value, code)| (value, code.into_inner()))
            .collect()
    }
}

fn invalid_reference(err: &ValidationError) -> Diagnostic {
    let builder = Diagnostic::builder(DiagnosticKind::InvalidReferenceCode).message(err.to_string());
    let builder = match err {
        ValidationError::NoDigits { field, raw } => builder.detail("field", field).detail("raw", raw),
        other => builder.detail("reason", other),
    };
    builder
        .suggestion("reference and base codes need at least one digit each")
        .build()
}

fn extra_axes(axes: &[Axis], assignment: &AxisAssignment) -> Diagnostic {
    let context: Vec<&str> = axes
        .iter()
        .zip(&assignment.roles)
        .filter(|(_, role)| **role == AxisRole::Context)
        .map(|(axis, _)| axis.key.as_str())
        .collect();
    Diagnostic::builder(DiagnosticKind::ExtraAxesIgnoredForEncoding)
        .message(format!(
            "{} parameters declared; only size and color are encoded in the barcode",
            axes.len()
        ))
        .detail("parameters", axes.len())
        .detail("context_axes", context.join(", "))
        .build()
}

fn duplicate_code(code: &str, pairs: &[(String, String)]) -> Diagnostic {
    let listed: Vec<String> = pairs
        .iter()
        .map(|(size, color)| format!("{}/{}", size, color))
        .collect();
    Diagnostic::builder(DiagnosticKind::DuplicateEncodedCode)
        .message(format!(
            "barcode {} is shared by {}",
            code,
            listed.join(", ")
        ))
        .detail("ean13", code)
        .detail("pairs", listed.join(", "))
        .suggestion("give the colliding values distinct override codes")
        .build()
}
