use crate::domain::{BaseCode, RefCode, Sku12};
use crate::ean::Ean13;
use crate::error::{Diagnostic, DiagnosticKind, Severity, VariantError};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use strum::{AsRefStr, Display, EnumString};

/// Role an axis plays in the barcode payload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AxisRole {
    Size,
    Color,
    Context,
}

/// One declared variant axis as received from the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    #[serde(rename = "chave", alias = "key", default)]
    pub key: String,
    #[serde(
        rename = "valores",
        alias = "values",
        default,
        deserialize_with = "lenient_values"
    )]
    #[schemars(with = "Vec<String>")]
    pub values: Vec<String>,
    /// Explicit role; skips the heuristic classification for this Parameter.
    #[serde(default, alias = "papel", skip_serializing_if = "Option::is_none")]
    pub role: Option<AxisRole>,
}

impl Parameter {
    pub fn new<K, I, V>(key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: AxisRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// `{ "parametros": [ { "chave": ..., "valores": [...] } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct GradePayload {
    #[serde(
        rename = "parametros",
        alias = "parameters",
        default,
        deserialize_with = "lenient_parameters"
    )]
    #[schemars(with = "Vec<Parameter>")]
    pub parameters: Vec<Parameter>,
}

impl GradePayload {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Accepts an array of scalars; anything else reads as an empty list.
fn lenient_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect())
}

/// Null or non-array reads as no parameters; null entries are skipped.
fn lenient_parameters<'de, D>(deserializer: D) -> Result<Vec<Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| Parameter::deserialize(item).map_err(D::Error::custom))
        .collect()
}

/// Read-only snapshot of a Parameter with a unique key and a clean value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    pub key: String,
    pub values: Vec<String>,
    pub declared_role: Option<AxisRole>,
}

impl Axis {
    /// Snapshots caller Parameters without touching them.
    ///
    /// Values are trimmed, blanks dropped and repeats removed (first wins).
    /// A blank key becomes `param_<n>`; a repeated key gets a `_<n>` suffix.
    pub fn snapshot(parameters: &[Parameter]) -> Vec<Axis> {
        let mut seen_keys = HashSet::new();
        parameters
            .iter()
            .enumerate()
            .map(|(idx, parameter)| {
                let position = idx + 1;
                let trimmed = parameter.key.trim();
                let mut key = if trimmed.is_empty() {
                    format!("param_{}", position)
                } else {
                    trimmed.to_string()
                };
                if seen_keys.contains(&key) {
                    let stem = key;
                    key = format!("{}_{}", stem, position);
                    let mut bump = 1;
                    while seen_keys.contains(&key) {
                        bump += 1;
                        key = format!("{}_{}_{}", stem, position, bump);
                    }
                }
                seen_keys.insert(key.clone());

                let mut seen_values = HashSet::new();
                let values = parameter
                    .values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty() && seen_values.insert(*v))
                    .map(str::to_string)
                    .collect();

                Axis {
                    key,
                    values,
                    declared_role: parameter.role,
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One generated combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
    /// One value per declared Parameter key, in declared order.
    pub tuple: IndexMap<String, String>,
    pub sku12: Sku12,
    pub ean13: Ean13,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub reference: RefCode,
    pub base: BaseCode,
    pub size_parameter: Option<String>,
    pub color_parameter: Option<String>,
    /// Value → code actually used, in first-seen order.
    pub size_codes: IndexMap<String, String>,
    pub color_codes: IndexMap<String, String>,
    pub context_axes: usize,
    pub row_count: usize,
}

/// Rows plus the diagnostics collected while producing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub rows: Vec<VariantRow>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<BuildSummary>,
}

impl BuildOutcome {
    pub(crate) fn halted(diagnostic: Diagnostic) -> Self {
        Self {
            rows: Vec::new(),
            diagnostics: vec![diagnostic],
            summary: None,
        }
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Rows when no diagnostic halted the build, otherwise the halting condition.
    pub fn into_result(self) -> Result<Vec<VariantRow>, VariantError> {
        let Some(diagnostic) = self.diagnostics.iter().find(|d| d.kind.halts_build()) else {
            return Ok(self.rows);
        };
        if diagnostic.kind == DiagnosticKind::CombinationLimitExceeded {
            let limit = diagnostic.detail("limit").and_then(|l| l.parse().ok());
            if let (Some(combinations), Some(limit)) = (diagnostic.detail("combinations"), limit) {
                return Err(VariantError::CombinationLimitExceeded {
                    combinations: combinations.to_string(),
                    limit,
                });
            }
        }
        Err(VariantError::Halted {
            kind: diagnostic.kind,
            message: diagnostic.message.clone(),
        })
    }
}
