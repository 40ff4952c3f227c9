use crate::model::{Axis, AxisRole};
use crate::resolver::{AxisKind, CodeResolver};
use crate::utils::normalize_key;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::Display;

// Static patterns, checked by the tests below.
static SIZE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tam|tamanho|size|numero|número").expect("valid size pattern"));
static COLOR_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"cor|color").expect("valid color pattern"));

/// How a role got bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BindingReason {
    Explicit,
    NamePattern,
    DictionaryIntersection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleBinding {
    pub index: usize,
    pub reason: BindingReason,
}

/// One role per axis, with at most one Size and at most one Color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisAssignment {
    pub roles: Vec<AxisRole>,
    pub size: Option<RoleBinding>,
    pub color: Option<RoleBinding>,
}

impl AxisAssignment {
    pub fn size_index(&self) -> Option<usize> {
        self.size.map(|b| b.index)
    }

    pub fn color_index(&self) -> Option<usize> {
        self.color.map(|b| b.index)
    }

    pub fn context_count(&self) -> usize {
        self.roles
            .iter()
            .filter(|role| **role == AxisRole::Context)
            .count()
    }
}

pub fn key_suggests_size(key: &str) -> bool {
    SIZE_KEY.is_match(&normalize_key(key))
}

pub fn key_suggests_color(key: &str) -> bool {
    COLOR_KEY.is_match(&normalize_key(key))
}

/// Decides which axis is Size and which is Color.
///
/// Order of passes, first binding per role wins:
/// explicit roles, key name patterns, then dictionary intersection of values.
/// Size is always settled before Color within a pass, and an axis bound to
/// one role is never considered for the other.
#[derive(Debug, Clone, Copy)]
pub struct AxisClassifier<'a> {
    resolver: CodeResolver<'a>,
}

impl<'a> AxisClassifier<'a> {
    pub fn new(resolver: CodeResolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn classify(&self, axes: &[Axis]) -> AxisAssignment {
        let mut size: Option<RoleBinding> = None;
        let mut color: Option<RoleBinding> = None;

        for (index, axis) in axes.iter().enumerate() {
            match axis.declared_role {
                Some(AxisRole::Size) if size.is_none() => {
                    size = Some(RoleBinding {
                        index,
                        reason: BindingReason::Explicit,
                    });
                }
                Some(AxisRole::Color) if color.is_none() => {
                    color = Some(RoleBinding {
                        index,
                        reason: BindingReason::Explicit,
                    });
                }
                _ => {}
            }
        }

        // Axes with a declared role never enter the heuristic passes.
        let open = |index: usize, size: &Option<RoleBinding>, color: &Option<RoleBinding>| {
            axes[index].declared_role.is_none()
                && size.map(|b| b.index) != Some(index)
                && color.map(|b| b.index) != Some(index)
        };

        if size.is_none() {
            size = (0..axes.len())
                .find(|&i| open(i, &size, &color) && key_suggests_size(&axes[i].key))
                .map(|index| RoleBinding {
                    index,
                    reason: BindingReason::NamePattern,
                });
        }
        if color.is_none() {
            color = (0..axes.len())
                .find(|&i| open(i, &size, &color) && key_suggests_color(&axes[i].key))
                .map(|index| RoleBinding {
                    index,
                    reason: BindingReason::NamePattern,
                });
        }

        if size.is_none() {
            size = (0..axes.len())
                .find(|&i| open(i, &size, &color) && self.intersects(&axes[i], AxisKind::Size))
                .map(|index| RoleBinding {
                    index,
                    reason: BindingReason::DictionaryIntersection,
                });
        }
        if color.is_none() {
            color = (0..axes.len())
                .find(|&i| open(i, &size, &color) && self.intersects(&axes[i], AxisKind::Color))
                .map(|index| RoleBinding {
                    index,
                    reason: BindingReason::DictionaryIntersection,
                });
        }

        let roles = (0..axes.len())
            .map(|i| {
                if size.map(|b| b.index) == Some(i) {
                    AxisRole::Size
                } else if color.map(|b| b.index) == Some(i) {
                    AxisRole::Color
                } else {
                    AxisRole::Context
                }
            })
            .collect();

        tracing::debug!(
            size = ?size.map(|b| (&axes[b.index].key, b.reason)),
            color = ?color.map(|b| (&axes[b.index].key, b.reason)),
            axes = axes.len(),
            "axes classified"
        );

        AxisAssignment { roles, size, color }
    }

    fn intersects(&self, axis: &Axis, kind: AxisKind) -> bool {
        axis.values
            .iter()
            .any(|value| self.resolver.knows(kind, &value.to_lowercase()))
    }
}
