//! Axis role inference and combination enumeration.

pub mod classification;
pub mod combinations;

pub use classification::{AxisAssignment, AxisClassifier, BindingReason, RoleBinding};
pub use combinations::{CombinationEngine, Combinations};
