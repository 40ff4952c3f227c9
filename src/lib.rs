pub mod analysis;
pub mod builder;
pub mod config;
pub mod dictionary;
pub mod domain;
pub mod ean;
pub mod error;
pub mod logging;
pub mod model;
pub mod overrides;
pub mod report;
pub mod resolver;
pub mod utils;

pub use analysis::{AxisAssignment, AxisClassifier, CombinationEngine};
pub use builder::{BuildOptions, VariantTableBuilder, build};
pub use config::{CliArgs, Command, GenerateArgs, GeneratorConfig, OutputFormat};
pub use dictionary::{AttributeDictionary, AttributeFamily, AttributeRecord};
pub use domain::{AttributeCode, BaseCode, RefCode, ReferenceCodes, Sku12, ValidationError};
pub use ean::{Ean13, Ean13Error, validate_ean13, verify};
pub use error::{Diagnostic, DiagnosticKind, Severity, VariantError};
pub use logging::{LoggingConfig, init_logging};
pub use model::{AxisRole, BuildOutcome, BuildSummary, GradePayload, Parameter, VariantRow};
pub use overrides::{OverrideEntry, OverrideMap};
pub use resolver::{AxisKind, CodeResolver};
