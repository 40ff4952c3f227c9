use crate::builder::{BuildOptions, DEFAULT_MAX_COMBINATIONS, MAX_COMBINATIONS_CEILING};
use crate::dictionary::AttributeFamily;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetKind {
    Colors,
    LetterSizes,
    NumberSizes,
}

impl From<PresetKind> for AttributeFamily {
    fn from(kind: PresetKind) -> Self {
        match kind {
            PresetKind::Colors => AttributeFamily::Color,
            PresetKind::LetterSizes => AttributeFamily::LetterSize,
            PresetKind::NumberSizes => AttributeFamily::NumberSize,
        }
    }
}

/// Settings for one `generate` run, after merging CLI, config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub reference: String,
    pub base: String,
    pub grade: PathBuf,
    pub size_overrides: Option<PathBuf>,
    pub color_overrides: Option<PathBuf>,
    pub output: OutputFormat,
    pub max_combinations: usize,
}

impl GeneratorConfig {
    pub fn from_args(config: Option<&Path>, args: GenerateArgs) -> Result<Self> {
        let GenerateArgs {
            grade: cli_grade,
            reference: cli_reference,
            base: cli_base,
            size_overrides: cli_size_overrides,
            color_overrides: cli_color_overrides,
            format: cli_format,
            max_combinations: cli_max_combinations,
        } = args;

        let file_config = if let Some(path) = config {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            reference: file_reference,
            base: file_base,
            grade: file_grade,
            size_overrides: file_size_overrides,
            color_overrides: file_color_overrides,
            output: file_output,
            max_combinations: file_max_combinations,
        } = file_config;

        let reference = cli_reference
            .or(file_reference)
            .context("a reference code is required (--reference or `reference` in the config file)")?;
        let base = cli_base
            .or(file_base)
            .context("a base code is required (--base or `base` in the config file)")?;
        let grade = cli_grade
            .or(file_grade)
            .context("a grade file is required (--grade or `grade` in the config file)")?;

        anyhow::ensure!(
            !reference.trim().is_empty(),
            "reference code must not be blank"
        );
        anyhow::ensure!(!base.trim().is_empty(), "base code must not be blank");

        let max_combinations = cli_max_combinations
            .or(file_max_combinations)
            .unwrap_or(DEFAULT_MAX_COMBINATIONS)
            .clamp(1, MAX_COMBINATIONS_CEILING);

        Ok(Self {
            reference,
            base,
            grade,
            size_overrides: cli_size_overrides.or(file_size_overrides),
            color_overrides: cli_color_overrides.or(file_color_overrides),
            output: cli_format.or(file_output).unwrap_or_default(),
            max_combinations,
        })
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::with_max_combinations(self.max_combinations)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "variant-codes",
    about = "Derive variant codes and EAN-13 barcodes from product variant axes",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        env = "VARIANT_CODES_CONFIG",
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the variant table for one product
    Generate(GenerateArgs),
    /// Print a built-in table as `Name=NN` override lines
    Preset {
        #[arg(value_enum)]
        kind: PresetKind,
    },
    /// Check EAN-13 codes
    Verify {
        #[arg(required = true, value_name = "EAN13")]
        codes: Vec<String>,
    },
    /// Print the JSON Schema of the grade file
    Schema,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    #[arg(
        long,
        env = "VARIANT_CODES_GRADE",
        value_name = "FILE",
        help = "Grade JSON file: {\"parametros\": [{\"chave\", \"valores\"}]}"
    )]
    pub grade: Option<PathBuf>,

    #[arg(
        long,
        env = "VARIANT_CODES_REFERENCE",
        value_name = "CODE",
        help = "Reference code; non-digits are stripped, then cut or padded to 4 digits"
    )]
    pub reference: Option<String>,

    #[arg(
        long,
        env = "VARIANT_CODES_BASE",
        value_name = "CODE",
        help = "Base code; non-digits are stripped, then cut or padded to 4 digits"
    )]
    pub base: Option<String>,

    #[arg(
        long,
        env = "VARIANT_CODES_SIZE_OVERRIDES",
        value_name = "FILE",
        help = "File of `Name=NN` lines overriding size codes"
    )]
    pub size_overrides: Option<PathBuf>,

    #[arg(
        long,
        env = "VARIANT_CODES_COLOR_OVERRIDES",
        value_name = "FILE",
        help = "File of `Name=NN` lines overriding color codes"
    )]
    pub color_overrides: Option<PathBuf>,

    #[arg(
        long,
        env = "VARIANT_CODES_FORMAT",
        value_enum,
        value_name = "FORMAT",
        help = "Output format (table or json)"
    )]
    pub format: Option<OutputFormat>,

    #[arg(
        long,
        env = "VARIANT_CODES_MAX_COMBINATIONS",
        value_name = "N",
        help = "Refuse to build more rows than this",
        value_parser = clap::value_parser!(usize)
    )]
    pub max_combinations: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    reference: Option<String>,
    base: Option<String>,
    grade: Option<PathBuf>,
    size_overrides: Option<PathBuf>,
    color_overrides: Option<PathBuf>,
    output: Option<OutputFormat>,
    max_combinations: Option<usize>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
