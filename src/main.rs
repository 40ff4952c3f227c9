use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use variant_codes::logging::command_span;
use variant_codes::{
    AttributeDictionary, CliArgs, Command, GeneratorConfig, GradePayload, LoggingConfig,
    OutputFormat, OverrideMap, VariantTableBuilder, init_logging, report, validate_ean13,
};

fn main() -> Result<ExitCode> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    match cli.command {
        Command::Generate(args) => {
            let _span = command_span("generate").entered();
            let config = GeneratorConfig::from_args(cli.config.as_deref(), args)?;
            generate(&config)
        }
        Command::Preset { kind } => {
            println!("{}", AttributeDictionary::builtin().preset(kind.into()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { codes } => {
            let _span = command_span("verify").entered();
            Ok(verify_codes(&codes))
        }
        Command::Schema => {
            let schema = schemars::schema_for!(GradePayload);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn generate(config: &GeneratorConfig) -> Result<ExitCode> {
    let grade_text = fs::read_to_string(&config.grade)
        .with_context(|| format!("failed to read grade file {:?}", config.grade))?;
    let grade = GradePayload::from_json(&grade_text)
        .with_context(|| format!("failed to parse grade file {:?}", config.grade))?;
    let size_overrides = load_overrides(config.size_overrides.as_deref())?;
    let color_overrides = load_overrides(config.color_overrides.as_deref())?;

    let outcome = VariantTableBuilder::new()
        .options(config.build_options())
        .build(
            &grade.parameters,
            &config.reference,
            &config.base,
            &size_overrides,
            &color_overrides,
        );

    match config.output {
        OutputFormat::Table => print!("{}", report::render_outcome(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    Ok(if outcome.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn load_overrides(path: Option<&Path>) -> Result<OverrideMap> {
    let Some(path) = path else {
        return Ok(OverrideMap::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read override file {:?}", path))?;
    let overrides = OverrideMap::parse(&text);
    tracing::debug!(path = ?path, entries = overrides.len(), "overrides loaded");
    Ok(overrides)
}

fn verify_codes(codes: &[String]) -> ExitCode {
    let mut all_valid = true;
    for code in codes {
        match validate_ean13(code.trim()) {
            Ok(ean) => println!("{}  valid", ean),
            Err(err) => {
                all_valid = false;
                println!("{}  invalid: {}", code, err);
            }
        }
    }
    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
