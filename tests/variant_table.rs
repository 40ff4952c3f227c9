//! End-to-end scenarios for building variant tables.

use assert_matches::assert_matches;
use std::collections::HashSet;
use variant_codes::ean::{append_check_digit, check_digit};
use variant_codes::utils::{PLACEHOLDER_VALUE, sanitize_digits};
use variant_codes::{
    AxisKind, AxisRole, BuildOptions, CodeResolver, DiagnosticKind, GradePayload, OverrideMap,
    Parameter, Sku12, VariantError, VariantTableBuilder, build, verify,
};

const GRADE: &str = include_str!("fixtures/grade.json");
const COLOR_OVERRIDES: &str = include_str!("fixtures/cores.txt");

fn none() -> OverrideMap {
    OverrideMap::new()
}

fn tam_cor() -> Vec<Parameter> {
    vec![
        Parameter::new("tam", ["P", "M", "G"]),
        Parameter::new("cor", ["AZUL", "VERDE"]),
    ]
}

#[test]
fn checksum_reference_vector() {
    let payload = Sku12::parse("400638133393").unwrap();
    assert_eq!(check_digit(&payload), 1);
    assert_eq!(append_check_digit(&payload).as_str(), "4006381333931");
}

#[test]
fn padding_and_truncation() {
    assert_eq!(sanitize_digits("12", 4), "1200");
    assert_eq!(sanitize_digits("123456", 4), "1234");
    assert_eq!(sanitize_digits("R-1.2", 4), "1200");
}

#[test]
fn override_takes_precedence_over_dictionary() {
    let colors = OverrideMap::parse("preto=50");
    let sizes = none();
    let resolver = CodeResolver::builtin(&sizes, &colors);
    assert_eq!(resolver.resolve(AxisKind::Color, "Preto").as_str(), "50");
}

#[test]
fn unknown_color_falls_back_with_one_diagnostic() {
    let sizes = none();
    let colors = none();
    let resolver = CodeResolver::builtin(&sizes, &colors);
    assert_eq!(resolver.resolve(AxisKind::Color, "Cor Inexistente").as_str(), "00");

    let params = vec![
        Parameter::new("tam", ["P", "M"]),
        Parameter::new("cor", ["Cor Inexistente"]),
    ];
    let outcome = build(&params, "1234", "5678", &sizes, &colors);
    let unresolved: Vec<_> = outcome
        .diagnostics_of(DiagnosticKind::UnresolvedAttributeValue)
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].detail("value"), Some("Cor Inexistente"));
}

#[test]
fn two_axes_give_six_rows() {
    let outcome = build(&tam_cor(), "1234", "5678", &none(), &none());
    assert_eq!(outcome.rows.len(), 6);

    let tuples: HashSet<(String, String)> = outcome
        .rows
        .iter()
        .map(|row| (row.tuple["tam"].clone(), row.tuple["cor"].clone()))
        .collect();
    assert_eq!(tuples.len(), 6);

    for row in &outcome.rows {
        assert!(row.sku12.as_str().starts_with("12345678"));
        assert_eq!(row.ean13.payload(), row.sku12.as_str());
    }
    let sizes: Vec<&str> = outcome.rows.iter().map(|r| &r.sku12.as_str()[8..10]).collect();
    assert_eq!(sizes, vec!["02", "02", "03", "03", "04", "04"]);
}

#[test]
fn identical_inputs_build_identical_rows() {
    let colors = OverrideMap::parse(COLOR_OVERRIDES);
    let params = tam_cor();
    let first = build(&params, "77", "8", &none(), &colors);
    let second = build(&params, "77", "8", &none(), &colors);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn every_generated_code_verifies() {
    let grade = GradePayload::from_json(GRADE).unwrap();
    let outcome = build(&grade.parameters, "0042", "0100", &none(), &none());
    assert_eq!(outcome.rows.len(), 4 * 3 * 2);
    assert!(outcome.rows.iter().all(|row| verify(row.ean13.as_str())));
}

#[test]
fn key_names_win_over_value_contents() {
    let params = vec![
        Parameter::new("tamanho", ["Preto", "Branco"]),
        Parameter::new("cor", ["P", "G"]),
    ];
    let summary = build(&params, "1", "1", &none(), &none()).summary.unwrap();
    assert_eq!(summary.size_parameter.as_deref(), Some("tamanho"));
    assert_eq!(summary.color_parameter.as_deref(), Some("cor"));
}

#[test]
fn empty_value_list_contributes_placeholder() {
    let params = vec![
        Parameter::new("tam", ["P", "M", "G"]),
        Parameter::new("cor", Vec::<String>::new()),
    ];
    let outcome = build(&params, "1", "1", &none(), &none());
    assert_eq!(outcome.rows.len(), 3);
    assert!(outcome.rows.iter().all(|row| row.tuple["cor"] == PLACEHOLDER_VALUE));
    assert!(outcome.rows.iter().all(|row| row.sku12.as_str().ends_with("00")));
    assert!(!outcome.has(DiagnosticKind::UnresolvedAttributeValue));
}

#[test]
fn fixture_grade_with_override_file() {
    let grade = GradePayload::from_json(GRADE).unwrap();
    assert_eq!(grade.parameters[2].role, Some(AxisRole::Context));

    let colors = OverrideMap::parse(COLOR_OVERRIDES);
    assert_eq!(colors.len(), 2);

    let outcome = build(&grade.parameters, "0042", "0100", &none(), &colors);
    let summary = outcome.summary.as_ref().unwrap();
    assert_eq!(summary.color_codes["Preto"], "50");
    assert_eq!(summary.color_codes["Branco"], "01");
    assert_eq!(summary.color_codes["Azul Jeans"], "23");
    assert_eq!(summary.size_codes["GG"], "05");
    assert_eq!(summary.context_axes, 1);
    assert!(outcome.has(DiagnosticKind::ExtraAxesIgnoredForEncoding));

    // Estampa only varies the display tuple
    assert_eq!(outcome.rows[0].ean13, outcome.rows[1].ean13);
    assert_ne!(outcome.rows[0].tuple["Estampa"], outcome.rows[1].tuple["Estampa"]);
}

#[test]
fn halting_conditions_map_to_errors() {
    let outcome = build(&tam_cor(), "", "1", &none(), &none());
    assert_matches!(
        outcome.into_result(),
        Err(VariantError::Halted {
            kind: DiagnosticKind::InvalidReferenceCode,
            ..
        })
    );

    let outcome = VariantTableBuilder::new()
        .options(BuildOptions::with_max_combinations(5))
        .build(&tam_cor(), "1", "1", &none(), &none());
    assert_matches!(
        outcome.into_result(),
        Err(VariantError::CombinationLimitExceeded { limit: 5, .. })
    );

    let rows = build(&tam_cor(), "1", "1", &none(), &none()).into_result().unwrap();
    assert_eq!(rows.len(), 6);
}

#[test]
fn caller_parameters_are_not_modified() {
    let params = vec![
        Parameter::new(" tam ", ["P", "P", " M "]),
        Parameter::new("cor", ["Preto"]),
    ];
    let before = params.clone();
    let outcome = build(&params, "1", "1", &none(), &none());
    assert_eq!(params, before);
    assert_eq!(outcome.rows.len(), 2);
    assert!(outcome.rows[0].tuple.contains_key("tam"));
}
