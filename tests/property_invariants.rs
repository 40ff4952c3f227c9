//! Property-Based Invariant Testing
//!
//! Invariants that must hold for any input:
//! - Every generated barcode carries a valid check digit
//! - A single changed digit is always detected
//! - Row count equals the product of the axis domain sizes
//! - Building twice gives the same rows
//! - At most one Size and one Color axis, never the same axis

use proptest::prelude::*;
use std::collections::HashSet;
use variant_codes::analysis::AxisClassifier;
use variant_codes::ean::{append_check_digit, validate_ean13};
use variant_codes::model::Axis;
use variant_codes::utils::sanitize_digits;
use variant_codes::{AxisRole, CodeResolver, OverrideMap, Parameter, Sku12, build, verify};

// =============================================================================
// Strategies
// =============================================================================

fn payload() -> impl Strategy<Value = String> {
    "[0-9]{12}"
}

fn parameter() -> impl Strategy<Value = Parameter> {
    let keys = prop::sample::select(vec![
        "tam", "tamanho", "cor", "color", "material", "estilo", "", "x",
    ]);
    let value = prop::sample::select(vec![
        "P", "M", "G", "GG", "42", "44", "Preto", "Branco", "Marinho", "Lisa", "07", "", " ",
    ]);
    (keys, prop::collection::vec(value, 0..5))
        .prop_map(|(key, values)| Parameter::new(key, values))
}

fn parameters() -> impl Strategy<Value = Vec<Parameter>> {
    prop::collection::vec(parameter(), 1..5)
}

fn expected_rows(params: &[Parameter]) -> usize {
    params
        .iter()
        .map(|p| {
            let distinct: HashSet<&str> = p
                .values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .collect();
            distinct.len().max(1)
        })
        .product()
}

// =============================================================================
// Check Digit Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_appended_check_digit_verifies(raw in payload()) {
        let sku = Sku12::parse(&raw).unwrap();
        let ean = append_check_digit(&sku);
        prop_assert_eq!(ean.payload(), raw.as_str());
        prop_assert!(verify(ean.as_str()));
    }

    #[test]
    fn prop_single_digit_change_is_detected(raw in payload(), position in 0usize..13, bump in 1u8..10) {
        let ean = append_check_digit(&Sku12::parse(&raw).unwrap());
        let mut digits = ean.as_str().as_bytes().to_vec();
        digits[position] = b'0' + (digits[position] - b'0' + bump) % 10;
        let corrupted = String::from_utf8(digits).unwrap();
        prop_assert!(validate_ean13(&corrupted).is_err());
    }

    #[test]
    fn prop_sanitized_codes_have_fixed_width(raw in ".{0,12}", width in 1usize..8) {
        let out = sanitize_digits(&raw, width);
        prop_assert_eq!(out.len(), width);
        prop_assert!(out.bytes().all(|b| b.is_ascii_digit()));
        let digits: String = raw.chars().filter(char::is_ascii_digit).take(width).collect();
        prop_assert!(out.starts_with(&digits));
    }
}

// =============================================================================
// Build Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_row_count_is_product_of_domains(params in parameters()) {
        let none = OverrideMap::new();
        let outcome = build(&params, "1234", "5678", &none, &none);
        let all_empty = params.iter().all(|p| p.values.iter().all(|v| v.trim().is_empty()));
        if all_empty {
            prop_assert!(outcome.rows.is_empty());
        } else {
            prop_assert_eq!(outcome.rows.len(), expected_rows(&params));
            for row in &outcome.rows {
                prop_assert_eq!(row.tuple.len(), params.len());
                prop_assert!(verify(row.ean13.as_str()));
                prop_assert!(row.sku12.as_str().starts_with("12345678"));
            }
        }
    }

    #[test]
    fn prop_build_is_idempotent(params in parameters(), reference in "[0-9a-z]{1,6}") {
        let colors = OverrideMap::parse("Lisa=77\nMarinho=25");
        let none = OverrideMap::new();
        let first = build(&params, &reference, "9", &none, &colors);
        let second = build(&params, &reference, "9", &none, &colors);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_roles_are_exclusive(params in parameters()) {
        let none = OverrideMap::new();
        let resolver = CodeResolver::builtin(&none, &none);
        let assignment = AxisClassifier::new(resolver).classify(&Axis::snapshot(&params));

        let sizes = assignment.roles.iter().filter(|r| **r == AxisRole::Size).count();
        let colors = assignment.roles.iter().filter(|r| **r == AxisRole::Color).count();
        prop_assert!(sizes <= 1);
        prop_assert!(colors <= 1);
        prop_assert_eq!(assignment.roles.len(), params.len());
        if let (Some(s), Some(c)) = (assignment.size_index(), assignment.color_index()) {
            prop_assert_ne!(s, c);
        }
    }
}
