//! Variant table benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use variant_codes::ean::append_check_digit;
use variant_codes::{AxisKind, CodeResolver, OverrideMap, Parameter, Sku12, build};

fn grade(sizes: usize, colors: usize, extra: usize) -> Vec<Parameter> {
    let size_values = ["PP", "P", "M", "G", "GG", "G1", "G2", "G3"];
    let color_values = ["Preto", "Branco", "Marinho", "Vinho", "Azul Jeans", "Areia", "Oliva", "Roxo"];
    let mut params = vec![
        Parameter::new("tamanho", size_values.iter().cycle().take(sizes).copied()),
        Parameter::new("cor", color_values.iter().cycle().take(colors).copied()),
    ];
    for idx in 0..extra {
        params.push(Parameter::new(
            format!("extra{}", idx),
            (0..4).map(|n| format!("v{}", n)),
        ));
    }
    params
}

fn bench_build(c: &mut Criterion) {
    let none = OverrideMap::new();
    let colors = OverrideMap::parse("Preto=50\nVinho=51");
    let mut group = c.benchmark_group("build");

    for (sizes, colors_n, extra) in [(3, 2, 0), (8, 8, 0), (8, 8, 2)] {
        let params = grade(sizes, colors_n, extra);
        let id = format!("{}x{}+{}", sizes, colors_n, extra);
        group.bench_with_input(BenchmarkId::from_parameter(id), &params, |b, params| {
            b.iter(|| build(black_box(params), "1234", "5678", &none, &colors))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let none = OverrideMap::new();
    let resolver = CodeResolver::builtin(&none, &none);
    c.bench_function("resolve_color_name", |b| {
        b.iter(|| resolver.resolve(AxisKind::Color, black_box("Azul Jeans")))
    });
}

fn bench_check_digit(c: &mut Criterion) {
    let Ok(payload) = Sku12::parse("400638133393") else {
        return;
    };
    c.bench_function("append_check_digit", |b| {
        b.iter(|| append_check_digit(black_box(&payload)))
    });
}

criterion_group!(benches, bench_build, bench_resolve, bench_check_digit);
criterion_main!(benches);
