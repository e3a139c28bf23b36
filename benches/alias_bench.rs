//! Benchmarks for instruction aliasing and template patching

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flowgen::alias::AliasTable;
use flowgen::codegen::{NamedDispatch, ShortcutGenerator};
use flowgen::template::{Anchor, TemplatePatch};

/// Names of a `side` x `side` valve grid plus a few plain instructions
fn grid_names(side: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(side * side + 3);
    for row in 0..side {
        for col in 0..side {
            names.push(format!("Valve_{}_{}", row, col));
        }
    }
    names.extend(["Mix", "Flush", "Wait"].iter().map(|s| s.to_string()));
    names
}

/// Benchmark alias table construction for varying grid sizes
fn bench_alias_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("alias_table");

    for &side in &[4, 16, 64] {
        let names = grid_names(side);
        group.throughput(Throughput::Elements(names.len() as u64));

        group.bench_function(format!("{}x{}", side, side), |b| {
            b.iter(|| black_box(AliasTable::from_names(&names)))
        });
    }

    group.finish();
}

/// Benchmark shortcut emission
fn bench_shortcuts(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortcuts");

    for &side in &[4, 16, 64] {
        let table = AliasTable::from_names(&grid_names(side));
        let generator = ShortcutGenerator::new(NamedDispatch::default());
        group.throughput(Throughput::Elements(table.instructions.len() as u64));

        group.bench_function(format!("{}x{}", side, side), |b| {
            b.iter(|| black_box(generator.generate(&table)))
        });
    }

    group.finish();
}

/// Benchmark patching a driver-sized template
fn bench_patch(c: &mut Criterion) {
    let table = AliasTable::from_names(&grid_names(16));
    let shortcuts = ShortcutGenerator::new(NamedDispatch::default()).generate(&table);

    let mut template = String::from("public static final int CONTROL_LINES = 16;\n");
    for i in 0..500 {
        template.push_str(&format!("    static int field{} = {};\n", i, i));
    }
    template.push_str("\t// BEGIN instruction shortcuts\n\t// END instruction shortcuts\n}\n");

    let patch = TemplatePatch::new()
        .set(
            Anchor::integer("CONTROL_LINES", "int CONTROL_LINES = "),
            "24",
        )
        .set(Anchor::comment_region("instruction shortcuts"), shortcuts);

    c.bench_function("patch_driver", |b| {
        b.iter(|| black_box(patch.apply("Driver", &template)))
    });
}

criterion_group!(benches, bench_alias_table, bench_shortcuts, bench_patch);
criterion_main!(benches);
