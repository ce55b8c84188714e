//! Shape indexing benchmarks.
//!
//! Measures canonicalization of recursive types and full program indexing.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tshape_solver::{
    DeclaredForm, MemoryProgram, NodeId, ProgramId, ProgramIndex, PropertySpec,
    ShapeIndexOptions, canonical_key, find_best_base,
};

/// Program with `files * per_file` interfaces. Every tenth shape repeats, and
/// each interface extends the previous one by one property.
fn synthetic_program(files: u32, per_file: u32) -> MemoryProgram {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let either = program.union(vec![number, string]);

    for file_index in 0..files {
        let file = program.add_file(&format!("src/module{file_index}.ts"));
        for decl in 0..per_file {
            let width = decl % 10 + 1;
            let properties = (0..width)
                .map(|p| {
                    let ty = if p % 2 == 0 { string } else { either };
                    PropertySpec::new(format!("p{p}"), ty)
                })
                .collect();
            let shape = program.object(properties);
            program.declare(
                file,
                decl * 32,
                DeclaredForm::ObjectShape,
                &format!("I{file_index}_{decl}"),
                shape,
            );
        }
    }
    program
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_canonicalize");

    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let list = program.reserve_object();
    program.define_properties(
        list,
        vec![
            PropertySpec::new("value", string),
            PropertySpec::new("next", list),
            PropertySpec::new("prev", list).optional(),
        ],
    );

    for depth in [2u32, 4, 8] {
        group.bench_with_input(BenchmarkId::new("recursive", depth), &depth, |b, &depth| {
            b.iter(|| black_box(canonical_key(&program, list, NodeId(0), depth, true)));
        });
    }
    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_index");
    let options = ShapeIndexOptions::default();

    for files in [1u32, 10, 50] {
        let program = synthetic_program(files, 40);
        group.bench_with_input(BenchmarkId::new("build", files), &program, |b, program| {
            b.iter(|| black_box(ProgramIndex::build(program, &options)));
        });
    }
    group.finish();
}

fn bench_base_finding(c: &mut Criterion) {
    let program = synthetic_program(20, 40);
    let index = ProgramIndex::build(&program, &ShapeIndexOptions::default());

    c.bench_function("shape_base/all_candidates", |b| {
        b.iter(|| {
            for target in index.object_candidates() {
                black_box(find_best_base(target, index.object_candidates()));
            }
        });
    });
}

criterion_group!(
    shape_benches,
    bench_canonicalize,
    bench_index,
    bench_base_finding
);
criterion_main!(shape_benches);
