use criterion::{criterion_group, criterion_main, Criterion};
use tbbands_rust::{
    build_path,
    kpath::kpath_util::graphene_path,
    model::{tight_binding::TightBinding, CARBON_ONSITE, GRAPHENE_HOPPING},
    sample_bands, sample_bands_parallel,
};

pub fn criterion_benchmark(c: &mut Criterion) {
    let path = build_path(&graphene_path(), 3001).unwrap();
    let model = TightBinding::graphene(CARBON_ONSITE, GRAPHENE_HOPPING);
    c.bench_function("build path", |b| {
        b.iter(|| build_path(&graphene_path(), 3001).unwrap())
    });
    c.bench_function("graphene bands serial", |b| {
        b.iter(|| sample_bands(&path, &model).unwrap())
    });
    c.bench_function("graphene bands parallel", |b| {
        b.iter(|| sample_bands_parallel(&path, &model).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
