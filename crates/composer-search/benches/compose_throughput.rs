use composer_core::catalog;
use composer_core::{RngHandle, TypeName};
use composer_search::{compose_batch, Composer, ConstantTable, SearchConfig, SynthesisRequest};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn request(max_depth: u32) -> SynthesisRequest {
    SynthesisRequest::new(
        ["int", "int", "float", "str"]
            .into_iter()
            .map(TypeName::new)
            .collect(),
        vec![TypeName::new("str"), TypeName::new("float")],
        max_depth,
    )
    .expect("request")
}

fn bench_compose(c: &mut Criterion) {
    let composer = Composer::new(
        catalog::standard(),
        ConstantTable::standard(),
        SearchConfig::default(),
    )
    .expect("composer");
    for max_depth in [3u32, 6] {
        let request = request(max_depth);
        c.bench_function(&format!("compose_depth_{max_depth}"), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let mut rng = RngHandle::from_seed(seed);
                black_box(composer.compose(&request, &mut rng).expect("compose"))
            })
        });
    }
}

fn bench_batch(c: &mut Criterion) {
    let composer = Composer::new(
        catalog::standard(),
        ConstantTable::standard(),
        SearchConfig::default(),
    )
    .expect("composer");
    let request = request(4);
    c.bench_function("compose_batch_32", |b| {
        b.iter(|| black_box(compose_batch(&composer, &request, 2024, 32).expect("batch")))
    });
}

criterion_group!(benches, bench_compose, bench_batch);
criterion_main!(benches);
