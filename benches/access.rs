use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;

use modelplus::{Model, ModelSchema, Mutator, SerializeOptions, SetOptions};

fn make_schema() -> Arc<ModelSchema> {
    let mut builder = ModelSchema::builder()
        .default_value("firstName", "Iain")
        .default_value("lastName", "Banks")
        .default_value("address", json!({"city": "Fife", "geo": {"lat": 56.2, "lng": -3.0}}))
        .mutator(
            "fullName",
            Mutator::get_set(
                |m| {
                    let first = m.resolve("firstName")?;
                    let last = m.resolve("lastName")?;
                    Some(json!(format!("{} {}", first.as_str()?, last.as_str()?)))
                },
                |model, args| {
                    let value = args.value.as_str().unwrap_or_default().to_string();
                    let mut parts = value.split(' ');
                    model.apply("firstName", parts.next().unwrap_or_default(), args.options)?;
                    model.apply("lastName", parts.next().unwrap_or_default(), args.options)
                },
            )
            .transient(),
        );

    // Pad the store so snapshots measure realistic work.
    for i in 0..64u32 {
        builder = builder.default_value(format!("field_{i}"), i);
    }

    Arc::new(builder.build().unwrap())
}

fn bench_resolve(c: &mut Criterion) {
    let model = Model::new(make_schema()).unwrap();
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain", |b| b.iter(|| black_box(model.resolve("field_7"))));
    group.bench_function("nested", |b| b.iter(|| black_box(model.resolve("address.geo.lat"))));
    group.bench_function("getter", |b| b.iter(|| black_box(model.resolve("fullName"))));

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    group.throughput(Throughput::Elements(1));

    group.bench_function("plain", |b| {
        b.iter_custom(|iters| {
            // Fresh model per sample so listeners and values do not accumulate.
            let mut model = Model::new(make_schema()).unwrap();
            let start = Instant::now();
            for i in 0..iters {
                model.apply("counter", i, &SetOptions::default()).unwrap();
            }
            start.elapsed()
        });
    });

    group.bench_function("nested", |b| {
        b.iter_custom(|iters| {
            let mut model = Model::new(make_schema()).unwrap();
            let start = Instant::now();
            for i in 0..iters {
                model.apply("address.geo.lat", i, &SetOptions::default()).unwrap();
            }
            start.elapsed()
        });
    });

    group.bench_function("mutator_fan_out", |b| {
        b.iter_custom(|iters| {
            let mut model = Model::new(make_schema()).unwrap();
            let _stream = model.subscribe();
            let start = Instant::now();
            for i in 0..iters {
                let name = if i % 2 == 0 { "Ada Lovelace" } else { "Iain Banks" };
                model.apply("fullName", name, &SetOptions::default()).unwrap();
            }
            start.elapsed()
        });
    });

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let model = Model::new(make_schema()).unwrap();
    let mut group = c.benchmark_group("serialize");

    group.bench_function("general", |b| {
        b.iter(|| black_box(model.serialize(&SerializeOptions::default())));
    });
    group.bench_function("save", |b| {
        b.iter(|| black_box(model.serialize(&SerializeOptions::for_save(false))));
    });

    group.finish();
}

criterion_group!(access, bench_resolve, bench_apply, bench_serialize);
criterion_main!(access);
