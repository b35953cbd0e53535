use cgmath::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use pathtracer::bvh::{Bvh, SplitMethod};
use pathtracer::material::MaterialId;
use pathtracer::shapes::Triangle;
use pathtracer::{Point3f, Ray, Vec3f};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

fn random_triangles(n: usize, seed: u64) -> Vec<Triangle> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let mut p = move |rng: &mut Xoshiro256Plus| {
        Point3f::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        )
    };
    (0..n)
        .map(|_| {
            let v0 = p(&mut rng);
            let offset = |rng: &mut Xoshiro256Plus| {
                Vec3f::new(
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                )
            };
            Triangle::new(v0, v0 + offset(&mut rng), v0 + offset(&mut rng), MaterialId(0))
        })
        .collect()
}

fn bench(c: &mut Criterion) {
    let bvh = Bvh::build(random_triangles(10_000, 1), SplitMethod::EqualCounts);
    let mut rng = Xoshiro256Plus::seed_from_u64(2);

    let mut group = c.benchmark_group("bvh");
    group.throughput(Throughput::Elements(1));
    group.bench_function("intersect 10k triangles", |b| {
        b.iter(|| {
            let origin = Point3f::new(
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
                rng.gen_range(-12.0..12.0),
            );
            let dir = Vec3f::new(
                rng.gen_range(-1.0..1.0f32),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            )
            .normalize();
            bvh.intersect(&Ray::new(origin, dir))
        })
    });
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
