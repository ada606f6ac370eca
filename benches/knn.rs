use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use point_index::covertree::CoverTree;
use point_index::kdtree::KdTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_points(n: usize) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            ]
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [1_000, 10_000, 100_000] {
        let points = generate_points(n);
        group.bench_with_input(BenchmarkId::new("kdtree", n), &points, |b, points| {
            b.iter(|| KdTree::<_>::build(&points[..], 16).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("covertree", n), &points, |b, points| {
            b.iter(|| CoverTree::<_>::build(&points[..], 1.3).unwrap())
        });
    }
    group.finish();
}

fn bench_knn(c: &mut Criterion) {
    let points = generate_points(50_000);
    let queries = generate_points(100);
    let kdtree: KdTree<_> = KdTree::build(&points[..], 16).unwrap();
    let covertree: CoverTree<_> = CoverTree::build(&points[..], 1.3).unwrap();

    let mut group = c.benchmark_group("knn");
    for k in [1, 8, 32] {
        group.bench_with_input(BenchmarkId::new("kdtree", k), &k, |b, &k| {
            b.iter(|| {
                let mut total = 0;
                for query in &queries {
                    total += kdtree.search_knn(query, k).len();
                }
                total
            })
        });
        group.bench_with_input(BenchmarkId::new("covertree", k), &k, |b, &k| {
            b.iter(|| {
                let mut total = 0;
                for query in &queries {
                    total += covertree.search_knn(query, k).len();
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_radius(c: &mut Criterion) {
    let points = generate_points(50_000);
    let queries = generate_points(100);
    let kdtree: KdTree<_> = KdTree::build(&points[..], 16).unwrap();

    c.bench_function("radius/kdtree", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                // squared radius
                total += kdtree.search_radius(query, 25.0).len();
            }
            total
        })
    });
}

criterion_group!(benches, bench_build, bench_knn, bench_radius);
criterion_main!(benches);
