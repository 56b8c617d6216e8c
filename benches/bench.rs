// Criterion benchmarks for OOH Coverage

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use ooh_coverage::core::{
    buffer::create_buffers,
    geometry::pois_to_geo,
    scoring::score_candidates,
    CoveragePipeline,
};
use ooh_coverage::models::{RegionCatalog, ScoringWeights, SiteMetrics};
use ooh_coverage::services::sample_pois;

fn bench_buffers(c: &mut Criterion) {
    let catalog = RegionCatalog::sao_paulo();
    let region = catalog.get("Zona Sul").cloned().unwrap();
    let mut group = c.benchmark_group("buffers");

    for segments in [16usize, 64].iter() {
        let points = pois_to_geo(sample_pois(&region.bbox, 1000)).unwrap().points;
        group.bench_with_input(
            BenchmarkId::new("create_1000", segments),
            segments,
            |b, &segments| {
                b.iter(|| create_buffers(black_box(&points), black_box(150.0), segments));
            },
        );
    }

    group.finish();
}

fn bench_analyze(c: &mut Criterion) {
    let catalog = RegionCatalog::sao_paulo();
    let region = catalog.get("Toda São Paulo").cloned().unwrap();
    let pipeline = CoveragePipeline::default();

    let mut group = c.benchmark_group("analyze");

    for poi_count in [100usize, 1000, 5000].iter() {
        let pois = sample_pois(&region.bbox, *poi_count);
        group.bench_with_input(BenchmarkId::new("uniform", poi_count), poi_count, |b, _| {
            b.iter(|| pipeline.analyze(black_box(&region), black_box(pois.clone()), 150.0, None));
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let candidates: Vec<SiteMetrics> = (0..1000)
        .map(|i| SiteMetrics {
            population_covered: Some((i * 37 % 1000) as f64),
            traffic_count: Some((i % 50) as f64),
            income_per_capita: if i % 3 == 0 { None } else { Some((i % 70) as f64) },
        })
        .collect();
    let weights = ScoringWeights::default();

    c.bench_function("score_1000_candidates", |b| {
        b.iter(|| score_candidates(black_box(candidates.clone()), &weights));
    });
}

criterion_group!(benches, bench_buffers, bench_analyze, bench_scoring);

criterion_main!(benches);
