use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use bidstack::data::{BidCategory, BidNotice, ResultStore};
use bidstack::view::projection;

fn generate_notices(size: usize) -> Vec<BidNotice> {
    (0..size)
        .map(|i| BidNotice {
            id: format!("notice-{}", i),
            category: match i % 3 {
                0 => BidCategory::Service,
                1 => BidCategory::Construction,
                _ => BidCategory::Goods,
            },
            announced_at: Some("2024-01-15 10:00:00".to_string()),
            closes_at: Some("2024-01-22 17:00:00".to_string()),
            title: format!("입찰공고 {}", i),
            notice_no: format!("2024{:08}", i),
            agency: "조달청".to_string(),
            announcing_agency: None,
            estimated_price: Some((i as u64 * 1_250_000).to_string()),
            detail_url: None,
        })
        .collect()
}

fn store_with(size: usize) -> ResultStore {
    let mut store = ResultStore::new();
    store.replace(generate_notices(size));
    store
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("replace", size), &size, |b, &size| {
            let rows = generate_notices(size);
            let mut store = ResultStore::new();
            b.iter(|| store.replace(black_box(rows.clone())));
        });

        group.bench_with_input(BenchmarkId::new("select_all_summary", size), &size, |b, &size| {
            let mut store = store_with(size);
            b.iter(|| {
                store.select_all();
                black_box(store.summary());
                store.clear_selection();
            });
        });

        group.bench_with_input(BenchmarkId::new("export_targets", size), &size, |b, &size| {
            let mut store = store_with(size);
            for i in (0..size).step_by(2) {
                store.toggle(&format!("notice-{}", i), true);
            }
            b.iter(|| black_box(store.export_targets()));
        });

        group.bench_with_input(BenchmarkId::new("remove_half", size), &size, |b, &size| {
            let doomed: Vec<String> = (0..size).step_by(2).map(|i| format!("notice-{}", i)).collect();
            let rows = generate_notices(size);
            b.iter(|| {
                let mut store = ResultStore::new();
                store.replace(rows.clone());
                black_box(store.remove(&doomed))
            });
        });
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for size in [100, 1_000] {
        group.bench_with_input(BenchmarkId::new("rows", size), &size, |b, &size| {
            let store = store_with(size);
            b.iter(|| black_box(projection::rows(&store)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_selection, bench_projection);
criterion_main!(benches);
