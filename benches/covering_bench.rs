//! Cell index benchmarks.
//!
//! Measures:
//! - Point → leaf cell id encoding and decoding
//! - Cell bound computation (rect and cap)
//! - Cap coverings across cell budgets

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_s2_cells::random::{random_cap, random_cell_id, random_point, seeded_rng};
use rust_s2_cells::*;

// ============================================================================
// Encoding
// ============================================================================

fn bench_cell_id_encoding(c: &mut Criterion) {
    let mut rng = seeded_rng(42);
    let points: Vec<Point> = (0..1000).map(|_| random_point(&mut rng)).collect();
    let ids: Vec<CellId> = points.iter().map(|p| CellId::from_point(*p)).collect();

    let mut group = c.benchmark_group("cell_id");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("from_point", |b| {
        b.iter(|| {
            for p in &points {
                black_box(CellId::from_point(black_box(*p)));
            }
        })
    });
    group.bench_function("to_point", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(id.to_point());
            }
        })
    });
    group.bench_function("all_neighbors_same_level", |b| {
        let cells: Vec<CellId> = ids.iter().filter_map(|id| id.parent_at(14).ok()).collect();
        b.iter(|| {
            for id in &cells {
                black_box(id.all_neighbors(14).ok());
            }
        })
    });
    group.finish();
}

// ============================================================================
// Cell Bounds
// ============================================================================

fn bench_cell_bounds(c: &mut Criterion) {
    let mut rng = seeded_rng(7);
    let mut group = c.benchmark_group("cell_bounds");

    for level in [2u8, 10, 20, 30] {
        let cells: Vec<Cell> = (0..200)
            .filter_map(|_| random_cell_id(&mut rng, level).ok())
            .filter_map(|id| Cell::new(id).ok())
            .collect();
        group.throughput(Throughput::Elements(cells.len() as u64));

        group.bench_with_input(BenchmarkId::new("rect_bound", level), &cells, |b, cells| {
            b.iter(|| {
                for cell in cells {
                    black_box(cell.rect_bound());
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("cap_bound", level), &cells, |b, cells| {
            b.iter(|| {
                for cell in cells {
                    black_box(cell.cap_bound());
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("exact_area", level), &cells, |b, cells| {
            b.iter(|| {
                for cell in cells {
                    black_box(cell.exact_area());
                }
            })
        });
    }
    group.finish();
}

// ============================================================================
// Coverings
// ============================================================================

fn bench_cap_covering(c: &mut Criterion) {
    let mut rng = seeded_rng(11);
    let caps: Vec<Region> = (0..20)
        .map(|_| Region::Cap(random_cap(&mut rng, 1e-10, 1e-2)))
        .collect();

    let mut group = c.benchmark_group("cap_covering");
    group.throughput(Throughput::Elements(caps.len() as u64));

    for max_cells in [8usize, 32, 128] {
        let Ok(coverer) = CovererOptionsBuilder::new()
            .max_cells(max_cells)
            .build()
            .and_then(RegionCoverer::new)
        else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("covering", max_cells), &caps, |b, caps| {
            b.iter(|| {
                for region in caps {
                    black_box(coverer.get_covering(region));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("interior", max_cells), &caps, |b, caps| {
            b.iter(|| {
                for region in caps {
                    black_box(coverer.get_interior_covering(region));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cell_id_encoding, bench_cell_bounds, bench_cap_covering);
criterion_main!(benches);
