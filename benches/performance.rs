//! Performance benchmarks for the board.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use switchboard::{Board, BoardConfig, SharedFields};

fn fields() -> SharedFields {
    SharedFields {
        campaign_id: "C1".into(),
        wavy_user: "W1".into(),
        report_campaign: "Portabilidad".into(),
        ..Default::default()
    }
}

fn seeded_board(records: usize) -> Board {
    let board = Board::new();
    board.select_channel("SMS");
    let keys: Vec<String> = (0..records).map(|i| format!("H{i}")).collect();
    board.upsert(&keys, fields()).unwrap();
    board
}

/// Benchmark upsert batches of varying size into a pre-populated board,
/// half the keys colliding with existing records.
fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");

    for batch in [100, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::new("keys", batch), &batch, |b, &batch| {
            let keys: Vec<String> = (0..batch).map(|i| format!("H{}", i * 2)).collect();
            b.iter_batched(
                || seeded_board(batch),
                |board| {
                    black_box(board.upsert(&keys, fields()).unwrap());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark index lookups against a linear scan of the store.
fn bench_lookup(c: &mut Criterion) {
    let board = seeded_board(10_000);

    c.bench_function("lookup_indexed", |b| {
        b.iter(|| black_box(board.lookup("H9999")));
    });

    c.bench_function("lookup_scan", |b| {
        b.iter(|| {
            let records = board.records();
            black_box(
                records
                    .iter()
                    .filter(|r| r.handoff_value == "H9999")
                    .count(),
            )
        });
    });
}

/// Benchmark search and page projection over a large set.
fn bench_view(c: &mut Criterion) {
    let board = seeded_board(10_000);

    c.bench_function("search_10k", |b| {
        b.iter(|| {
            black_box(board.search("H42"));
            board.clear_search();
        });
    });

    c.bench_function("page_10k", |b| {
        board.set_page(50);
        b.iter(|| black_box(board.page()));
    });
}

/// Benchmark import of a generated file.
fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    for rows in [1_000, 10_000] {
        let mut text = String::from(
            "HandoffValue;ChannelId;VirtualCC;CampaignId;WavyUser;Reporte_Campana;Reporte_Producto;Reporte_Cod_Campana;Peso\n",
        );
        for i in 0..rows {
            text.push_str(&format!(
                "H{i};SMS;ventas;C1;W1;Portabilidad;Movil;Movil_Portabilidad;100\n"
            ));
        }
        group.bench_with_input(BenchmarkId::new("rows", rows), &text, |b, text| {
            b.iter_batched(
                Board::new,
                |board| {
                    black_box(board.import_text(text).unwrap());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_upsert, bench_lookup, bench_view, bench_import);
criterion_main!(benches);
