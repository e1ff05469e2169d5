use std::hint::black_box;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use circulation_analytics::analytics::{compute_heatmap, compute_metrics, compute_time_series};
use circulation_analytics::config::AnalyticsConfig;
use circulation_analytics::execution::AnalyticsEngine;
use circulation_analytics::ingestion::csv::{LoanCsvFormat, ingest_loans_csv_from_reader};
use circulation_analytics::types::{LoanRecord, LoanStore};

const NAMES: [&str; 7] = ["Ana", "Bruno", "Carla", "Davi", "Elisa", "Fabio", "Gabi"];
const TITLES: [&str; 5] = ["Dom Casmurro", "Iracema", "O Cortiço", "Calculadora", "Memórias Póstumas"];
const TYPES: [&str; 3] = ["Livros", "Notebook", "Outros"];

fn create_records(count: usize) -> Vec<LoanRecord> {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    (0..count)
        .map(|i| {
            let loan = base
                .checked_add_days(Days::new((i % 365) as u64))
                .and_then(|d| d.and_hms_opt(7 + (i % 16) as u32, 0, 0));
            let due = loan.and_then(|d| d.checked_add_days(Days::new(7)));
            let back = if i % 5 == 0 {
                None
            } else {
                loan.and_then(|d| d.checked_add_days(Days::new((i % 11) as u64)))
            };
            LoanRecord {
                borrower_name: Some(NAMES[i % NAMES.len()].to_string()),
                item_title: Some(TITLES[i % TITLES.len()].to_string()),
                item_type: Some(TYPES[i % TYPES.len()].to_string()),
                loan_date: loan,
                expected_return_date: due,
                actual_return_date: back,
                borrower_gender: Some(if i % 2 == 0 { "F" } else { "M" }.to_string()),
                borrower_age: Some(15.0 + (i % 60) as f64),
            }
        })
        .collect()
}

fn create_csv(rows: usize) -> String {
    let mut out = String::from(
        "Nome da pessoa;Título;Nome tipo obra;Data de empréstimo;Data devolução prevista;Data devolução efetiva;Gênero;Idade\n",
    );
    for i in 0..rows {
        let day = 1 + i % 28;
        out.push_str(&format!(
            "{};{};{};{:02}/03/2025 10:00;{:02}/04/2025;{};{};{}\n",
            NAMES[i % NAMES.len()],
            TITLES[i % TITLES.len()],
            TYPES[i % TYPES.len()],
            day,
            day,
            if i % 5 == 0 { String::new() } else { format!("{:02}/04/2025", 1 + i % 28) },
            if i % 2 == 0 { "F" } else { "M" },
            15 + i % 60
        ));
    }
    out
}

fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");
    let config = AnalyticsConfig::default();

    for size in [1_000, 50_000] {
        let store = LoanStore::with_all_columns(create_records(size));
        group.bench_with_input(BenchmarkId::new("time_series", size), &store, |b, store| {
            b.iter(|| black_box(compute_time_series(store)))
        });
        group.bench_with_input(BenchmarkId::new("heatmap", size), &store, |b, store| {
            b.iter(|| black_box(compute_heatmap(store)))
        });
        group.bench_with_input(BenchmarkId::new("metrics", size), &store, |b, store| {
            b.iter(|| black_box(compute_metrics(store, &config)))
        });
    }

    group.finish();
}

fn bench_dashboard(c: &mut Criterion) {
    let store = Arc::new(LoanStore::with_all_columns(create_records(50_000)));
    let engine = AnalyticsEngine::new(store, AnalyticsConfig::default());

    c.bench_function("dashboard_json_50k", |b| {
        b.iter(|| black_box(engine.dashboard_json()))
    });
}

fn bench_ingestion(c: &mut Criterion) {
    let input = create_csv(20_000);
    let format = LoanCsvFormat::default();

    c.bench_function("ingest_csv_20k", |b| {
        b.iter(|| {
            let mut rdr = format.reader_builder().from_reader(input.as_bytes());
            black_box(ingest_loans_csv_from_reader(&mut rdr, format.date_order))
        })
    });
}

criterion_group!(benches, bench_views, bench_dashboard, bench_ingestion);
criterion_main!(benches);
