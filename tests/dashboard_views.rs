use std::sync::Arc;

use serde_json::json;

use circulation_analytics::analytics::{AgeBucket, View};
use circulation_analytics::config::AnalyticsConfig;
use circulation_analytics::execution::{AnalyticsEngine, LogQueryObserver};
use circulation_analytics::ingestion::{ingest_from_path, IngestionOptions};

fn engine_for(path: &str) -> AnalyticsEngine {
    let store = ingest_from_path(path, &IngestionOptions::default()).unwrap();
    AnalyticsEngine::new(Arc::new(store), AnalyticsConfig::default()).with_observer(Arc::new(LogQueryObserver))
}

#[test]
fn time_series_counts_books_and_notebooks_per_month() {
    let ts = engine_for("tests/fixtures/loans.csv").time_series().available().unwrap();
    assert_eq!(ts.months, vec!["2025-03", "2025-04"]);
    assert_eq!(ts.livros, vec![2, 1]);
    assert_eq!(ts.notebook, vec![1, 1]);
}

#[test]
fn heatmap_places_weekday_loans_in_hour_cells() {
    let hm = engine_for("tests/fixtures/loans.csv").heatmap().available().unwrap();
    assert_eq!(hm.total(), 5);
    // Monday 09:15, Wednesday 14:00, Thursday 18:30, Tuesday 10:00, Tuesday 08:00
    assert_eq!(hm.values[0][2], 1);
    assert_eq!(hm.values[2][7], 1);
    assert_eq!(hm.values[3][11], 1);
    assert_eq!(hm.values[1][3], 1);
    assert_eq!(hm.values[1][1], 1);
    assert_eq!(hm.hours[0], 7);
    assert_eq!(hm.hours[15], 22);
}

#[test]
fn headline_metrics_from_fixture() {
    let m = engine_for("tests/fixtures/loans.csv").metrics();

    assert_eq!(m.total_records, 7);
    assert_eq!(m.unique_borrowers, 3);
    assert_eq!(m.currently_loaned, 2);
    assert_eq!(m.average_loan_days, Some(2.96));
    assert!(m.unavailable.is_empty());

    let books: Vec<(&str, usize)> = m.top_books.iter().map(|b| (b.title.as_str(), b.count)).collect();
    assert_eq!(books, vec![("Dom Casmurro", 3), ("Iracema", 1), ("O Cortiço", 1)]);

    let people: Vec<(&str, usize)> = m.top_people.iter().map(|p| (p.person.as_str(), p.count)).collect();
    assert_eq!(people, vec![("Ana Souza", 3), ("Bruno Lima", 2), ("Carla Dias", 1)]);
    assert_eq!(m.top_person.person.as_deref(), Some("Ana Souza"));
    assert_eq!(m.top_person.count, 3);
}

#[test]
fn delay_breakdowns_from_fixture() {
    let m = engine_for("tests/fixtures/loans.csv").metrics();

    let genders: Vec<&str> = m.delay_by_genre.iter().map(|g| g.gender.as_str()).collect();
    assert_eq!(genders, vec!["F", "M"]);
    let f = &m.delay_by_genre[0].stats;
    assert_eq!((f.total, f.delayed, f.pct_delayed, f.avg_delay), (1, 1, 1.0, Some(2.0)));
    let male = &m.delay_by_genre[1].stats;
    assert_eq!((male.total, male.delayed, male.pct_delayed, male.avg_delay), (2, 1, 0.5, Some(0.5)));

    let buckets: Vec<AgeBucket> = m.delay_by_age.iter().map(|a| a.age_group).collect();
    assert_eq!(
        buckets,
        vec![AgeBucket::Under20, AgeBucket::From20To29, AgeBucket::Unknown]
    );
    let unknown = &m.delay_by_age[2].stats;
    assert_eq!((unknown.total, unknown.delayed, unknown.pct_delayed), (2, 0, 0.0));
    assert_eq!(unknown.avg_delay, Some(-1.5));

    let total: usize = m.delay_by_age.iter().map(|a| a.stats.total).sum();
    assert_eq!(total, 4);
}

#[test]
fn dashboard_json_has_wire_shape() {
    let engine = engine_for("tests/fixtures/loans.csv");
    let doc: serde_json::Value = serde_json::from_str(&engine.dashboard_json().unwrap()).unwrap();

    assert_eq!(doc["time_series"]["months"], json!(["2025-03", "2025-04"]));
    assert_eq!(doc["heatmap"]["weekdays"][0], "Segunda");
    assert_eq!(doc["metrics"]["top_person"], json!({"person": "Ana Souza", "count": 3}));
    assert_eq!(
        doc["metrics"]["delay_by_genre"][0],
        json!({"Gênero": "F", "total": 1, "delayed": 1, "pct_delayed": 1.0, "avg_delay": 2.0})
    );
    assert_eq!(doc["metrics"]["delay_by_age"][0]["age_group"], "<20");
    assert_eq!(doc["metrics"]["delay_by_age"][2]["age_group"], "Unknown");
    assert!(doc["metrics"].get("unavailable").is_none());
}

#[test]
fn missing_columns_degrade_views_independently() {
    let engine = engine_for("tests/fixtures/loans_no_gender.csv");
    let dashboard = engine.dashboard();

    let marker = dashboard.time_series.unavailable().unwrap();
    assert_eq!(marker.missing_columns, vec!["Nome tipo obra"]);

    let hm = dashboard.heatmap.available().unwrap();
    assert_eq!(hm.total(), 2);

    let m = dashboard.metrics;
    assert_eq!(m.total_records, 2);
    assert_eq!(m.unique_borrowers, 2);
    assert_eq!(m.currently_loaned, 1);
    assert!(m.delay_by_genre.is_empty());
    assert_eq!(m.unavailable, vec![View::DelayByGenre]);
    assert_eq!(m.delay_by_age.len(), 1);
    assert_eq!(m.delay_by_age[0].age_group, AgeBucket::Unknown);
    assert_eq!(m.delay_by_age[0].stats.avg_delay, Some(2.0));

    let snap = engine.query_metrics().snapshot();
    assert_eq!(snap.queries, 3);
    assert_eq!(snap.degraded, 2);
}

#[test]
fn degraded_view_serializes_as_error_marker() {
    let engine = engine_for("tests/fixtures/loans_no_gender.csv");
    let doc = serde_json::to_value(engine.dashboard()).unwrap();

    assert_eq!(doc["time_series"]["missing_columns"], json!(["Nome tipo obra"]));
    assert!(doc["time_series"]["error"].as_str().unwrap().contains("Nome tipo obra"));
    assert_eq!(doc["metrics"]["unavailable"], json!(["delay_by_genre"]));
}

#[test]
fn denylist_and_ranking_length_come_from_config() {
    let store = ingest_from_path("tests/fixtures/loans.csv", &IngestionOptions::default()).unwrap();
    let config = AnalyticsConfig::from_toml_str(
        r#"
top_n = 1
title_denylist = ["dom casmurro"]
"#,
    )
    .unwrap();
    let engine = AnalyticsEngine::new(Arc::new(store), config);
    let m = engine.metrics();

    assert_eq!(m.top_books.len(), 1);
    assert_eq!(m.top_books[0].title, "Computador Notebook Positivo Master");
    assert_eq!(m.top_people.len(), 1);
    assert_eq!(m.top_person.person.as_deref(), Some("Ana Souza"));
}

#[test]
fn concurrent_queries_agree() {
    let engine = Arc::new(engine_for("tests/fixtures/loans.csv"));
    let expected = engine.dashboard_json().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.dashboard_json().unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
