use std::fs;
use std::sync::{Arc, Mutex};

use circulation_analytics::ingestion::{
    ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionEvent, IngestionObserver,
    IngestionOptions, IngestionRequest, IngestionSeverity, IngestionStats,
};
use circulation_analytics::types::Column;
use circulation_analytics::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<IngestionStats>>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_event(&self, _ctx: &IngestionContext, event: &IngestionEvent<'_>) {
        match event {
            IngestionEvent::Loaded { stats } => self.successes.lock().unwrap().push((*stats).clone()),
            IngestionEvent::Failed { error } => self.failures.lock().unwrap().push(error.severity()),
            IngestionEvent::Alert { error } => self.alerts.lock().unwrap().push(error.severity()),
        }
    }
}

fn options_with(obs: Arc<dyn IngestionObserver>) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs),
        alert_at_or_above: IngestionSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone());

    // Missing file -> Io error -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_without_alert_for_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let err = ingest_from_path(&path, &options_with(obs.clone())).unwrap_err();

    assert!(matches!(err, IngestionError::EmptySource));
    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_alert_threshold_alerts_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let obs = Arc::new(RecordingObserver::default());
    let opts = IngestionOptions {
        alert_at_or_above: IngestionSeverity::Error,
        ..options_with(obs.clone())
    };
    let _ = ingest_from_path(&path, &opts).unwrap_err();

    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);
}

#[test]
fn success_reports_rows_and_downgraded_values() {
    let obs = Arc::new(RecordingObserver::default());
    let store = ingest_from_path("tests/fixtures/loans.csv", &options_with(obs.clone())).unwrap();
    assert_eq!(store.record_count(), 7);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].rows, 7);
    assert_eq!(successes[0].unparsable_values, 3);
    assert_eq!(successes[0].severity(), IngestionSeverity::Warning);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn success_reports_missing_columns() {
    let obs = Arc::new(RecordingObserver::default());
    let request =
        IngestionRequest::new("tests/fixtures/loans_no_gender.csv").with_options(options_with(obs.clone()));
    let store = request.run().unwrap();
    assert_eq!(store.record_count(), 2);

    let stats = obs.successes.lock().unwrap()[0].clone();
    assert_eq!(stats.unparsable_values, 0);
    assert!(stats.missing_columns.contains(&Column::BorrowerGender));
    assert_eq!(stats.severity(), IngestionSeverity::Warning);
}

#[test]
fn clean_ingestion_is_info() {
    let stats = IngestionStats {
        rows: 3,
        ..Default::default()
    };
    assert_eq!(stats.severity(), IngestionSeverity::Info);
}

#[test]
fn composite_and_file_observers_write_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("ingest.log");
    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        Arc::new(FileObserver::new(&log_path)),
        recorder.clone(),
    ]);
    let opts = options_with(Arc::new(composite));

    let _ = ingest_from_path("tests/fixtures/loans_no_gender.csv", &opts).unwrap();
    let _ = ingest_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("loans_no_gender.csv ok "));
    assert!(lines[0].contains("rows=2"));
    assert!(lines[0].contains("missing_columns=Nome tipo obra,Gênero,Idade"));
    assert!(lines[1].contains("fail severity=Critical"));
    assert!(lines[2].contains("ALERT severity=Critical"));

    assert_eq!(recorder.successes.lock().unwrap().len(), 1);
    assert_eq!(*recorder.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn closures_can_observe_ingestion() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let opts = options_with(Arc::new(move |ctx: &IngestionContext, event: &IngestionEvent<'_>| {
        sink.lock().unwrap().push((ctx.path.clone(), event.severity()));
    }));

    let _ = ingest_from_path("tests/fixtures/loans.csv", &opts).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.ends_with("loans.csv"));
    assert_eq!(seen[0].1, IngestionSeverity::Warning);
}
