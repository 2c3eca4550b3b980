use chrono::{Duration, NaiveDate, Utc};
use recoverrs::baseline::BaselineProvider;
use recoverrs::config::AppConfig;
use recoverrs::database::Database;
use recoverrs::export::export_report_csv;
use recoverrs::routines::RoutineKind;
use recoverrs::{BaselineProfile, Gender, RecoverError, RiskLevel, ScoringEngine, WorkoutSample};
use tempfile::TempDir;

fn steady_session() -> WorkoutSample {
    WorkoutSample {
        duration_min: 60.0,
        rpe: Some(5.0),
        sleep_hours: 8.0,
        ..WorkoutSample::default()
    }
}

fn easy_session() -> WorkoutSample {
    WorkoutSample {
        duration_min: 30.0,
        rpe: Some(3.0),
        sleep_hours: 8.0,
        ..WorkoutSample::default()
    }
}

#[test]
fn test_stored_history_feeds_next_prediction() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(temp_dir.path().join("data").join("recoverrs.db")).unwrap();
    let engine = ScoringEngine::new();
    let today = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();

    // Twenty steady sessions, all older than a week
    for offset in 8..28 {
        let sample = steady_session();
        let prediction = engine.predict(&sample);
        db.store_scoring("ana", today - Duration::days(offset), &sample, &prediction)
            .unwrap();
    }

    let history = db.load_history("ana", today).unwrap();
    assert_eq!(history.last7_load, 0.0);
    assert!((history.last28_load - 2005.78).abs() < 0.05);

    let mut sample = easy_session();
    assert_eq!(engine.fatigue_score(&sample), 100);

    history.apply_to(&mut sample);
    let prediction = engine.predict(&sample);
    assert_eq!(prediction.fatigue_score, 17);
    assert_eq!(prediction.risk, RiskLevel::None);
}

#[test]
fn test_history_is_per_user() {
    let db = Database::open_in_memory().unwrap();
    let engine = ScoringEngine::new();
    let today = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();
    let sample = steady_session();

    db.store_scoring("ana", today - Duration::days(1), &sample, &engine.predict(&sample))
        .unwrap();

    assert!(db.load_history("ana", today).unwrap().last7_load > 0.0);
    assert_eq!(db.load_history("ben", today).unwrap().last7_load, 0.0);
    assert!(db.list_scorings("ben", 10).unwrap().is_empty());
}

#[test]
fn test_database_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("recoverrs.db");

    {
        let db = Database::new(&path).unwrap();
        db.add_todo("ana", "Foam roll calves").unwrap();
        db.log_routine_run("ana", "Box breathing", RoutineKind::Breathing, 5, Utc::now())
            .unwrap();
    }

    let db = Database::new(&path).unwrap();
    let todos = db.list_todos("ana").unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Foam roll calves");

    let runs = db.list_routine_runs("ana", 10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].kind, RoutineKind::Breathing);
}

#[test]
fn test_todo_of_other_user_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    let todo = db.add_todo("ana", "Stretch").unwrap();

    let err = RecoverError::from(db.set_todo_done("ben", todo.id, true).unwrap_err());
    assert!(err.user_message().contains("No todos entry"));
    assert!(!db.list_todos("ana").unwrap()[0].done);
}

#[test]
fn test_config_drives_engine_and_baseline() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
        default_user = "ana"

        [scoring]
        yellow_fatigue = 10
        fallback_baseline = 50

        [baseline]
        source = "club-survey"

        [[baseline.bands]]
        min_age = 18
        max_age = 40
        score = 30
        "#,
    )
    .unwrap();

    let config = AppConfig::load_or_default(Some(&config_path)).unwrap();
    let engine = ScoringEngine::with_constants(config.scoring.clone());
    let rest = WorkoutSample {
        sleep_hours: 7.0,
        ..WorkoutSample::default()
    };
    assert_eq!(engine.fatigue(&rest).risk, RiskLevel::Yellow);

    let table = config.baseline.table().unwrap();
    let profile = BaselineProfile {
        age: Some(25),
        gender: Some(Gender::Female),
    };
    let delta = engine.fatigue_delta(18, table.baseline_for(&profile));
    assert_eq!(delta.baseline, 30);
    assert_eq!(delta.source, "club-survey");
    assert_eq!(delta.delta, -12);

    let unknown = engine.fatigue_delta(18, table.baseline_for(&BaselineProfile::default()));
    assert_eq!(unknown.baseline, 50);
    assert_eq!(unknown.delta, -32);
}

#[test]
fn test_report_export_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("week.csv");
    let engine = ScoringEngine::new();
    let report = engine.weekly_report(&[easy_session(), steady_session()]);

    export_report_csv(&report, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["day", "workout_load", "recovery_load", "ratio"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][0], "D2");
}
