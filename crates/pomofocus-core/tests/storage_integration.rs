//! File-backed storage: the dataset and host state survive reopening.

use chrono::{Duration, Utc};
use pomofocus_core::{
    ActiveTarget, AppOptions, DataStore, Database, FocusApp, NewSubtask, NoopNotifier, TimerEngine,
    TimerMode,
};

#[test]
fn dataset_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomofocus.db");

    let project_id = {
        let db = Database::open_at(&path).unwrap();
        let mut app = FocusApp::open(&db, NoopNotifier, AppOptions::default()).unwrap();
        let project = app
            .create_project("Novel", vec![NewSubtask::new("Draft", 2)])
            .unwrap();
        app.select_subtask(&project.id, &project.subtasks[0].id).unwrap();
        app.complete().unwrap();
        project.id
    };

    let db = Database::open_at(&path).unwrap();
    let dataset = db.load().unwrap().unwrap();
    let project = dataset.project(&project_id).unwrap();
    assert_eq!(project.subtasks[0].completed_sessions, 1);
    assert_eq!(dataset.stats.total_work_time, 25 * 60);
}

#[test]
fn host_state_is_kept_beside_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomofocus.db");

    {
        let db = Database::open_at(&path).unwrap();
        let mut app = FocusApp::open(&db, NoopNotifier, AppOptions::default()).unwrap();
        let project = app.create_project("Errands", vec![]).unwrap();
        app.set_mode(TimerMode::LongBreak);
        db.set_json("timer_engine", app.engine()).unwrap();
        db.set_json(
            "active_target",
            &ActiveTarget {
                project_id: project.id,
                subtask_id: None,
            },
        )
        .unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let mut app = FocusApp::open(&db, NoopNotifier, AppOptions::default()).unwrap();
    let engine: TimerEngine = db.get_json("timer_engine").unwrap().unwrap();
    app.restore_engine(engine);
    let target: ActiveTarget = db.get_json("active_target").unwrap().unwrap();
    app.restore_target(target);

    assert_eq!(app.engine().mode(), TimerMode::LongBreak);
    assert!(!app.engine().is_running());
    assert!(app.target().is_some());
}

#[test]
fn stale_target_is_dropped_on_restore() {
    let db = Database::open_memory().unwrap();
    let mut app = FocusApp::open(&db, NoopNotifier, AppOptions::default()).unwrap();
    app.restore_target(ActiveTarget {
        project_id: "gone".into(),
        subtask_id: None,
    });
    assert!(app.target().is_none());
}

#[test]
fn phase_history_is_queried_by_time() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("history.db")).unwrap();
    let now = Utc::now();

    db.record_phase(TimerMode::Work, 1500, None, None, now - Duration::days(1))
        .unwrap();
    db.record_phase(TimerMode::Work, 1500, Some("p"), None, now)
        .unwrap();
    db.record_phase(TimerMode::LongBreak, 900, None, None, now)
        .unwrap();

    let totals = db.phase_totals_since(now - Duration::minutes(5)).unwrap();
    assert_eq!((totals.work_phases, totals.work_secs), (1, 1500));
    assert_eq!((totals.break_phases, totals.break_secs), (1, 900));
    assert_eq!(db.phases_since(now - Duration::days(2)).unwrap().len(), 3);
}
