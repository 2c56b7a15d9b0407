//! Integration tests for the application state root.
//!
//! Drives `FocusApp` end to end with an in-memory store, a recording
//! notifier and a hand-driven clock.

use chrono::{Duration, TimeZone, Utc};
use pomofocus_core::{
    AppOptions, CoreError, Event, FocusApp, ImportMode, ManualCadence, ManualClock, MemoryStore,
    NewSubtask, NotificationKind, RecordingNotifier, SettingsPatch, TimerMode,
};

fn one_minute_phases() -> SettingsPatch {
    SettingsPatch {
        work_duration: Some(1),
        short_break_duration: Some(1),
        long_break_duration: Some(2),
        sessions_before_long_break: Some(2),
    }
}

fn open_app<'a>(
    store: &'a MemoryStore,
    notifier: &'a RecordingNotifier,
) -> (FocusApp<&'a MemoryStore, &'a RecordingNotifier, ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap());
    let app =
        FocusApp::open_with_clock(store, notifier, AppOptions::default(), clock.clone()).unwrap();
    (app, clock)
}

#[tokio::test]
async fn full_cycle_credits_subtask_and_rests_on_work() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);

    app.update_settings(&one_minute_phases()).unwrap();
    let project = app
        .create_project("Thesis", vec![NewSubtask::new("Chapter 1", 3)])
        .unwrap();
    let subtask_id = project.subtasks[0].id.clone();
    app.select_subtask(&project.id, &subtask_id).unwrap();
    app.set_mode(TimerMode::Work);

    app.start();
    let mut cadence = ManualCadence::unbounded();
    let mut ticks_seen = 0;
    let events = app.drive(&mut cadence, |_, _| ticks_seen += 1).await;

    assert_eq!(cadence.fired(), 120, "one work minute plus one break minute");
    assert_eq!(ticks_seen, 120);
    let completed: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseCompleted { mode, .. } => Some(*mode),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![TimerMode::Work, TimerMode::ShortBreak]);
    assert_eq!(
        notifier.sent(),
        vec![NotificationKind::WorkComplete, NotificationKind::BreakComplete]
    );

    assert_eq!(app.engine().mode(), TimerMode::Work);
    assert!(!app.engine().is_running());
    assert_eq!(app.engine().session_index(), 2);

    let dataset = app.dataset();
    assert_eq!(dataset.stats.total_work_time, 60);
    assert_eq!(dataset.stats.total_break_time, 60);
    assert_eq!(dataset.projects[0].subtasks[0].completed_sessions, 1);

    let saved = store.snapshot().unwrap();
    assert_eq!(saved.projects[0].subtasks[0].completed_sessions, 1);
    assert_eq!(saved.stats.total_break_time, 60);
}

#[tokio::test]
async fn drive_stops_when_cadence_is_exhausted() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);

    app.start();
    let mut cadence = ManualCadence::with_budget(10);
    let events = app.drive(&mut cadence, |_, _| {}).await;

    assert!(events.is_empty());
    assert!(app.engine().is_running());
    assert_eq!(app.engine().remaining_secs(), 25 * 60 - 10);
}

#[test]
fn second_work_completion_reaches_long_break() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    app.update_settings(&one_minute_phases()).unwrap();

    app.complete().unwrap();
    assert_eq!(app.engine().mode(), TimerMode::ShortBreak);
    app.complete().unwrap();
    assert_eq!(app.engine().mode(), TimerMode::Work);
    app.complete().unwrap();
    assert_eq!(app.engine().mode(), TimerMode::LongBreak);
    assert_eq!(app.engine().remaining_secs(), 120);
    assert_eq!(app.engine().session_index(), 1);
}

#[test]
fn every_mutation_is_saved() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);

    let project = app
        .create_project("Garden", vec![NewSubtask::new("Dig", 2)])
        .unwrap();
    assert_eq!(store.save_count(), 1);
    app.adjust_session_target(&project.id, &project.subtasks[0].id, 1)
        .unwrap();
    assert_eq!(store.save_count(), 2);
    app.update_settings(&SettingsPatch {
        work_duration: Some(30),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(store.save_count(), 3);
    assert_eq!(store.snapshot().unwrap().settings.work_duration, 30);
}

#[test]
fn rejected_adjustment_changes_and_saves_nothing() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    let project = app
        .create_project("Garden", vec![NewSubtask::new("Dig", 1)])
        .unwrap();
    let saves = store.save_count();

    let err = app
        .adjust_session_target(&project.id, &project.subtasks[0].id, -1)
        .unwrap_err();
    assert!(matches!(err, CoreError::RejectedAdjustment(_)));
    assert_eq!(store.save_count(), saves);
    assert_eq!(app.dataset().projects[0].subtasks[0].total_sessions, 1);
}

#[test]
fn unknown_ids_are_not_found() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    let project = app.create_project("Solo", vec![]).unwrap();

    assert!(matches!(
        app.select_subtask(&project.id, "missing"),
        Err(CoreError::NotFound { kind: "subtask", .. })
    ));
    assert!(matches!(
        app.select_project("missing"),
        Err(CoreError::NotFound { kind: "project", .. })
    ));
    assert!(app.target().is_none());
}

#[test]
fn save_failure_is_surfaced_but_state_is_kept() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);

    store.set_fail_saves(true);
    let err = app.create_project("Offline", vec![]).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(app.dataset().projects.len(), 1);

    let events = app.complete().unwrap_err();
    assert!(matches!(events, CoreError::Storage(_)));
    assert_eq!(app.dataset().stats.total_work_time, 25 * 60);

    store.set_fail_saves(false);
    app.checkpoint().unwrap();
    assert_eq!(store.snapshot().unwrap().projects.len(), 1);
}

#[test]
fn manual_mode_switch_does_not_credit() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    let project = app
        .create_project("Study", vec![NewSubtask::new("Read", 4)])
        .unwrap();
    app.select_subtask(&project.id, &project.subtasks[0].id).unwrap();

    app.start();
    app.set_mode(TimerMode::ShortBreak);
    app.set_mode(TimerMode::Work);
    assert!(!app.engine().is_running());
    assert_eq!(app.dataset().projects[0].subtasks[0].completed_sessions, 0);
}

#[test]
fn import_merge_swaps_in_result_and_clears_selection() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    let project = app
        .create_project("Existing", vec![NewSubtask::new("Task", 2)])
        .unwrap();
    app.select_project(&project.id).unwrap();

    let payload = serde_json::json!({
        "projects": [
            {"id": project.id, "name": "changed", "createdAt": "2026-01-01T00:00:00Z", "subtasks": []},
            {"id": "b", "name": "Imported", "createdAt": "2026-01-01T00:00:00Z", "subtasks": []}
        ]
    })
    .to_string();
    let (report, event) = app.import(&payload, ImportMode::Merge).unwrap();

    assert_eq!(report.projects_added, 1);
    assert!(matches!(event, Event::DataImported { projects_skipped: 1, .. }));
    assert!(app.target().is_none());
    let names: Vec<_> = app.dataset().projects.iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Existing", "Imported"]);
    assert_eq!(store.snapshot().unwrap().projects.len(), 2);
}

#[test]
fn failed_import_leaves_dataset_untouched() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, _clock) = open_app(&store, &notifier);
    app.create_project("Keep", vec![]).unwrap();
    let before = app.dataset().clone();
    let saves = store.save_count();

    let err = app.import(r#"{"settings": {}}"#, ImportMode::Replace).unwrap_err();
    assert!(matches!(err, CoreError::Import(_)));
    assert_eq!(app.dataset(), &before);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn commit_app_session_accumulates_per_day() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, clock) = open_app(&store, &notifier);

    clock.advance(Duration::minutes(30));
    app.commit_app_session().unwrap();
    clock.advance(Duration::minutes(15));
    let (entry, event) = app.commit_app_session().unwrap();

    assert_eq!(entry.duration, 45 * 60);
    assert!(matches!(event, Event::AppSessionCommitted { added_secs: 900, .. }));
    assert_eq!(app.dataset().app_sessions.len(), 1);
    assert_eq!(store.snapshot().unwrap().app_sessions[0].duration, 45 * 60);
}

#[test]
fn export_folds_in_progress_session_without_mutating() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let (mut app, clock) = open_app(&store, &notifier);

    clock.advance(Duration::minutes(10));
    app.commit_app_session().unwrap();
    clock.advance(Duration::minutes(5));

    let snapshot = app.export();
    assert_eq!(snapshot.dataset.app_sessions[0].duration, 15 * 60);
    assert_eq!(app.dataset().app_sessions[0].duration, 10 * 60);
    assert_eq!(snapshot.summary.total_projects, 0);
}

#[test]
fn reopen_restores_dataset_from_store() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    {
        let (mut app, _clock) = open_app(&store, &notifier);
        app.create_project("Persisted", vec![NewSubtask::new("One", 1)])
            .unwrap();
    }
    let (app, _clock) = open_app(&store, &notifier);
    assert_eq!(app.dataset().projects[0].name, "Persisted");
}
