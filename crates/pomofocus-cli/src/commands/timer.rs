use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use clap::Subcommand;
use pomofocus_core::{
    format_clock, Cadence, CoreError, DataStore, Event, FocusApp, IntervalCadence, Notifier,
    TimerMode,
};

use super::{print_json, CommandResult};
use crate::host::{App, Host};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground until it comes to rest or Ctrl-C
    Run,
    /// Print current timer state as JSON
    Status,
    /// Switch to a mode (pauses the timer)
    Mode {
        /// work, short-break or long-break
        mode: TimerMode,
    },
    /// Finish the current phase now
    Complete,
    /// Restart the current phase from its full duration
    Reset,
}

/// Wraps a cadence so that Ctrl-C ends the wait with `false`.
struct UntilCtrlC<K> {
    inner: K,
    ctrl_c: Pin<Box<dyn Future<Output = std::io::Result<()>>>>,
    interrupted: bool,
}

impl<K: Cadence> UntilCtrlC<K> {
    fn new(inner: K) -> Self {
        Self {
            inner,
            ctrl_c: Box::pin(tokio::signal::ctrl_c()),
            interrupted: false,
        }
    }
}

impl<K: Cadence> Cadence for UntilCtrlC<K> {
    async fn wait(&mut self) -> bool {
        if self.interrupted {
            return false;
        }
        tokio::select! {
            ready = self.inner.wait() => ready,
            _ = &mut self.ctrl_c => {
                self.interrupted = true;
                false
            }
        }
    }
}

fn print_events(events: &[Event]) -> CommandResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn record_completions(host: &Host, app: &App<'_>, events: &[Event]) {
    for event in events {
        if let Event::PhaseCompleted {
            mode,
            duration_secs,
            at,
            ..
        } = event
        {
            let target = app.target();
            let result = host.db.record_phase(
                *mode,
                *duration_secs,
                target.map(|t| t.project_id.as_str()),
                target.and_then(|t| t.subtask_id.as_deref()),
                *at,
            );
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to record phase");
            }
        }
    }
}

async fn run_foreground(host: &Host, app: &mut App<'_>) -> CommandResult {
    if let Some(event) = app.start() {
        print_events(&[event])?;
    }

    let mut cadence = UntilCtrlC::new(IntervalCadence::every_second());
    app.drive(&mut cadence, |app, events| {
        let engine = app.engine();
        eprint!(
            "\r{} {} ",
            engine.mode().label(),
            format_clock(engine.remaining_secs())
        );
        let _ = std::io::stderr().flush();
        if events.is_empty() {
            return;
        }
        eprintln!();
        record_completions(host, app, events);
        if let Err(e) = print_events(events) {
            tracing::warn!(error = %e, "failed to print events");
        }
    })
    .await;
    eprintln!();

    let events = finish_run(app)?;
    print_events(&events)
}

/// Pause and commit the app session before anything is printed.
fn finish_run<S: DataStore, N: Notifier>(
    app: &mut FocusApp<S, N>,
) -> Result<Vec<Event>, CoreError> {
    let mut events: Vec<Event> = app.pause().into_iter().collect();
    let (_, committed) = app.commit_app_session()?;
    events.push(committed);
    Ok(events)
}

pub fn run(action: TimerAction) -> CommandResult {
    let host = Host::open()?;
    let mut app = host.app()?;

    match action {
        TimerAction::Run => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let outcome = runtime.block_on(run_foreground(&host, &mut app));
            host.save_state(&app)?;
            return outcome;
        }
        TimerAction::Status => {
            print_json(&app.snapshot())?;
        }
        TimerAction::Mode { mode } => {
            print_json(&app.set_mode(mode))?;
        }
        TimerAction::Complete => {
            let events = app.complete()?;
            record_completions(&host, &app, &events);
            print_events(&events)?;
        }
        TimerAction::Reset => {
            print_json(&app.reset())?;
        }
    }

    host.save_state(&app)?;
    Ok(())
}
