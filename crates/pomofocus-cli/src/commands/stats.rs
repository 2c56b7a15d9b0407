use chrono::{TimeZone, Utc};
use clap::Subcommand;
use pomofocus_core::{format_hms, model::day_key};
use serde::Serialize;

use super::{print_json, CommandResult};
use crate::host::Host;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed phases and app time
    Today,
    /// All-time totals
    All,
    /// Per-day app session log
    Sessions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayStats {
    date: String,
    work_phases: u64,
    work_time: String,
    break_phases: u64,
    break_time: String,
    app_time: String,
}

pub fn run(action: StatsAction) -> CommandResult {
    let host = Host::open()?;
    let app = host.app()?;

    match action {
        StatsAction::Today => {
            let zone = app.tracker().zone();
            let now = Utc::now();
            let midnight = now.with_timezone(&zone).date_naive().and_hms_opt(0, 0, 0);
            let since = midnight
                .and_then(|m| zone.from_local_datetime(&m).single())
                .map_or(now, |m| m.with_timezone(&Utc));
            let totals = host.db.phase_totals_since(since)?;

            let date = day_key(now, zone);
            let app_secs = app.dataset().app_session(&date).map_or(0, |s| s.duration);
            print_json(&TodayStats {
                work_phases: totals.work_phases,
                work_time: format_hms(totals.work_secs),
                break_phases: totals.break_phases,
                break_time: format_hms(totals.break_secs),
                app_time: format_hms(app_secs),
                date,
            })?;
        }
        StatsAction::All => print_json(&app.export().summary)?,
        StatsAction::Sessions => print_json(&app.dataset().app_sessions)?,
    }
    Ok(())
}
