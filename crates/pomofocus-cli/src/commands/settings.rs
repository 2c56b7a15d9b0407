use clap::Subcommand;
use pomofocus_core::SettingsPatch;

use super::{print_json, CommandResult};
use crate::host::Host;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current durations
    Show,
    /// Change one or more durations (minutes)
    Set {
        #[arg(long)]
        work: Option<u32>,
        #[arg(long)]
        short_break: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
        #[arg(long)]
        sessions_before_long_break: Option<u32>,
    },
}

pub fn run(action: SettingsAction) -> CommandResult {
    let host = Host::open()?;
    let mut app = host.app()?;

    match action {
        SettingsAction::Show => print_json(app.settings())?,
        SettingsAction::Set {
            work,
            short_break,
            long_break,
            sessions_before_long_break,
        } => {
            let patch = SettingsPatch {
                work_duration: work,
                short_break_duration: short_break,
                long_break_duration: long_break,
                sessions_before_long_break,
            };
            if patch.is_empty() {
                return Err("nothing to change; pass at least one option".into());
            }
            let settings = app.update_settings(&patch)?;
            print_json(&settings)?;
        }
    }
    Ok(())
}
