//! Wiring shared by the commands: the database, the host config and the
//! timer state that outlives a single invocation.

use pomofocus_core::storage::Database;
use pomofocus_core::{
    ActiveTarget, AppOptions, Config, CoreError, FocusApp, NotificationKind, Notifier, TimerEngine,
};

const ENGINE_KEY: &str = "timer_engine";
const TARGET_KEY: &str = "active_target";

pub type App<'a> = FocusApp<&'a Database, TerminalNotifier>;

/// Writes completion notices to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    enabled: bool,
    bell: bool,
}

impl TerminalNotifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.notifications.enabled,
            bell: config.notifications.bell,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, _kind: NotificationKind, title: &str, body: &str) {
        if !self.enabled {
            return;
        }
        if self.bell {
            eprint!("\x07");
        }
        eprintln!("{title} {body}");
    }
}

pub struct Host {
    pub db: Database,
    pub config: Config,
}

impl Host {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Database::open()?;
        Ok(Self { db, config })
    }

    pub fn options(&self) -> AppOptions {
        let defaults = AppOptions::default();
        AppOptions {
            policy: self.config.auto_start_policy(),
            reporting_zone: self
                .config
                .reporting_zone()
                .unwrap_or(defaults.reporting_zone),
        }
    }

    /// Open the app with the persisted timer and selection restored.
    ///
    /// Only `timer run` commits the app session; other commands are too short to log.
    pub fn app(&self) -> Result<App<'_>, CoreError> {
        let notifier = TerminalNotifier::from_config(&self.config);
        let mut app = FocusApp::open(&self.db, notifier, self.options())?;
        if let Some(engine) = self.db.get_json::<TimerEngine>(ENGINE_KEY)? {
            app.restore_engine(engine);
        }
        if let Some(target) = self.db.get_json::<ActiveTarget>(TARGET_KEY)? {
            app.restore_target(target);
        }
        Ok(app)
    }

    /// Persist the timer and selection for the next invocation.
    pub fn save_state(&self, app: &App<'_>) -> Result<(), CoreError> {
        self.db.set_json(ENGINE_KEY, app.engine())?;
        match app.target() {
            Some(target) => self.db.set_json(TARGET_KEY, target)?,
            None => self
                .db
                .kv_delete(TARGET_KEY)
                .map_err(pomofocus_core::StorageError::from)?,
        }
        Ok(())
    }
}
