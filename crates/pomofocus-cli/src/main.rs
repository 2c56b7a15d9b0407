use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod host;

#[derive(Parser)]
#[command(
    name = "pomofocus",
    version,
    about = "Pomodoro timer that tracks progress on project subtasks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project and subtask management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Pomodoro durations
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Import and export of the whole dataset
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
    /// Accumulated statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Project { action } => commands::project::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Data { action } => commands::data::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pomofocus", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
