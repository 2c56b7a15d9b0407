pub mod config;
pub mod data;
pub mod project;
pub mod settings;
pub mod stats;
pub mod timer;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
