//! Project management commands for CLI.

use clap::Subcommand;
use pomofocus_core::{NewSubtask, Project, ProjectProgress};
use serde::Serialize;

use super::{print_json, CommandResult};
use crate::host::Host;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Subtask as "<name>:<sessions>", repeatable
        #[arg(long = "subtask", value_parser = parse_subtask)]
        subtasks: Vec<NewSubtask>,
    },
    /// List all projects with their progress
    List,
    /// Show one project with its progress
    Show {
        /// Project ID
        id: String,
    },
    /// Change a subtask's session target by a signed delta
    Adjust {
        project: String,
        subtask: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Select the project (and subtask) credited by completed work phases
    Select {
        project: String,
        subtask: Option<String>,
    },
    /// Clear the current selection
    Deselect,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectView<'a> {
    #[serde(flatten)]
    project: &'a Project,
    progress: ProjectProgress,
}

fn parse_subtask(raw: &str) -> Result<NewSubtask, String> {
    let (name, sessions) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected <name>:<sessions>, got '{raw}'"))?;
    let sessions = sessions
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid session count '{sessions}': {e}"))?;
    Ok(NewSubtask::new(name, sessions))
}

pub fn run(action: ProjectAction) -> CommandResult {
    let host = Host::open()?;
    let mut app = host.app()?;

    match action {
        ProjectAction::Create { name, subtasks } => {
            let project = app.create_project(&name, subtasks)?;
            eprintln!("Project created: {}", project.id);
            print_json(&project)?;
        }
        ProjectAction::List => {
            let settings = *app.settings();
            let views: Vec<_> = app
                .dataset()
                .projects
                .iter()
                .map(|project| ProjectView {
                    project,
                    progress: ProjectProgress::of(project, &settings),
                })
                .collect();
            print_json(&views)?;
        }
        ProjectAction::Show { id } => {
            let view = ProjectView {
                project: app.project(&id)?,
                progress: app.project_progress(&id)?,
            };
            print_json(&view)?;
        }
        ProjectAction::Adjust {
            project,
            subtask,
            delta,
        } => {
            app.adjust_session_target(&project, &subtask, delta)?;
            let updated = app
                .project(&project)?
                .subtask(&subtask)
                .ok_or_else(|| pomofocus_core::CoreError::subtask_not_found(&subtask))?;
            print_json(updated)?;
        }
        ProjectAction::Select { project, subtask } => {
            match subtask {
                Some(subtask) => app.select_subtask(&project, &subtask)?,
                None => app.select_project(&project)?,
            }
            host.save_state(&app)?;
            print_json(&app.target())?;
        }
        ProjectAction::Deselect => {
            app.clear_selection();
            host.save_state(&app)?;
            println!("selection cleared");
        }
    }
    Ok(())
}
