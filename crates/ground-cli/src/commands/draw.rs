//! Draw command implementation

use crate::cli::DrawArgs;
use crate::config_loader::load_config_with_overrides;
use crate::errors::project_unavailable;
use crate::location::SimulatedLocationManager;
use crate::output::{describe, DrawReport, OutputWriter};
use crate::script::{load_script, DrawingScript, ScriptEvent};
use anyhow::{bail, Context, Result};
use ground_core::config::CliConfigOverrides;
use ground_core::drawing::{persist_completed, LocationLock, PolygonDrawingController};
use ground_core::memory::{MemoryFeatureRepository, MemoryProjectRepository};
use ground_core::models::{Project, User};
use ground_core::ports::{FeatureRepository, StaticAuthenticationManager, UuidGenerator};
use ground_core::selector::ProjectSelector;
use std::path::Path;
use std::sync::Arc;

pub async fn execute(args: DrawArgs, config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config_with_overrides(
        config_path,
        CliConfigOverrides {
            snap_threshold_dp: args.snap_threshold,
            user_email: args.user_email.clone(),
            ..Default::default()
        },
    )?;
    let script = load_script(&args.script)?;
    let layer = script.layer.to_layer(&config.default_style());
    let user = config.user();
    let auth = Arc::new(StaticAuthenticationManager::new(user.clone()));

    let project = select_project(&script, args.project, &user, auth.as_ref(), output)?;
    tracing::info!(project_id = %project.id, "Replaying drawing script");

    let repository = Arc::new(MemoryFeatureRepository::new());
    let mut controller = PolygonDrawingController::new(config.drawing(), Arc::new(UuidGenerator), auth)
        .with_location_lock(LocationLock::spawn(Arc::new(SimulatedLocationManager)));

    let mut states = controller.drawing_state();
    let persisting = tokio::spawn(persist_completed(controller.drawing_state(), repository.clone()));
    let mut transitions = Vec::new();

    for (step, event) in script.events.iter().enumerate() {
        tracing::debug!(step, ?event, "Applying drawing event");
        match event {
            ScriptEvent::Start => controller.start_drawing_flow(project.clone(), layer.clone()),
            ScriptEvent::Camera { .. } => {
                if let Some(point) = event.point() {
                    controller.on_camera_moved(point);
                }
            }
            ScriptEvent::Update { distance, .. } => {
                if let Some(point) = event.point() {
                    controller.update_last_vertex(point, *distance);
                }
            }
            ScriptEvent::Select => controller.select_current_vertex(),
            ScriptEvent::Remove => controller.remove_last_vertex(),
            ScriptEvent::Complete => {
                controller
                    .on_complete_polygon_button_click()
                    .with_context(|| format!("Event {} could not complete the polygon", step + 1))?;
            }
            ScriptEvent::LocationLock => {
                controller.on_location_lock_click();
                // Let the lock task observe the request before the next event.
                tokio::task::yield_now().await;
            }
        }

        for state in states.drain() {
            output.transition(step + 1, &state);
            transitions.push(describe(&state));
        }
    }

    let open_vertices = controller.vertices().len();
    drop(controller);
    let saved = persisting.await.context("Persisting task failed")?;
    let features = repository.list_features(&project.id)?;
    tracing::debug!(saved, listed = features.len(), "Drawing session finished");

    output.draw_report(&DrawReport { project, transitions, features, open_vertices })
}

/// Register the script's projects and activate one through the project selector
fn select_project(
    script: &DrawingScript,
    index_override: Option<usize>,
    user: &User,
    auth: &StaticAuthenticationManager,
    output: &OutputWriter,
) -> Result<Project> {
    let projects = Arc::new(MemoryProjectRepository::new());
    for entry in &script.projects {
        if entry.members.is_empty() {
            projects.add_project(entry.to_project(), [user.email.clone()]);
        } else {
            projects.add_project(entry.to_project(), entry.members.iter().cloned());
        }
    }

    let selector = ProjectSelector::load(projects, auth)?;
    let index = index_override.unwrap_or(script.active_project);
    match selector.activate_project(index) {
        Ok(project) => {
            output.project_activated(&project, selector.summaries().len());
            Ok(project)
        }
        Err(error) => {
            let cli_error = project_unavailable(&user.email, &error);
            cli_error.display();
            bail!("{}: {}", cli_error, error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(active_project: usize) -> DrawingScript {
        toml::from_str(&format!(
            r#"
active_project = {}

[[projects]]
id = "shared"
title = "Shared"

[[projects]]
id = "hydrology"
title = "Hydrology"
members = ["hydro@example.com"]

[[projects]]
id = "forest"
title = "Forest"
members = ["ana@example.com", "hydro@example.com"]

[layer]
id = "plots"
name = "Plots"
"#,
            active_project
        ))
        .unwrap()
    }

    fn user(email: &str) -> User {
        User { id: email.to_string(), email: email.to_string(), display_name: "Surveyor".to_string() }
    }

    fn select(script: &DrawingScript, index: Option<usize>, email: &str) -> Result<Project> {
        let user = user(email);
        let auth = StaticAuthenticationManager::new(user.clone());
        select_project(script, index, &user, &auth, &OutputWriter::new(true))
    }

    #[test]
    fn test_index_counts_only_visible_projects() {
        // ana sees "shared" (granted to the configured user) and "forest"
        let project = select(&script(1), None, "ana@example.com").unwrap();
        assert_eq!(project.id, "forest");
    }

    #[test]
    fn test_cli_index_overrides_script() {
        let project = select(&script(1), Some(0), "ana@example.com").unwrap();
        assert_eq!(project.id, "shared");
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let error = select(&script(5), None, "ana@example.com").unwrap_err();
        assert!(error.to_string().contains("index 5"));
    }
}
