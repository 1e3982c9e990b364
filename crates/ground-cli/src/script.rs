//! Drawing scripts: a recorded sequence of map interactions.
//!
//! ```toml
//! active_project = 0
//!
//! [[projects]]
//! id = "forest-survey"
//! title = "Forest survey"
//! members = ["surveyor@example.com"]
//!
//! [layer]
//! id = "plots"
//! name = "Plots"
//!
//! [[events]]
//! action = "start"
//!
//! [[events]]
//! action = "camera"
//! latitude = 0.0
//! longitude = 0.0
//! ```

use anyhow::{Context, Result};
use ground_core::models::{Layer, Point, Project, Style};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct DrawingScript {
    pub projects: Vec<ScriptProject>,
    /// Index into the current user's project summaries
    #[serde(default)]
    pub active_project: usize,
    pub layer: ScriptLayer,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptProject {
    pub id: String,
    pub title: String,
    /// Emails allowed to open the project; empty grants the configured user
    #[serde(default)]
    pub members: Vec<String>,
}

impl ScriptProject {
    pub fn to_project(&self) -> Project {
        Project { id: self.id.clone(), title: self.title.clone() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScriptLayer {
    pub id: String,
    pub name: String,
    /// Falls back to the configured default style color
    pub color: Option<String>,
}

impl ScriptLayer {
    pub fn to_layer(&self, default_style: &Style) -> Layer {
        Layer {
            id: self.id.clone(),
            name: self.name.clone(),
            default_style: self.color.as_ref().map(Style::new).unwrap_or_else(|| default_style.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptEvent {
    Start,
    Camera { latitude: f64, longitude: f64 },
    Update { latitude: f64, longitude: f64, distance: f64 },
    Select,
    Remove,
    Complete,
    LocationLock,
}

impl ScriptEvent {
    pub fn point(&self) -> Option<Point> {
        match self {
            ScriptEvent::Camera { latitude, longitude } | ScriptEvent::Update { latitude, longitude, .. } => {
                Some(Point::new(*latitude, *longitude))
            }
            _ => None,
        }
    }
}

pub fn load_script(path: &Path) -> Result<DrawingScript> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read drawing script {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid drawing script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_script() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[projects]]
id = "p"
title = "Project"
members = ["a@example.com"]

[layer]
id = "l"
name = "Layer"

[[events]]
action = "start"

[[events]]
action = "update"
latitude = 1.5
longitude = 2.5
distance = 30.0

[[events]]
action = "complete"
"#
        )
        .unwrap();

        let script = load_script(file.path()).unwrap();
        assert_eq!(script.projects[0].to_project().id, "p");
        assert_eq!(script.projects[0].members, vec!["a@example.com"]);
        assert_eq!(script.active_project, 0);
        assert_eq!(script.events.len(), 3);
        assert_eq!(script.events[1].point(), Some(Point::new(1.5, 2.5)));
        assert_eq!(script.events[2], ScriptEvent::Complete);

        let layer = script.layer.to_layer(&Style::new("#123456"));
        assert_eq!(layer.default_style.color, "#123456");
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[projects]]\nid = \"p\"\ntitle = \"P\"\n[layer]\nid = \"l\"\nname = \"L\"\n[[events]]\naction = \"fly\""
        )
        .unwrap();

        assert!(load_script(file.path()).is_err());
    }
}
