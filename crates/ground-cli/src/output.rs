use console::style;
use ground_core::codec;
use ground_core::config::{ConfigSource, LayeredConfig};
use ground_core::drawing::DrawingState;
use ground_core::models::{Geometry, Project};
use ground_core::ports::StoredFeature;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Everything a replayed drawing session produced
#[derive(Debug)]
pub struct DrawReport {
    pub project: Project,
    pub transitions: Vec<String>,
    pub features: Vec<StoredFeature>,
    /// Vertices of a polygon still being drawn when the script ended
    pub open_vertices: usize,
}

#[derive(Debug, Serialize)]
struct FeatureDocument<'a> {
    id: &'a str,
    layer: &'a str,
    created_by: &'a str,
    geometry: codec::StoreValue,
}

impl<'a> From<&'a StoredFeature> for FeatureDocument<'a> {
    fn from(feature: &'a StoredFeature) -> Self {
        Self {
            id: &feature.id,
            layer: &feature.layer_id,
            created_by: &feature.created.user.email,
            geometry: codec::to_store_map(&feature.geometry),
        }
    }
}

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    id: String,
    #[tabled(rename = "Layer")]
    layer: String,
    #[tabled(rename = "Created by")]
    created_by: String,
    #[tabled(rename = "Vertices")]
    vertices: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }

    /// One drawing state change; JSON output collects these into the report
    pub fn transition(&self, step: usize, state: &DrawingState) {
        if let OutputFormat::Human = self.format {
            let marker = match state {
                DrawingState::InProgress => style("●").blue().bold(),
                DrawingState::Completed(_) => style("✓").green().bold(),
                DrawingState::Canceled => style("✗").yellow().bold(),
            };
            println!("{} step {}: {}", marker, step, describe(state));
        }
    }

    pub fn project_activated(&self, project: &Project, available: usize) {
        if let OutputFormat::Human = self.format {
            println!(
                "{} Drawing in {} ({} of {} project(s) available)",
                style("ℹ").blue().bold(),
                style(&project.title).bold(),
                project.id,
                available
            );
        }
    }

    pub fn draw_report(&self, report: &DrawReport) -> anyhow::Result<()> {
        let documents: Vec<FeatureDocument<'_>> = report.features.iter().map(Into::into).collect();

        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": {
                        "project": report.project,
                        "transitions": report.transitions,
                        "open_vertices": report.open_vertices,
                        "features": documents,
                    },
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Human => {
                if report.open_vertices > 0 {
                    eprintln!(
                        "{} Script ended with {} unsaved vertices",
                        style("⚠").yellow().bold(),
                        report.open_vertices
                    );
                }
                println!(
                    "{} Saved {} polygon(s) to {}",
                    style("✓").green().bold(),
                    report.features.len(),
                    report.project.title
                );
                if report.features.is_empty() {
                    return Ok(());
                }

                let rows = report.features.iter().map(|feature| FeatureRow {
                    id: feature.id.clone(),
                    layer: feature.layer_id.clone(),
                    created_by: feature.created.user.email.clone(),
                    vertices: vertex_count(&feature.geometry),
                });
                print_table(Table::new(rows));

                for document in &documents {
                    println!("\n{}", style(format!("Store map of {}", document.id)).bold().underlined());
                    println!("{}", serde_json::to_string_pretty(&document.geometry)?);
                }
            }
        }
        Ok(())
    }

    /// Confirmation for a geometry written to a file
    pub fn geometry_written(&self, geometry: &Geometry, path: &Path) {
        match self.format {
            OutputFormat::Human => println!(
                "{} Wrote {} geometry to {}",
                style("✓").green().bold(),
                geometry.geometry_type(),
                path.display()
            ),
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "status": "success",
                    "data": {
                        "type": geometry.geometry_type(),
                        "path": path.display().to_string(),
                    },
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            }
        }
    }

    pub fn config(&self, config: &LayeredConfig) -> anyhow::Result<()> {
        let mut rows: Vec<ConfigRow> = config
            .to_inspection_map()
            .into_iter()
            .map(|(key, (value, source))| ConfigRow { key, value, source: source_label(source).to_string() })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({ "status": "success", "data": rows });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Human => {
                println!("\n{}", style("Configuration").bold().underlined());
                print_table(Table::new(rows));
            }
        }
        Ok(())
    }
}

/// Short human label of a drawing state
pub fn describe(state: &DrawingState) -> String {
    match state {
        DrawingState::InProgress => "in progress".to_string(),
        DrawingState::Completed(feature) => {
            format!("completed polygon {} with {} vertices", feature.id, feature.vertices.len())
        }
        DrawingState::Canceled => "canceled".to_string(),
    }
}

fn source_label(source: ConfigSource) -> &'static str {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "environment",
        ConfigSource::Cli => "command line",
    }
}

fn vertex_count(geometry: &Geometry) -> usize {
    match geometry {
        Geometry::Point(_) => 1,
        Geometry::Polygon(polygon) => polygon.shell.coordinates().len(),
        Geometry::MultiPolygon(multi) => {
            multi.polygons.iter().map(|polygon| polygon.shell.coordinates().len()).sum()
        }
    }
}

fn print_table(mut table: Table) {
    table.with(Style::rounded());
    println!("{}", table);
}
