//! Interactive polygon drawing.
//!
//! Camera moves and taps on the map feed a [`PolygonDrawingController`], which
//! keeps the ordered vertex list of the polygon being drawn and republishes a
//! full snapshot after every change.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DrawingConfig;
use crate::drawing::location::{IconTint, LocationLock};
use crate::drawing::state::DrawingState;
use crate::drawing::subject::{Subject, Subscription};
use crate::error::DrawingError;
use crate::models::{
    unsaved_features_from_polygon, AuditInfo, Layer, MapFeature, MapPolygon, Point,
    PolygonFeature, Project,
};
use crate::ports::{AuthenticationManager, IdGenerator};

pub struct PolygonDrawingController {
    config: DrawingConfig,
    id_generator: Arc<dyn IdGenerator>,
    auth: Arc<dyn AuthenticationManager>,
    location_lock: Option<LocationLock>,

    drawing_state: Subject<DrawingState>,
    polygon_completed: Subject<bool>,
    unsaved_map_features: Subject<Vec<MapFeature>>,
    location_lock_enabled: Subject<bool>,

    vertices: Vec<Point>,
    /// The last vertex was added by camera tracking, not by the user, and is
    /// replaced by the next vertex added.
    last_vertex_provisional: bool,
    camera_target: Option<Point>,
    map_polygon: Option<MapPolygon>,
    project: Option<Project>,
    layer: Option<Layer>,
}

impl PolygonDrawingController {
    pub fn new(
        config: DrawingConfig,
        id_generator: Arc<dyn IdGenerator>,
        auth: Arc<dyn AuthenticationManager>,
    ) -> Self {
        Self {
            config,
            id_generator,
            auth,
            location_lock: None,
            drawing_state: Subject::publish(),
            polygon_completed: Subject::behavior(false),
            unsaved_map_features: Subject::behavior(Vec::new()),
            location_lock_enabled: Subject::behavior(false),
            vertices: Vec::new(),
            last_vertex_provisional: false,
            camera_target: None,
            map_polygon: None,
            project: None,
            layer: None,
        }
    }

    /// Attach a location lock, disabled automatically when the map is dragged
    pub fn with_location_lock(mut self, lock: LocationLock) -> Self {
        self.location_lock = Some(lock);
        self
    }

    /// Drawing state transitions, emitted from the moment of subscription
    pub fn drawing_state(&self) -> Subscription<DrawingState> {
        self.drawing_state.subscribe()
    }

    /// Whether the current polygon is closed, starting with the latest value
    pub fn polygon_completed(&self) -> Subscription<bool> {
        self.polygon_completed.subscribe()
    }

    /// Features drawn by the user but not yet saved, starting with the latest set
    pub fn unsaved_map_features(&self) -> Subscription<Vec<MapFeature>> {
        self.unsaved_map_features.subscribe()
    }

    pub fn location_lock_enabled(&self) -> Subscription<bool> {
        self.location_lock_enabled.subscribe()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn is_last_vertex_provisional(&self) -> bool {
        self.last_vertex_provisional
    }

    pub fn first_vertex(&self) -> Option<Point> {
        self.map_polygon.as_ref().and_then(MapPolygon::first_vertex)
    }

    pub fn map_polygon(&self) -> Option<&MapPolygon> {
        self.map_polygon.as_ref()
    }

    pub fn start_drawing_flow(&mut self, project: Project, layer: Layer) {
        self.vertices.clear();
        self.last_vertex_provisional = false;

        let polygon = MapPolygon {
            id: self.id_generator.generate_uuid(),
            vertices: Vec::new(),
            style: layer.default_style.clone(),
        };
        info!(polygon_id = %polygon.id, project = %project.id, layer = %layer.id, "Started drawing polygon");

        self.project = Some(project);
        self.layer = Some(layer);
        self.drawing_state.emit(DrawingState::InProgress);
        self.map_polygon = Some(polygon);
        self.publish_polygon();
    }

    pub fn on_camera_moved(&mut self, target: Point) {
        self.camera_target = Some(target);
        if let Some(lock) = &self.location_lock {
            if lock.is_locked() {
                debug!("User dragged map. Disabling location lock");
                lock.request(false);
            }
        }
    }

    /// Move the provisional vertex to the camera target, or snap it onto the
    /// first vertex when the target is within the snap threshold of it.
    ///
    /// `distance_in_pixels` is the on-screen distance between the target and
    /// the first vertex.
    pub fn update_last_vertex(&mut self, target: Point, distance_in_pixels: f64) {
        let snap = self.vertices.len() > 2 && distance_in_pixels <= self.config.snap_threshold_dp;
        let vertex = if snap {
            debug!(distance_in_pixels, "Snapping to first vertex");
            self.vertices[0]
        } else {
            target
        };
        self.add_vertex(vertex, true);
    }

    /// Confirm a vertex at the current camera target
    pub fn select_current_vertex(&mut self) {
        if let Some(target) = self.camera_target {
            self.add_vertex(target, false);
        }
    }

    /// Remove the last vertex, or cancel drawing if there is none
    pub fn remove_last_vertex(&mut self) {
        if self.vertices.pop().is_none() {
            info!("Polygon drawing canceled");
            self.drawing_state.emit(DrawingState::Canceled);
            self.reset();
        } else {
            // The remaining tail was placed by the user.
            self.last_vertex_provisional = false;
            self.publish_polygon();
        }
    }

    /// Finish the polygon and emit it as [`DrawingState::Completed`].
    ///
    /// Fails if no project and layer are active or the polygon is not closed.
    /// Closure depends on a prior [`update_last_vertex`](Self::update_last_vertex)
    /// having snapped to the first vertex; the UI must only offer completion
    /// once [`polygon_completed`](Self::polygon_completed) reports `true`.
    pub fn on_complete_polygon_button_click(&mut self) -> Result<PolygonFeature, DrawingError> {
        let (Some(project), Some(layer)) = (&self.project, &self.layer) else {
            return Err(DrawingError::MissingProjectOrLayer);
        };
        let polygon = self.map_polygon.as_ref().ok_or(DrawingError::NoActiveSession)?;
        if !polygon.is_polygon_complete() {
            return Err(DrawingError::PolygonNotComplete);
        }

        let audit_info = AuditInfo::now(self.auth.current_user());
        let feature = PolygonFeature {
            id: polygon.id.clone(),
            vertices: polygon.vertices.clone(),
            project: project.clone(),
            layer: layer.clone(),
            created: audit_info.clone(),
            last_modified: audit_info,
        };
        info!(polygon_id = %feature.id, vertices = feature.vertices.len(), "Polygon completed");

        self.drawing_state.emit(DrawingState::Completed(feature.clone()));
        self.reset();
        Ok(feature)
    }

    pub fn set_location_lock_enabled(&self, enabled: bool) {
        self.location_lock_enabled.emit(enabled);
    }

    /// Toggle the location lock
    pub fn on_location_lock_click(&self) {
        if let Some(lock) = &self.location_lock {
            lock.request(!lock.is_locked());
        }
    }

    pub fn icon_tint(&self) -> IconTint {
        self.location_lock.as_ref().map_or(IconTint::Grey800, LocationLock::icon_tint)
    }

    fn add_vertex(&mut self, vertex: Point, provisional: bool) {
        if self.last_vertex_provisional {
            self.vertices.pop();
        }
        self.last_vertex_provisional = provisional;
        self.vertices.push(vertex);
        debug!(count = self.vertices.len(), provisional, "Vertex added");
        self.publish_polygon();
    }

    fn publish_polygon(&mut self) {
        if let Some(polygon) = &mut self.map_polygon {
            polygon.vertices = self.vertices.clone();
        }
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let (features, completed) = match &self.map_polygon {
            Some(polygon) => (unsaved_features_from_polygon(polygon), polygon.is_polygon_complete()),
            None => (Vec::new(), false),
        };
        self.polygon_completed.emit(completed);
        self.unsaved_map_features.emit(features);
    }

    fn reset(&mut self) {
        self.last_vertex_provisional = false;
        self.vertices.clear();
        self.map_polygon = None;
        self.publish_snapshot();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Style, User};
    use crate::ports::StaticAuthenticationManager;

    struct FixedIds;

    impl IdGenerator for FixedIds {
        fn generate_uuid(&self) -> String {
            "polygon-1".to_string()
        }
    }

    fn controller() -> PolygonDrawingController {
        let user = User {
            id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            display_name: "User One".to_string(),
        };
        PolygonDrawingController::new(
            DrawingConfig::default(),
            Arc::new(FixedIds),
            Arc::new(StaticAuthenticationManager::new(user)),
        )
    }

    fn project() -> Project {
        Project { id: "project".to_string(), title: "Project".to_string() }
    }

    fn layer() -> Layer {
        Layer { id: "layer".to_string(), name: "Layer".to_string(), default_style: Style::new("#112233") }
    }

    fn select(controller: &mut PolygonDrawingController, point: Point) {
        controller.on_camera_moved(point);
        controller.select_current_vertex();
    }

    #[test]
    fn test_start_emits_in_progress() {
        let mut controller = controller();
        let mut states = controller.drawing_state();
        controller.start_drawing_flow(project(), layer());

        assert_eq!(states.drain(), vec![DrawingState::InProgress]);
        assert_eq!(controller.map_polygon().unwrap().id, "polygon-1");
        assert_eq!(controller.map_polygon().unwrap().style.color, "#112233");
    }

    #[test]
    fn test_select_without_camera_target_is_noop() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        controller.select_current_vertex();
        assert!(controller.vertices().is_empty());
    }

    #[test]
    fn test_update_replaces_provisional_vertex() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));

        controller.update_last_vertex(Point::new(1.0, 1.0), 100.0);
        controller.update_last_vertex(Point::new(2.0, 2.0), 100.0);

        assert_eq!(controller.vertices(), &[Point::new(0.0, 0.0), Point::new(2.0, 2.0)]);
        assert!(controller.is_last_vertex_provisional());
    }

    #[test]
    fn test_select_replaces_provisional_vertex() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        controller.on_camera_moved(Point::new(1.0, 1.0));
        controller.update_last_vertex(Point::new(1.0, 1.0), 100.0);
        controller.select_current_vertex();

        assert_eq!(controller.vertices(), &[Point::new(1.0, 1.0)]);
        assert!(!controller.is_last_vertex_provisional());
    }

    #[test]
    fn test_snap_to_first_vertex_completes_polygon() {
        let mut controller = controller();
        let mut completed = controller.polygon_completed();
        controller.start_drawing_flow(project(), layer());
        let a = Point::new(0.0, 0.0);
        select(&mut controller, a);
        select(&mut controller, Point::new(0.0, 1.0));
        select(&mut controller, Point::new(1.0, 1.0));

        controller.update_last_vertex(Point::new(0.1, 0.1), 10.0);

        assert_eq!(controller.vertices().len(), 4);
        assert_eq!(controller.vertices()[3], a);
        assert_eq!(completed.drain().last(), Some(&true));
    }

    #[test]
    fn test_no_snap_below_three_vertices() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));

        controller.update_last_vertex(Point::new(0.5, 0.5), 0.0);
        assert_eq!(controller.vertices()[2], Point::new(0.5, 0.5));
    }

    #[test]
    fn test_snap_threshold_is_inclusive() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));
        select(&mut controller, Point::new(1.0, 1.0));

        controller.update_last_vertex(Point::new(5.0, 5.0), 24.0);
        assert_eq!(controller.vertices()[3], Point::new(0.0, 0.0));

        controller.update_last_vertex(Point::new(5.0, 5.0), 24.5);
        assert_eq!(controller.vertices()[3], Point::new(5.0, 5.0));
        assert_eq!(controller.vertices().len(), 4);
    }

    #[test]
    fn test_remove_last_vertex() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));

        controller.remove_last_vertex();
        assert_eq!(controller.vertices(), &[Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_remove_provisional_keeps_confirmed_vertices() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        controller.update_last_vertex(Point::new(3.0, 3.0), 100.0);

        controller.remove_last_vertex();
        controller.update_last_vertex(Point::new(4.0, 4.0), 100.0);

        assert_eq!(controller.vertices(), &[Point::new(0.0, 0.0), Point::new(4.0, 4.0)]);
    }

    #[test]
    fn test_remove_on_empty_cancels() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        let mut states = controller.drawing_state();
        let mut features = controller.unsaved_map_features();

        controller.remove_last_vertex();

        assert_eq!(states.drain(), vec![DrawingState::Canceled]);
        assert!(controller.map_polygon().is_none());
        assert!(controller.vertices().is_empty());
        assert_eq!(features.drain().last(), Some(&Vec::new()));
    }

    #[test]
    fn test_complete_builds_feature_and_resets() {
        let mut controller = controller();
        let mut states = controller.drawing_state();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));
        select(&mut controller, Point::new(1.0, 1.0));
        controller.update_last_vertex(Point::new(0.0, 0.0), 1.0);

        let feature = controller.on_complete_polygon_button_click().unwrap();

        assert_eq!(feature.id, "polygon-1");
        assert_eq!(feature.vertices.len(), 4);
        assert_eq!(feature.project, project());
        assert_eq!(feature.layer, layer());
        assert_eq!(feature.created.user.id, "u1");
        assert_eq!(feature.created, feature.last_modified);

        let emitted = states.drain();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].unsaved_polygon_feature(), Some(&feature));
        assert!(controller.vertices().is_empty());
        assert!(controller.map_polygon().is_none());
    }

    #[test]
    fn test_complete_without_project_fails() {
        let mut controller = controller();
        assert_eq!(
            controller.on_complete_polygon_button_click(),
            Err(DrawingError::MissingProjectOrLayer)
        );
    }

    #[test]
    fn test_complete_open_polygon_fails() {
        let mut controller = controller();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));
        select(&mut controller, Point::new(1.0, 1.0));

        assert_eq!(
            controller.on_complete_polygon_button_click(),
            Err(DrawingError::PolygonNotComplete)
        );
        assert_eq!(controller.vertices().len(), 3);
    }

    #[test]
    fn test_unsaved_features_follow_vertices() {
        let mut controller = controller();
        let mut features = controller.unsaved_map_features();
        controller.start_drawing_flow(project(), layer());
        select(&mut controller, Point::new(0.0, 0.0));
        select(&mut controller, Point::new(0.0, 1.0));

        let snapshots = features.drain();
        // initial, start, two vertices
        assert_eq!(snapshots.len(), 4);
        assert!(snapshots[1].is_empty());
        assert_eq!(snapshots[3].len(), 3);
    }

    #[test]
    fn test_location_lock_enabled_flag() {
        let controller = controller();
        controller.set_location_lock_enabled(true);
        let mut enabled = controller.location_lock_enabled();
        assert_eq!(enabled.drain(), vec![true]);
        assert_eq!(controller.icon_tint(), IconTint::Grey800);
    }
}
