use crate::engine::assets::grid_assets::GridAssets;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::grid::report::ProbeReport;
use crate::engine::grid::sampler::GridCoordinates;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::render_settings::PROBE_MARKER_RELATIVE_SIZE;
use serde::{Deserialize, Serialize};

/// Elevation reference for downstream placement workflows. UI state only:
/// it never changes how the grid is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SituationMode {
    #[default]
    Relative,
    Absolute,
}

impl SituationMode {
    /// Convert string identifier to mode for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            _ => None,
        }
    }

    /// String identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
        }
    }
}

/// Result of the most recent click, kept for the panel display.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Sampled(ProbeReport),
    /// The click resolved to grid coordinates whose neighbours fall
    /// outside the grid; coordinates still display, samples do not.
    OutOfRange {
        point: Vec3,
        coordinates: GridCoordinates,
    },
}

impl ProbeOutcome {
    fn coordinates(&self) -> &GridCoordinates {
        match self {
            Self::Sampled(report) => &report.coordinates,
            Self::OutOfRange { coordinates, .. } => coordinates,
        }
    }

    fn point(&self) -> Vec3 {
        match self {
            Self::Sampled(report) => report.point,
            Self::OutOfRange { point, .. } => *point,
        }
    }
}

#[derive(Resource)]
pub struct ProbeTool {
    is_active: bool,
    pub situation_mode: SituationMode,
    pub current: Option<ProbeOutcome>,
}

impl Default for ProbeTool {
    fn default() -> Self {
        Self {
            is_active: true,
            situation_mode: SituationMode::default(),
            current: None,
        }
    }
}

impl ProbeTool {
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        if !active {
            self.current = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Marker sphere spawned at the most recent hit point.
#[derive(Component)]
pub struct ProbeMarker;

/// Panel text entity displaying one probe field.
#[derive(Component)]
pub struct ProbeField(pub ProbeFieldKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFieldKind {
    CoordX,
    CoordY,
    CoordZ,
    RowIndex,
    ColumnIndex,
    Value,
    Neighbours,
}

// Input/logic: click to probe the grid under the cursor
pub fn probe_tool_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut probe_tool: ResMut<ProbeTool>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    viewport_camera: Res<ViewportCamera>,
    assets: Res<GridAssets>,
    mut rpc_interface: ResMut<crate::rpc::web_rpc::WebRpcInterface>,
    existing_markers: Query<Entity, With<ProbeMarker>>,
) {
    if !probe_tool.is_active() {
        return;
    }
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((cam_xform, camera)) = cameras.single() else {
        return;
    };
    let Some(grid) = assets.grid() else {
        return;
    };

    // Raycast from mouse to the terrain surface
    let Some(hit) = viewport_camera.mouse_to_terrain(cursor_pos, camera, cam_xform, Some(grid))
    else {
        return;
    };

    // One marker at a time
    for entity in existing_markers.iter() {
        commands.entity(entity).despawn();
    }

    let marker_radius =
        grid.row_spacing().min(grid.column_spacing()) * PROBE_MARKER_RELATIVE_SIZE;
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(marker_radius))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::hsv(0.0, 1.0, 1.0),
            emissive: LinearRgba::new(1.0, 1.0, 1.0, 1.0),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(hit),
        ProbeMarker,
    ));

    let coordinates = grid.to_grid_coordinates(hit);
    let mode = probe_tool.situation_mode;

    match grid.sample_neighbors(coordinates.i, coordinates.j) {
        Ok(neighbours) => {
            let report = ProbeReport {
                point: hit,
                coordinates,
                neighbours,
            };

            rpc_interface.send_notification(
                "probe_sampled",
                serde_json::json!({
                    "point": [hit.x, hit.y, hit.z],
                    "i": coordinates.i,
                    "j": coordinates.j,
                    "value": coordinates.value,
                    "mode": mode.as_str(),
                    "neighbours": neighbours,
                    "block": report.neighbour_block(),
                }),
            );

            probe_tool.current = Some(ProbeOutcome::Sampled(report));
        }
        Err(error) => {
            warn!("Probe outside grid: {}", error);

            rpc_interface.send_notification(
                "probe_out_of_range",
                serde_json::json!({
                    "point": [hit.x, hit.y, hit.z],
                    "i": coordinates.i,
                    "j": coordinates.j,
                    "value": coordinates.value,
                    "mode": mode.as_str(),
                    "reason": error.to_string(),
                }),
            );

            probe_tool.current = Some(ProbeOutcome::OutOfRange {
                point: hit,
                coordinates,
            });
        }
    }
}

/// Refresh the panel text entities from the probe state.
pub fn update_probe_panel(
    probe_tool: Res<ProbeTool>,
    mut fields: Query<(&mut Text, &ProbeField)>,
) {
    for (mut text, field) in &mut fields {
        text.0 = field_text(&probe_tool, field.0);
    }
}

fn field_text(probe_tool: &ProbeTool, kind: ProbeFieldKind) -> String {
    let Some(outcome) = probe_tool.current.as_ref() else {
        return placeholder(kind);
    };

    let coordinates = outcome.coordinates();
    let point = outcome.point();
    match kind {
        ProbeFieldKind::CoordX => labelled("X", point.x),
        ProbeFieldKind::CoordY => labelled("Y", point.y),
        ProbeFieldKind::CoordZ => labelled("Z", point.z),
        ProbeFieldKind::RowIndex => labelled("i", coordinates.i),
        ProbeFieldKind::ColumnIndex => labelled("j", coordinates.j),
        ProbeFieldKind::Value => labelled("value", coordinates.value),
        ProbeFieldKind::Neighbours => match outcome {
            ProbeOutcome::Sampled(report) => report.neighbour_block(),
            ProbeOutcome::OutOfRange { .. } => "-".to_string(),
        },
    }
}

fn labelled(label: &str, value: f32) -> String {
    format!("{}: {}", label, crate::engine::grid::report::format_rounded(value))
}

fn placeholder(kind: ProbeFieldKind) -> String {
    match kind {
        ProbeFieldKind::CoordX => "X: -".to_string(),
        ProbeFieldKind::CoordY => "Y: -".to_string(),
        ProbeFieldKind::CoordZ => "Z: -".to_string(),
        ProbeFieldKind::RowIndex => "i: -".to_string(),
        ProbeFieldKind::ColumnIndex => "j: -".to_string(),
        ProbeFieldKind::Value => "value: -".to_string(),
        ProbeFieldKind::Neighbours => String::new(),
    }
}

/// System handling keyboard shortcuts for the probe (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn probe_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut probe_tool: ResMut<ProbeTool>,
    mut rpc_interface: ResMut<crate::rpc::web_rpc::WebRpcInterface>,
) {
    let mut changed = false;

    if keyboard.just_pressed(KeyCode::KeyP) {
        let active = !probe_tool.is_active();
        probe_tool.set_active(active);
        info!("Probe tool {}", if active { "activated" } else { "deactivated" });
        changed = true;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        probe_tool.situation_mode = SituationMode::Relative;
        info!("Situation mode: relative");
        changed = true;
    }

    if keyboard.just_pressed(KeyCode::KeyT) {
        probe_tool.situation_mode = SituationMode::Absolute;
        info!("Situation mode: absolute");
        changed = true;
    }

    if changed {
        rpc_interface.send_notification(
            "tool_state_changed",
            serde_json::json!({
                "tool": "probe",
                "active": probe_tool.is_active(),
                "mode": probe_tool.situation_mode.as_str(),
            }),
        );
    }
}

/// Placeholder for WASM builds where the probe is controlled via RPC only.
#[cfg(target_arch = "wasm32")]
pub fn probe_keyboard_shortcuts() {}

pub struct ProbeToolPlugin;
impl Plugin for ProbeToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProbeTool>().add_systems(
            Update,
            (probe_tool_system, update_probe_panel, probe_keyboard_shortcuts),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::elevation_grid::ElevationGrid;

    fn outcome_2x2() -> ProbeOutcome {
        let grid = ElevationGrid::from_height_text("0 1 2 3", 2, 2, 1.0, 1.0, 1.0).unwrap();
        let point = Vec3::new(0.5, 0.0, 0.5);
        let coordinates = grid.to_grid_coordinates(point);
        let neighbours = grid.sample_neighbors(coordinates.i, coordinates.j).unwrap();
        ProbeOutcome::Sampled(ProbeReport {
            point,
            coordinates,
            neighbours,
        })
    }

    #[test]
    fn test_situation_mode_round_trip() {
        assert_eq!(SituationMode::from_string("relative"), Some(SituationMode::Relative));
        assert_eq!(SituationMode::from_string("ABSOLUTE"), Some(SituationMode::Absolute));
        assert_eq!(SituationMode::from_string("other"), None);
        assert_eq!(SituationMode::Absolute.as_str(), "absolute");
    }

    #[test]
    fn test_panel_placeholders_before_first_click() {
        let tool = ProbeTool::default();
        assert_eq!(field_text(&tool, ProbeFieldKind::CoordX), "X: -");
        assert_eq!(field_text(&tool, ProbeFieldKind::Value), "value: -");
        assert_eq!(field_text(&tool, ProbeFieldKind::Neighbours), "");
    }

    #[test]
    fn test_panel_fields_after_sample() {
        let tool = ProbeTool {
            current: Some(outcome_2x2()),
            ..Default::default()
        };
        assert_eq!(field_text(&tool, ProbeFieldKind::CoordX), "X: 0.5");
        assert_eq!(field_text(&tool, ProbeFieldKind::RowIndex), "i: 0.5");
        assert_eq!(field_text(&tool, ProbeFieldKind::ColumnIndex), "j: 0.5");
        assert_eq!(
            field_text(&tool, ProbeFieldKind::Neighbours),
            "array[0][0] = 0.00\narray[1][0] = 2.00\narray[0][1] = 1.00\narray[1][1] = 3.00"
        );
    }

    #[test]
    fn test_panel_shows_coordinates_but_no_samples_out_of_range() {
        let grid = ElevationGrid::from_height_text("0 1 2 3", 2, 2, 1.0, 1.0, 1.0).unwrap();
        let point = Vec3::new(-0.5, 0.0, 0.5);
        let tool = ProbeTool {
            current: Some(ProbeOutcome::OutOfRange {
                point,
                coordinates: grid.to_grid_coordinates(point),
            }),
            ..Default::default()
        };
        assert_eq!(field_text(&tool, ProbeFieldKind::ColumnIndex), "j: -0.5");
        assert_eq!(field_text(&tool, ProbeFieldKind::Neighbours), "-");
    }

    #[test]
    fn test_deactivation_clears_last_report() {
        let mut tool = ProbeTool {
            current: Some(outcome_2x2()),
            ..Default::default()
        };
        tool.set_active(false);
        assert!(!tool.is_active());
        assert!(tool.current.is_none());
    }
}
