use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;

mod engine;
mod rpc;
mod tools;

use constants::render_settings::{
    PANEL_FONT_SIZE, PANEL_RIGHT_OFFSET_PX, PANEL_TOP_OFFSET_PX,
};
use engine::assets::grid_assets::GridAssets;
use engine::assets::grid_manifest::GridManifest;
use engine::camera::{ViewportCamera, camera_controller};
use engine::scene::terrain::{TerrainCreated, create_terrain_system};
use rpc::web_rpc::{WebRpcInterface, WebRpcPlugin};
use tools::probe::{ProbeField, ProbeFieldKind, ProbeToolPlugin};

const MANIFEST_ASSET_PATH: &'static str = "grids/sample_terrain_manifest.json";

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Create the viewer application: manifest loading, terrain scene,
/// camera, probe tool, and the RPC bridge.
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<GridManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(ProbeToolPlugin);

    app.init_resource::<GridAssets>()
        .init_resource::<TerrainCreated>()
        .insert_resource(ViewportCamera::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                load_grid_manifest_system,
                create_terrain_system,
                camera_controller,
                fps_text_update_system,
            ),
        );

    app
}

/// Load the grid manifest JSON and build the elevation grid from it.
fn load_grid_manifest_system(
    mut grid_assets: ResMut<GridAssets>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<GridManifest>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    // Start loading if not already started
    if grid_assets.manifest.is_none() {
        println!("Loading grid manifest from: {}", MANIFEST_ASSET_PATH);
        grid_assets.manifest = Some(asset_server.load(MANIFEST_ASSET_PATH));
        return;
    }

    if grid_assets.is_loaded || grid_assets.failed {
        return;
    }

    let Some(handle) = grid_assets.manifest.as_ref() else {
        return;
    };
    let Some(manifest) = manifests.get(handle) else {
        return;
    };

    match manifest.build_grid() {
        Ok(grid) => {
            println!(
                "Grid manifest loaded: '{}' {}x{} samples",
                manifest.name,
                grid.rows(),
                grid.columns()
            );

            // Frame the camera over the loaded grid
            commands.insert_resource(ViewportCamera::with_manifest(manifest));

            grid_assets.grid = Some(grid);
            grid_assets.is_loaded = true;
        }
        Err(error) => {
            error!("Grid manifest rejected: {}", error);
            rpc_interface.send_notification(
                "grid_load_failed",
                serde_json::json!({
                    "manifest": manifest.name,
                    "reason": error.to_string(),
                }),
            );
            grid_assets.failed = true;
        }
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

#[derive(Component)]
struct FpsText;

/// Spawn lighting, the viewport camera, and the UI overlay.
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
    spawn_ui(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// UI overlay: the probe panel in source field order and the FPS readout.
fn spawn_ui(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn(Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(PANEL_TOP_OFFSET_PX),
                    right: Val::Px(PANEL_RIGHT_OFFSET_PX),
                    width: Val::Px(220.0),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(2.0),
                    ..default()
                })
                .with_children(|panel| {
                    spawn_panel_title(panel);
                    for kind in [
                        ProbeFieldKind::CoordX,
                        ProbeFieldKind::CoordY,
                        ProbeFieldKind::CoordZ,
                        ProbeFieldKind::RowIndex,
                        ProbeFieldKind::ColumnIndex,
                        ProbeFieldKind::Value,
                        ProbeFieldKind::Neighbours,
                    ] {
                        spawn_panel_field(panel, kind);
                    }
                });

            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: PANEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn spawn_panel_title(panel: &mut ChildSpawnerCommands) {
    panel.spawn((
        Text::new("Click coordinates:"),
        TextFont {
            font_size: PANEL_FONT_SIZE + 2.0,
            ..default()
        },
        TextColor(Color::WHITE),
    ));
}

fn spawn_panel_field(panel: &mut ChildSpawnerCommands, kind: ProbeFieldKind) {
    panel.spawn((
        Text::new(""),
        TextFont {
            font_size: PANEL_FONT_SIZE,
            ..default()
        },
        TextColor(Color::WHITE),
        ProbeField(kind),
    ));
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
