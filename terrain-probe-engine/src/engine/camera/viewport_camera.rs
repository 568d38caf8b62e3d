use crate::engine::assets::grid_assets::GridAssets;
use crate::engine::assets::grid_manifest::GridManifest;
use crate::engine::grid::elevation_grid::ElevationGrid;
use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub height: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub ground_height: f32,
}

impl ViewportCamera {
    /// Frame the camera above the loaded grid, looking down at it.
    pub fn with_manifest(manifest: &GridManifest) -> Self {
        let center = manifest.center();
        let size = manifest.size();

        Self {
            focus_point: center + Vec3::new(0.0, size.length() * 0.6, size.z * 0.4),
            height: size.length() * 0.6,
            pitch: -0.9,
            yaw: 0.0,
            ground_height: manifest.ground_height(),
        }
    }

    /// Intersect the cursor ray with the terrain surface. Marches the ray
    /// against the bilinear grid surface with binary-search refinement,
    /// falling back to the ground plane when no grid is loaded.
    pub fn mouse_to_terrain(
        &self,
        cursor_pos: Vec2,
        camera: &Camera,
        camera_transform: &GlobalTransform,
        grid: Option<&ElevationGrid>,
    ) -> Option<Vec3> {
        let ray = camera
            .viewport_to_world(camera_transform, cursor_pos)
            .ok()?;

        match grid {
            Some(grid) => self.terrain_intersection(&ray, grid),
            None => self.flat_plane_intersection(&ray),
        }
    }

    fn terrain_intersection(&self, ray: &Ray3d, grid: &ElevationGrid) -> Option<Vec3> {
        // Step size scales with camera height for stable precision.
        let base_step = (self.height * 0.01).clamp(0.1, 2.0);
        let max_distance = self.height * 4.0;
        let mut last_above = None;
        let mut t = 0.0;

        while t < max_distance {
            let test_point = ray.origin + ray.direction * t;

            if let Some(surface) = grid.sample_surface(test_point.x, test_point.z) {
                let height_diff = test_point.y - surface;
                if height_diff <= 0.0 {
                    let refined_t = match last_above {
                        Some(t_above) => self.binary_search_intersection(ray, grid, t_above, t, 8),
                        None => t,
                    };
                    let hit = ray.origin + ray.direction * refined_t;
                    let height = grid.sample_surface(hit.x, hit.z)?;
                    return Some(Vec3::new(hit.x, height, hit.z));
                }
                last_above = Some(t);
            }

            t += base_step;
        }

        None
    }

    fn binary_search_intersection(
        &self,
        ray: &Ray3d,
        grid: &ElevationGrid,
        t_start: f32,
        t_end: f32,
        iterations: usize,
    ) -> f32 {
        let mut low = t_start;
        let mut high = t_end;

        for _ in 0..iterations {
            let mid = (low + high) * 0.5;
            let test_point = ray.origin + ray.direction * mid;

            match grid.sample_surface(test_point.x, test_point.z) {
                Some(surface) if test_point.y > surface => low = mid,
                _ => high = mid,
            }
        }

        (low + high) * 0.5
    }

    fn flat_plane_intersection(&self, ray: &Ray3d) -> Option<Vec3> {
        let plane_y = self.ground_height;
        if ray.direction.y.abs() < 0.001 {
            return None;
        }
        let t = (plane_y - ray.origin.y) / ray.direction.y;
        if t > 0.0 {
            Some(ray.origin + ray.direction * t)
        } else {
            None
        }
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::new(0.0, 100.0, 0.0),
            height: 100.0,
            pitch: -0.6,
            yaw: 0.0,
            ground_height: 0.0,
        }
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    assets: Res<GridAssets>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Read mouse motion
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Mouse motion with right click (look around)
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    // Track camera height above ground for speed scaling
    if assets.is_loaded {
        viewport_camera.height =
            (viewport_camera.focus_point.y - viewport_camera.ground_height).max(1.0);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    // Mouse wheel scroll dolly along camera view
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (viewport_camera.height * 0.2).clamp(0.5, 500.0);
        let view_rot = Quat::from_euler(
            EulerRot::YXZ,
            viewport_camera.yaw,
            viewport_camera.pitch,
            0.0,
        );
        let forward = (view_rot * Vec3::Z).normalize();
        viewport_camera.focus_point -= forward * (scroll_accum * dolly_speed);
    }

    // Keyboard movement input
    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        move_input.y += 1.0; // Up
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        move_input.y -= 1.0; // Down
    }

    if move_input != Vec3::ZERO {
        let view_rot = Quat::from_euler(
            EulerRot::YXZ,
            viewport_camera.yaw,
            viewport_camera.pitch,
            0.0,
        );
        let forward = (view_rot * Vec3::Z).normalize();
        let right = (view_rot * Vec3::X).normalize();
        let up = Vec3::Y;

        // Adjust speed, shift = faster, ctrl = slower
        let mut speed = (viewport_camera.height * 1.0).clamp(2.0, 500.0);
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 3.5;
        }
        if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
            speed *= 0.25;
        }

        let world_delta = right * move_input.x + up * move_input.y + forward * move_input.z;
        viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
    }

    let target_rot = Quat::from_euler(
        EulerRot::YXZ,
        viewport_camera.yaw,
        viewport_camera.pitch,
        0.0,
    );
    let target_pos = viewport_camera.focus_point;

    let lerp_speed = 12.0 * time.delta_secs();
    camera_transform.translation = camera_transform
        .translation
        .lerp(target_pos, lerp_speed.min(1.0));
    camera_transform.rotation = camera_transform
        .rotation
        .slerp(target_rot, lerp_speed.min(1.0));
}
