/// Heightfield terrain meshes built from the elevation grid.
use crate::engine::assets::grid_assets::GridAssets;
use crate::engine::grid::elevation_grid::ElevationGrid;
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::render_settings::GRID_LINE_LIFT;

#[derive(Component)]
pub struct TerrainSurface;

#[derive(Component)]
pub struct TerrainGridLine;

#[derive(Resource, Default)]
pub struct TerrainCreated {
    pub created: bool,
}

/// Spawn the terrain surface and its reference grid lines once the grid
/// has been built from the manifest.
pub fn create_terrain_system(
    mut commands: Commands,
    mut created: ResMut<TerrainCreated>,
    assets: Res<GridAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if created.created || !assets.is_loaded {
        return;
    }
    let Some(grid) = assets.grid() else {
        return;
    };

    let surface_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.42, 0.50, 0.38),
        perceptual_roughness: 0.95,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(build_surface_mesh(grid))),
        MeshMaterial3d(surface_material),
        Transform::IDENTITY,
        TerrainSurface,
    ));

    let line_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.5),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for i in 0..grid.rows() {
        let mesh = build_row_line_mesh(grid, i);
        spawn_grid_line_entity(&mut commands, &mut meshes, line_material.clone(), mesh);
    }
    for j in 0..grid.columns() {
        let mesh = build_column_line_mesh(grid, j);
        spawn_grid_line_entity(&mut commands, &mut meshes, line_material.clone(), mesh);
    }

    info!(
        "Terrain spawned: {}x{} grid, {} line meshes",
        grid.rows(),
        grid.columns(),
        grid.rows() + grid.columns()
    );
    created.created = true;
}

/// Triangle-list surface over all grid vertices at their stored heights.
fn build_surface_mesh(grid: &ElevationGrid) -> Mesh {
    let positions = vertex_positions(grid);
    let normals = vertex_normals(grid, &positions);
    let indices = triangle_indices(grid.rows(), grid.columns());

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Row-major vertex positions, one per grid sample.
fn vertex_positions(grid: &ElevationGrid) -> Vec<[f32; 3]> {
    let mut positions = Vec::with_capacity(grid.rows() * grid.columns());
    for i in 0..grid.rows() {
        for j in 0..grid.columns() {
            // Indices stay in range by construction.
            let v = grid
                .vertex_coordinate(i, j)
                .unwrap_or(Vec3::ZERO);
            positions.push([v.x, v.y, v.z]);
        }
    }
    positions
}

/// Per-vertex normals from central differences of neighbouring heights.
fn vertex_normals(grid: &ElevationGrid, positions: &[[f32; 3]]) -> Vec<[f32; 3]> {
    let rows = grid.rows();
    let columns = grid.columns();
    let height = |i: usize, j: usize| positions[i * columns + j][1];

    let mut normals = Vec::with_capacity(positions.len());
    for i in 0..rows {
        for j in 0..columns {
            let j0 = j.saturating_sub(1);
            let j1 = (j + 1).min(columns - 1);
            let i0 = i.saturating_sub(1);
            let i1 = (i + 1).min(rows - 1);

            let dx = (height(i, j1) - height(i, j0))
                / ((j1 - j0).max(1) as f32 * grid.column_spacing());
            let dz = (height(i1, j) - height(i0, j))
                / ((i1 - i0).max(1) as f32 * grid.row_spacing());

            let normal = Vec3::new(-dx, 1.0, -dz).normalize();
            normals.push([normal.x, normal.y, normal.z]);
        }
    }
    normals
}

/// Two counter-clockwise triangles per cell (viewed from +Y).
fn triangle_indices(rows: usize, columns: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows - 1) * (columns - 1) * 6);
    for i in 0..rows - 1 {
        for j in 0..columns - 1 {
            let i0 = (i * columns + j) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + columns as u32;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }
    indices
}

/// Line strip along grid row `i`, lifted slightly above the surface.
fn build_row_line_mesh(grid: &ElevationGrid, i: usize) -> Mesh {
    let points = (0..grid.columns())
        .map(|j| grid.vertex_coordinate(i, j).unwrap_or(Vec3::ZERO))
        .collect::<Vec<_>>();
    build_line_mesh(&points)
}

/// Line strip along grid column `j`, lifted slightly above the surface.
fn build_column_line_mesh(grid: &ElevationGrid, j: usize) -> Mesh {
    let points = (0..grid.rows())
        .map(|i| grid.vertex_coordinate(i, j).unwrap_or(Vec3::ZERO))
        .collect::<Vec<_>>();
    build_line_mesh(&points)
}

fn build_line_mesh(points: &[Vec3]) -> Mesh {
    let mut vertices = Vec::with_capacity(points.len());
    let mut indices = Vec::with_capacity(points.len().saturating_sub(1) * 2);

    for (index, point) in points.iter().enumerate() {
        vertices.push([point.x, point.y + GRID_LINE_LIFT, point.z]);
        if index + 1 < points.len() {
            indices.extend_from_slice(&[index as u32, index as u32 + 1]);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

fn spawn_grid_line_entity(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    line_material: Handle<StandardMaterial>,
    line_mesh: Mesh,
) {
    commands.spawn((
        Mesh3d(meshes.add(line_mesh)),
        MeshMaterial3d(line_material),
        Visibility::Visible,
        Transform::IDENTITY,
        TerrainGridLine,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x3() -> ElevationGrid {
        ElevationGrid::from_height_text("0 1 2 3 4 5", 2, 3, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_vertex_positions_row_major() {
        let positions = vertex_positions(&grid_2x3());
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(positions[2], [2.0, 2.0, 0.0]);
        assert_eq!(positions[3], [0.0, 3.0, 1.0]);
    }

    #[test]
    fn test_triangle_indices_cover_all_cells() {
        let indices = triangle_indices(2, 3);
        // one cell row, two cells, two triangles each
        assert_eq!(indices.len(), 12);
        assert_eq!(&indices[0..6], &[0, 3, 1, 1, 3, 4]);
    }

    #[test]
    fn test_flat_grid_normals_point_up() {
        let grid = ElevationGrid::from_height_text("5 5 5 5", 2, 2, 1.0, 1.0, 1.0).unwrap();
        let positions = vertex_positions(&grid);
        for normal in vertex_normals(&grid, &positions) {
            assert_eq!(normal, [0.0, 1.0, 0.0]);
        }
    }
}
