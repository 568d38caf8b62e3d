use super::grid_manifest::GridManifest;
use crate::engine::grid::elevation_grid::ElevationGrid;
use bevy::prelude::*;

/// Loading state for the scene manifest and the grid built from it.
/// The grid is constructed once and read-only for the rest of the run.
#[derive(Resource, Default)]
pub struct GridAssets {
    pub manifest: Option<Handle<GridManifest>>,
    pub grid: Option<ElevationGrid>,
    pub is_loaded: bool,
    /// Set when the manifest failed to build, so the loader does not
    /// retry every frame.
    pub failed: bool,
}

impl GridAssets {
    pub fn grid(&self) -> Option<&ElevationGrid> {
        self.grid.as_ref()
    }
}
