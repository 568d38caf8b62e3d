use crate::engine::grid::elevation_grid::ElevationGrid;
use crate::engine::grid::error::GridError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Scene manifest describing one elevation grid: dimensions, spacings,
/// the exaggeration already applied to the stored heights, and the
/// whitespace-separated height string. Written by the pre-processing CLI,
/// parsed once at startup, treated as opaque input thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, Asset, TypePath)]
pub struct GridManifest {
    pub name: String,
    /// Rows follow the world z axis, columns the x axis.
    pub rows: usize,
    pub columns: usize,
    pub row_spacing: f32,
    pub column_spacing: f32,
    pub exaggeration: f32,
    /// Row-major pre-exaggerated height values.
    pub heights: String,
    /// True (un-exaggerated) elevation statistics for camera framing.
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl GridManifest {
    /// Build the immutable elevation grid this manifest describes.
    pub fn build_grid(&self) -> Result<ElevationGrid, GridError> {
        ElevationGrid::from_height_text(
            &self.heights,
            self.rows,
            self.columns,
            self.row_spacing,
            self.column_spacing,
            self.exaggeration,
        )
    }

    /// Centre of the grid footprint at the exaggerated mid elevation,
    /// for camera positioning and scene navigation.
    pub fn center(&self) -> Vec3 {
        let (width, depth) = self.footprint();
        let mid = (self.min_elevation + self.max_elevation) * 0.5 * self.exaggeration;
        Vec3::new(width * 0.5, mid, depth * 0.5)
    }

    /// Footprint and exaggerated elevation span, for framing distance.
    pub fn size(&self) -> Vec3 {
        let (width, depth) = self.footprint();
        let span = (self.max_elevation - self.min_elevation) * self.exaggeration;
        Vec3::new(width, span, depth)
    }

    /// Exaggerated ground height for the flat-plane raycast fallback.
    pub fn ground_height(&self) -> f32 {
        self.min_elevation * self.exaggeration
    }

    fn footprint(&self) -> (f32, f32) {
        (
            self.columns.saturating_sub(1) as f32 * self.column_spacing,
            self.rows.saturating_sub(1) as f32 * self.row_spacing,
        )
    }
}
