/// Scene manifest generation for the elevation-grid viewer.
use serde::{Deserialize, Serialize};

/// Scene manifest binding grid metadata and the height string.
/// The viewer carries its own copy of this structure as a Bevy asset.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GridManifest {
    /// Dataset name derived from the input file stem.
    pub name: String,
    /// Grid dimensions: rows follow the world z axis, columns the x axis.
    pub rows: usize,
    pub columns: usize,
    /// World-space distance between adjacent samples along each axis.
    pub row_spacing: f32,
    pub column_spacing: f32,
    /// Vertical scale factor already applied to the stored heights.
    pub exaggeration: f32,
    /// Whitespace-separated row-major height values, pre-exaggerated.
    pub heights: String,
    /// True (un-exaggerated) elevation statistics for camera framing.
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl GridManifest {
    /// Number of height samples the manifest describes.
    pub fn sample_count(&self) -> usize {
        self.rows * self.columns
    }
}
