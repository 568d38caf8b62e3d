//! Scene construction: the rendered heightfield and its reference grid.

/// Heightfield surface and grid-line meshes built from the loaded grid.
pub mod terrain;
