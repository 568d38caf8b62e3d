//! Shared constants for the elevation-grid viewer and pre-processing pipeline.

/// Elevation-grid defaults: exaggeration, cell spacing, manifest naming.
pub mod grid;

/// Viewport presentation settings: probe marker, grid lines, panel layout.
pub mod render_settings;
