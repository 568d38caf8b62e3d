//! Scene asset layer: the grid manifest JSON and its loading state.

/// Grid manifest asset binding metadata and the height string.
pub mod grid_manifest;

/// Resource tracking manifest loading and the built elevation grid.
pub mod grid_assets;
