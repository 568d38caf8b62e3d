//! Elevation-grid sampling core.
//!
//! Pure request/response computation over an immutable regular grid of
//! exaggerated height samples: fractional grid coordinates from a world
//! point, four-neighbour lookups, and the probe report formatting shown
//! in the panel and forwarded over RPC.

/// Error taxonomy for grid construction and sampling.
pub mod error;

/// Immutable elevation grid built once from the scene manifest.
pub mod elevation_grid;

/// Fractional grid coordinates and four-neighbour sampling.
pub mod sampler;

/// Probe report assembly and display formatting.
pub mod report;
