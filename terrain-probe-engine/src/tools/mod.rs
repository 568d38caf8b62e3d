//! Interactive tools for terrain inspection.
//!
//! One tool ships today: the grid probe. Clicking the terrain converts the
//! hit point into fractional grid indices, samples the four surrounding
//! height values, and reports them on the panel and over RPC.

/// Grid probe click tool with panel display and RPC reporting.
pub mod probe;
