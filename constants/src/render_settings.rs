/// Probe marker sphere radius as a fraction of the smaller cell spacing
pub const PROBE_MARKER_RELATIVE_SIZE: f32 = 0.08;

/// Vertical lift applied to reference grid lines to avoid z-fighting
/// with the terrain surface (world units)
pub const GRID_LINE_LIFT: f32 = 0.05;

/// Probe panel placement (logical pixels from the viewport edges)
pub const PANEL_RIGHT_OFFSET_PX: f32 = 12.0;
pub const PANEL_TOP_OFFSET_PX: f32 = 100.0;

/// Font size shared by the probe panel and the FPS readout
pub const PANEL_FONT_SIZE: f32 = 16.0;
