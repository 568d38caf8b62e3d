/// Default vertical exaggeration applied to stored heights for display
pub const DEFAULT_EXAGGERATION: f32 = 7.0;

/// Default world-space spacing between adjacent grid samples (metres)
pub const DEFAULT_CELL_SPACING: f32 = 50.0;

/// Suffix appended to the input stem when writing scene manifests
pub const MANIFEST_SUFFIX: &str = "_manifest.json";
