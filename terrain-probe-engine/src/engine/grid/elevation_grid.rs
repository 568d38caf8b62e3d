/// Immutable regular elevation grid with exaggerated height samples.
use super::error::GridError;
use bevy::math::Vec3;

/// Regular rectangular grid of elevation samples. Rows follow the world
/// z axis, columns the x axis; stored heights carry the vertical
/// exaggeration applied at pre-processing time. Built once from the scene
/// manifest, read-only thereafter.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    rows: usize,
    columns: usize,
    row_spacing: f32,
    column_spacing: f32,
    exaggeration: f32,
    heights: Vec<f32>,
}

impl ElevationGrid {
    /// Build a grid from a whitespace-separated height string and its
    /// metadata. The height count must match `rows * columns`; the source
    /// format silently produced ragged rows here, so the mismatch is
    /// rejected instead.
    pub fn from_height_text(
        text: &str,
        rows: usize,
        columns: usize,
        row_spacing: f32,
        column_spacing: f32,
        exaggeration: f32,
    ) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::Dimensions {
                reason: format!("grid is {}x{}", rows, columns),
            });
        }
        if !(row_spacing > 0.0) || !(column_spacing > 0.0) {
            return Err(GridError::Dimensions {
                reason: format!(
                    "spacing must be positive, got row {} column {}",
                    row_spacing, column_spacing
                ),
            });
        }
        if exaggeration == 0.0 || !exaggeration.is_finite() {
            return Err(GridError::Dimensions {
                reason: format!("exaggeration must be finite and non-zero, got {}", exaggeration),
            });
        }

        let mut heights = Vec::with_capacity(rows * columns);
        for (position, token) in text.split_ascii_whitespace().enumerate() {
            let value: f32 = token.parse().map_err(|_| GridError::Parse {
                position,
                token: token.to_string(),
            })?;
            heights.push(value);
        }

        let expected = rows * columns;
        if heights.len() != expected {
            return Err(GridError::Shape {
                rows,
                columns,
                expected,
                actual: heights.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            row_spacing,
            column_spacing,
            exaggeration,
            heights,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn column_spacing(&self) -> f32 {
        self.column_spacing
    }

    pub fn exaggeration(&self) -> f32 {
        self.exaggeration
    }

    /// Stored (exaggerated) height at integer indices, bounds-checked.
    pub fn stored_height(&self, row: i64, column: i64) -> Result<f32, GridError> {
        if row < 0 || column < 0 || row >= self.rows as i64 || column >= self.columns as i64 {
            return Err(GridError::Index {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(self.heights[row as usize * self.columns + column as usize])
    }

    /// World position of the grid vertex `(i, j)`, at its stored height.
    pub fn vertex_coordinate(&self, i: usize, j: usize) -> Result<Vec3, GridError> {
        let y = self.stored_height(i as i64, j as i64)?;
        Ok(Vec3::new(
            j as f32 * self.column_spacing,
            y,
            i as f32 * self.row_spacing,
        ))
    }

    /// Minimum and maximum stored heights.
    pub fn stored_height_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &h in &self.heights {
            min = min.min(h);
            max = max.max(h);
        }
        (min, max)
    }

    /// World-space extent of the grid footprint along x and z.
    pub fn footprint(&self) -> (f32, f32) {
        (
            (self.columns - 1) as f32 * self.column_spacing,
            (self.rows - 1) as f32 * self.row_spacing,
        )
    }

    /// Bilinearly interpolated stored surface height at a world position,
    /// clamping the upper cell edge at the last row/column. `None` outside
    /// the grid footprint. Used by the camera raycast, never by the probe:
    /// the probe reports raw corner samples only.
    pub fn sample_surface(&self, x: f32, z: f32) -> Option<f32> {
        let fj = x / self.column_spacing;
        let fi = z / self.row_spacing;
        if fi < 0.0 || fj < 0.0 {
            return None;
        }
        if fi > (self.rows - 1) as f32 || fj > (self.columns - 1) as f32 {
            return None;
        }

        let i0 = fi.floor() as usize;
        let j0 = fj.floor() as usize;
        let i1 = (i0 + 1).min(self.rows - 1);
        let j1 = (j0 + 1).min(self.columns - 1);
        let wi = fi - i0 as f32;
        let wj = fj - j0 as f32;

        let h00 = self.heights[i0 * self.columns + j0];
        let h01 = self.heights[i0 * self.columns + j1];
        let h10 = self.heights[i1 * self.columns + j0];
        let h11 = self.heights[i1 * self.columns + j1];

        let near = h00 * (1.0 - wj) + h01 * wj;
        let far = h10 * (1.0 - wj) + h11 * wj;
        Some(near * (1.0 - wi) + far * wi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2() -> ElevationGrid {
        ElevationGrid::from_height_text("0 1 2 3", 2, 2, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_from_height_text_row_major_order() {
        let grid = grid_2x2();
        assert_eq!(grid.stored_height(0, 0).unwrap(), 0.0);
        assert_eq!(grid.stored_height(0, 1).unwrap(), 1.0);
        assert_eq!(grid.stored_height(1, 0).unwrap(), 2.0);
        assert_eq!(grid.stored_height(1, 1).unwrap(), 3.0);
    }

    #[test]
    fn test_non_numeric_token_reports_position() {
        let err = ElevationGrid::from_height_text("0 1 x 3", 2, 2, 1.0, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            GridError::Parse {
                position: 2,
                token: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let err = ElevationGrid::from_height_text("0 1 2", 2, 2, 1.0, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            GridError::Shape {
                rows: 2,
                columns: 2,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_degenerate_metadata_rejected() {
        assert!(ElevationGrid::from_height_text("", 0, 2, 1.0, 1.0, 1.0).is_err());
        assert!(ElevationGrid::from_height_text("0 1", 1, 2, 0.0, 1.0, 1.0).is_err());
        assert!(ElevationGrid::from_height_text("0 1", 1, 2, 1.0, -1.0, 1.0).is_err());
        assert!(ElevationGrid::from_height_text("0 1", 1, 2, 1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_out_of_range_lookup_rejected() {
        let grid = grid_2x2();
        let err = grid.stored_height(2, 0).unwrap_err();
        assert_eq!(
            err,
            GridError::Index {
                row: 2,
                column: 0,
                rows: 2,
                columns: 2,
            }
        );
        assert!(grid.stored_height(-1, 0).is_err());
        assert!(grid.stored_height(0, 2).is_err());
    }

    #[test]
    fn test_vertex_coordinate_uses_spacings_and_stored_height() {
        let grid = ElevationGrid::from_height_text("0 1 2 3 4 5", 2, 3, 50.0, 25.0, 7.0).unwrap();
        let v = grid.vertex_coordinate(1, 2).unwrap();
        assert_eq!(v, Vec3::new(50.0, 5.0, 50.0));
        assert!(grid.vertex_coordinate(2, 0).is_err());
    }

    #[test]
    fn test_footprint_and_height_range() {
        let grid = ElevationGrid::from_height_text("0 1 2 3 4 5", 2, 3, 50.0, 25.0, 7.0).unwrap();
        assert_eq!(grid.footprint(), (50.0, 50.0));
        assert_eq!(grid.stored_height_range(), (0.0, 5.0));
    }

    #[test]
    fn test_sample_surface_vertex_exact() {
        let grid = grid_2x2();
        assert_eq!(grid.sample_surface(0.0, 0.0), Some(0.0));
        assert_eq!(grid.sample_surface(1.0, 0.0), Some(1.0));
        assert_eq!(grid.sample_surface(0.0, 1.0), Some(2.0));
        assert_eq!(grid.sample_surface(1.0, 1.0), Some(3.0));
    }

    #[test]
    fn test_sample_surface_bilinear_midpoint() {
        let grid = grid_2x2();
        assert_eq!(grid.sample_surface(0.5, 0.5), Some(1.5));
    }

    #[test]
    fn test_sample_surface_outside_footprint() {
        let grid = grid_2x2();
        assert_eq!(grid.sample_surface(-0.1, 0.0), None);
        assert_eq!(grid.sample_surface(0.0, 1.1), None);
    }
}
