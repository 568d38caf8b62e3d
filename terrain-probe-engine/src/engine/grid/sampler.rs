/// Fractional grid coordinates and four-neighbour sampling.
use super::elevation_grid::ElevationGrid;
use super::error::GridError;
use bevy::math::Vec3;
use serde::Serialize;

/// Fractional grid position of a clicked world point. `value` is the
/// de-exaggerated clicked elevation, returned for display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCoordinates {
    pub i: f32,
    pub j: f32,
    pub value: f32,
}

/// One of the four height samples surrounding a fractional grid position.
/// `value` is the de-exaggerated stored height, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborSample {
    pub row: i64,
    pub column: i64,
    pub value: f32,
}

/// Round to two decimal places: multiply by 100, round to the nearest
/// integer (ties away from zero), divide by 100.
pub fn round_with_two_decimals(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

impl ElevationGrid {
    /// Map a world point to fractional grid coordinates. No bounds
    /// validation: negative or out-of-range results pass through unchanged.
    pub fn to_grid_coordinates(&self, point: Vec3) -> GridCoordinates {
        GridCoordinates {
            i: point.z / self.row_spacing(),
            j: point.x / self.column_spacing(),
            value: point.y / self.exaggeration(),
        }
    }

    /// The four height samples bracketing `(i, j)`, in fixed order:
    /// `(floor_i, floor_j)`, `(ceil_i, floor_j)`, `(floor_i, ceil_j)`,
    /// `(ceil_i, ceil_j)`. Fails with `GridError::Index` when any index
    /// falls outside the grid, including the `ceil == dimension` edge the
    /// source left reading past the last row.
    pub fn sample_neighbors(&self, i: f32, j: f32) -> Result<[NeighborSample; 4], GridError> {
        let floor_i = i.floor() as i64;
        let ceil_i = i.ceil() as i64;
        let floor_j = j.floor() as i64;
        let ceil_j = j.ceil() as i64;

        let pairs = [
            (floor_i, floor_j),
            (ceil_i, floor_j),
            (floor_i, ceil_j),
            (ceil_i, ceil_j),
        ];

        let mut samples = [NeighborSample {
            row: 0,
            column: 0,
            value: 0.0,
        }; 4];
        for (slot, &(row, column)) in samples.iter_mut().zip(pairs.iter()) {
            let stored = self.stored_height(row, column)?;
            *slot = NeighborSample {
                row,
                column,
                value: round_with_two_decimals(stored / self.exaggeration()),
            };
        }

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_2x2() -> ElevationGrid {
        ElevationGrid::from_height_text("0 1 2 3", 2, 2, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_rounding_two_decimals() {
        assert_eq!(round_with_two_decimals(1.004), 1.0);
        assert_eq!(round_with_two_decimals(1.006), 1.01);
        assert_eq!(round_with_two_decimals(3.14159), 3.14);
        assert_eq!(round_with_two_decimals(2.0), 2.0);
    }

    #[test]
    fn test_rounding_exact_tie_goes_away_from_zero() {
        // 0.125 * 100 is exactly 12.5 in binary floating point.
        assert_eq!(round_with_two_decimals(0.125), 0.13);
        assert_eq!(round_with_two_decimals(-0.125), -0.13);
    }

    #[test]
    fn test_grid_coordinates_divide_by_spacing_and_exaggeration() {
        let grid = ElevationGrid::from_height_text(
            "0 0 0 0 0 0",
            2,
            3,
            50.0,
            25.0,
            7.0,
        )
        .unwrap();
        let coords = grid.to_grid_coordinates(Vec3::new(50.0, 14.0, 75.0));
        assert_eq!(coords.j, 2.0);
        assert_eq!(coords.value, 2.0);
        assert_eq!(coords.i, 1.5);
    }

    #[test]
    fn test_grid_coordinates_pass_out_of_range_through() {
        let grid = grid_2x2();
        let coords = grid.to_grid_coordinates(Vec3::new(-3.0, 0.0, 12.0));
        assert_eq!(coords.j, -3.0);
        assert_eq!(coords.i, 12.0);
    }

    #[test]
    fn test_grid_coordinates_idempotent() {
        let grid = grid_2x2();
        let point = Vec3::new(0.25, 0.5, 0.75);
        assert_eq!(grid.to_grid_coordinates(point), grid.to_grid_coordinates(point));
    }

    #[test]
    fn test_vertex_coordinate_round_trips_grid_coordinates() {
        let grid =
            ElevationGrid::from_height_text("0 1 2 3 4 5", 2, 3, 50.0, 25.0, 1.0).unwrap();
        let vertex = grid.vertex_coordinate(1, 2).unwrap();
        let coords = grid.to_grid_coordinates(vertex);
        assert_eq!(coords.i, 1.0);
        assert_eq!(coords.j, 2.0);
        assert_eq!(coords.value, 5.0);
    }

    #[test]
    fn test_neighbours_of_cell_centre() {
        let grid = grid_2x2();
        let coords = grid.to_grid_coordinates(Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(coords.i, 0.5);
        assert_eq!(coords.j, 0.5);

        let samples = grid.sample_neighbors(coords.i, coords.j).unwrap();
        assert_eq!(
            samples,
            [
                NeighborSample { row: 0, column: 0, value: 0.0 },
                NeighborSample { row: 1, column: 0, value: 2.0 },
                NeighborSample { row: 0, column: 1, value: 1.0 },
                NeighborSample { row: 1, column: 1, value: 3.0 },
            ]
        );
    }

    #[test]
    fn test_neighbour_values_divide_by_exaggeration() {
        let grid = ElevationGrid::from_height_text("2 4 6 8", 2, 2, 1.0, 1.0, 2.0).unwrap();
        let samples = grid.sample_neighbors(0.5, 0.5).unwrap();
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[1].value, 3.0);
        assert_eq!(samples[2].value, 2.0);
        assert_eq!(samples[3].value, 4.0);
    }

    #[test]
    fn test_integral_coordinates_collapse_floor_and_ceil() {
        let grid = grid_2x2();
        let samples = grid.sample_neighbors(1.0, 0.5).unwrap();
        // floor_i == ceil_i == 1: at most two distinct index pairs remain.
        assert_eq!(samples[0], samples[1]);
        assert_eq!(samples[2], samples[3]);
        assert_eq!(samples[0].row, 1);
        assert_eq!(samples[2].column, 1);
    }

    #[test]
    fn test_fully_integral_coordinates_collapse_to_one_pair() {
        let grid = grid_2x2();
        let samples = grid.sample_neighbors(1.0, 1.0).unwrap();
        for sample in &samples {
            assert_eq!(sample.row, 1);
            assert_eq!(sample.column, 1);
            assert_eq!(sample.value, 3.0);
        }
    }

    #[test]
    fn test_out_of_range_neighbours_rejected() {
        let grid = grid_2x2();
        // ceil lands on the missing row past the last grid line.
        assert_eq!(
            grid.sample_neighbors(1.5, 0.5).unwrap_err(),
            GridError::Index {
                row: 2,
                column: 0,
                rows: 2,
                columns: 2,
            }
        );
        assert!(grid.sample_neighbors(-0.5, 0.5).is_err());
        assert!(grid.sample_neighbors(0.5, 2.5).is_err());
    }
}
