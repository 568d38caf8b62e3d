/// Probe report assembly and display formatting.
use super::sampler::{GridCoordinates, NeighborSample, round_with_two_decimals};
use bevy::math::Vec3;

/// Full result of one terrain click: the raw hit point, its fractional
/// grid coordinates, and the four surrounding height samples.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub point: Vec3,
    pub coordinates: GridCoordinates,
    pub neighbours: [NeighborSample; 4],
}

/// Round to two decimals and print the way the panel displays numbers:
/// trailing zeros trimmed, so `0.5` rather than `0.50`.
pub fn format_rounded(value: f32) -> String {
    format!("{}", round_with_two_decimals(value))
}

/// One neighbour line of the panel block. The two-fixed-decimals value
/// format is part of the external display contract.
pub fn format_neighbour(sample: &NeighborSample) -> String {
    format!(
        "array[{}][{}] = {:.2}",
        sample.row, sample.column, sample.value
    )
}

impl ProbeReport {
    /// The six display fields in panel order: raw coordinates first, then
    /// the fractional grid indices and the de-exaggerated elevation.
    pub fn coordinate_fields(&self) -> [(&'static str, String); 6] {
        [
            ("X", format_rounded(self.point.x)),
            ("Y", format_rounded(self.point.y)),
            ("Z", format_rounded(self.point.z)),
            ("i", format_rounded(self.coordinates.i)),
            ("j", format_rounded(self.coordinates.j)),
            ("value", format_rounded(self.coordinates.value)),
        ]
    }

    /// The four-line neighbour block, one `array[i][j] = v` line per
    /// sample in fixed order, no trailing newline.
    pub fn neighbour_block(&self) -> String {
        self.neighbours
            .iter()
            .map(format_neighbour)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::elevation_grid::ElevationGrid;

    fn report_2x2() -> ProbeReport {
        let grid = ElevationGrid::from_height_text("0 1 2 3", 2, 2, 1.0, 1.0, 1.0).unwrap();
        let point = Vec3::new(0.5, 0.0, 0.5);
        let coordinates = grid.to_grid_coordinates(point);
        let neighbours = grid
            .sample_neighbors(coordinates.i, coordinates.j)
            .unwrap();
        ProbeReport {
            point,
            coordinates,
            neighbours,
        }
    }

    #[test]
    fn test_format_rounded_trims_trailing_zeros() {
        assert_eq!(format_rounded(0.5), "0.5");
        assert_eq!(format_rounded(3.0), "3");
        assert_eq!(format_rounded(1.2345), "1.23");
        assert_eq!(format_rounded(12.5), "12.5");
    }

    #[test]
    fn test_neighbour_line_keeps_two_fixed_decimals() {
        let sample = NeighborSample {
            row: 1,
            column: 0,
            value: 2.0,
        };
        assert_eq!(format_neighbour(&sample), "array[1][0] = 2.00");
    }

    #[test]
    fn test_coordinate_fields_order_and_values() {
        let report = report_2x2();
        let fields = report.coordinate_fields();
        assert_eq!(fields[0], ("X", "0.5".to_string()));
        assert_eq!(fields[1], ("Y", "0".to_string()));
        assert_eq!(fields[2], ("Z", "0.5".to_string()));
        assert_eq!(fields[3], ("i", "0.5".to_string()));
        assert_eq!(fields[4], ("j", "0.5".to_string()));
        assert_eq!(fields[5], ("value", "0".to_string()));
    }

    #[test]
    fn test_neighbour_block_exact_text() {
        let report = report_2x2();
        assert_eq!(
            report.neighbour_block(),
            "array[0][0] = 0.00\n\
             array[1][0] = 2.00\n\
             array[0][1] = 1.00\n\
             array[1][1] = 3.00"
        );
    }
}
