/// ArcInfo ASCII grid to scene manifest conversion pipeline.
use crate::asc::AscGrid;
use crate::manifest::GridManifest;
use constants::grid::MANIFEST_SUFFIX;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Converts one ArcInfo ASCII grid into the viewer's scene manifest:
/// applies vertical exaggeration, collects elevation statistics, and
/// writes the manifest JSON next to the input file.
pub struct GridConverter {
    input_path: PathBuf,
    output_path: PathBuf,
    name: String,
    exaggeration: f32,
}

impl GridConverter {
    /// Create a converter instance, validating the invocation up front.
    pub fn new(input_path: &str, exaggeration: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let input = PathBuf::from(input_path);
        if !input.exists() {
            return Err(format!("input grid does not exist: {}", input.display()).into());
        }
        if exaggeration == 0.0 {
            return Err("exaggeration must be non-zero".into());
        }

        let stem = input_path.trim_end_matches(".asc").trim_end_matches(".agr");
        let name = Path::new(stem)
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            input_path: input,
            output_path: PathBuf::from(format!("{}{}", stem, MANIFEST_SUFFIX)),
            name,
            exaggeration,
        })
    }

    /// Execute the conversion and write the manifest.
    pub fn convert(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Reading ArcInfo ASCII grid: {}", self.input_path.display());
        let grid = AscGrid::from_path(&self.input_path)?;
        println!(
            "{} rows x {} columns, cell size {}",
            grid.rows, grid.columns, grid.cell_size
        );

        let manifest = self.build_manifest(&grid);
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&self.output_path, json)?;

        println!(
            "Saved {} ({} samples, exaggeration {})",
            self.output_path.display(),
            manifest.sample_count(),
            self.exaggeration
        );
        Ok(())
    }

    /// Assemble the manifest: exaggerate heights row by row with progress
    /// tracking and attach true elevation statistics.
    fn build_manifest(&self, grid: &AscGrid) -> GridManifest {
        let (min_elevation, max_elevation) = grid.elevation_range();

        let pb = ProgressBar::new(grid.rows as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
                .unwrap()
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Encoding heights");

        let mut encoded = Vec::with_capacity(grid.rows * grid.columns);
        for i in 0..grid.rows {
            for &elevation in grid.row(i) {
                encoded.push((elevation * self.exaggeration).to_string());
            }
            pb.set_position(i as u64 + 1);
        }
        pb.finish_with_message("Rows encoded");

        GridManifest {
            name: self.name.clone(),
            rows: grid.rows,
            columns: grid.columns,
            row_spacing: grid.cell_size,
            column_spacing: grid.cell_size,
            exaggeration: self.exaggeration,
            heights: encoded.join(" "),
            min_elevation,
            max_elevation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> AscGrid {
        AscGrid::from_text(
            "ncols 2\nnrows 2\ncellsize 25.0\n\
             1.0 2.0\n3.0 4.0\n",
        )
        .unwrap()
    }

    fn converter(exaggeration: f32) -> GridConverter {
        GridConverter {
            input_path: PathBuf::from("test.asc"),
            output_path: PathBuf::from("test_manifest.json"),
            name: "test".to_string(),
            exaggeration,
        }
    }

    #[test]
    fn test_manifest_applies_exaggeration() {
        let manifest = converter(7.0).build_manifest(&small_grid());
        assert_eq!(manifest.heights, "7 14 21 28");
        assert_eq!(manifest.exaggeration, 7.0);
    }

    #[test]
    fn test_manifest_statistics_stay_unexaggerated() {
        let manifest = converter(7.0).build_manifest(&small_grid());
        assert_eq!(manifest.min_elevation, 1.0);
        assert_eq!(manifest.max_elevation, 4.0);
    }

    #[test]
    fn test_manifest_copies_grid_shape() {
        let manifest = converter(2.0).build_manifest(&small_grid());
        assert_eq!(manifest.rows, 2);
        assert_eq!(manifest.columns, 2);
        assert_eq!(manifest.row_spacing, 25.0);
        assert_eq!(manifest.column_spacing, 25.0);
    }
}
