/// ArcInfo ASCII elevation grid reader with strict header validation.
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading an ArcInfo ASCII grid file.
#[derive(Error, Debug)]
pub enum AscError {
    #[error("missing '{0}' header entry")]
    MissingHeader(&'static str),

    #[error("malformed header line '{line}': {reason}")]
    Header { line: String, reason: String },

    #[error("value at position {position} is not numeric: '{token}'")]
    Value { position: usize, token: String },

    #[error("expected {expected} values for {rows} rows x {columns} columns, found {actual}")]
    Count {
        rows: usize,
        columns: usize,
        expected: usize,
        actual: usize,
    },

    #[error("nodata cell at position {position}; unset cells are not supported")]
    Nodata { position: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parsed ArcInfo ASCII grid. Values are row-major in file order
/// (the first file row is the northernmost row).
#[derive(Debug, Clone)]
pub struct AscGrid {
    pub columns: usize,
    pub rows: usize,
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cell_size: f32,
    pub nodata: Option<f32>,
    pub values: Vec<f32>,
}

impl AscGrid {
    /// Read and parse a grid file from disk.
    pub fn from_path(path: &Path) -> Result<Self, AscError> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Parse grid text: key/value header lines followed by row-major values.
    pub fn from_text(text: &str) -> Result<Self, AscError> {
        let mut header = HeaderFields::default();
        let mut values = Vec::new();
        let mut in_header = true;
        let mut position = 0;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            // Header lines start with an alphabetic key; the first numeric
            // token marks the start of the value block.
            let first = trimmed.chars().next().unwrap_or(' ');
            if in_header && first.is_ascii_alphabetic() {
                header.apply(trimmed)?;
                continue;
            }
            in_header = false;

            for token in trimmed.split_ascii_whitespace() {
                let value: f32 = token.parse().map_err(|_| AscError::Value {
                    position,
                    token: token.to_string(),
                })?;

                if let Some(nodata) = header.nodata {
                    if value == nodata {
                        return Err(AscError::Nodata { position });
                    }
                }

                values.push(value);
                position += 1;
            }
        }

        let columns = header.columns.ok_or(AscError::MissingHeader("ncols"))?;
        let rows = header.rows.ok_or(AscError::MissingHeader("nrows"))?;
        let cell_size = header.cell_size.ok_or(AscError::MissingHeader("cellsize"))?;

        if columns == 0 || rows == 0 {
            return Err(AscError::Count {
                rows,
                columns,
                expected: rows * columns,
                actual: values.len(),
            });
        }

        let expected = rows * columns;
        if values.len() != expected {
            return Err(AscError::Count {
                rows,
                columns,
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            xllcorner: header.xllcorner,
            yllcorner: header.yllcorner,
            cell_size,
            nodata: header.nodata,
            values,
        })
    }

    /// Minimum and maximum elevation across all cells.
    pub fn elevation_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &value in &self.values {
            min = min.min(value);
            max = max.max(value);
        }
        (min, max)
    }

    /// One row of values, in file order.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.columns..(i + 1) * self.columns]
    }
}

/// Accumulates header entries until the value block starts.
#[derive(Default)]
struct HeaderFields {
    columns: Option<usize>,
    rows: Option<usize>,
    xllcorner: f64,
    yllcorner: f64,
    cell_size: Option<f32>,
    nodata: Option<f32>,
}

impl HeaderFields {
    fn apply(&mut self, line: &str) -> Result<(), AscError> {
        let mut parts = line.split_ascii_whitespace();
        let key = parts.next().unwrap_or("").to_ascii_lowercase();
        let raw = parts.next().ok_or_else(|| AscError::Header {
            line: line.to_string(),
            reason: "missing value".to_string(),
        })?;

        let numeric = |raw: &str| -> Result<f64, AscError> {
            raw.parse::<f64>().map_err(|_| AscError::Header {
                line: line.to_string(),
                reason: format!("value '{}' is not numeric", raw),
            })
        };

        match key.as_str() {
            "ncols" => self.columns = Some(numeric(raw)? as usize),
            "nrows" => self.rows = Some(numeric(raw)? as usize),
            "xllcorner" | "xllcenter" => self.xllcorner = numeric(raw)?,
            "yllcorner" | "yllcenter" => self.yllcorner = numeric(raw)?,
            "cellsize" => self.cell_size = Some(numeric(raw)? as f32),
            "nodata_value" => self.nodata = Some(numeric(raw)? as f32),
            _ => {
                return Err(AscError::Header {
                    line: line.to_string(),
                    reason: format!("unknown header key '{}'", key),
                });
            }
        }

        Ok(())
    }
}
