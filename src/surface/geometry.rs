use thiserror::Error;

/// Reasons a surface layout cannot be played.
///
/// These are configuration faults: they are reported before any touch is
/// processed, because the mapping math would otherwise divide by zero or by a
/// negative span.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("a surface needs at least 2 rows, got {0}")]
    TooFewRows(usize),
    #[error("a surface needs at least 1 column")]
    NoColumns,
    #[error("{name} must be a finite, non-negative number, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
    #[error("column spacing {spacing} must exceed twice the snap distance {snap_distance}")]
    ColumnsTooNarrow { spacing: f64, snap_distance: f64 },
    #[error("row spacing {spacing} must exceed twice the snap distance {snap_distance}")]
    RowsTooNarrow { spacing: f64, snap_distance: f64 },
}

/// Validated layout of the playing surface.
///
/// Rows are horizontal lines spread between `row_edge_offset` from the top and
/// bottom edges. Columns are vertical lines centred in equal-width cells, so
/// the first sits half a cell in from the left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    rows: usize,
    columns: usize,
    width: f64,
    height: f64,
    row_edge_offset: f64,
    snap_distance: f64,
}

fn check_dimension(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidDimension { name, value })
    }
}

impl SurfaceGeometry {
    pub fn new(
        rows: usize,
        columns: usize,
        width: f64,
        height: f64,
        row_edge_offset: f64,
        snap_distance: f64,
    ) -> Result<Self, GeometryError> {
        if rows < 2 {
            return Err(GeometryError::TooFewRows(rows));
        }
        if columns < 1 {
            return Err(GeometryError::NoColumns);
        }

        let geometry = Self {
            rows,
            columns,
            width: check_dimension("width", width)?,
            height: check_dimension("height", height)?,
            row_edge_offset: check_dimension("row edge offset", row_edge_offset)?,
            snap_distance: check_dimension("snap distance", snap_distance)?,
        };

        let column_spacing = geometry.space_between_columns();
        if column_spacing <= 2.0 * snap_distance {
            return Err(GeometryError::ColumnsTooNarrow {
                spacing: column_spacing,
                snap_distance,
            });
        }

        let row_spacing = geometry.space_between_rows();
        if row_spacing <= 2.0 * snap_distance {
            return Err(GeometryError::RowsTooNarrow {
                spacing: row_spacing,
                snap_distance,
            });
        }

        Ok(geometry)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn row_edge_offset(&self) -> f64 {
        self.row_edge_offset
    }

    pub fn snap_distance(&self) -> f64 {
        self.snap_distance
    }

    pub fn space_between_rows(&self) -> f64 {
        (self.height - 2.0 * self.row_edge_offset) / (self.rows - 1) as f64
    }

    pub fn space_between_columns(&self) -> f64 {
        self.width / self.columns as f64
    }

    pub fn column_edge_offset(&self) -> f64 {
        self.space_between_columns() / 2.0
    }

    /// Horizontal position of a column line. Lines beyond the grid are
    /// extrapolated with the same spacing.
    pub fn column_offset(&self, column: f64) -> f64 {
        self.column_edge_offset() + column * self.space_between_columns()
    }

    /// Vertical position of a row line, extrapolated like [`Self::column_offset`].
    pub fn row_offset(&self, row: f64) -> f64 {
        self.row_edge_offset + row * self.space_between_rows()
    }
}
