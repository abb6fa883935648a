use crate::sheet::domain::layout::LayoutError;

/// One slot of the sheet and the time it samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    /// Position in sampling order (column-major).
    pub index: u32,
    /// Horizontal position, `0..row_count`.
    pub row: u32,
    /// Vertical position, `0..col_count`.
    pub column: u32,
    pub timestamp_seconds: u64,
}

/// Evenly spaced sampling times for a `row_count` x `col_count` sheet.
///
/// The duration is split into `cells + 2` equal steps (integer seconds);
/// cell `k` samples at `step * (k + 1)`, leaving one step unsampled at the
/// start and two at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSchedule {
    step_seconds: u64,
    cells: Vec<GridCell>,
}

impl GridSchedule {
    pub fn new(duration_seconds: u64, row_count: u32, col_count: u32) -> Result<Self, LayoutError> {
        if row_count == 0 || col_count == 0 {
            return Err(LayoutError::InvalidGrid {
                row_count,
                col_count,
            });
        }

        let cell_total = u64::from(row_count) * u64::from(col_count);
        let step_seconds = duration_seconds / (cell_total + 2);
        if step_seconds == 0 {
            return Err(LayoutError::DegenerateDuration {
                duration_seconds,
                cells: cell_total,
            });
        }

        let cells = (0..col_count)
            .flat_map(|column| (0..row_count).map(move |row| (row, column)))
            .map(|(row, column)| {
                let index = column * row_count + row;
                GridCell {
                    index,
                    row,
                    column,
                    timestamp_seconds: step_seconds * (u64::from(index) + 1),
                }
            })
            .collect();

        Ok(Self {
            step_seconds,
            cells,
        })
    }

    pub fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

}
