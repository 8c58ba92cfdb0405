use super::NamedGroup;
use ahash::AHashMap;

/// Spacing used to turn a group's column and row into canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub column_spacing: f64,
    pub row_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 300.0,
            row_spacing: 120.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(column_spacing: f64, row_spacing: f64) -> Self {
        Self {
            column_spacing,
            row_spacing,
        }
    }

    /// Assigns column, row and position to groups that are already in layout order.
    ///
    /// The column is the kind rank; the row counts groups already placed in that column.
    pub(super) fn place(&self, groups: &mut [NamedGroup<'_>]) {
        let mut rows: AHashMap<usize, usize> = AHashMap::new();
        for group in groups.iter_mut() {
            let column = group.kind.rank();
            let row = rows.entry(column).or_insert(0);
            group.column = column;
            group.row = *row;
            group.position = (
                column as f64 * self.column_spacing,
                *row as f64 * self.row_spacing,
            );
            *row += 1;
        }
    }
}
