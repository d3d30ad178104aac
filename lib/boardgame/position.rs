use derive_more::{Constructor, Display};

/// The coordinate of a cell on a [`Board`][`crate::boardgame::Board`].
///
/// Rows are counted top to bottom and columns left to right, both starting at zero.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}, {}", row, column)]
pub struct Position {
    #[cfg_attr(test, strategy(0usize..16))]
    pub row: usize,
    #[cfg_attr(test, strategy(0usize..16))]
    pub column: usize,
}

impl Position {
    /// The position displaced by the given number of rows and columns.
    ///
    /// Returns [`None`] if either coordinate would become negative,
    /// whether the result lies on a particular board is up to the board to tell.
    #[inline(always)]
    pub fn offset(&self, rows: isize, columns: isize) -> Option<Self> {
        Some(Position {
            row: self.row.checked_add_signed(rows)?,
            column: self.column.checked_add_signed(columns)?,
        })
    }
}
