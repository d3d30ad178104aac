use crate::boardgame::Position;
use derive_more::{Display, Error};
use std::ops::Index;

/// The reason why an operation on the [`Board`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum BoardError {
    #[display(fmt = "error creating board: there must be at least 1 row and 1 column")]
    InvalidDimensions { rows: usize, columns: usize },

    #[display(fmt = "position `{}` is not on the board", _0)]
    OutOfBounds(#[error(not(source))] Position),

    #[display(fmt = "there is already a piece on position `{}`", _0)]
    Occupied(#[error(not(source))] Position),
}

/// A rectangular grid of cells, each holding at most one piece.
///
/// This type knows nothing about the rules of any particular game,
/// it only enforces that pieces are placed within bounds and never stacked.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board<T> {
    rows: usize,
    columns: usize,
    cells: Vec<Option<T>>,
}

impl<T> Board<T> {
    /// Constructs an empty board with the given dimensions.
    pub fn new(rows: usize, columns: usize) -> Result<Self, BoardError> {
        if rows == 0 || columns == 0 {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }

        let mut cells = Vec::with_capacity(rows * columns);
        cells.resize_with(rows * columns, || None);

        Ok(Board {
            rows,
            columns,
            cells,
        })
    }

    /// The number of rows.
    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    #[inline(always)]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Whether the [`Position`] lies on this board.
    #[inline(always)]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }

    #[inline(always)]
    fn cell(&self, pos: Position) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(pos.row * self.columns + pos.column)
        } else {
            Err(BoardError::OutOfBounds(pos))
        }
    }

    /// The piece on the given [`Position`], if any.
    pub fn get(&self, pos: Position) -> Result<Option<&T>, BoardError> {
        let i = self.cell(pos)?;
        Ok(self.cells[i].as_ref())
    }

    /// Whether there is a piece on the given [`Position`].
    pub fn is_occupied(&self, pos: Position) -> Result<bool, BoardError> {
        Ok(self.get(pos)?.is_some())
    }

    /// Places a piece on an empty [`Position`].
    pub fn place(&mut self, piece: T, pos: Position) -> Result<(), BoardError> {
        let i = self.cell(pos)?;
        match &mut self.cells[i] {
            Some(_) => Err(BoardError::Occupied(pos)),
            cell @ None => {
                *cell = Some(piece);
                Ok(())
            }
        }
    }

    /// Takes the piece off the given [`Position`], if any.
    pub fn remove(&mut self, pos: Position) -> Result<Option<T>, BoardError> {
        let i = self.cell(pos)?;
        Ok(self.cells[i].take())
    }

    /// An iterator over every [`Position`] in row-major order.
    pub fn positions(&self) -> impl DoubleEndedIterator<Item = Position> + ExactSizeIterator {
        let columns = self.columns;
        (0..self.rows * columns).map(move |i| Position::new(i / columns, i % columns))
    }

    /// An iterator over the occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.positions()
            .zip(&self.cells)
            .filter_map(|(pos, cell)| Some((pos, cell.as_ref()?)))
    }
}

/// Retrieves the piece at a given [`Position`], if any.
///
/// # Panics
///
/// Panics if the position is not on the board.
impl<T> Index<Position> for Board<T> {
    type Output = Option<T>;

    #[inline(always)]
    fn index(&self, pos: Position) -> &Self::Output {
        match self.cell(pos) {
            Ok(i) => &self.cells[i],
            Err(e) => panic!("{}", e),
        }
    }
}
