use crate::boardgame::Position;
use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use std::str::FromStr;

/// A square on the chess board in algebraic coordinates.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", file, rank)]
pub struct Square {
    rank: Rank,
    file: File,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(file: File, rank: Rank) -> Self {
        Square { rank, file }
    }

    /// This square's [`File`].
    #[inline(always)]
    pub fn file(&self) -> File {
        self.file
    }

    /// This square's [`Rank`].
    #[inline(always)]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The square displaced by the given number of files and ranks, if still on the board.
    #[inline(always)]
    pub fn offset(&self, files: i8, ranks: i8) -> Option<Self> {
        let file = File::from_index(self.file.index().checked_add_signed(files)?)?;
        let rank = Rank::from_index(self.rank.index().checked_add_signed(ranks)?)?;
        Some(Square::new(file, rank))
    }

    /// Returns an iterator over all [`Square`]s, rank by rank from `a1` to `h8`.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Rank::iter().flat_map(|r| File::iter().map(move |f| Square::new(f, r)))
    }
}

/// Maps the eighth rank onto the first row, as the board is printed from white's side.
impl From<Square> for Position {
    #[inline(always)]
    fn from(sq: Square) -> Self {
        Position::new(7 - sq.rank.index() as usize, sq.file.index() as usize)
    }
}

/// The reason why converting [`Position`] to [`Square`] failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Error)]
#[display(fmt = "position `{}` is not on the chess board", _0)]
pub struct SquareOutOfRange(#[error(not(source))] pub Position);

impl TryFrom<Position> for Square {
    type Error = SquareOutOfRange;

    fn try_from(pos: Position) -> Result<Self, Self::Error> {
        let err = || SquareOutOfRange(pos);
        let row = u8::try_from(pos.row).ok().filter(|&r| r < 8).ok_or_else(err)?;
        let column = u8::try_from(pos.column).map_err(|_| err())?;
        let file = File::from_index(column).ok_or_else(err)?;
        let rank = Rank::from_index(7 - row).ok_or_else(err)?;
        Ok(Square::new(file, rank))
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display(fmt = "invalid square, valid values are from a1 to h8")]
    InvalidFile(ParseFileError),
    #[display(fmt = "invalid square, valid values are from a1 to h8")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
