use crate::chess::{Color, Role};
use derive_more::{Display, Error};
use std::fmt::{self, Write};
use std::str::FromStr;

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece(pub Color, pub Role);

impl Piece {
    /// Constructs [`Piece`] from a pair of [`Color`] and [`Role`].
    #[inline(always)]
    pub fn new(c: Color, r: Role) -> Self {
        Piece(c, r)
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.0
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.1
    }

    fn figurine(&self) -> char {
        use Color::*;
        use Role::*;
        match *self {
            Piece(White, Pawn) => '♙',
            Piece(White, Knight) => '♘',
            Piece(White, Bishop) => '♗',
            Piece(White, Rook) => '♖',
            Piece(White, Queen) => '♕',
            Piece(White, King) => '♔',
            Piece(Black, Pawn) => '♟',
            Piece(Black, Knight) => '♞',
            Piece(Black, Bishop) => '♝',
            Piece(Black, Rook) => '♜',
            Piece(Black, Queen) => '♛',
            Piece(Black, King) => '♚',
        }
    }
}

impl From<Piece> for char {
    fn from(p: Piece) -> char {
        use Color::*;
        use Role::*;
        match p {
            Piece(White, Pawn) => 'P',
            Piece(White, Knight) => 'N',
            Piece(White, Bishop) => 'B',
            Piece(White, Rook) => 'R',
            Piece(White, Queen) => 'Q',
            Piece(White, King) => 'K',
            Piece(Black, Pawn) => 'p',
            Piece(Black, Knight) => 'n',
            Piece(Black, Bishop) => 'b',
            Piece(Black, Rook) => 'r',
            Piece(Black, Queen) => 'q',
            Piece(Black, King) => 'k',
        }
    }
}

/// Letters as in FEN, upper case for white; the alternate form prints the figurine.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = if f.alternate() {
            self.figurine()
        } else {
            (*self).into()
        };

        f.write_char(c)
    }
}

/// The reason why parsing [`Piece`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse piece, expected one of `[PNBRQKpnbrqk]`")]
pub struct ParsePieceError;

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(ParsePieceError);
        };

        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let role = c
            .to_ascii_lowercase()
            .encode_utf8(&mut [0; 4])
            .parse()
            .map_err(|_| ParsePieceError)?;

        Ok(Piece(color, role))
    }
}
