use crate::chess::{Color, File, Rank, Square};
use bitflags::bitflags;
use derive_more::{Display, Error};
use std::{fmt, str::FromStr};

bitflags! {
    /// The castling rights in a chess [`Game`][`crate::chess::Game`].
    pub struct Castles: u8 {
        const WHITE_SHORT = 0b0001;
        const WHITE_LONG =  0b0010;
        const BLACK_SHORT = 0b0100;
        const BLACK_LONG =  0b1000;
    }
}

impl Castles {
    /// The kingside castling right of a side.
    #[inline(always)]
    pub fn short(side: Color) -> Self {
        match side {
            Color::White => Castles::WHITE_SHORT,
            Color::Black => Castles::BLACK_SHORT,
        }
    }

    /// The queenside castling right of a side.
    #[inline(always)]
    pub fn long(side: Color) -> Self {
        match side {
            Color::White => Castles::WHITE_LONG,
            Color::Black => Castles::BLACK_LONG,
        }
    }

    /// Whether the given side may still castle kingside.
    #[inline(always)]
    pub fn has_short(&self, side: Color) -> bool {
        self.contains(Castles::short(side))
    }

    /// Whether the given side may still castle queenside.
    #[inline(always)]
    pub fn has_long(&self, side: Color) -> bool {
        self.contains(Castles::long(side))
    }

    /// The rights lost when a piece leaves or lands on this [`Square`].
    pub fn revoked_by(sq: Square) -> Self {
        match (sq.file(), sq.rank()) {
            (File::A, Rank::First) => Castles::WHITE_LONG,
            (File::H, Rank::First) => Castles::WHITE_SHORT,
            (File::E, Rank::First) => Castles::WHITE_SHORT | Castles::WHITE_LONG,
            (File::A, Rank::Eighth) => Castles::BLACK_LONG,
            (File::H, Rank::Eighth) => Castles::BLACK_SHORT,
            (File::E, Rank::Eighth) => Castles::BLACK_SHORT | Castles::BLACK_LONG,
            _ => Castles::empty(),
        }
    }
}

impl Default for Castles {
    fn default() -> Self {
        Castles::all()
    }
}

/// Castling rights as in FEN, e.g. `KQkq`, or `-` if none.
impl fmt::Display for Castles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }

        for (right, c) in [
            (Castles::WHITE_SHORT, "K"),
            (Castles::WHITE_LONG, "Q"),
            (Castles::BLACK_SHORT, "k"),
            (Castles::BLACK_LONG, "q"),
        ] {
            if self.contains(right) {
                f.write_str(c)?;
            }
        }

        Ok(())
    }
}

/// The reason why parsing [`Castles`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse castling rights")]
pub struct ParseCastlesError;

impl FromStr for Castles {
    type Err = ParseCastlesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Castles::empty());
        }

        let mut castles = Castles::empty();

        for c in s.chars() {
            let right = match c {
                'K' => Castles::WHITE_SHORT,
                'Q' => Castles::WHITE_LONG,
                'k' => Castles::BLACK_SHORT,
                'q' => Castles::BLACK_LONG,
                _ => return Err(ParseCastlesError),
            };

            if castles.contains(right) {
                return Err(ParseCastlesError);
            }

            castles |= right;
        }

        if castles.is_empty() {
            Err(ParseCastlesError)
        } else {
            Ok(castles)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn castles() -> impl Strategy<Value = Castles> {
        (0u8..16).prop_map(Castles::from_bits_truncate)
    }

    #[proptest]
    fn castles_of_both_sides_are_distinct(c: Color) {
        assert_ne!(Castles::short(c), Castles::long(c));
        assert_ne!(Castles::short(c), Castles::short(!c));
        assert_ne!(Castles::long(c), Castles::long(!c));
    }

    #[proptest]
    fn has_short_checks_kingside_right(#[strategy(castles())] cr: Castles, c: Color) {
        assert_eq!(cr.has_short(c), cr.contains(Castles::short(c)));
    }

    #[proptest]
    fn has_long_checks_queenside_right(#[strategy(castles())] cr: Castles, c: Color) {
        assert_eq!(cr.has_long(c), cr.contains(Castles::long(c)));
    }

    #[test]
    fn moving_the_king_revokes_both_rights() {
        let e1 = "e1".parse().unwrap();
        let e8 = "e8".parse().unwrap();
        assert_eq!(Castles::revoked_by(e1), Castles::short(Color::White) | Castles::long(Color::White));
        assert_eq!(Castles::revoked_by(e8), Castles::short(Color::Black) | Castles::long(Color::Black));
    }

    #[test]
    fn moving_a_rook_revokes_one_right() {
        assert_eq!(Castles::revoked_by("a1".parse().unwrap()), Castles::WHITE_LONG);
        assert_eq!(Castles::revoked_by("h1".parse().unwrap()), Castles::WHITE_SHORT);
        assert_eq!(Castles::revoked_by("a8".parse().unwrap()), Castles::BLACK_LONG);
        assert_eq!(Castles::revoked_by("h8".parse().unwrap()), Castles::BLACK_SHORT);
    }

    #[proptest]
    fn other_squares_revoke_nothing(
        #[filter(!["a1", "e1", "h1", "a8", "e8", "h8"].contains(&#sq.to_string().as_str()))]
        sq: Square,
    ) {
        assert_eq!(Castles::revoked_by(sq), Castles::empty());
    }

    #[proptest]
    fn parsing_printed_castles_is_an_identity(#[strategy(castles())] cr: Castles) {
        assert_eq!(cr.to_string().parse(), Ok(cr));
    }

    #[proptest]
    fn parsing_castles_fails_if_right_is_duplicated(
        #[filter(!#s.is_empty())]
        #[strategy("(KK)?(kk)?(QQ)?(qq)?")]
        s: String,
    ) {
        assert_eq!(s.parse::<Castles>(), Err(ParseCastlesError));
    }

    #[proptest]
    fn parsing_castles_fails_for_invalid_characters(
        #[strategy("[^KQkq-]+")] s: String,
    ) {
        assert_eq!(s.parse::<Castles>(), Err(ParseCastlesError));
    }
}
