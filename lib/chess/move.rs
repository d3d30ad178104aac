use crate::chess::{ParsePromotionError, ParseSquareError, Promotion, Square};
use derive_more::{Display, Error, From};
use std::fmt::{self, Formatter};
use std::str::FromStr;

/// A chess move in pure coordinate notation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.whence != #self.whither))]
pub struct Move {
    whence: Square,
    whither: Square,
    promotion: Option<Promotion>,
}

impl Move {
    /// Constructs a [`Move`] without promotion.
    #[inline(always)]
    pub fn new(whence: Square, whither: Square) -> Self {
        Move {
            whence,
            whither,
            promotion: None,
        }
    }

    /// Constructs a [`Move`] that promotes a pawn.
    #[inline(always)]
    pub fn promotion(whence: Square, whither: Square, promotion: Promotion) -> Self {
        Move {
            whence,
            whither,
            promotion: Some(promotion),
        }
    }

    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.whence
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.whither
    }

    /// The [`Promotion`] specifier, if any.
    #[inline(always)]
    pub fn promotes(&self) -> Option<Promotion> {
        self.promotion
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.whence, self.whither)?;

        if let Some(p) = self.promotion {
            write!(f, "{}", p)?;
        }

        Ok(())
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseMoveError {
    #[display(fmt = "failed to parse move, {}", _0)]
    InvalidSquare(ParseSquareError),

    #[display(fmt = "failed to parse move, {}", _0)]
    InvalidPromotion(ParsePromotionError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(2).map_or_else(|| s.len(), |(i, _)| i);
        let j = s.char_indices().nth(4).map_or_else(|| s.len(), |(i, _)| i);

        let whence = s[..i].parse()?;
        let whither = s[i..j].parse()?;

        let promotion = match &s[j..] {
            "" => None,
            p => Some(p.parse()?),
        };

        Ok(Move {
            whence,
            whither,
            promotion,
        })
    }
}
