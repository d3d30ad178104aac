use crate::chess::Role;
use derive_more::{Display, Error, From};
use std::str::FromStr;

/// The role a pawn may be promoted to.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Promotion {
    #[display(fmt = "n")]
    Knight,
    #[display(fmt = "b")]
    Bishop,
    #[display(fmt = "r")]
    Rook,
    #[display(fmt = "q")]
    Queen,
}

impl Promotion {
    /// Every promotion, from the weakest to the strongest.
    pub const ALL: [Self; 4] = [
        Promotion::Knight,
        Promotion::Bishop,
        Promotion::Rook,
        Promotion::Queen,
    ];
}

/// The promotion assumed when none is specified.
impl Default for Promotion {
    fn default() -> Self {
        Promotion::Queen
    }
}

impl From<Promotion> for Role {
    fn from(p: Promotion) -> Self {
        match p {
            Promotion::Knight => Role::Knight,
            Promotion::Bishop => Role::Bishop,
            Promotion::Rook => Role::Rook,
            Promotion::Queen => Role::Queen,
        }
    }
}

/// The reason parsing a [`Promotion`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Error, From)]
#[display(
    fmt = "unable to parse promotion from `{}`, expected one of `[{}{}{}{}]`",
    _0,
    Promotion::Knight,
    Promotion::Bishop,
    Promotion::Rook,
    Promotion::Queen
)]
#[from(forward)]
pub struct ParsePromotionError(#[error(not(source))] pub String);

/// Accepts either case, as in `q` or `Q`.
impl FromStr for Promotion {
    type Err = ParsePromotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" | "N" => Ok(Promotion::Knight),
            "b" | "B" => Ok(Promotion::Bishop),
            "r" | "R" => Ok(Promotion::Rook),
            "q" | "Q" => Ok(Promotion::Queen),
            _ => Err(s.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_promotion_is_an_identity(p: Promotion) {
        assert_eq!(p.to_string().parse(), Ok(p));
    }

    #[proptest]
    fn parsing_promotion_ignores_case(p: Promotion) {
        assert_eq!(p.to_string().to_uppercase().parse(), Ok(p));
    }

    #[proptest]
    fn parsing_promotion_fails_except_for_one_of_four_letters(
        #[strategy("[^nbrqNBRQ]*")] s: String,
    ) {
        assert_eq!(s.parse::<Promotion>(), Err(ParsePromotionError(s)));
    }

    #[test]
    fn pawns_promote_to_queen_by_default() {
        assert_eq!(Role::from(Promotion::default()), Role::Queen);
    }

    #[proptest]
    fn pawns_never_promote_to_pawn_or_king(p: Promotion) {
        assert!(!matches!(Role::from(p), Role::Pawn | Role::King));
    }
}
