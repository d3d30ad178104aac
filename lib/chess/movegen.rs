use crate::boardgame::{Board, Position};
use crate::chess::{Castles, Color, File, Piece, Rank, Role, Square};
use arrayvec::ArrayVec;

/// The squares a single piece may move to.
///
/// No piece ever has more than 27 targets, the count of a queen in the middle of an empty board.
pub type Targets = ArrayVec<Square, 27>;

const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// The [`Piece`] on a [`Square`] of a chess board, if any.
#[inline(always)]
pub fn piece_on(board: &Board<Piece>, sq: Square) -> Option<Piece> {
    board.get(Position::from(sq)).ok().flatten().copied()
}

/// The [`Square`] occupied by the king of a [`Color`], if any.
pub fn king(board: &Board<Piece>, side: Color) -> Option<Square> {
    board
        .iter()
        .find(|(_, &p)| p == Piece(side, Role::King))
        .and_then(|(pos, _)| Square::try_from(pos).ok())
}

/// Whether any piece of the given [`Color`] attacks the [`Square`].
pub fn is_attacked(board: &Board<Piece>, sq: Square, by: Color) -> bool {
    let holds = |s: Option<Square>, roles: &[Role]| {
        matches!(s.and_then(|s| piece_on(board, s)), Some(Piece(c, r)) if c == by && roles.contains(&r))
    };

    let ray = |(df, dr): (i8, i8)| {
        let mut next = sq.offset(df, dr);
        while let Some(s) = next {
            if piece_on(board, s).is_some() {
                return Some(s);
            }

            next = s.offset(df, dr);
        }

        None
    };

    KNIGHT.iter().any(|&(df, dr)| holds(sq.offset(df, dr), &[Role::Knight]))
        || KING.iter().any(|&(df, dr)| holds(sq.offset(df, dr), &[Role::King]))
        || [-1, 1].iter().any(|&df| holds(sq.offset(df, -by.forward()), &[Role::Pawn]))
        || ORTHOGONAL.into_iter().any(|d| holds(ray(d), &[Role::Rook, Role::Queen]))
        || DIAGONAL.into_iter().any(|d| holds(ray(d), &[Role::Bishop, Role::Queen]))
}

/// Whether the king of the given [`Color`] is attacked.
pub fn is_check(board: &Board<Piece>, side: Color) -> bool {
    king(board, side).map_or(false, |sq| is_attacked(board, sq, !side))
}

fn slide(board: &Board<Piece>, sq: Square, side: Color, dirs: &[(i8, i8)], targets: &mut Targets) {
    for &(df, dr) in dirs {
        let mut next = sq.offset(df, dr);
        while let Some(s) = next {
            match piece_on(board, s) {
                None => targets.push(s),
                Some(p) => {
                    if p.color() != side {
                        targets.push(s);
                    }

                    break;
                }
            }

            next = s.offset(df, dr);
        }
    }
}

fn leap(board: &Board<Piece>, sq: Square, side: Color, jumps: &[(i8, i8)], targets: &mut Targets) {
    for s in jumps.iter().filter_map(|&(df, dr)| sq.offset(df, dr)) {
        if piece_on(board, s).map_or(true, |p| p.color() != side) {
            targets.push(s);
        }
    }
}

fn pawn(board: &Board<Piece>, sq: Square, side: Color, ep: Option<Square>, targets: &mut Targets) {
    let home = match side {
        Color::White => Rank::Second,
        Color::Black => Rank::Seventh,
    };

    if let Some(one) = sq.offset(0, side.forward()).filter(|&s| piece_on(board, s).is_none()) {
        targets.push(one);

        if sq.rank() == home {
            if let Some(two) = one.offset(0, side.forward()) {
                if piece_on(board, two).is_none() {
                    targets.push(two);
                }
            }
        }
    }

    for s in [-1, 1].into_iter().filter_map(|df| sq.offset(df, side.forward())) {
        match piece_on(board, s) {
            Some(p) if p.color() != side => targets.push(s),
            None if ep == Some(s)
                && piece_on(board, Square::new(s.file(), sq.rank())) == Some(Piece(!side, Role::Pawn)) =>
            {
                targets.push(s)
            }
            _ => {}
        }
    }
}

fn castle(board: &Board<Piece>, side: Color, castles: Castles, targets: &mut Targets) {
    let rank = match side {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    };

    let on = |f: File| Square::new(f, rank);
    let empty = |files: &[File]| files.iter().all(|&f| piece_on(board, on(f)).is_none());
    let safe = |files: &[File]| files.iter().all(|&f| !is_attacked(board, on(f), !side));
    let rook = |f: File| piece_on(board, on(f)) == Some(Piece(side, Role::Rook));

    if piece_on(board, on(File::E)) != Some(Piece(side, Role::King)) {
        return;
    }

    if castles.has_short(side)
        && rook(File::H)
        && empty(&[File::F, File::G])
        && safe(&[File::E, File::F, File::G])
    {
        targets.push(on(File::G));
    }

    if castles.has_long(side)
        && rook(File::A)
        && empty(&[File::B, File::C, File::D])
        && safe(&[File::E, File::D, File::C])
    {
        targets.push(on(File::C));
    }
}

/// The squares the piece on the given [`Square`] may move to,
/// regardless of whether that would leave its own king in check.
///
/// Castling is the exception, a king never castles out of, through or into check.
pub fn targets(
    board: &Board<Piece>,
    sq: Square,
    castles: Castles,
    en_passant: Option<Square>,
) -> Targets {
    let mut targets = Targets::new();

    if let Some(Piece(side, role)) = piece_on(board, sq) {
        match role {
            Role::Pawn => pawn(board, sq, side, en_passant, &mut targets),
            Role::Knight => leap(board, sq, side, &KNIGHT, &mut targets),
            Role::Bishop => slide(board, sq, side, &DIAGONAL, &mut targets),
            Role::Rook => slide(board, sq, side, &ORTHOGONAL, &mut targets),
            Role::Queen => {
                slide(board, sq, side, &ORTHOGONAL, &mut targets);
                slide(board, sq, side, &DIAGONAL, &mut targets);
            }
            Role::King => {
                leap(board, sq, side, &KING, &mut targets);
                castle(board, side, castles, &mut targets);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn board(pieces: &[(&str, Piece)]) -> Board<Piece> {
        let mut b = Board::new(8, 8).unwrap();
        for &(s, p) in pieces {
            b.place(p, sq(s).into()).unwrap();
        }

        b
    }

    fn sorted(mut targets: Targets) -> Vec<String> {
        targets.sort();
        targets.iter().map(Square::to_string).collect()
    }

    const WK: Piece = Piece(Color::White, Role::King);
    const WR: Piece = Piece(Color::White, Role::Rook);
    const WP: Piece = Piece(Color::White, Role::Pawn);
    const BK: Piece = Piece(Color::Black, Role::King);
    const BR: Piece = Piece(Color::Black, Role::Rook);
    const BP: Piece = Piece(Color::Black, Role::Pawn);

    #[proptest]
    fn empty_square_has_no_targets(s: Square, castles: u8) {
        let b = board(&[]);
        let castles = Castles::from_bits_truncate(castles);
        assert!(targets(&b, s, castles, None).is_empty());
    }

    #[proptest]
    fn queen_on_an_empty_board_reaches_rook_and_bishop_targets(s: Square, c: Color) {
        let q = board(&[(&s.to_string(), Piece(c, Role::Queen))]);
        let r = board(&[(&s.to_string(), Piece(c, Role::Rook))]);
        let b = board(&[(&s.to_string(), Piece(c, Role::Bishop))]);

        let mut expected = targets(&r, s, Castles::empty(), None);
        expected.extend(targets(&b, s, Castles::empty(), None));
        assert_eq!(sorted(targets(&q, s, Castles::empty(), None)), sorted(expected));
    }

    #[proptest]
    fn rook_on_an_empty_board_reaches_fourteen_squares(s: Square, c: Color) {
        let b = board(&[(&s.to_string(), Piece(c, Role::Rook))]);
        assert_eq!(targets(&b, s, Castles::empty(), None).len(), 14);
    }

    #[proptest]
    fn targets_never_include_friendly_pieces(s: Square, c: Color, r: Role) {
        let b = board(&[(&s.to_string(), Piece(c, r))]);
        for t in targets(&b, s, Castles::all(), None) {
            assert_ne!(piece_on(&b, t).map(|p| p.color()), Some(c));
        }
    }

    #[test]
    fn knight_in_the_corner_has_two_targets() {
        let b = board(&[("a1", Piece(Color::White, Role::Knight))]);
        assert_eq!(sorted(targets(&b, sq("a1"), Castles::empty(), None)), ["c2", "b3"]);
    }

    #[test]
    fn sliders_stop_at_the_first_piece_and_capture_it_if_hostile() {
        let b = board(&[("a1", WR), ("a3", BP), ("c1", WP)]);
        assert_eq!(sorted(targets(&b, sq("a1"), Castles::empty(), None)), ["b1", "a2", "a3"]);
    }

    #[test]
    fn pawn_may_advance_two_squares_from_its_home_rank() {
        let b = board(&[("e2", WP), ("e7", BP)]);
        assert_eq!(sorted(targets(&b, sq("e2"), Castles::empty(), None)), ["e3", "e4"]);
        assert_eq!(sorted(targets(&b, sq("e7"), Castles::empty(), None)), ["e5", "e6"]);
    }

    #[test]
    fn blocked_pawn_cannot_advance() {
        let b = board(&[("e2", WP), ("e3", BP)]);
        assert!(targets(&b, sq("e2"), Castles::empty(), None).is_empty());

        let b = board(&[("e2", WP), ("e4", BP)]);
        assert_eq!(sorted(targets(&b, sq("e2"), Castles::empty(), None)), ["e3"]);
    }

    #[test]
    fn pawn_captures_diagonally_forward() {
        let b = board(&[("e4", WP), ("d5", BP), ("f5", WP), ("e5", BP)]);
        assert_eq!(sorted(targets(&b, sq("e4"), Castles::empty(), None)), ["d5"]);
    }

    #[test]
    fn pawn_captures_en_passant() {
        let b = board(&[("e5", WP), ("d5", BP)]);
        assert_eq!(sorted(targets(&b, sq("e5"), Castles::empty(), Some(sq("d6")))), ["d6", "e6"]);
        assert_eq!(sorted(targets(&b, sq("e5"), Castles::empty(), None)), ["e6"]);
    }

    #[test]
    fn pawn_captures_en_passant_only_an_opposing_pawn() {
        let b = board(&[("d5", WP), ("e5", WR)]);
        assert_eq!(sorted(targets(&b, sq("d5"), Castles::empty(), Some(sq("e6")))), ["d6"]);
    }

    #[test]
    fn king_castles_on_both_sides_if_path_is_clear() {
        let b = board(&[("e1", WK), ("a1", WR), ("h1", WR), ("e8", BK)]);
        assert_eq!(
            sorted(targets(&b, sq("e1"), Castles::all(), None)),
            ["c1", "d1", "f1", "g1", "d2", "e2", "f2"]
        );
    }

    #[test]
    fn king_does_not_castle_without_the_right() {
        let b = board(&[("e1", WK), ("a1", WR), ("h1", WR)]);
        assert_eq!(
            sorted(targets(&b, sq("e1"), Castles::WHITE_LONG, None)),
            ["c1", "d1", "f1", "d2", "e2", "f2"]
        );
    }

    #[test]
    fn king_does_not_castle_through_attacked_squares() {
        let b = board(&[("e1", WK), ("a1", WR), ("h1", WR), ("f8", BR)]);
        assert_eq!(
            sorted(targets(&b, sq("e1"), Castles::all(), None)),
            ["c1", "d1", "f1", "d2", "e2", "f2"]
        );
    }

    #[test]
    fn king_does_not_castle_out_of_check() {
        let b = board(&[("e1", WK), ("a1", WR), ("h1", WR), ("e8", BR)]);
        assert!(!targets(&b, sq("e1"), Castles::all(), None).contains(&sq("g1")));
        assert!(!targets(&b, sq("e1"), Castles::all(), None).contains(&sq("c1")));
    }

    #[test]
    fn king_castles_long_even_if_b_file_is_attacked() {
        let b = board(&[("e1", WK), ("a1", WR), ("b8", BR)]);
        assert!(targets(&b, sq("e1"), Castles::all(), None).contains(&sq("c1")));
    }

    #[test]
    fn king_does_not_castle_if_path_is_blocked() {
        let b = board(&[("e1", WK), ("a1", WR), ("b1", BR), ("h1", WR), ("g1", WP)]);
        let t = targets(&b, sq("e1"), Castles::all(), None);
        assert!(!t.contains(&sq("c1")));
        assert!(!t.contains(&sq("g1")));
    }

    #[test]
    fn pawns_attack_diagonally_towards_the_opponent() {
        let b = board(&[("e4", WP), ("d5", BP)]);
        assert!(is_attacked(&b, sq("d5"), Color::White));
        assert!(is_attacked(&b, sq("f5"), Color::White));
        assert!(!is_attacked(&b, sq("e5"), Color::White));
        assert!(!is_attacked(&b, sq("d3"), Color::White));
        assert!(is_attacked(&b, sq("e4"), Color::Black));
        assert!(is_attacked(&b, sq("c4"), Color::Black));
    }

    #[test]
    fn sliding_attacks_are_blocked_by_any_piece() {
        let b = board(&[("a1", BR), ("a4", WP)]);
        assert!(is_attacked(&b, sq("a3"), Color::Black));
        assert!(is_attacked(&b, sq("a4"), Color::Black));
        assert!(!is_attacked(&b, sq("a5"), Color::Black));
    }

    #[test]
    fn king_is_in_check_if_attacked() {
        let b = board(&[("e1", WK), ("e8", BR)]);
        assert!(is_check(&b, Color::White));
        assert!(!is_check(&b, Color::Black));
        assert_eq!(king(&b, Color::White), Some(sq("e1")));
        assert_eq!(king(&b, Color::Black), None);
    }
}
