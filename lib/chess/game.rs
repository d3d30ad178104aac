use crate::boardgame::{Board, BoardError, Position};
use crate::chess::*;
use derive_more::{Display, Error};
use std::{fmt, str::FromStr};
use tracing::{debug, info, instrument};

const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The reason why a [`Game`] rejected an action.
///
/// A rejected action never changes the state of the game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum GameError {
    #[display(fmt = "the game has ended in a {}", _0)]
    GameOver(#[error(not(source))] Outcome),

    #[display(fmt = "there is no piece on source square `{}`", _0)]
    NoPieceOnSource(#[error(not(source))] Square),

    #[display(fmt = "the piece on square `{}` is not yours", _0)]
    NotYourPiece(#[error(not(source))] Square),

    #[display(fmt = "there are no possible moves for the piece on square `{}`", _0)]
    NoPossibleMoves(#[error(not(source))] Square),

    #[display(fmt = "the piece on square `{}` can't move to square `{}`", _0, _1)]
    UnreachableTarget(Square, Square),

    #[display(fmt = "move `{}` would leave your king in check", _0)]
    SelfCheck(#[error(not(source))] Move),

    #[display(fmt = "{}", _0)]
    Board(BoardError),
}

impl From<BoardError> for GameError {
    fn from(e: BoardError) -> Self {
        GameError::Board(e)
    }
}

/// The reason why a chess setup is not playable.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum IllegalSetup {
    #[display(fmt = "the {} king is missing", _0)]
    MissingKing(#[error(not(source))] Color),

    #[display(fmt = "there is more than one {} king", _0)]
    TooManyKings(#[error(not(source))] Color),

    #[display(fmt = "there is a pawn on the back rank at `{}`", _0)]
    PawnOnBackRank(#[error(not(source))] Square),

    #[display(fmt = "the {} king is in check, but it's not their turn", _0)]
    OppositeCheck(#[error(not(source))] Color),
}

/// The reason why parsing [`Game`] from FEN failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseFenError {
    #[display(fmt = "failed to parse FEN, expected 6 fields separated by whitespace")]
    InvalidSyntax,

    #[display(fmt = "failed to parse FEN, invalid piece placement")]
    InvalidPlacement,

    #[display(fmt = "failed to parse FEN, expected side to move to be either `w` or `b`")]
    InvalidSideToMove,

    #[display(fmt = "failed to parse FEN, {}", _0)]
    InvalidCastlingRights(ParseCastlesError),

    #[display(fmt = "failed to parse FEN, invalid en passant square")]
    InvalidEnPassantSquare,

    #[display(fmt = "failed to parse FEN, invalid halfmove clock")]
    InvalidHalfmoveClock,

    #[display(fmt = "failed to parse FEN, invalid fullmove number")]
    InvalidFullmoveNumber,

    #[display(fmt = "illegal setup, {}", _0)]
    IllegalSetup(IllegalSetup),
}

/// A chess match between two players sharing the same board.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Game {
    board: Board<Piece>,
    player: Color,
    turn: u32,
    castles: Castles,
    en_passant: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
    captured: Vec<Piece>,
    check: bool,
    outcome: Option<Outcome>,
}

impl Default for Game {
    fn default() -> Self {
        STARTING_POSITION
            .parse()
            .expect("expected valid starting position")
    }
}

#[inline(always)]
fn back_rank(side: Color) -> Rank {
    match side {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

/// Moves a piece and whatever else comes along with it, returning the captured piece if any.
///
/// Legality is not checked.
fn displace(
    board: &mut Board<Piece>,
    whence: Square,
    whither: Square,
    en_passant: Option<Square>,
    promotion: Option<Promotion>,
) -> Result<Option<Piece>, BoardError> {
    let piece = match board.remove(whence.into())? {
        Some(p) => p,
        None => return Ok(None),
    };

    let mut captured = board.remove(whither.into())?;

    if piece.role() == Role::Pawn
        && captured.is_none()
        && en_passant == Some(whither)
        && whither.file() != whence.file()
    {
        let behind = Square::new(whither.file(), whence.rank());
        if movegen::piece_on(board, behind) == Some(Piece(!piece.color(), Role::Pawn)) {
            captured = board.remove(behind.into())?;
        }
    }

    if piece.role() == Role::King && (whither.file() - whence.file()).abs() == 2 {
        let (from, to) = if whither.file() > whence.file() {
            (File::H, File::F)
        } else {
            (File::A, File::D)
        };

        if let Some(rook) = board.remove(Square::new(from, whence.rank()).into())? {
            board.place(rook, Square::new(to, whence.rank()).into())?;
        }
    }

    let piece = match piece {
        Piece(c, Role::Pawn) if whither.rank() == back_rank(!c) => {
            Piece(c, promotion.unwrap_or_default().into())
        }
        p => p,
    };

    board.place(piece, whither.into())?;

    Ok(captured)
}

impl Game {
    /// The board and the pieces on it.
    #[inline(always)]
    pub fn pieces(&self) -> &Board<Piece> {
        &self.board
    }

    /// The [`Piece`] on a [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        movegen::piece_on(&self.board, sq)
    }

    /// The current turn, starting at 1 and advancing after every move that doesn't end the game.
    #[inline(always)]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The side to move.
    #[inline(always)]
    pub fn player(&self) -> Color {
        self.player
    }

    /// Whether the side to move is in check.
    #[inline(always)]
    pub fn is_check(&self) -> bool {
        self.check
    }

    /// The [`Outcome`] of the game, if it has ended.
    #[inline(always)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The pieces captured so far, in the order they were captured.
    #[inline(always)]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// The castling rights still available.
    #[inline(always)]
    pub fn castles(&self) -> Castles {
        self.castles
    }

    /// The square a pawn may capture en passant, if any.
    #[inline(always)]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// The number of halfmoves since the last capture or pawn move.
    #[inline(always)]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    /// The fullmove number, incremented after every move by black.
    #[inline(always)]
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    fn sources(&self) -> impl Iterator<Item = Square> + '_ {
        self.board
            .iter()
            .filter(|(_, p)| p.color() == self.player)
            .filter_map(|(pos, _)| Square::try_from(pos).ok())
    }

    fn exposes_king(&self, whence: Square, whither: Square) -> bool {
        let mut board = self.board.clone();
        displace(&mut board, whence, whither, self.en_passant, None)
            .map_or(true, |_| movegen::is_check(&board, self.player))
    }

    fn legal_targets(&self, whence: Square) -> Targets {
        let mut targets = movegen::targets(&self.board, whence, self.castles, self.en_passant);
        targets.retain(|whither| !self.exposes_king(whence, *whither));
        targets
    }

    fn movable(&self, whence: Square) -> Result<(Piece, Targets), GameError> {
        if let Some(o) = self.outcome {
            return Err(GameError::GameOver(o));
        }

        let piece = match self.piece_on(whence) {
            None => return Err(GameError::NoPieceOnSource(whence)),
            Some(p) if p.color() != self.player => return Err(GameError::NotYourPiece(whence)),
            Some(p) => p,
        };

        let targets = self.legal_targets(whence);
        if targets.is_empty() {
            return Err(GameError::NoPossibleMoves(whence));
        }

        Ok((piece, targets))
    }

    fn is_material_insufficient(&self) -> bool {
        let mut minors = self.board.iter().filter(|(_, p)| p.role() != Role::King);
        match (minors.next(), minors.next()) {
            (None, _) => true,
            (Some((_, p)), None) => matches!(p.role(), Role::Knight | Role::Bishop),
            _ => false,
        }
    }

    fn refresh(&mut self) {
        self.check = movegen::is_check(&self.board, self.player);

        let stuck = !self
            .sources()
            .any(|whence| !self.legal_targets(whence).is_empty());

        self.outcome = if stuck && self.check {
            Some(Outcome::Checkmate(!self.player))
        } else if stuck {
            Some(Outcome::Stalemate)
        } else if self.halfmoves >= 150 {
            Some(Outcome::DrawBy75MoveRule)
        } else if self.is_material_insufficient() {
            Some(Outcome::DrawByInsufficientMaterial)
        } else {
            None
        };
    }

    /// The squares the piece on `whence` may legally move to.
    #[instrument(level = "trace", skip(self), err)]
    pub fn possible_moves(&self, whence: Square) -> Result<Targets, GameError> {
        let (_, targets) = self.movable(whence)?;
        Ok(targets)
    }

    /// Whether moving the piece on `whence` to `whither` promotes a pawn.
    pub fn requires_promotion(&self, whence: Square, whither: Square) -> bool {
        matches!(self.piece_on(whence), Some(Piece(c, Role::Pawn)) if c == self.player && whither.rank() == back_rank(!c))
    }

    /// Moves the piece on `whence` to `whither`, returning the captured piece if any.
    ///
    /// A pawn reaching the last rank is promoted to the given role, or to a queen if none is given.
    #[instrument(level = "debug", skip(self), err)]
    pub fn perform(
        &mut self,
        whence: Square,
        whither: Square,
        promotion: Option<Promotion>,
    ) -> Result<Option<Piece>, GameError> {
        let (piece, targets) = self.movable(whence)?;

        let promotion = self
            .requires_promotion(whence, whither)
            .then(|| promotion.unwrap_or_default());

        let m = match promotion {
            Some(p) => Move::promotion(whence, whither, p),
            None => Move::new(whence, whither),
        };

        if !targets.contains(&whither) {
            let reachable = movegen::targets(&self.board, whence, self.castles, self.en_passant);
            return if reachable.contains(&whither) {
                Err(GameError::SelfCheck(m))
            } else {
                Err(GameError::UnreachableTarget(whence, whither))
            };
        }

        let mut board = self.board.clone();
        let captured = displace(&mut board, whence, whither, self.en_passant, promotion)?;
        self.board = board;

        self.castles -= Castles::revoked_by(whence) | Castles::revoked_by(whither);

        self.en_passant = match piece.role() {
            Role::Pawn if (whither.rank() - whence.rank()).abs() == 2 => {
                whence.offset(0, piece.color().forward())
            }
            _ => None,
        };

        if piece.role() == Role::Pawn || captured.is_some() {
            self.halfmoves = 0;
        } else {
            self.halfmoves = self.halfmoves.saturating_add(1);
        }

        if self.player == Color::Black {
            self.fullmoves = self.fullmoves.saturating_add(1);
        }

        if let Some(p) = captured {
            debug!(piece = %p, square = %whither, "captured");
            self.captured.push(p);
        }

        self.player = !self.player;
        self.refresh();

        match self.outcome {
            None => self.turn = self.turn.saturating_add(1),
            Some(o) => info!(outcome = %o, "game over"),
        }

        debug!(%m, fen = %self, "performed");

        Ok(captured)
    }

    /// Plays a [`Move`].
    pub fn play(&mut self, m: Move) -> Result<Option<Piece>, GameError> {
        self.perform(m.whence(), m.whither(), m.promotes())
    }

    /// Every legal [`Move`] for the side to move, one per promotion choice.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        if self.outcome.is_some() {
            return moves;
        }

        for whence in self.sources() {
            for whither in self.legal_targets(whence) {
                if self.requires_promotion(whence, whither) {
                    moves.extend(Promotion::ALL.map(|p| Move::promotion(whence, whither, p)));
                } else {
                    moves.push(Move::new(whence, whither));
                }
            }
        }

        moves
    }
}

fn placement(s: &str) -> Result<Board<Piece>, ParseFenError> {
    let invalid = |_| ParseFenError::InvalidPlacement;
    let mut board = Board::new(8, 8).map_err(invalid)?;

    let rows: Vec<&str> = s.split('/').collect();
    if rows.len() != 8 {
        return Err(ParseFenError::InvalidPlacement);
    }

    for (row, line) in rows.into_iter().enumerate() {
        let mut column = 0;
        for c in line.chars() {
            match c.to_digit(10) {
                Some(n @ 1..=8) => column += n as usize,
                _ => {
                    let p = c
                        .encode_utf8(&mut [0; 4])
                        .parse()
                        .map_err(|_| ParseFenError::InvalidPlacement)?;

                    board.place(p, Position::new(row, column)).map_err(invalid)?;
                    column += 1;
                }
            }
        }

        if column != 8 {
            return Err(ParseFenError::InvalidPlacement);
        }
    }

    Ok(board)
}

fn validate(board: &Board<Piece>, player: Color) -> Result<(), IllegalSetup> {
    for side in Color::ALL {
        match board.iter().filter(|(_, &p)| p == Piece(side, Role::King)).count() {
            0 => return Err(IllegalSetup::MissingKing(side)),
            1 => {}
            _ => return Err(IllegalSetup::TooManyKings(side)),
        }
    }

    let pawns = board
        .iter()
        .filter(|(_, p)| p.role() == Role::Pawn)
        .filter_map(|(pos, _)| Square::try_from(pos).ok());

    for sq in pawns {
        if sq.rank() == Rank::First || sq.rank() == Rank::Eighth {
            return Err(IllegalSetup::PawnOnBackRank(sq));
        }
    }

    if movegen::is_check(board, !player) {
        return Err(IllegalSetup::OppositeCheck(!player));
    }

    Ok(())
}

/// Parses a position in [Forsyth-Edwards Notation].
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl FromStr for Game {
    type Err = ParseFenError;

    #[instrument(level = "trace", err)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_ascii_whitespace().collect();
        let [board, player, castles, en_passant, halfmoves, fullmoves] = fields[..] else {
            return Err(ParseFenError::InvalidSyntax);
        };

        let board = placement(board)?;

        let player = match player {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(ParseFenError::InvalidSideToMove),
        };

        let castles: Castles = castles
            .parse()
            .map_err(ParseFenError::InvalidCastlingRights)?;

        let en_passant = match en_passant {
            "-" => None,
            ep => {
                let sq: Square = ep
                    .parse()
                    .map_err(|_| ParseFenError::InvalidEnPassantSquare)?;

                let expected = match player {
                    Color::White => Rank::Sixth,
                    Color::Black => Rank::Third,
                };

                let behind = sq.offset(0, -player.forward());
                let origin = sq.offset(0, player.forward());

                if sq.rank() != expected
                    || movegen::piece_on(&board, sq).is_some()
                    || origin.and_then(|s| movegen::piece_on(&board, s)).is_some()
                    || behind.and_then(|s| movegen::piece_on(&board, s))
                        != Some(Piece(!player, Role::Pawn))
                {
                    return Err(ParseFenError::InvalidEnPassantSquare);
                }

                Some(sq)
            }
        };

        let halfmoves: u32 = halfmoves
            .parse()
            .map_err(|_| ParseFenError::InvalidHalfmoveClock)?;

        let fullmoves: u32 = fullmoves
            .parse()
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ParseFenError::InvalidFullmoveNumber)?;

        let turn = (fullmoves - 1)
            .checked_mul(2)
            .and_then(|n| n.checked_add((player == Color::Black) as u32 + 1))
            .ok_or(ParseFenError::InvalidFullmoveNumber)?;

        validate(&board, player).map_err(ParseFenError::IllegalSetup)?;

        let mut game = Game {
            board,
            player,
            turn,
            castles,
            en_passant,
            halfmoves,
            fullmoves,
            captured: Vec::new(),
            check: false,
            outcome: None,
        };

        game.refresh();

        Ok(game)
    }
}

/// Displays the position in [Forsyth-Edwards Notation].
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.board.rows() {
            if row > 0 {
                f.write_str("/")?;
            }

            let mut empty = 0;
            for column in 0..self.board.columns() {
                match self.board[Position::new(row, column)] {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }

                        write!(f, "{}", p)?;
                    }
                }
            }

            if empty > 0 {
                write!(f, "{}", empty)?;
            }
        }

        let player = match self.player {
            Color::White => 'w',
            Color::Black => 'b',
        };

        write!(f, " {} {} ", player, self.castles)?;

        match self.en_passant {
            Some(sq) => write!(f, "{}", sq)?,
            None => f.write_str("-")?,
        }

        write!(f, " {} {}", self.halfmoves, self.fullmoves)
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Game {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::{prelude::*, sample::Selector};

        (0..96usize, any::<Selector>())
            .prop_map(|(n, selector)| {
                let mut game = Game::default();

                for _ in 0..n {
                    let moves = game.moves();
                    if moves.is_empty() {
                        break;
                    }

                    game.play(selector.select(moves)).unwrap();
                }

                game
            })
            .no_shrink()
            .boxed()
    }
}
