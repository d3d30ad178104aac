use derive_more::Constructor;
use lib::chess::{Color, File, Game, Outcome, Piece, Rank, Square};
use std::fmt::{self, Display, Write};

const RESET: &str = "\x1b[0m";
const WHITE: &str = "\x1b[37m";
const YELLOW: &str = "\x1b[33m";
const BLUE_BACKGROUND: &str = "\x1b[44m";

fn paint(side: Color) -> &'static str {
    match side {
        Color::White => WHITE,
        Color::Black => YELLOW,
    }
}

/// The chess board as seen from white's side, with some squares highlighted.
///
/// In plain mode no escape codes are emitted, pieces are shown by their FEN letter
/// and highlighted squares are marked with `*` if empty or `x` if occupied.
#[derive(Debug, Copy, Clone, Constructor)]
pub struct Board<'a> {
    game: &'a Game,
    highlights: &'a [Square],
    plain: bool,
}

impl Board<'_> {
    fn cell(&self, f: &mut fmt::Formatter<'_>, sq: Square) -> fmt::Result {
        let highlighted = self.highlights.contains(&sq);

        if self.plain {
            return match (self.game.piece_on(sq), highlighted) {
                (None, false) => f.write_char('-'),
                (None, true) => f.write_char('*'),
                (Some(_), true) => f.write_char('x'),
                (Some(p), false) => write!(f, "{}", p),
            };
        }

        if highlighted {
            f.write_str(BLUE_BACKGROUND)?;
        }

        match self.game.piece_on(sq) {
            None => write!(f, "-{}", RESET),
            Some(p) => {
                let letter = char::from(p).to_ascii_uppercase();
                write!(f, "{}{}{}", paint(p.color()), letter, RESET)
            }
        }
    }
}

impl Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{} ", rank)?;

            for file in File::iter() {
                self.cell(f, Square::new(file, rank))?;
                f.write_char(' ')?;
            }

            writeln!(f)?;
        }

        f.write_str("  ")?;
        for (i, file) in File::iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }

            write!(f, "{}", file)?;
        }

        Ok(())
    }
}

/// The pieces of one side captured so far, e.g. `[P, N]`.
struct Captured<'a> {
    pieces: &'a [Piece],
    side: Color,
    plain: bool,
}

impl Display for Captured<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pieces = self.pieces.iter().filter(|p| p.color() == self.side);

        if !self.plain {
            f.write_str(paint(self.side))?;
        }

        f.write_char('[')?;
        for (i, p) in pieces.enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            if self.plain {
                write!(f, "{}", p)?;
            } else {
                f.write_char(char::from(*p).to_ascii_uppercase())?;
            }
        }

        f.write_char(']')?;

        if !self.plain {
            f.write_str(RESET)?;
        }

        Ok(())
    }
}

/// The state of the match: board, captured pieces, turn and who's to play or who won.
#[derive(Debug, Copy, Clone, Constructor)]
pub struct Summary<'a> {
    game: &'a Game,
    plain: bool,
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let captured = |side| Captured {
            pieces: self.game.captured(),
            side,
            plain: self.plain,
        };

        writeln!(f, "{}", Board::new(self.game, &[], self.plain))?;
        writeln!(f)?;
        writeln!(f, "Captured pieces:")?;
        writeln!(f, "White: {}", captured(Color::White))?;
        writeln!(f, "Black: {}", captured(Color::Black))?;
        writeln!(f)?;
        writeln!(f, "Turn: {}", self.game.turn())?;

        match self.game.outcome() {
            None => {
                write!(f, "Waiting player: {}", self.game.player())?;
                if self.game.is_check() {
                    write!(f, "\nCHECK!")?;
                }
            }

            Some(Outcome::Checkmate(winner)) => {
                write!(f, "CHECKMATE!\nWinner: {}", winner)?;
            }

            Some(o) => {
                write!(f, "DRAW!\nReason: {}", o)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn plain_board_shows_fen_letters_and_dashes() {
        let game = Game::default();
        let expected = [
            "8 r n b q k b n r ",
            "7 p p p p p p p p ",
            "6 - - - - - - - - ",
            "5 - - - - - - - - ",
            "4 - - - - - - - - ",
            "3 - - - - - - - - ",
            "2 P P P P P P P P ",
            "1 R N B Q K B N R ",
            "  a b c d e f g h",
        ];

        assert_eq!(Board::new(&game, &[], true).to_string(), expected.join("\n"));
    }

    #[test]
    fn plain_board_marks_highlighted_squares() {
        let game: Game = "4k3/8/8/8/8/2p5/8/4K3 w - - 0 1".parse().unwrap();
        let board = Board::new(&game, &[sq("c3"), sq("d3")], true).to_string();
        assert!(board.contains("3 - - x * - - - - "));
    }

    #[test]
    fn colored_board_paints_pieces_by_color() {
        let game = Game::default();
        let board = Board::new(&game, &[], false).to_string();
        assert!(board.contains(&format!("{}R{}", WHITE, RESET)));
        assert!(board.contains(&format!("{}R{}", YELLOW, RESET)));
        assert!(!board.contains(BLUE_BACKGROUND));
    }

    #[test]
    fn colored_board_highlights_squares_with_blue_background() {
        let game = Game::default();
        let board = Board::new(&game, &[sq("a3"), sq("c3")], false).to_string();
        assert_eq!(board.matches(BLUE_BACKGROUND).count(), 2);
        assert!(board.contains(&format!("{}-{}", BLUE_BACKGROUND, RESET)));
    }

    #[test]
    fn summary_shows_turn_and_waiting_player() {
        let game = Game::default();
        let summary = Summary::new(&game, true).to_string();
        assert!(summary.contains("Captured pieces:\nWhite: []\nBlack: []"));
        assert!(summary.ends_with("Turn: 1\nWaiting player: white"));
    }

    #[test]
    fn summary_lists_captured_pieces_by_color() {
        let mut game = Game::default();
        for m in ["e2e4", "d7d5", "e4d5", "d8d5"] {
            game.play(m.parse().unwrap()).unwrap();
        }

        let summary = Summary::new(&game, true).to_string();
        assert!(summary.contains("White: [P]\nBlack: [p]"));
    }

    #[test]
    fn summary_announces_check() {
        let game: Game = "4k3/8/8/8/8/8/8/4K2r w - - 0 1".parse().unwrap();
        let summary = Summary::new(&game, true).to_string();
        assert!(summary.ends_with("Waiting player: white\nCHECK!"));
    }

    #[test]
    fn summary_announces_the_winner() {
        let mut game = Game::default();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.play(m.parse().unwrap()).unwrap();
        }

        let summary = Summary::new(&game, true).to_string();
        assert!(summary.ends_with("Turn: 4\nCHECKMATE!\nWinner: black"));
    }

    #[test]
    fn summary_announces_draws() {
        let game: Game = "k7/8/8/8/8/8/8/K7 w - - 0 1".parse().unwrap();
        let summary = Summary::new(&game, true).to_string();
        assert!(summary.ends_with("DRAW!\nReason: draw by insufficient material"));
    }
}
