use crate::io::Io;
use crate::ui::{Board, Summary};
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{Game, Promotion, Square};
use std::io::{self, stdin, stdout, ErrorKind, Read, Write};
use tracing::{info, instrument, warn};

/// A match of chess between two players sharing the terminal.
#[derive(Debug, Default, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// Start from this position in FEN instead of the standard setup.
    #[clap(long = "fen", value_name = "FEN")]
    setup: Option<Game>,

    /// Disable colors.
    #[clap(long)]
    plain: bool,

    /// Do not clear the screen between turns.
    #[clap(long)]
    no_clear: bool,
}

fn is_eof(e: &Anyhow) -> bool {
    e.downcast_ref::<io::Error>()
        .map_or(false, |e| e.kind() == ErrorKind::UnexpectedEof)
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut game = self.setup.clone().unwrap_or_default();
        let mut io = Io::new(stdout(), stdin());
        self.run(&mut game, &mut io)
    }

    fn clear(&self) -> Result<(), Anyhow> {
        if !self.no_clear {
            clearscreen::clear()?;
        }

        Ok(())
    }

    fn promotion<W: Write, R: Read>(&self, io: &mut Io<W, R>) -> Result<Promotion, Anyhow> {
        loop {
            io.prompt("Enter piece for promotion (B/N/R/Q): ")?;
            match io.recv()?.trim().parse() {
                Ok(p) => break Ok(p),
                Err(e) => {
                    warn!(error = %e, "invalid promotion");
                    io.send("Invalid value!")?;
                }
            }
        }
    }

    fn turn<W: Write, R: Read>(&self, game: &mut Game, io: &mut Io<W, R>) -> Result<(), Anyhow> {
        self.clear()?;
        io.send(Summary::new(game, self.plain))?;
        io.send("")?;

        io.prompt("Source: ")?;
        let source: Square = io.recv()?.trim().parse()?;
        let targets = game.possible_moves(source)?;

        self.clear()?;
        io.send(Board::new(game, &targets, self.plain))?;
        io.send("")?;

        io.prompt("Target: ")?;
        let target: Square = io.recv()?.trim().parse()?;

        let promotion = if targets.contains(&target) && game.requires_promotion(source, target) {
            Some(self.promotion(io)?)
        } else {
            None
        };

        if let Some(p) = game.perform(source, target, promotion)? {
            info!(piece = %p, "captured");
        }

        Ok(())
    }

    /// Plays until the game is over or the input runs out.
    #[instrument(level = "debug", skip(self, game, io), err, fields(%game))]
    pub fn run<W: Write, R: Read>(&self, game: &mut Game, io: &mut Io<W, R>) -> Result<(), Anyhow> {
        while game.outcome().is_none() {
            match self.turn(game, io) {
                Ok(()) => continue,
                Err(e) if is_eof(&e) => return Ok(()),
                Err(e) if e.is::<io::Error>() || e.is::<clearscreen::Error>() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "rejected");
                    io.send(&e)?;
                }
            }

            match io.recv() {
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }

        self.clear()?;
        io.send(Summary::new(game, self.plain))?;
        io.flush()?;

        Ok(())
    }
}
