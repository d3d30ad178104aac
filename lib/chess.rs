mod castles;
mod color;
mod file;
mod game;
mod movegen;
mod r#move;
mod outcome;
mod piece;
mod promotion;
mod rank;
mod role;
mod square;

pub use castles::*;
pub use color::*;
pub use file::*;
pub use game::*;
pub use movegen::*;
pub use outcome::*;
pub use piece::*;
pub use promotion::*;
pub use r#move::*;
pub use rank::*;
pub use role::*;
pub use square::*;
