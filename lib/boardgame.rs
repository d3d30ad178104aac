mod board;
mod position;

pub use board::*;
pub use position::*;
