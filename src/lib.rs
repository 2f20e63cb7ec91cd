pub mod food;
pub mod game;
pub mod snake;
pub mod term;

pub type TermInt = u16;

/// A board cell as (column, row).
pub type Coords = (i16, i16);
