mod board;
mod config;
mod disc;
mod event;
mod intent;
mod outcome;
mod phase;
mod physics;
mod player;
mod vector;

pub use board::*;
pub use config::*;
pub use disc::*;
pub use event::*;
pub use intent::*;
pub use outcome::*;
pub use phase::*;
pub use physics::*;
pub use player::*;
pub use vector::*;
