use derive_more::Display;
use std::ops::Not;

/// One of the two carrom players.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Player {
    #[display(fmt = "Player 1")]
    One,
    #[display(fmt = "Player 2")]
    Two,
}

impl Player {
    /// Both players, in turn order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// This player's index into per-player tables.
    #[inline(always)]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Not for Player {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}
