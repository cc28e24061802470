use crate::carrom::Player;
use derive_more::Display;

/// One of the possible outcomes of a carrom game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    #[display(fmt = "{} wins", _0)]
    Winner(Player),

    #[display(fmt = "tie")]
    Tie,
}

impl Outcome {
    /// Decides the outcome from the final scores, indexed by [`Player`].
    pub fn from_scores(scores: [u32; 2]) -> Self {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::One),
            std::cmp::Ordering::Less => Outcome::Winner(Player::Two),
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    /// The winning player, if any.
    pub fn winner(&self) -> Option<Player> {
        match *self {
            Outcome::Winner(p) => Some(p),
            Outcome::Tie => None,
        }
    }
}
