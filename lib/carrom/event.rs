use crate::carrom::{Contact, DiscKind, Outcome, Phase, Player, Vector2};
use derive_more::{Display, Error};

/// The reason why an [`Intent`][`crate::carrom::Intent`] was rejected.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Rejection {
    #[display(fmt = "not allowed during {}", _0)]
    WrongPhase(#[error(not(source))] Phase),
    #[display(fmt = "value out of range")]
    OutOfRange,
    #[display(fmt = "the game is over")]
    GameOver,
}

/// What happened as a result of an [`Intent`][`crate::carrom::Intent`].
#[derive(Debug, Display, Copy, Clone, PartialEq)]
pub enum Event {
    #[display(fmt = "striker placed at {:.1}", _0)]
    StrikerPlaced(f64),
    #[display(fmt = "position confirmed")]
    PositionConfirmed,
    #[display(fmt = "aimed at {:.1} degrees", _0)]
    Aimed(f64),
    #[display(fmt = "angle confirmed")]
    AngleConfirmed,
    #[display(fmt = "power set to {:.0}", _0)]
    PowerSet(f64),
    #[display(fmt = "shot with velocity {}", _0)]
    Shot(Vector2),
    #[display(fmt = "discs {} and {} collided", "_0.0", "_0.1")]
    Collided(Contact),
    #[display(fmt = "discs are moving")]
    Moving,
    #[display(fmt = "{} pocketed {}", _1, _0)]
    Pocketed(DiscKind, Player),
    #[display(fmt = "{} pocketed the striker", _0)]
    StrikerPocketed(Player),
    #[display(fmt = "round settled, {} to play", _0)]
    RoundSettled(Player),
    #[display(fmt = "game over, {}", _0)]
    GameOver(Outcome),
    #[display(fmt = "restarted")]
    Restarted,
    #[display(fmt = "rejected, {}", _0)]
    Rejected(Rejection),
}
