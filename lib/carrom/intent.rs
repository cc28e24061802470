use crate::carrom::Vector2;
use derive_more::Display;
use std::time::Duration;

/// A player's intent, as forwarded by the presentation layer.
#[derive(Debug, Display, Copy, Clone, PartialEq)]
pub enum Intent {
    /// Slides the striker to a horizontal position along the baseline.
    #[display(fmt = "place striker at {}", _0)]
    PlaceStriker(f64),
    #[display(fmt = "confirm position")]
    ConfirmPosition,
    /// Aims at an angle in degrees, counterclockwise from the positive x axis.
    #[display(fmt = "set angle to {}", _0)]
    SetAngle(f64),
    /// Aims from the striker towards a point on the board.
    #[display(fmt = "aim at {}", _0)]
    AimAt(Vector2),
    #[display(fmt = "confirm angle")]
    ConfirmAngle,
    #[display(fmt = "set power to {}", _0)]
    SetPower(f64),
    #[display(fmt = "shoot")]
    Shoot,
    /// Advances the simulation by some elapsed wall time.
    #[display(fmt = "tick {:?}", _0)]
    Tick(Duration),
    #[display(fmt = "restart")]
    Restart,
}
