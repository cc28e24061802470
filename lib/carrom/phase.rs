use derive_more::Display;

/// The stage of a carrom turn.
///
/// A turn cycles through positioning, aiming, power selection and
/// simulation, until the game ends.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Phase {
    /// The striker is being slid along the baseline.
    #[display(fmt = "positioning")]
    Positioning,
    /// The shot direction is being chosen.
    #[display(fmt = "aiming")]
    Aiming,
    /// The shot strength is being chosen.
    #[display(fmt = "power selection")]
    PowerSelect,
    /// Discs are in motion.
    #[display(fmt = "simulating")]
    Simulating,
    #[display(fmt = "game over")]
    GameOver,
}
