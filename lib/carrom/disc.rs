use crate::carrom::Vector2;
use derive_more::Display;

/// The kind of a carrom [`Disc`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum DiscKind {
    #[display(fmt = "striker")]
    Striker,
    #[display(fmt = "white")]
    White,
    #[display(fmt = "black")]
    Black,
    #[display(fmt = "red")]
    Red,
}

impl DiscKind {
    /// Whether this is a scoring coin rather than the striker.
    #[inline(always)]
    pub fn is_coin(&self) -> bool {
        *self != DiscKind::Striker
    }

    /// The points scored by pocketing a disc of this kind.
    #[inline(always)]
    pub fn points(&self) -> u32 {
        match self {
            DiscKind::Striker => 0,
            DiscKind::White | DiscKind::Black => 1,
            DiscKind::Red => 3,
        }
    }
}

/// A circular carrom piece.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Disc {
    kind: DiscKind,
    radius: f64,
    pub position: Vector2,
    pub velocity: Vector2,
}

impl Disc {
    /// Constructs a disc at rest.
    ///
    /// The radius must be positive.
    pub fn new(kind: DiscKind, position: Vector2, radius: f64) -> Self {
        debug_assert!(radius > 0., "expected positive radius, got {radius}");

        Disc {
            kind,
            radius,
            position,
            velocity: Vector2::ZERO,
        }
    }

    #[inline(always)]
    pub fn kind(&self) -> DiscKind {
        self.kind
    }

    #[inline(always)]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether either velocity component is at least `threshold`.
    #[inline(always)]
    pub fn is_moving(&self, threshold: f64) -> bool {
        self.velocity.x.abs() >= threshold || self.velocity.y.abs() >= threshold
    }
}
