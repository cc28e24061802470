use derive_more::{Add, AddAssign, Constructor, Display, Mul, MulAssign, Neg, Sub, SubAssign};

/// A two dimensional vector in board units.
///
/// The y axis grows downwards, as on screen.
#[derive(
    Debug,
    Display,
    Default,
    Copy,
    Clone,
    PartialEq,
    Constructor,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Neg,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "({:.2}, {:.2})", x, y)]
pub struct Vector2 {
    #[cfg_attr(test, strategy(-1e3f64..1e3))]
    pub x: f64,
    #[cfg_attr(test, strategy(-1e3f64..1e3))]
    pub y: f64,
}

impl Vector2 {
    /// The null vector.
    pub const ZERO: Self = Vector2 { x: 0., y: 0. };

    /// The dot product.
    #[inline(always)]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The euclidean norm.
    #[inline(always)]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// The unit vector pointing in the same direction, if there is one.
    #[inline(always)]
    pub fn normalized(&self) -> Option<Self> {
        let l = self.length();
        (l > 0.).then(|| *self * l.recip())
    }

    /// Whether both coordinates are finite numbers.
    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
