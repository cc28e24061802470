use crate::chess::{Color, ParseRoleError, Role};
use derive_more::Constructor;
use std::fmt::{self, Formatter};
use std::str::FromStr;

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    role: Role,
    color: Color,
}

impl Piece {
    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }
}

/// Prints the piece in FEN style, uppercase for white and lowercase for black.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.color {
            Color::White => f.write_str(&self.role.to_string().to_uppercase()),
            Color::Black => fmt::Display::fmt(&self.role, f),
        }
    }
}

impl FromStr for Piece {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let role = lower.parse()?;
        let color = if lower == s {
            Color::Black
        } else if s.to_uppercase() == s {
            Color::White
        } else {
            return Err(ParseRoleError);
        };

        Ok(Piece::new(role, color))
    }
}
