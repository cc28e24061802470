use crate::chess::{OutOfRange, ParseSquareError, Square};
use derive_more::{Display, Error};
use std::str::FromStr;

/// A chess move in [pure coordinate notation].
///
/// Promotions are implicit, pawns reaching the far rank always become queens.
///
/// [pure coordinate notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Pure_coordinate_notation
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[display(fmt = "{}{}", _0, _1)]
pub struct Move(Square, Square);

impl Move {
    /// Constructs [`Move`] from a pair of [`Square`]s.
    #[inline(always)]
    pub fn new(whence: Square, whither: Square) -> Self {
        Move(whence, whither)
    }

    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.1
    }

    /// The displacement as a pair of row and column deltas.
    #[inline(always)]
    pub fn delta(&self) -> (i8, i8) {
        (
            self.1.row() as i8 - self.0.row() as i8,
            self.1.col() as i8 - self.0.col() as i8,
        )
    }
}

/// Constructs [`Move`] from a pair of `(row, col)` coordinates.
impl TryFrom<((usize, usize), (usize, usize))> for Move {
    type Error = OutOfRange;

    #[inline(always)]
    fn try_from((whence, whither): ((usize, usize), (usize, usize))) -> Result<Self, Self::Error> {
        Ok(Move(whence.try_into()?, whither.try_into()?))
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseMoveError {
    #[display(fmt = "failed to parse move, {}", _0)]
    InvalidSquare(ParseSquareError),
    #[display(fmt = "failed to parse move, expected exactly two squares")]
    InvalidLength,
}

impl From<ParseSquareError> for ParseMoveError {
    fn from(e: ParseSquareError) -> Self {
        ParseMoveError::InvalidSquare(e)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match (s.get(..2), s.get(2..)) {
            (Some(whence), Some(whither)) if s.len() == 4 => {
                Ok(Move(whence.parse()?, whither.parse()?))
            }

            _ => Err(ParseMoveError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn move_has_a_source_and_destination(a: Square, b: Square) {
        let m = Move::new(a, b);
        assert_eq!(m.whence(), a);
        assert_eq!(m.whither(), b);
    }

    #[proptest]
    fn delta_displaces_source_into_destination(m: Move) {
        let (dr, dc) = m.delta();
        assert_eq!(m.whence().offset(dr, dc), Some(m.whither()));
    }

    #[test]
    fn move_can_be_constructed_from_coordinates() {
        assert_eq!(Move::try_from(((6, 4), (4, 4))).map(|m| m.to_string()), Ok("e2e4".into()));
        assert_eq!(Move::try_from(((6, 4), (8, 4))), Err(OutOfRange));
    }

    #[proptest]
    fn parsing_printed_move_is_an_identity(m: Move) {
        assert_eq!(m.to_string().parse(), Ok(m));
    }

    #[proptest]
    fn parsing_move_fails_if_length_not_four(#[filter(#s.len() != 4)] s: String) {
        assert!(s.parse::<Move>().is_err());
    }

    #[proptest]
    fn parsing_move_fails_if_square_invalid(m: Move, #[filter(#c.is_ascii() && !('1'..='8').contains(&#c))] c: char) {
        let s = [m.to_string()[..3].to_string(), c.to_string()].concat();
        assert_eq!(s.parse::<Move>(), Err(ParseMoveError::InvalidSquare(ParseSquareError)));
    }
}
