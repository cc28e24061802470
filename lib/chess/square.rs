use derive_more::{Display, Error};
use std::fmt::{self, Formatter, Write};
use std::str::FromStr;

/// A square on the 8×8 chess board.
///
/// Squares are addressed by `(row, col)`, where row 0 is black's back rank and
/// row 7 is white's, so `(6, 4)` is the square `e2`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square(#[cfg_attr(test, strategy(0u8..64))] u8);

/// The reason why a pair of coordinates does not name a [`Square`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Error)]
#[display(fmt = "coordinates lie outside of the board")]
pub struct OutOfRange;

impl Square {
    /// Constructs [`Square`] from a pair of row and column indices.
    #[inline(always)]
    pub fn new(row: u8, col: u8) -> Result<Self, OutOfRange> {
        if row < 8 && col < 8 {
            Ok(Square(row * 8 + col))
        } else {
            Err(OutOfRange)
        }
    }

    /// This square's row, counting from black's back rank.
    #[inline(always)]
    pub fn row(&self) -> u8 {
        self.0 / 8
    }

    /// This square's column, counting from the `a` file.
    #[inline(always)]
    pub fn col(&self) -> u8 {
        self.0 % 8
    }

    /// This square's index in the range `0..64`, in row-major order.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The square displaced by the given number of rows and columns, if any.
    #[inline(always)]
    pub fn offset(&self, rows: i8, cols: i8) -> Option<Self> {
        let row = u8::try_from(self.row() as i8 + rows).ok()?;
        let col = u8::try_from(self.col() as i8 + cols).ok()?;
        Square::new(row, col).ok()
    }

    /// An iterator over all squares in row-major order.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..64).map(Square)
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = OutOfRange;

    #[inline(always)]
    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        let row = u8::try_from(row).map_err(|_| OutOfRange)?;
        let col = u8::try_from(col).map_err(|_| OutOfRange)?;
        Square::new(row, col)
    }
}

impl From<Square> for (usize, usize) {
    #[inline(always)]
    fn from(sq: Square) -> Self {
        (sq.row() as usize, sq.col() as usize)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.col()) as char)?;
        f.write_char((b'8' - self.row()) as char)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse square, expected a file in `a..=h` followed by a rank in `1..=8`")]
pub struct ParseSquareError;

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            &[f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(Square((b'8' - r) * 8 + (f - b'a'))),
            _ => Err(ParseSquareError),
        }
    }
}
