use crate::chess::{Color, IllegalMove, Move, Piece, Role, Square};
use derive_more::{Display, Error};
use std::fmt::{self, Formatter, Write};
use std::{ops::Index, str::FromStr};

/// The chess board, an 8×8 grid of optional [`Piece`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self {
        use {Color::*, Role::*};

        const BACK: [Role; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Board::empty();
        for (col, role) in (0u8..).zip(BACK) {
            board.squares[col as usize] = Some(Piece::new(role, Black));
            board.squares[8 + col as usize] = Some(Piece::new(Pawn, Black));
            board.squares[48 + col as usize] = Some(Piece::new(Pawn, White));
            board.squares[56 + col as usize] = Some(Piece::new(role, White));
        }

        board
    }
}

impl Board {
    /// A board without any pieces.
    #[inline(always)]
    pub fn empty() -> Self {
        Board { squares: [None; 64] }
    }

    /// Puts a piece on (or clears) a square, returning what was there.
    #[inline(always)]
    pub fn place(&mut self, sq: Square, p: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[sq.index()], p)
    }

    /// An iterator over all pieces on the board.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Square::iter().filter_map(|sq| Some((self[sq]?, sq)))
    }

    /// [`Square`]s occupied by a [`Color`].
    #[inline(always)]
    pub fn by_color(&self, c: Color) -> impl Iterator<Item = Square> + '_ {
        self.iter().filter(move |(p, _)| p.color() == c).map(|(_, sq)| sq)
    }

    /// [`Square`] occupied by the king of a [`Color`], if any.
    #[inline(always)]
    pub fn king(&self, side: Color) -> Option<Square> {
        let king = Piece::new(Role::King, side);
        self.iter().find(|&(p, _)| p == king).map(|(_, sq)| sq)
    }

    /// Checks whether the piece on [`Move::whence`] can reach [`Move::whither`].
    ///
    /// This is the bare movement rule of each piece, it disregards whose turn it
    /// is and whether the move exposes the mover's own king.
    pub fn reach(&self, m: Move) -> Result<Piece, IllegalMove> {
        let piece = self[m.whence()].ok_or(IllegalMove::NoPieceAtSource)?;
        let target = self[m.whither()];

        if target.is_some_and(|t| t.color() == piece.color()) {
            return Err(IllegalMove::OccupiedByOwnPiece);
        }

        let (dr, dc) = m.delta();

        match piece.role() {
            Role::Pawn => {
                let forward = piece.color().forward();
                let home = m.whence().row() == piece.color().pawn_row();

                match (dr, dc.abs()) {
                    (r, 0) if r == forward && target.is_none() => Ok(piece),
                    (r, 0) if r == forward => Err(IllegalMove::BlockedPath),
                    (r, 0) if r == 2 * forward && home => {
                        self.clear(m)?;
                        match target {
                            None => Ok(piece),
                            Some(_) => Err(IllegalMove::BlockedPath),
                        }
                    }

                    (r, 1) if r == forward && target.is_some() => Ok(piece),
                    _ => Err(IllegalMove::IllegalShape),
                }
            }

            Role::Knight => match (dr.abs(), dc.abs()) {
                (1, 2) | (2, 1) => Ok(piece),
                _ => Err(IllegalMove::IllegalShape),
            },

            Role::King if dr.abs() <= 1 && dc.abs() <= 1 => Ok(piece),
            Role::Bishop if dr.abs() == dc.abs() => self.clear(m).map(|_| piece),
            Role::Rook if dr == 0 || dc == 0 => self.clear(m).map(|_| piece),
            Role::Queen if dr == 0 || dc == 0 || dr.abs() == dc.abs() => {
                self.clear(m).map(|_| piece)
            }

            _ => Err(IllegalMove::IllegalShape),
        }
    }

    /// Whether any piece of color `by` reaches the given square.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.by_color(by)
            .any(|whence| self.reach(Move::new(whence, sq)).is_ok())
    }

    /// Checks that every square strictly between both ends of a line is empty.
    fn clear(&self, m: Move) -> Result<(), IllegalMove> {
        let (dr, dc) = m.delta();
        let (sr, sc) = (dr.signum(), dc.signum());

        let mut sq = m.whence();
        while let Some(next) = sq.offset(sr, sc).filter(|&next| next != m.whither()) {
            if self[next].is_some() {
                return Err(IllegalMove::BlockedPath);
            }

            sq = next;
        }

        Ok(())
    }
}

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.index()]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Board({self})")
    }
}

/// Prints the piece placement field of [FEN].
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            if row > 0 {
                f.write_char('/')?;
            }

            let mut skip = 0;
            for sq in Square::iter().skip(row as usize * 8).take(8) {
                match self[sq] {
                    None => skip += 1,
                    Some(p) => {
                        if skip > 0 {
                            write!(f, "{skip}")?;
                            skip = 0;
                        }

                        write!(f, "{p}")?;
                    }
                }
            }

            if skip > 0 {
                write!(f, "{skip}")?;
            }
        }

        Ok(())
    }
}

/// The reason why parsing [`Board`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "failed to parse piece placement")]
pub struct ParseBoardError;

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.split('/').collect();
        if rows.len() != 8 {
            return Err(ParseBoardError);
        }

        let mut board = Board::empty();
        for (row, placement) in (0u8..).zip(rows) {
            let mut col = 0u8;
            for c in placement.chars() {
                match c.to_digit(10) {
                    Some(n @ 1..=8) => col += n as u8,
                    Some(_) => return Err(ParseBoardError),
                    None => {
                        let sq = Square::new(row, col).map_err(|_| ParseBoardError)?;
                        let p = c.to_string().parse().map_err(|_| ParseBoardError)?;
                        board.place(sq, Some(p));
                        col += 1;
                    }
                }

                if col > 8 {
                    return Err(ParseBoardError);
                }
            }

            if col != 8 {
                return Err(ParseBoardError);
            }
        }

        Ok(board)
    }
}
