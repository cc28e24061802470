use crate::chess::{Board, Color, Move, Outcome, ParseBoardError, Piece, Role, Square};
use derive_more::{Display, Error};
use std::fmt::{self, Formatter};
use std::str::FromStr;
use tracing::trace;

#[cfg(test)]
use proptest::{prelude::*, sample::Selector};

/// The reason why a [`Move`] was rejected.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum IllegalMove {
    #[display(fmt = "the game is over")]
    GameOver,
    #[display(fmt = "there is no piece on the source square")]
    NoPieceAtSource,
    #[display(fmt = "the piece belongs to the side not to move")]
    WrongTurn,
    #[display(fmt = "the destination is occupied by a piece of the same color")]
    OccupiedByOwnPiece,
    #[display(fmt = "the piece does not move that way")]
    IllegalShape,
    #[display(fmt = "the path of the piece is obstructed")]
    BlockedPath,
    #[display(fmt = "the move leaves the king in check")]
    LeavesKingInCheck,
    #[display(fmt = "coordinates lie outside of the board")]
    OutOfRange,
}

impl From<crate::chess::OutOfRange> for IllegalMove {
    fn from(_: crate::chess::OutOfRange) -> Self {
        IllegalMove::OutOfRange
    }
}

/// The reason why a [`Board`] does not describe a valid [`Position`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum InvalidPosition {
    #[display(fmt = "expected exactly one {} king", _0)]
    KingCount(#[error(not(source))] Color),
    #[display(fmt = "the side not to move is in check")]
    OpponentInCheck,
}

/// A copy of the board reused to simulate candidate moves.
///
/// Every trial restores the squares it touched before returning.
struct Scratch(Board);

impl Scratch {
    /// Whether `side`'s king, standing on `king` after the move, is not attacked.
    fn is_safe(&mut self, m: Move, side: Color, king: Square) -> bool {
        let piece = self.0.place(m.whence(), None);
        let captured = self.0.place(m.whither(), piece);
        let safe = !self.0.is_attacked(king, !side);
        self.0.place(m.whither(), captured);
        self.0.place(m.whence(), piece);
        safe
    }
}

/// The current position on the chess board.
///
/// This type guarantees that it only holds valid positions, with exactly one
/// king of each color.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Position {
    board: Board,
    turn: Color,
    kings: [Square; 2],
    outcome: Option<Outcome>,
}

impl Default for Position {
    fn default() -> Self {
        let board = Board::default();
        let kings = Color::ALL.map(|c| board.king(c).expect("expected king on the board"));

        Position {
            board,
            turn: Color::White,
            kings,
            outcome: None,
        }
    }
}

#[cfg(test)]
impl Arbitrary for Position {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..64usize, any::<Selector>())
            .prop_map(|(moves, selector)| {
                let mut pos = Position::default();
                for _ in 0..moves {
                    let m = selector.try_select(pos.moves());
                    match m {
                        Some(m) if pos.play(m).is_ok() => continue,
                        _ => break,
                    }
                }

                pos
            })
            .boxed()
    }
}

impl Position {
    /// Validates a [`Board`] with the given side to move.
    pub fn new(board: Board, turn: Color) -> Result<Self, InvalidPosition> {
        let king = |c: Color| {
            let mut iter = board.iter().filter(|&(p, _)| p == Piece::new(Role::King, c));
            match (iter.next(), iter.next()) {
                (Some((_, sq)), None) => Ok(sq),
                _ => Err(InvalidPosition::KingCount(c)),
            }
        };

        let kings = [king(Color::White)?, king(Color::Black)?];
        if board.is_attacked(kings[!turn as usize], turn) {
            return Err(InvalidPosition::OpponentInCheck);
        }

        let mut pos = Position {
            board,
            turn,
            kings,
            outcome: None,
        };

        pos.outcome = pos.evaluate();
        Ok(pos)
    }

    /// The piece placement.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// [`Square`] occupied by the king of the given color.
    #[inline(always)]
    pub fn king(&self, side: Color) -> Square {
        self.kings[side as usize]
    }

    /// The [`Outcome`] of the game in case this position is final.
    #[inline(always)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whether the king of the given color is attacked.
    pub fn is_in_check(&self, side: Color) -> bool {
        self.board.is_attacked(self.king(side), !side)
    }

    /// Whether the side to move is in [check].
    ///
    /// [check]: https://www.chessprogramming.org/Check
    pub fn is_check(&self) -> bool {
        self.is_in_check(self.turn)
    }

    /// Whether the side to move is [checkmated].
    ///
    /// [checkmated]: https://www.chessprogramming.org/Checkmate
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.moves().next().is_none()
    }

    /// Whether the side to move is [stalemated].
    ///
    /// [stalemated]: https://www.chessprogramming.org/Stalemate
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.moves().next().is_none()
    }

    /// An iterator over the legal [`Move`]s of the side to move.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        let turn = self.turn;
        let mut scratch = Scratch(self.board);

        self.board
            .by_color(turn)
            .flat_map(|whence| Square::iter().map(move |whither| Move::new(whence, whither)))
            .filter(move |&m| match self.board.reach(m) {
                Ok(p) => scratch.is_safe(m, turn, self.king_after(p, m)),
                Err(_) => false,
            })
    }

    /// An iterator over the legal [`Move`]s of the piece on a [`Square`].
    pub fn moves_from(&self, whence: Square) -> impl Iterator<Item = Move> + '_ {
        self.moves().filter(move |m| m.whence() == whence)
    }

    /// Checks whether a [`Move`] is legal in this position, without playing it.
    pub fn validate(&self, m: Move) -> Result<Piece, IllegalMove> {
        if self.outcome.is_some() {
            return Err(IllegalMove::GameOver);
        }

        let piece = self.board[m.whence()].ok_or(IllegalMove::NoPieceAtSource)?;
        if piece.color() != self.turn {
            return Err(IllegalMove::WrongTurn);
        }

        self.board.reach(m)?;

        let king = self.king_after(piece, m);
        if Scratch(self.board).is_safe(m, self.turn, king) {
            Ok(piece)
        } else {
            Err(IllegalMove::LeavesKingInCheck)
        }
    }

    /// Plays a [`Move`] if legal in this position.
    ///
    /// The position is left untouched if the move is rejected.
    pub fn play(&mut self, m: Move) -> Result<(), IllegalMove> {
        let piece = self.validate(m)?;
        let side = piece.color();

        let promoted = match piece.role() {
            Role::Pawn if m.whither().row() == side.promotion_row() => {
                Piece::new(Role::Queen, side)
            }

            _ => piece,
        };

        self.board.place(m.whence(), None);
        let capture = self.board.place(m.whither(), Some(promoted));
        self.kings[side as usize] = self.king_after(piece, m);
        self.turn = !side;
        self.outcome = self.evaluate();

        trace!(%m, %side, ?capture, promotion = promoted != piece, outcome = ?self.outcome);

        Ok(())
    }

    /// Where the mover's king stands after a move by `piece`.
    #[inline(always)]
    fn king_after(&self, piece: Piece, m: Move) -> Square {
        match piece.role() {
            Role::King => m.whither(),
            _ => self.king(piece.color()),
        }
    }

    fn evaluate(&self) -> Option<Outcome> {
        match (self.moves().next(), self.is_check()) {
            (Some(_), _) => None,
            (None, true) => Some(Outcome::Checkmate(!self.turn)),
            (None, false) => Some(Outcome::Stalemate),
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position({self})")
    }
}

/// Prints the piece placement followed by the side to move, as in [FEN].
///
/// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
impl fmt::Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.turn {
            Color::White => write!(f, "{} w", self.board),
            Color::Black => write!(f, "{} b", self.board),
        }
    }
}

/// The reason why parsing [`Position`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParsePositionError {
    #[display(fmt = "failed to parse position, {}", _0)]
    InvalidBoard(ParseBoardError),
    #[display(fmt = "failed to parse position, expected side to move `w` or `b`")]
    InvalidTurn,
    #[display(fmt = "failed to parse position, {}", _0)]
    InvalidPosition(InvalidPosition),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    /// Parses the first two fields of [FEN], any other fields are ignored.
    ///
    /// [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let board = fields
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(ParsePositionError::InvalidBoard)?;

        let turn = match fields.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            _ => return Err(ParsePositionError::InvalidTurn),
        };

        Position::new(board, turn).map_err(ParsePositionError::InvalidPosition)
    }
}
