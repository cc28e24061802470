use crate::chess::{Color, IllegalMove, Move, Outcome, Position, Square};
use derive_more::Display;
use tracing::debug;

/// A player's intent, as forwarded by the presentation layer.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Intent {
    /// Selects a square, either to pick up a piece or to drop the one held.
    #[display(fmt = "select {}", _0)]
    Select(Square),
    /// Plays a move directly.
    #[display(fmt = "move {}", _0)]
    Move(Move),
    /// Starts over from the initial position.
    #[display(fmt = "restart")]
    Restart,
}

/// What happened as a result of an [`Intent`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Event {
    #[display(fmt = "selected {}", _0)]
    Selected(Square),
    #[display(fmt = "deselected")]
    Deselected,
    #[display(fmt = "moved {}", _0)]
    Moved(Move),
    #[display(fmt = "moved {} with check", _0)]
    Check(Move),
    #[display(fmt = "checkmate, {} wins", _0)]
    Checkmate(Color),
    #[display(fmt = "stalemate")]
    Stalemate,
    #[display(fmt = "restarted")]
    Restarted,
    #[display(fmt = "rejected, {}", _0)]
    Rejected(IllegalMove),
}

/// A game of chess driven by [`Intent`]s.
///
/// Tracks the piece currently held by the side to move on top of the
/// [`Position`], mirroring a click-to-select, click-to-drop interface.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Game {
    position: Position,
    selected: Option<Square>,
}

impl Game {
    /// Starts a game from an arbitrary [`Position`].
    pub fn new(position: Position) -> Self {
        Game {
            position,
            selected: None,
        }
    }

    /// The current [`Position`].
    #[inline(always)]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The square of the piece currently held, if any.
    #[inline(always)]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// The legal destinations of the piece currently held.
    pub fn destinations(&self) -> impl Iterator<Item = Square> + '_ {
        self.selected
            .into_iter()
            .flat_map(|sq| self.position.moves_from(sq))
            .map(|m| m.whither())
    }

    /// The [`Outcome`] of the game, if it is over.
    #[inline(always)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.position.outcome()
    }

    /// Applies an [`Intent`] to a snapshot of this game.
    ///
    /// Returns the resulting game alongside the [`Event`] it produced, while
    /// `self` is left as it was.
    pub fn apply(&self, intent: Intent) -> (Self, Event) {
        let mut next = self.clone();
        let event = next.execute(intent);
        (next, event)
    }

    /// Applies an [`Intent`] in place.
    ///
    /// Rejected intents leave the game untouched.
    pub fn execute(&mut self, intent: Intent) -> Event {
        let event = match intent {
            Intent::Restart => {
                *self = Game::default();
                Event::Restarted
            }

            Intent::Move(m) => self.play(m),
            Intent::Select(sq) => self.select(sq),
        };

        debug!(%intent, %event);
        event
    }

    fn select(&mut self, sq: Square) -> Event {
        if self.outcome().is_some() {
            return Event::Rejected(IllegalMove::GameOver);
        }

        let own = self.position.board()[sq].is_some_and(|p| p.color() == self.position.turn());

        match self.selected {
            Some(held) if held == sq => {
                self.selected = None;
                Event::Deselected
            }

            _ if own => {
                self.selected = Some(sq);
                Event::Selected(sq)
            }

            Some(held) => self.play(Move::new(held, sq)),

            None => match self.position.board()[sq] {
                None => Event::Rejected(IllegalMove::NoPieceAtSource),
                Some(_) => Event::Rejected(IllegalMove::WrongTurn),
            },
        }
    }

    fn play(&mut self, m: Move) -> Event {
        if let Err(e) = self.position.play(m) {
            return Event::Rejected(e);
        }

        self.selected = None;

        match self.position.outcome() {
            Some(Outcome::Checkmate(winner)) => Event::Checkmate(winner),
            Some(Outcome::Stalemate) => Event::Stalemate,
            None if self.position.is_check() => Event::Check(m),
            None => Event::Moved(m),
        }
    }
}
