use crate::io::Pipe;
use anyhow::{Context, Error as Anyhow};
use clap::Parser;
use lib::chess::{Event, Game, Intent, Position};
use tokio::io::{stdin, stdout};
use tracing::{info, instrument, warn};

/// Plays chess from moves or selections read line by line.
///
/// Each line is either a move such as `e2e4`, a square such as `e2` to select
/// or drop a piece, or `restart`.
#[derive(Debug, Default, Parser)]
pub struct Chess {
    /// The starting position, as a FEN piece placement followed by the side to move.
    #[clap(short, long, default_value_t)]
    position: Position,
}

impl Chess {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let mut io = Pipe::new(stdout(), stdin());
        let mut game = Game::new(self.position);

        io.send(game.position()).await?;
        io.flush().await?;

        while let Some(line) = io.recv().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let intent = match parse(line) {
                Ok(intent) => intent,
                Err(e) => {
                    warn!("{:?}", e);
                    continue;
                }
            };

            match game.execute(intent) {
                Event::Rejected(reason) => warn!(%intent, "{}", reason),
                event @ (Event::Selected(_) | Event::Deselected) => {
                    let targets: Vec<_> = game.destinations().map(|sq| sq.to_string()).collect();
                    info!(%event, ?targets);
                }

                event => {
                    info!(%event);
                    io.send(game.position()).await?;
                }
            }

            io.flush().await?;

            if let Some(outcome) = game.outcome() {
                info!(%outcome, "game over");
                break;
            }
        }

        Ok(())
    }
}

fn parse(s: &str) -> Result<Intent, Anyhow> {
    match s.len() {
        _ if s.eq_ignore_ascii_case("restart") => Ok(Intent::Restart),
        2 => Ok(Intent::Select(s.parse().context("invalid square")?)),
        _ => Ok(Intent::Move(s.parse().context("invalid move")?)),
    }
}
