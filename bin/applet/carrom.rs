use anyhow::{bail, Error as Anyhow};
use clap::Parser;
use derive_more::{Display, Error, From};
use lib::carrom::{Board, Config, Event, Intent, Phase, Player};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::io::{stdout, AsyncWriteExt};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, trace};

/// The reason why parsing [`Shot`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse shot")]
pub struct ParseShotError(ron::de::SpannedError);

/// A shot, from the striker's position along the baseline.
#[derive(Debug, Display, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
#[serde(deny_unknown_fields)]
pub struct Shot {
    x: f64,
    angle: f64,
    power: f64,
}

impl FromStr for Shot {
    type Err = ParseShotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

impl Shot {
    fn intents(&self) -> [Intent; 6] {
        [
            Intent::PlaceStriker(self.x),
            Intent::ConfirmPosition,
            Intent::SetAngle(self.angle),
            Intent::ConfirmAngle,
            Intent::SetPower(self.power),
            Intent::Shoot,
        ]
    }
}

/// Plays a sequence of carrom shots and reports the scores.
#[derive(Debug, Parser)]
pub struct Carrom {
    /// The game configuration in RON.
    #[clap(short, long, default_value_t)]
    config: Config,

    /// The seed used to rack the coins.
    #[clap(short, long, default_value_t)]
    seed: u64,

    /// Advance the simulation at the pace of the wall clock.
    #[clap(short, long)]
    realtime: bool,

    /// The shots to play, e.g. `(x: 400, angle: 90, power: 100)`.
    shots: Vec<Shot>,
}

impl Carrom {
    #[instrument(level = "trace", skip(self), err)]
    pub async fn execute(self) -> Result<(), Anyhow> {
        let mut board = Board::new(self.config, self.seed);
        let mut timer = interval(self.config.timestep);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut out = stdout();

        for shot in &self.shots {
            if board.outcome().is_some() {
                info!(%shot, "ignored shot, the game is over");
                break;
            }

            for intent in shot.intents() {
                for event in board.execute(intent) {
                    if let Event::Rejected(reason) = event {
                        bail!("invalid shot `{}`, {}", shot, reason);
                    }

                    debug!(%event);
                }
            }

            timer.reset();
            let mut last = Instant::now();
            while board.phase() == Phase::Simulating {
                let dt = if self.realtime {
                    let now = timer.tick().await;
                    let dt = now.duration_since(last);
                    last = now;
                    dt
                } else {
                    board.config().timestep
                };

                for event in board.execute(Intent::Tick(dt)) {
                    match event {
                        Event::Moving => {}
                        Event::Collided(_) => trace!(%event),
                        event => info!(%event),
                    }
                }
            }

            out.write_all(format!("{board}\n").as_bytes()).await?;
        }

        let line = format!(
            "{}: {}\n{}: {}\n",
            Player::One,
            board.score(Player::One),
            Player::Two,
            board.score(Player::Two),
        );

        out.write_all(line.as_bytes()).await?;

        if let Some(outcome) = board.outcome() {
            out.write_all(format!("{outcome}\n").as_bytes()).await?;
        }

        out.flush().await?;
        Ok(())
    }
}
