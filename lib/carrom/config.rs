use crate::carrom::Vector2;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, time::Duration};

/// Tunable constants of a carrom game.
///
/// Lengths are in board units, velocities in board units per step.
#[derive(Debug, Display, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[display(fmt = "{}", "ron::ser::to_string(self).unwrap()")]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The side of the square board.
    pub board_size: f64,

    /// The distance from the board edge to the cushions.
    pub margin: f64,

    pub pocket_radius: f64,
    pub striker_radius: f64,
    pub coin_radius: f64,

    /// The distance of the coin ring from the centre of the board.
    pub ring_radius: f64,

    /// The number of white and of black coins.
    pub coins: usize,

    /// The distance of the striker baseline from the bottom edge.
    pub baseline: f64,

    /// Where the striker is placed along the baseline when spawned.
    pub striker_x: f64,

    /// How far the striker may slide along the baseline.
    pub striker_range: (f64, f64),

    /// The fraction of velocity kept after each step.
    pub friction: f64,

    /// The fraction of velocity kept after hitting a cushion.
    pub bounce: f64,

    /// The coefficient of restitution between discs.
    pub restitution: f64,

    /// The velocity below which a disc is considered at rest.
    pub rest_threshold: f64,

    /// The range of accepted shot power.
    pub power_range: (f64, f64),

    /// Shot speed is power divided by this scale.
    pub power_scale: f64,

    /// The score that ends the game.
    pub winning_score: u32,

    /// The duration of one physics step.
    #[serde(with = "humantime_serde")]
    pub timestep: Duration,

    /// The maximum number of steps run by a single tick.
    pub max_steps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            board_size: 600.,
            margin: 50.,
            pocket_radius: 30.,
            striker_radius: 20.,
            coin_radius: 15.,
            ring_radius: 40.,
            coins: 9,
            baseline: 100.,
            striker_x: 400.,
            striker_range: (100., 500.),
            friction: 0.98,
            bounce: 0.8,
            restitution: 0.8,
            rest_threshold: 0.1,
            power_range: (10., 100.),
            power_scale: 10.,
            winning_score: 21,
            timestep: Duration::from_millis(16),
            max_steps: 8,
        }
    }
}

impl Config {
    /// The centre of the board.
    pub fn centre(&self) -> Vector2 {
        Vector2::new(self.board_size / 2., self.board_size / 2.)
    }

    /// The centres of the four corner pockets.
    pub fn pockets(&self) -> [Vector2; 4] {
        let (lo, hi) = (self.margin, self.board_size - self.margin);

        [
            Vector2::new(lo, lo),
            Vector2::new(hi, lo),
            Vector2::new(lo, hi),
            Vector2::new(hi, hi),
        ]
    }

    /// The vertical coordinate of the striker baseline.
    pub fn baseline_y(&self) -> f64 {
        self.board_size - self.baseline
    }

    /// The range of positions a disc of radius `r` may occupy along either axis.
    pub fn bounds(&self, r: f64) -> (f64, f64) {
        (self.margin + r, self.board_size - self.margin - r)
    }

    /// Checks that the constants describe a playable board.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        let finite = [
            self.board_size,
            self.margin,
            self.pocket_radius,
            self.striker_radius,
            self.coin_radius,
            self.ring_radius,
            self.baseline,
            self.striker_x,
            self.striker_range.0,
            self.striker_range.1,
            self.friction,
            self.bounce,
            self.restitution,
            self.rest_threshold,
            self.power_range.0,
            self.power_range.1,
            self.power_scale,
        ];

        if !finite.iter().all(|v| v.is_finite()) {
            return Err(InvalidConfig::NotFinite);
        }

        if [self.pocket_radius, self.striker_radius, self.coin_radius]
            .iter()
            .any(|&r| r <= 0.)
        {
            return Err(InvalidConfig::NonPositiveRadius);
        }

        let coefficient = |c: f64| c > 0. && c <= 1.;
        if ![self.friction, self.bounce, self.restitution]
            .into_iter()
            .all(coefficient)
        {
            return Err(InvalidConfig::CoefficientOutOfRange);
        }

        if self.rest_threshold <= 0. {
            return Err(InvalidConfig::NonPositiveThreshold);
        }

        let (lo, hi) = self.power_range;
        if lo <= 0. || lo > hi || self.power_scale <= 0. {
            return Err(InvalidConfig::InvalidPowerRange);
        }

        let (min, max) = self.bounds(self.striker_radius);
        let (left, right) = self.striker_range;
        let y = self.baseline_y();
        if left > right
            || left < min
            || right > max
            || !(left..=right).contains(&self.striker_x)
            || !(min..=max).contains(&y)
        {
            return Err(InvalidConfig::StrikerOutOfBounds);
        }

        let (min, max) = self.bounds(self.coin_radius);
        if min > max || self.ring_radius < 0. || self.ring_radius > (max - min) / 2. {
            return Err(InvalidConfig::RingOutOfBounds);
        }

        if self.timestep.is_zero() || self.max_steps == 0 {
            return Err(InvalidConfig::NoProgress);
        }

        Ok(())
    }
}

/// The reason why a [`Config`] does not describe a playable board.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
pub enum InvalidConfig {
    #[display(fmt = "every length and coefficient must be a finite number")]
    NotFinite,
    #[display(fmt = "disc and pocket radii must be positive")]
    NonPositiveRadius,
    #[display(fmt = "friction, bounce and restitution must lie in (0, 1]")]
    CoefficientOutOfRange,
    #[display(fmt = "the rest threshold must be positive")]
    NonPositiveThreshold,
    #[display(fmt = "the power range must be positive and ordered")]
    InvalidPowerRange,
    #[display(fmt = "the striker baseline must lie within the cushions")]
    StrikerOutOfBounds,
    #[display(fmt = "the coin ring must lie within the cushions")]
    RingOutOfBounds,
    #[display(fmt = "the timestep and the step budget must be positive")]
    NoProgress,
}

/// The reason why parsing [`Config`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseConfigError {
    #[display(fmt = "failed to parse carrom configuration")]
    Syntax(ron::de::SpannedError),
    #[display(fmt = "invalid carrom configuration, {}", _0)]
    Invalid(InvalidConfig),
}

impl FromStr for Config {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = ron::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
