use crate::carrom::{is_settled, step, Config, Disc, DiscKind, Event, Intent};
use crate::carrom::{Outcome, Phase, Player, Rejection, Vector2};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use std::fmt::{self, Formatter};
use std::{iter, mem, time::Duration};
use tracing::{debug, trace};

/// The state of a carrom game.
///
/// The striker, whenever it is on the board, is the first disc.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    discs: Vec<Disc>,
    turn: Player,
    scores: [u32; 2],
    phase: Phase,
    angle: f64,
    power: f64,
    lag: Duration,
    config: Config,
    rng: ChaCha8Rng,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(Config::default(), 0)
    }
}

impl Board {
    /// Racks the coins in a ring shuffled by an RNG seeded with `seed`.
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let coins = rack(&config, &mut rng);
        Board::setup(config, coins, rng)
    }

    /// Starts a game with an arbitrary arrangement of coins.
    ///
    /// A striker is spawned on the baseline, any other strikers are ignored.
    pub fn with_coins<I: IntoIterator<Item = Disc>>(config: Config, coins: I) -> Self {
        let coins = coins.into_iter().filter(|d| d.kind().is_coin()).collect();
        Board::setup(config, coins, ChaCha8Rng::seed_from_u64(0))
    }

    fn setup(config: Config, coins: Vec<Disc>, rng: ChaCha8Rng) -> Self {
        let (lo, hi) = config.power_range;

        let mut board = Board {
            discs: coins,
            turn: Player::One,
            scores: [0; 2],
            phase: Phase::Positioning,
            angle: 90.,
            power: 50f64.clamp(lo, hi),
            lag: Duration::ZERO,
            config,
            rng,
        };

        board.respawn();
        board
    }

    /// Every disc on the board, striker first.
    #[inline(always)]
    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    /// The striker, unless it was pocketed by the last shot of the game.
    pub fn striker(&self) -> Option<&Disc> {
        self.discs.first().filter(|d| d.kind() == DiscKind::Striker)
    }

    /// The coins still on the board.
    pub fn coins(&self) -> impl Iterator<Item = &Disc> + '_ {
        self.discs.iter().filter(|d| d.kind().is_coin())
    }

    /// The player whose turn it is.
    #[inline(always)]
    pub fn turn(&self) -> Player {
        self.turn
    }

    #[inline(always)]
    pub fn score(&self, p: Player) -> u32 {
        self.scores[p.index()]
    }

    #[inline(always)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The aim angle in degrees.
    #[inline(always)]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline(always)]
    pub fn power(&self) -> f64 {
        self.power
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The [`Outcome`] of the game, if it is over.
    pub fn outcome(&self) -> Option<Outcome> {
        (self.phase == Phase::GameOver).then(|| Outcome::from_scores(self.scores))
    }

    /// Applies an [`Intent`] to a snapshot of this board.
    ///
    /// Returns the resulting board alongside the [`Event`]s it produced,
    /// while `self` is left as it was.
    pub fn apply(&self, intent: Intent) -> (Self, Vec<Event>) {
        let mut next = self.clone();
        let events = next.execute(intent);
        (next, events)
    }

    /// Applies an [`Intent`] in place.
    ///
    /// A rejected intent produces a single [`Event::Rejected`] and leaves the
    /// board untouched.
    pub fn execute(&mut self, intent: Intent) -> Vec<Event> {
        let events = match self.dispatch(intent) {
            Ok(events) => events,
            Err(r) => vec![Event::Rejected(r)],
        };

        trace!(%intent, ?events);
        events
    }

    fn dispatch(&mut self, intent: Intent) -> Result<Vec<Event>, Rejection> {
        match (self.phase, intent) {
            (_, Intent::Restart) => {
                self.restart();
                Ok(vec![Event::Restarted])
            }

            (Phase::GameOver, _) => Err(Rejection::GameOver),

            (Phase::Positioning, Intent::PlaceStriker(x)) => {
                let (lo, hi) = self.config.striker_range;
                let x = finite(x)?.clamp(lo, hi);
                self.striker_mut().position.x = x;
                Ok(vec![Event::StrikerPlaced(x)])
            }

            (Phase::Positioning, Intent::ConfirmPosition) => {
                self.phase = Phase::Aiming;
                Ok(vec![Event::PositionConfirmed])
            }

            (Phase::Aiming, Intent::SetAngle(degrees)) => {
                self.angle = finite(degrees)?.rem_euclid(360.);
                Ok(vec![Event::Aimed(self.angle)])
            }

            (Phase::Aiming, Intent::AimAt(target)) => {
                if !target.is_finite() {
                    return Err(Rejection::OutOfRange);
                }

                let whence = self.striker_mut().position;
                let angle = (whence.y - target.y).atan2(target.x - whence.x);
                self.angle = angle.to_degrees().rem_euclid(360.);
                Ok(vec![Event::Aimed(self.angle)])
            }

            (Phase::Aiming, Intent::ConfirmAngle) => {
                self.phase = Phase::PowerSelect;
                Ok(vec![Event::AngleConfirmed])
            }

            (Phase::PowerSelect, Intent::SetPower(power)) => {
                let (lo, hi) = self.config.power_range;
                if !(lo..=hi).contains(&power) {
                    return Err(Rejection::OutOfRange);
                }

                self.power = power;
                Ok(vec![Event::PowerSet(power)])
            }

            (Phase::PowerSelect, Intent::Shoot) => Ok(vec![self.shoot()]),
            (Phase::Simulating, Intent::Tick(dt)) => Ok(self.tick(dt)),
            (phase, _) => Err(Rejection::WrongPhase(phase)),
        }
    }

    fn striker_mut(&mut self) -> &mut Disc {
        self.discs
            .first_mut()
            .filter(|d| d.kind() == DiscKind::Striker)
            .expect("expected striker on the board")
    }

    fn respawn(&mut self) {
        self.discs.retain(|d| d.kind().is_coin());

        let position = Vector2::new(self.config.striker_x, self.config.baseline_y());
        let striker = Disc::new(DiscKind::Striker, position, self.config.striker_radius);
        self.discs.insert(0, striker);
    }

    fn restart(&mut self) {
        let coins = rack(&self.config, &mut self.rng);
        let rng = self.rng.clone();
        *self = Board::setup(self.config, coins, rng);
        debug!("restarted");
    }

    fn shoot(&mut self) -> Event {
        let theta = self.angle.to_radians();
        let speed = self.power / self.config.power_scale;
        let velocity = Vector2::new(speed * theta.cos(), -speed * theta.sin());

        self.striker_mut().velocity = velocity;
        self.phase = Phase::Simulating;
        self.lag = Duration::ZERO;

        debug!(turn = %self.turn, angle = self.angle, power = self.power, %velocity, "shot");
        Event::Shot(velocity)
    }

    fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        self.lag = self.lag.saturating_add(dt);

        for _ in 0..self.config.max_steps {
            if self.lag < self.config.timestep {
                break;
            }

            self.lag -= self.config.timestep;
            let contacts = step(&mut self.discs, &self.config);
            events.extend(contacts.into_iter().map(Event::Collided));

            if is_settled(&self.discs, self.config.rest_threshold) {
                self.settle(&mut events);
                return events;
            }
        }

        // Wall time the step budget could not absorb is dropped.
        self.lag = self.lag.min(self.config.timestep);
        events.push(Event::Moving);
        events
    }

    fn settle(&mut self, events: &mut Vec<Event>) {
        for d in &mut self.discs {
            d.velocity = Vector2::ZERO;
        }

        self.lag = Duration::ZERO;

        let pockets = self.config.pockets();
        let radius = self.config.pocket_radius;
        let (pocketed, kept): (Vec<_>, Vec<_>) = mem::take(&mut self.discs)
            .into_iter()
            .partition(|d| pockets.iter().any(|&p| (d.position - p).length() < radius));

        self.discs = kept;

        let turn = self.turn;
        let score = &mut self.scores[turn.index()];

        for kind in pocketed.iter().map(Disc::kind).filter(DiscKind::is_coin) {
            *score = score.saturating_add(kind.points());
            debug!(%turn, %kind, score = *score, "pocketed");
            events.push(Event::Pocketed(kind, turn));
        }

        if pocketed.iter().any(|d| d.kind() == DiscKind::Striker) {
            *score = score.saturating_sub(1);
            debug!(%turn, score = *score, "pocketed the striker");
            events.push(Event::StrikerPocketed(turn));
        }

        let goal = self.config.winning_score;
        if self.coins().next().is_none() || self.scores.iter().any(|&s| s >= goal) {
            let outcome = Outcome::from_scores(self.scores);
            self.phase = Phase::GameOver;
            debug!(%outcome, scores = ?self.scores, "game over");
            events.push(Event::GameOver(outcome));
        } else {
            self.turn = !turn;
            self.phase = Phase::Positioning;
            self.respawn();
            debug!(turn = %self.turn, scores = ?self.scores, "round settled");
            events.push(Event::RoundSettled(self.turn));
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [one, two] = self.scores;
        write!(f, "{}: {one} | {}: {two}, ", Player::One, Player::Two)?;

        match self.outcome() {
            Some(outcome) => write!(f, "{outcome}"),
            None => write!(f, "{} to play ({})", self.turn, self.phase),
        }
    }
}

fn finite(v: f64) -> Result<f64, Rejection> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Rejection::OutOfRange)
    }
}

/// The red coin at the centre, surrounded by a shuffled ring of white and black coins.
fn rack(config: &Config, rng: &mut ChaCha8Rng) -> Vec<Disc> {
    let centre = config.centre();

    let mut kinds: Vec<_> = [DiscKind::Black, DiscKind::White]
        .into_iter()
        .flat_map(|k| iter::repeat(k).take(config.coins))
        .collect();

    kinds.shuffle(rng);

    let n = kinds.len() as f64;
    let ring = kinds.into_iter().enumerate().map(|(i, kind)| {
        let theta = TAU * i as f64 / n;
        let offset = Vector2::new(theta.cos(), theta.sin()) * config.ring_radius;
        Disc::new(kind, centre + offset, config.coin_radius)
    });

    iter::once(Disc::new(DiscKind::Red, centre, config.coin_radius))
        .chain(ring)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(kind: DiscKind, x: f64, y: f64) -> Disc {
        Disc::new(kind, Vector2::new(x, y), Config::default().coin_radius)
    }

    fn tick() -> Intent {
        Intent::Tick(Config::default().timestep)
    }

    /// Puts the board in motion without touching any disc.
    fn simulate(board: &mut Board) {
        board.phase = Phase::Simulating;
    }

    fn ready(board: &mut Board, angle: f64, power: f64) {
        board.execute(Intent::ConfirmPosition);
        board.execute(Intent::SetAngle(angle));
        board.execute(Intent::ConfirmAngle);
        board.execute(Intent::SetPower(power));
    }

    #[test]
    fn new_board_racks_coins_around_the_centre() {
        let board = Board::default();
        let config = board.config();

        assert_eq!(board.discs().len(), 20);
        assert_eq!(board.discs()[0].kind(), DiscKind::Striker);
        assert_eq!(board.discs()[0].position, Vector2::new(400., 500.));
        assert_eq!(board.discs()[0].radius(), 20.);

        let count = |k| board.coins().filter(|d| d.kind() == k).count();
        assert_eq!(count(DiscKind::White), 9);
        assert_eq!(count(DiscKind::Black), 9);
        assert_eq!(count(DiscKind::Red), 1);

        for d in board.coins() {
            let distance = (d.position - config.centre()).length();
            match d.kind() {
                DiscKind::Red => assert_eq!(distance, 0.),
                _ => assert!((distance - 40.).abs() < 1e-9),
            }
        }

        assert_eq!(board.turn(), Player::One);
        assert_eq!(board.phase(), Phase::Positioning);
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn seed_determines_the_rack() {
        let config = Config::default();
        assert_eq!(Board::new(config, 7), Board::new(config, 7));
        assert_ne!(Board::new(config, 7).discs(), Board::new(config, 8).discs());
    }

    #[test]
    fn turn_cycles_through_phases() {
        let mut board = Board::default();

        assert_eq!(board.execute(Intent::PlaceStriker(50.)), [Event::StrikerPlaced(100.)]);
        assert_eq!(board.execute(Intent::PlaceStriker(900.)), [Event::StrikerPlaced(500.)]);
        assert_eq!(board.execute(Intent::PlaceStriker(400.)), [Event::StrikerPlaced(400.)]);
        assert_eq!(board.execute(Intent::ConfirmPosition), [Event::PositionConfirmed]);
        assert_eq!(board.phase(), Phase::Aiming);

        assert_eq!(
            board.execute(Intent::AimAt(Vector2::new(400., 300.))),
            [Event::Aimed(90.)]
        );

        assert_eq!(board.execute(Intent::ConfirmAngle), [Event::AngleConfirmed]);
        assert_eq!(board.phase(), Phase::PowerSelect);

        assert_eq!(
            board.execute(Intent::SetPower(5.)),
            [Event::Rejected(Rejection::OutOfRange)]
        );

        assert_eq!(board.execute(Intent::SetPower(100.)), [Event::PowerSet(100.)]);

        let events = board.execute(Intent::Shoot);
        let velocity = board.striker().map(|s| s.velocity);
        assert_eq!(events, velocity.map(Event::Shot).into_iter().collect::<Vec<_>>());
        assert_eq!(board.phase(), Phase::Simulating);

        let velocity = velocity.unwrap();
        assert!(velocity.x.abs() < 1e-9);
        assert!((velocity.y + 10.).abs() < 1e-9);
    }

    #[test]
    fn aiming_follows_screen_coordinates() {
        let mut board = Board::default();
        board.execute(Intent::ConfirmPosition);

        let aim = |board: &mut Board, x, y| board.execute(Intent::AimAt(Vector2::new(x, y)));
        assert_eq!(aim(&mut board, 500., 500.), [Event::Aimed(0.)]);
        assert_eq!(aim(&mut board, 400., 600.), [Event::Aimed(270.)]);
        assert_eq!(aim(&mut board, 300., 500.), [Event::Aimed(180.)]);
        assert_eq!(
            board.execute(Intent::SetAngle(-90.)),
            [Event::Aimed(270.)]
        );
    }

    #[test]
    fn intents_out_of_phase_are_rejected_without_changes() {
        let board = Board::default();

        for intent in [
            Intent::ConfirmAngle,
            Intent::SetAngle(45.),
            Intent::AimAt(Vector2::new(1., 1.)),
            Intent::SetPower(50.),
            Intent::Shoot,
            tick(),
        ] {
            let (next, events) = board.apply(intent);
            assert_eq!(events, [Event::Rejected(Rejection::WrongPhase(Phase::Positioning))]);
            assert_eq!(next, board);
        }

        let mut aiming = board.clone();
        aiming.execute(Intent::ConfirmPosition);

        for intent in [Intent::PlaceStriker(300.), Intent::ConfirmPosition, Intent::Shoot] {
            let (next, events) = aiming.apply(intent);
            assert_eq!(events, [Event::Rejected(Rejection::WrongPhase(Phase::Aiming))]);
            assert_eq!(next, aiming);
        }
    }

    #[test]
    fn non_finite_values_are_rejected_without_changes() {
        let board = Board::default();
        let (next, events) = board.apply(Intent::PlaceStriker(f64::NAN));
        assert_eq!(events, [Event::Rejected(Rejection::OutOfRange)]);
        assert_eq!(next, board);

        let mut aiming = board;
        aiming.execute(Intent::ConfirmPosition);

        for intent in [
            Intent::SetAngle(f64::INFINITY),
            Intent::AimAt(Vector2::new(f64::NAN, 0.)),
        ] {
            let (next, events) = aiming.apply(intent);
            assert_eq!(events, [Event::Rejected(Rejection::OutOfRange)]);
            assert_eq!(next, aiming);
        }

        aiming.execute(Intent::ConfirmAngle);
        let (next, events) = aiming.apply(Intent::SetPower(f64::NAN));
        assert_eq!(events, [Event::Rejected(Rejection::OutOfRange)]);
        assert_eq!(next, aiming);
    }

    #[test]
    fn short_ticks_accumulate_until_a_step_is_due() {
        let mut board = Board::default();
        ready(&mut board, 90., 100.);
        board.execute(Intent::Shoot);

        let before = board.discs()[0].position;
        assert_eq!(board.execute(Intent::Tick(Duration::from_millis(10))), [Event::Moving]);
        assert_eq!(board.discs()[0].position, before);

        board.execute(Intent::Tick(Duration::from_millis(10)));
        assert!(board.discs()[0].position.y < before.y);
    }

    #[test]
    fn long_ticks_are_bounded_by_the_step_budget() {
        let mut board = Board::default();
        ready(&mut board, 90., 100.);
        board.execute(Intent::Shoot);

        let mut expected = board.clone();
        for _ in 0..expected.config.max_steps {
            step(&mut expected.discs, &expected.config);
        }

        board.execute(Intent::Tick(Duration::from_secs(60)));
        assert_eq!(board.discs(), expected.discs());
        assert!(board.lag <= board.config.timestep);
    }

    #[test]
    fn coins_settled_in_pockets_score_for_the_current_player() {
        let mut board = Board::with_coins(
            Config::default(),
            [
                coin(DiscKind::White, 60., 60.),
                coin(DiscKind::Black, 540., 60.),
                coin(DiscKind::Red, 60., 540.),
                coin(DiscKind::White, 300., 300.),
            ],
        );

        simulate(&mut board);

        assert_eq!(
            board.execute(tick()),
            [
                Event::Pocketed(DiscKind::White, Player::One),
                Event::Pocketed(DiscKind::Black, Player::One),
                Event::Pocketed(DiscKind::Red, Player::One),
                Event::RoundSettled(Player::Two),
            ]
        );

        assert_eq!(board.score(Player::One), 5);
        assert_eq!(board.score(Player::Two), 0);
        assert_eq!(board.coins().count(), 1);
        assert_eq!(board.turn(), Player::Two);
        assert_eq!(board.phase(), Phase::Positioning);
    }

    #[test]
    fn coins_outside_pockets_stay_on_the_board() {
        let mut board = Board::with_coins(
            Config::default(),
            [coin(DiscKind::White, 100., 100.), coin(DiscKind::Black, 300., 65.)],
        );

        simulate(&mut board);
        assert_eq!(board.execute(tick()), [Event::RoundSettled(Player::Two)]);
        assert_eq!(board.coins().count(), 2);
        assert_eq!(board.score(Player::One), 0);
    }

    #[test]
    fn pocketed_striker_never_makes_scores_negative() {
        let mut board = Board::with_coins(Config::default(), [coin(DiscKind::White, 300., 300.)]);
        board.discs[0].position = Vector2::new(60., 540.);
        simulate(&mut board);

        assert_eq!(
            board.execute(tick()),
            [Event::StrikerPocketed(Player::One), Event::RoundSettled(Player::Two)]
        );

        assert_eq!(board.score(Player::One), 0);
        assert_eq!(board.striker().map(|s| s.position), Some(Vector2::new(400., 500.)));
    }

    #[test]
    fn pocketed_striker_costs_a_point() {
        let mut board = Board::with_coins(Config::default(), [coin(DiscKind::White, 300., 300.)]);
        board.scores = [2, 0];
        board.discs[0].position = Vector2::new(540., 60.);
        simulate(&mut board);

        board.execute(tick());
        assert_eq!(board.score(Player::One), 1);
    }

    #[test]
    fn pocketed_striker_is_charged_after_coins_are_credited() {
        let mut board = Board::with_coins(
            Config::default(),
            [coin(DiscKind::White, 60., 60.), coin(DiscKind::Black, 300., 300.)],
        );

        board.discs[0].position = Vector2::new(540., 540.);
        simulate(&mut board);

        assert_eq!(
            board.execute(tick()),
            [
                Event::Pocketed(DiscKind::White, Player::One),
                Event::StrikerPocketed(Player::One),
                Event::RoundSettled(Player::Two),
            ]
        );

        assert_eq!(board.score(Player::One), 0);
    }

    #[test]
    fn pocketing_the_last_coin_ends_the_game() {
        let mut board = Board::with_coins(Config::default(), [coin(DiscKind::Red, 60., 60.)]);
        simulate(&mut board);

        let outcome = Outcome::Winner(Player::One);
        assert_eq!(board.execute(tick()), [
            Event::Pocketed(DiscKind::Red, Player::One),
            Event::GameOver(outcome),
        ]);

        assert_eq!(board.phase(), Phase::GameOver);
        assert_eq!(board.outcome(), Some(outcome));

        let (next, events) = board.apply(Intent::PlaceStriker(200.));
        assert_eq!(events, [Event::Rejected(Rejection::GameOver)]);
        assert_eq!(next, board);
    }

    #[test]
    fn reaching_the_winning_score_ends_the_game() {
        let mut board = Board::with_coins(
            Config::default(),
            [coin(DiscKind::White, 60., 60.), coin(DiscKind::Black, 300., 300.)],
        );

        board.turn = Player::Two;
        board.scores = [0, 20];
        simulate(&mut board);

        let events = board.execute(tick());
        assert_eq!(events.last(), Some(&Event::GameOver(Outcome::Winner(Player::Two))));
        assert_eq!(board.coins().count(), 1);
    }

    #[test]
    fn equal_scores_at_the_end_tie() {
        let mut board = Board::with_coins(Config::default(), [coin(DiscKind::White, 60., 60.)]);
        board.turn = Player::Two;
        board.scores = [1, 0];
        simulate(&mut board);

        board.execute(tick());
        assert_eq!(board.outcome(), Some(Outcome::Tie));
    }

    #[test]
    fn restart_is_accepted_in_any_phase() {
        let mut board = Board::with_coins(Config::default(), [coin(DiscKind::Red, 60., 60.)]);
        simulate(&mut board);
        board.execute(tick());
        assert_eq!(board.phase(), Phase::GameOver);

        assert_eq!(board.execute(Intent::Restart), [Event::Restarted]);
        assert_eq!(board.phase(), Phase::Positioning);
        assert_eq!(board.discs().len(), 20);
        assert_eq!(board.score(Player::One), 0);
        assert_eq!(board.turn(), Player::One);
    }

    #[test]
    fn shots_eventually_settle_and_pass_the_turn() {
        let mut board = Board::default();
        ready(&mut board, 90., 10.);
        board.execute(Intent::Shoot);

        let mut settled = false;
        for _ in 0..1000 {
            if board.execute(tick()).contains(&Event::RoundSettled(Player::Two)) {
                settled = true;
                break;
            }
        }

        assert!(settled);
        assert_eq!(board.turn(), Player::Two);
        assert_eq!(board.phase(), Phase::Positioning);
        assert_eq!(board.angle(), 90.);
        assert_eq!(board.power(), 10.);
        assert!(board.discs().iter().all(|d| d.velocity == Vector2::ZERO));
        assert_eq!(board.striker().map(|s| s.position), Some(Vector2::new(400., 500.)));
    }

    #[test]
    fn apply_leaves_the_original_snapshot_untouched() {
        let board = Board::default();
        let (next, events) = board.apply(Intent::ConfirmPosition);
        assert_eq!(events, [Event::PositionConfirmed]);
        assert_eq!(board, Board::default());
        assert_eq!(next.phase(), Phase::Aiming);
    }

    #[test]
    fn board_is_printed_as_a_score_line() {
        assert_eq!(
            Board::default().to_string(),
            "Player 1: 0 | Player 2: 0, Player 1 to play (positioning)"
        );
    }
}
