use crate::carrom::{Config, Disc, Vector2};
use tracing::trace;

/// A pair of discs, by index, whose collision was resolved during a [`step`].
pub type Contact = (usize, usize);

/// Advances every disc by one fixed timestep.
///
/// Discs are processed in order: friction, then integration, then cushions.
/// Pairwise collisions are then resolved in a single pass over every pair.
///
/// Returns the pairs of discs whose collision was resolved.
pub fn step(discs: &mut [Disc], config: &Config) -> Vec<Contact> {
    for disc in discs.iter_mut() {
        disc.velocity *= config.friction;
        disc.position += disc.velocity;
        cushion(disc, config);
    }

    let mut contacts = Vec::new();
    for j in 1..discs.len() {
        let (head, tail) = discs.split_at_mut(j);
        for (i, a) in head.iter_mut().enumerate() {
            if collide(a, &mut tail[0], config.restitution) {
                contacts.push((i, j));
            }
        }
    }

    if !contacts.is_empty() {
        trace!(?contacts);
    }

    contacts
}

/// Keeps a disc within the cushions, bouncing it off any it crossed.
pub fn cushion(disc: &mut Disc, config: &Config) {
    let (min, max) = config.bounds(disc.radius());

    let axes = [
        (&mut disc.position.x, &mut disc.velocity.x),
        (&mut disc.position.y, &mut disc.velocity.y),
    ];

    for (p, v) in axes {
        if *p < min {
            *p = min;
            *v = -*v * config.bounce;
        } else if *p > max {
            *p = max;
            *v = -*v * config.bounce;
        }
    }
}

/// Resolves the collision between two overlapping discs of equal mass.
///
/// Discs that do not overlap or that are not approaching each other along the
/// line of centres are left untouched. Discs sharing a centre collide along
/// the x axis.
///
/// Returns whether the collision was resolved.
pub fn collide(a: &mut Disc, b: &mut Disc, restitution: f64) -> bool {
    let delta = b.position - a.position;
    let distance = delta.length();
    let reach = a.radius() + b.radius();

    if distance >= reach {
        return false;
    }

    let n = delta.normalized().unwrap_or(Vector2::new(1., 0.));
    let vn = (b.velocity - a.velocity).dot(n);

    if vn >= 0. {
        return false;
    }

    let impulse = n * (-(1. + restitution) * vn / 2.);
    a.velocity -= impulse;
    b.velocity += impulse;

    let push = n * ((reach - distance) / 2.);
    a.position -= push;
    b.position += push;

    true
}

/// Whether every disc has come to rest.
pub fn is_settled(discs: &[Disc], threshold: f64) -> bool {
    discs.iter().all(|d| !d.is_moving(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrom::DiscKind;
    use std::f64::consts::TAU;
    use test_strategy::proptest;

    fn coin(x: f64, y: f64) -> Disc {
        Disc::new(DiscKind::White, Vector2::new(x, y), 15.)
    }

    #[proptest]
    fn collision_reverses_normal_velocity_by_restitution(
        #[strategy(0f64..TAU)] theta: f64,
        #[strategy(0.1f64..20.)] speed: f64,
        #[strategy(-0.9f64..0.9)] spread: f64,
        #[strategy(0f64..10.)] other: f64,
        #[strategy(1f64..29.)] distance: f64,
    ) {
        let n = Vector2::new(theta.cos(), theta.sin());
        let mut a = coin(300., 300.);
        let mut b = coin(300. + n.x * distance, 300. + n.y * distance);
        let n = (b.position - a.position).normalized().unwrap();

        // a heads towards b within a cone around the line of centres.
        let heading = theta + spread;
        a.velocity = Vector2::new(heading.cos(), heading.sin()) * speed;
        b.velocity = Vector2::new(-n.y, n.x) * other;

        let before = (b.velocity - a.velocity).dot(n);
        let momentum = a.velocity + b.velocity;

        assert!(collide(&mut a, &mut b, 0.8));

        let after = (b.velocity - a.velocity).dot(n);
        assert!((after + 0.8 * before).abs() < 1e-9);
        assert!((a.velocity + b.velocity - momentum).length() < 1e-9);
    }

    #[proptest]
    fn collision_separates_overlapping_discs(
        #[strategy(0f64..TAU)] theta: f64,
        #[strategy(1f64..29.)] distance: f64,
    ) {
        let mut a = coin(300., 300.);
        let mut b = coin(300. + theta.cos() * distance, 300. + theta.sin() * distance);
        a.velocity = (b.position - a.position).normalized().unwrap();

        assert!(collide(&mut a, &mut b, 0.8));
        assert!(((b.position - a.position).length() - 30.).abs() < 1e-9);
    }

    #[proptest]
    fn receding_discs_do_not_collide(
        #[strategy(0f64..TAU)] theta: f64,
        #[strategy(0f64..10.)] speed: f64,
    ) {
        let mut a = coin(300., 300.);
        let mut b = coin(300. + theta.cos() * 20., 300. + theta.sin() * 20.);
        b.velocity = (b.position - a.position).normalized().unwrap() * speed;

        let (x, y) = (a, b);
        assert!(!collide(&mut a, &mut b, 0.8));
        assert_eq!((a, b), (x, y));
    }

    #[test]
    fn discs_sharing_a_centre_collide_along_the_x_axis() {
        let mut a = coin(300., 300.);
        let mut b = coin(300., 300.);
        a.velocity = Vector2::new(1., 0.);

        assert!(collide(&mut a, &mut b, 0.8));
        assert_eq!(a.position, Vector2::new(285., 300.));
        assert_eq!(b.position, Vector2::new(315., 300.));
        assert!(b.velocity.x > 0.);
        assert_eq!(b.velocity.y, 0.);
    }

    #[test]
    fn distant_discs_do_not_collide() {
        let mut a = coin(100., 100.);
        let mut b = coin(130., 100.);
        a.velocity = Vector2::new(5., 0.);
        assert!(!collide(&mut a, &mut b, 0.8));
    }

    #[proptest]
    fn friction_brings_discs_to_rest(
        #[strategy(0f64..TAU)] theta: f64,
        #[strategy(0f64..=10.)] speed: f64,
    ) {
        let config = Config::default();
        let mut discs = [coin(300., 300.)];
        discs[0].velocity = Vector2::new(theta.cos(), theta.sin()) * speed;

        let mut last = discs[0].velocity.length();
        for _ in 0..240 {
            if is_settled(&discs, config.rest_threshold) {
                break;
            }

            step(&mut discs, &config);
            let speed = discs[0].velocity.length();
            assert!(speed <= last);
            last = speed;
        }

        assert!(is_settled(&discs, config.rest_threshold));
    }

    #[proptest]
    fn cushions_keep_discs_on_the_board(
        #[strategy(0f64..TAU)] theta: f64,
        #[strategy(0f64..=50.)] speed: f64,
        #[strategy(1usize..100)] steps: usize,
    ) {
        let config = Config::default();
        let (min, max) = config.bounds(15.);
        let mut discs = [coin(300., 300.)];
        discs[0].velocity = Vector2::new(theta.cos(), theta.sin()) * speed;

        for _ in 0..steps {
            step(&mut discs, &config);
            let p = discs[0].position;
            assert!((min..=max).contains(&p.x));
            assert!((min..=max).contains(&p.y));
        }
    }

    #[test]
    fn cushion_reflects_and_damps_velocity() {
        let config = Config::default();
        let mut disc = coin(60., 300.);
        disc.velocity = Vector2::new(-10., 2.);
        cushion(&mut disc, &config);
        assert_eq!(disc.position, Vector2::new(65., 300.));
        assert_eq!(disc.velocity, Vector2::new(8., 2.));
    }

    #[test]
    fn step_reports_resolved_contacts() {
        let config = Config::default();
        let mut discs = [coin(300., 300.), coin(400., 300.), coin(329., 300.)];
        discs[0].velocity = Vector2::new(2., 0.);

        assert_eq!(step(&mut discs, &config), vec![(0, 2)]);
        assert!(discs[2].velocity.x > 0.);
        assert_eq!(discs[1].velocity, Vector2::ZERO);
    }
}
