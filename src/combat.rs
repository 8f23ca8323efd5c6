use glam::Vec2;

use crate::colony::Colony;
use crate::config::CombatRules;
use crate::particles::Particles;
use crate::spatial::SpatialGrid;

/// Velocity factor applied to a freshly captured particle (halved and reversed).
const CAPTURE_RECOIL: f32 = -0.5;

/// A particle changed sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureEvent {
    pub index: usize,
    pub from: Colony,
    pub to: Colony,
    pub position: Vec2,
}

/// Capture rule. The margin is hysteresis so marginal counts don't flicker.
#[inline]
pub fn should_capture(enemy_pressure: f32, friendly_support: f32, margin: f32) -> bool {
    enemy_pressure > friendly_support + margin
}

/// Local `(enemy_pressure, friendly_support)` around particle `i`.
pub fn pressure_at(
    particles: &Particles,
    grid: &SpatialGrid,
    rules: &CombatRules,
    i: usize,
) -> (f32, f32) {
    let me = particles.pos[i];
    let mine = particles.owner[i];
    let radius_sq = rules.radius * rules.radius;
    let mut enemy = 0.0;
    let mut support = 0.0;

    grid.query_neighbors(me, false, |j| {
        let j = j as usize;
        if j == i {
            return;
        }
        let d = particles.pos[j] - me;
        // Cheap box reject before the squared distance
        if d.x.abs() > rules.radius || d.y.abs() > rules.radius {
            return;
        }
        if d.length_squared() >= radius_sq {
            return;
        }
        if particles.owner[j] == mine {
            support += rules.support_weight;
        } else if particles.subtype[j] == 0 {
            enemy += rules.soldier_weight;
        } else {
            enemy += rules.enemy_weight;
        }
    });

    (enemy, support)
}

/// Stochastic capture pass. Each particle is evaluated with probability
/// `rules.sample_rate`; flips apply immediately, so later particles in the
/// same pass see the new ownership. Appends to `events`, returns captures.
///
/// `grid` must reflect current positions.
pub fn resolve(
    particles: &mut Particles,
    grid: &SpatialGrid,
    rules: &CombatRules,
    rng: &mut fastrand::Rng,
    events: &mut Vec<CaptureEvent>,
) -> u32 {
    let mut captures = 0;
    for i in 0..particles.len() {
        if rng.f32() >= rules.sample_rate {
            continue;
        }
        let (enemy, support) = pressure_at(particles, grid, rules, i);
        if !should_capture(enemy, support, rules.margin) {
            continue;
        }

        let from = particles.owner[i];
        let to = from.opponent();
        particles.owner[i] = to;
        particles.vel[i] *= CAPTURE_RECOIL;
        captures += 1;
        log::trace!("capture: #{i} {} -> {}", from.label(), to.label());
        events.push(CaptureEvent {
            index: i,
            from,
            to,
            position: particles.pos[i],
        });
    }
    captures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always() -> CombatRules {
        CombatRules {
            sample_rate: 1.0,
            ..CombatRules::default()
        }
    }

    fn run(particles: &mut Particles, rules: &CombatRules) -> Vec<CaptureEvent> {
        let mut grid = SpatialGrid::new(80.0, Vec2::new(1200.0, 800.0));
        grid.rebuild(particles.positions());
        let mut rng = fastrand::Rng::with_seed(5);
        let mut events = Vec::new();
        resolve(particles, &grid, rules, &mut rng, &mut events);
        events
    }

    #[test]
    fn threshold_is_strict() {
        assert!(should_capture(2.01, 0.0, 2.0));
        assert!(!should_capture(1.99, 0.0, 2.0));
        assert!(!should_capture(3.0, 1.0, 2.0));
        assert!(should_capture(5.5, 3.0, 2.0));
    }

    #[test]
    fn pressure_just_over_margin_flips() {
        // One soldier weighted friendly + 2.01
        let rules = CombatRules {
            soldier_weight: 2.01,
            ..always()
        };
        let mut particles = Particles::with_capacity(2);
        particles.push(Colony::First, 1, Vec2::new(300.0, 300.0));
        particles.push(Colony::Second, 0, Vec2::new(305.0, 300.0));
        particles.vel[0] = Vec2::new(2.0, -4.0);

        let events = run(&mut particles, &rules);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].index, 0);
        assert_eq!(events[0].to, Colony::Second);
        assert_eq!(particles.owner[0], Colony::Second);
        assert_eq!(particles.vel[0], Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn pressure_just_under_margin_holds() {
        let rules = CombatRules {
            soldier_weight: 1.99,
            ..always()
        };
        let mut particles = Particles::with_capacity(2);
        particles.push(Colony::First, 1, Vec2::new(300.0, 300.0));
        particles.push(Colony::Second, 0, Vec2::new(305.0, 300.0));

        assert!(run(&mut particles, &rules).is_empty());
        assert_eq!(particles.counts(), [1, 1]);
    }

    /// Particle 0 with two friends, facing two soldiers and a third enemy.
    fn skirmish(third_enemy_subtype: u8) -> Particles {
        let mut particles = Particles::with_capacity(6);
        particles.push(Colony::First, 1, Vec2::new(300.0, 300.0));
        particles.push(Colony::First, 1, Vec2::new(300.0, 306.0));
        particles.push(Colony::First, 1, Vec2::new(300.0, 294.0));
        particles.push(Colony::Second, 0, Vec2::new(306.0, 300.0));
        particles.push(Colony::Second, 0, Vec2::new(294.0, 300.0));
        particles.push(Colony::Second, third_enemy_subtype, Vec2::new(303.0, 303.0));
        particles
    }

    #[test]
    fn default_weights_cross_the_margin() {
        // Three soldiers (4.5) against two friends (2.0): 4.5 > 4.0
        let mut particles = skirmish(0);
        let rules = always();
        let mut grid = SpatialGrid::new(80.0, Vec2::new(1200.0, 800.0));
        grid.rebuild(particles.positions());
        assert_eq!(pressure_at(&particles, &grid, &rules, 0), (4.5, 2.0));

        let events = run(&mut particles, &rules);
        assert_eq!(events[0].index, 0);
        assert_eq!(particles.owner[0], Colony::Second);
    }

    #[test]
    fn default_weights_hold_at_the_margin() {
        // Two soldiers and a worker (4.0) against two friends (2.0): 4.0 is not > 4.0
        let mut particles = skirmish(1);
        let rules = always();
        let mut grid = SpatialGrid::new(80.0, Vec2::new(1200.0, 800.0));
        grid.rebuild(particles.positions());
        assert_eq!(pressure_at(&particles, &grid, &rules, 0), (4.0, 2.0));

        assert!(run(&mut particles, &rules).is_empty());
        assert_eq!(particles.counts(), [3, 3]);
    }

    #[test]
    fn outnumbered_particle_is_captured_and_count_conserved() {
        let mut particles = Particles::with_capacity(4);
        particles.push(Colony::First, 0, Vec2::new(300.0, 300.0));
        for offset in [Vec2::new(5.0, 0.0), Vec2::new(-5.0, 0.0), Vec2::new(0.0, 5.0)] {
            particles.push(Colony::Second, 1, Vec2::new(300.0, 300.0) + offset);
        }

        let events = run(&mut particles, &always());
        assert_eq!(events.len(), 1);
        assert_eq!(particles.counts(), [0, 4]);
    }

    #[test]
    fn support_cancels_pressure() {
        // Two soldiers (3.0) vs one friend: 3.0 is not > 1.0 + 2.0
        let mut particles = Particles::with_capacity(4);
        particles.push(Colony::First, 1, Vec2::new(300.0, 300.0));
        particles.push(Colony::First, 1, Vec2::new(300.0, 306.0));
        particles.push(Colony::Second, 0, Vec2::new(306.0, 300.0));
        particles.push(Colony::Second, 0, Vec2::new(294.0, 300.0));

        assert!(run(&mut particles, &always()).is_empty());
    }

    #[test]
    fn distant_enemies_exert_no_pressure() {
        let mut particles = Particles::with_capacity(4);
        particles.push(Colony::First, 1, Vec2::new(300.0, 300.0));
        for k in 0..3 {
            particles.push(Colony::Second, 0, Vec2::new(321.0 + k as f32, 300.0));
        }
        let rules = always();
        let mut grid = SpatialGrid::new(80.0, Vec2::new(1200.0, 800.0));
        grid.rebuild(particles.positions());
        assert_eq!(pressure_at(&particles, &grid, &rules, 0), (0.0, 0.0));
    }

    #[test]
    fn zero_sample_rate_never_captures() {
        let rules = CombatRules {
            sample_rate: 0.0,
            ..CombatRules::default()
        };
        let mut particles = Particles::with_capacity(4);
        particles.push(Colony::First, 0, Vec2::new(300.0, 300.0));
        for k in 0..3 {
            particles.push(Colony::Second, 0, Vec2::new(302.0 + k as f32, 300.0));
        }
        assert!(run(&mut particles, &rules).is_empty());
    }
}
