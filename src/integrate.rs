use glam::Vec2;

use crate::config::Perturbation;
use crate::particles::Particles;

/// Friction at which `Perturbation::jitter` applies unscaled.
const REFERENCE_FRICTION: f32 = 0.8;
/// Wall bounce keeps at least this share of speed...
const BOUNCE_DAMPING_MIN: f32 = 0.6;
/// ...gains up to this much more for fast impacts...
const BOUNCE_DAMPING_RANGE: f32 = 0.35;
/// ...reaching the full range at this squared speed...
const BOUNCE_SPEED_SQ_REF: f32 = 40.0;
/// ...and never exceeds this.
const BOUNCE_DAMPING_MAX: f32 = 0.95;

/// What happens at the arena edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Reflective walls (arena mode).
    Walls,
    /// Toroidal wraparound (training mode).
    Torus,
}

#[derive(Debug, Clone, Copy)]
pub struct IntegrateParams {
    pub friction: f32,
    pub extent: Vec2,
    pub boundary: Boundary,
    /// Only applied with `Boundary::Walls`.
    pub perturbation: Perturbation,
}

/// Share of speed kept after a wall hit. Faster impacts lose proportionally less.
#[inline]
pub fn bounce_damping(vel: Vec2) -> f32 {
    let speed_sq = vel.length_squared();
    (BOUNCE_DAMPING_MIN + (speed_sq / BOUNCE_SPEED_SQ_REF) * BOUNCE_DAMPING_RANGE)
        .min(BOUNCE_DAMPING_MAX)
}

/// Perturb, damp, move and resolve boundaries for every particle.
/// `flow_time` is the monotonically increasing flow-field clock.
pub fn integrate(
    particles: &mut Particles,
    params: &IntegrateParams,
    flow_time: f32,
    rng: &mut fastrand::Rng,
) {
    let perturb = params.boundary == Boundary::Walls;
    let jitter = params.perturbation.jitter * (REFERENCE_FRICTION / params.friction);
    let flow = params.perturbation;

    for (pos, vel) in particles.pos.iter_mut().zip(particles.vel.iter_mut()) {
        // Anti-stagnation: thermal jitter + smooth flow field
        if perturb {
            if jitter > 0.0 {
                *vel += Vec2::new(rng.f32() - 0.5, rng.f32() - 0.5) * jitter;
            }
            if flow.flow > 0.0 {
                *vel += Vec2::new(
                    (pos.y * flow.flow_scale + flow_time).sin(),
                    (pos.x * flow.flow_scale + flow_time).cos(),
                ) * flow.flow;
            }
        }

        *vel *= params.friction;
        *pos += *vel;

        match params.boundary {
            Boundary::Walls => bounce(pos, vel, params.extent),
            Boundary::Torus => wrap(pos, params.extent),
        }
    }
}

fn bounce(pos: &mut Vec2, vel: &mut Vec2, extent: Vec2) {
    let outside = pos.x < 0.0 || pos.x > extent.x || pos.y < 0.0 || pos.y > extent.y;
    if !outside {
        return;
    }
    let damping = bounce_damping(*vel);

    if pos.x < 0.0 || pos.x > extent.x {
        pos.x = pos.x.clamp(0.0, extent.x);
        vel.x = -vel.x * damping;
    }
    if pos.y < 0.0 || pos.y > extent.y {
        pos.y = pos.y.clamp(0.0, extent.y);
        vel.y = -vel.y * damping;
    }
}

fn wrap(pos: &mut Vec2, extent: Vec2) {
    pos.x = wrap_axis(pos.x, extent.x);
    pos.y = wrap_axis(pos.y, extent.y);
}

#[inline]
fn wrap_axis(v: f32, len: f32) -> f32 {
    if (0.0..len).contains(&v) {
        return v;
    }
    let w = v.rem_euclid(len);
    // rem_euclid can round up to `len` for tiny negatives
    if w >= len {
        0.0
    } else {
        w
    }
}
