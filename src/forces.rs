use glam::Vec2;

use crate::config::MIN_RADIUS;
use crate::matrix::ForceMatrix;
use crate::particles::Particles;
use crate::spatial::SpatialGrid;

/// Peak contact repulsion at zero distance.
const CONTACT_REPULSION: f32 = 2.0;
/// Interactions weaker than this are left out of inspection output.
const INSPECT_THRESHOLD: f32 = 0.01;

/// Per-run force parameters, copied out of the arena config.
#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    pub radius: f32,
    pub multiplier: f32,
    /// Arena extent when the world is toroidal (training mode).
    pub wrap: Option<Vec2>,
}

/// Shortest displacement from `from` to `to`, wrapping each axis when the
/// world is toroidal.
#[inline]
pub fn displacement(from: Vec2, to: Vec2, wrap: Option<Vec2>) -> Vec2 {
    let mut d = to - from;
    if let Some(extent) = wrap {
        if d.x > extent.x * 0.5 {
            d.x -= extent.x;
        } else if d.x < -extent.x * 0.5 {
            d.x += extent.x;
        }
        if d.y > extent.y * 0.5 {
            d.y -= extent.y;
        } else if d.y < -extent.y * 0.5 {
            d.y += extent.y;
        }
    }
    d
}

/// Scalar force at `dist` for a coefficient. Negative pushes apart.
/// The bool is true when the pair is inside the hard minimum (a collision).
///
/// Beyond `MIN_RADIUS` the coefficient is shaped by a triangular window that
/// is zero at both `MIN_RADIUS` and `radius` and peaks halfway between.
#[inline]
pub fn pair_force(dist: f32, coefficient: f32, radius: f32) -> (f32, bool) {
    if dist < MIN_RADIUS {
        (-CONTACT_REPULSION * (1.0 - dist / MIN_RADIUS), true)
    } else {
        let window = 1.0 - (2.0 * dist - radius - MIN_RADIUS).abs() / (radius - MIN_RADIUS);
        (coefficient * window, false)
    }
}

/// Sum neighbor forces for every particle, store them as `force` and add them
/// into `vel`. Returns the number of close-range collisions seen.
///
/// `grid` must have been rebuilt from the current positions.
pub fn evaluate(
    particles: &mut Particles,
    grid: &SpatialGrid,
    matrix: &ForceMatrix,
    params: ForceParams,
    global_types: &mut Vec<u8>,
) -> u32 {
    let count = particles.len();
    global_types.clear();
    global_types.extend((0..count).map(|i| particles.global_type(i) as u8));

    let radius_sq = params.radius * params.radius;
    let wrap = params.wrap.is_some();
    let pos = &particles.pos;
    let vel = &mut particles.vel;
    let force = &mut particles.force;
    let mut collisions = 0;

    for i in 0..count {
        let me = pos[i];
        let actor = global_types[i] as usize;
        let mut net = Vec2::ZERO;

        grid.query_neighbors(me, wrap, |j| {
            let j = j as usize;
            if j == i {
                return;
            }
            let d = displacement(me, pos[j], params.wrap);
            let dist_sq = d.length_squared();
            if dist_sq == 0.0 || dist_sq >= radius_sq {
                return;
            }
            let dist = dist_sq.sqrt();
            let coefficient = matrix.get(actor, global_types[j] as usize);
            let (f, collided) = pair_force(dist, coefficient, params.radius);
            if collided {
                collisions += 1;
            }
            net += d / dist * f;
        });

        let scaled = net * params.multiplier;
        force[i] = scaled;
        vel[i] += scaled;
    }

    collisions
}

/// One neighbor's contribution to an inspected particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub peer: usize,
    /// From the inspected particle to the peer (wrapped in training mode).
    pub displacement: Vec2,
    /// Scalar force before the multiplier. Negative is repulsion.
    pub force: f32,
    pub is_repulsion: bool,
}

/// Debug view of a single particle's force picture.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub index: usize,
    pub position: Vec2,
    /// Net force from the last step.
    pub net_force: Vec2,
    pub interactions: Vec<Interaction>,
}

/// Rebuild the interaction list of particle `index` against every other
/// particle. Scans linearly so it never depends on a stale grid.
pub fn inspect(
    particles: &Particles,
    matrix: &ForceMatrix,
    params: ForceParams,
    index: usize,
) -> Option<Inspection> {
    let me = particles.position(index)?;
    let actor = particles.global_type(index);
    let radius_sq = params.radius * params.radius;

    let interactions = particles
        .positions()
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .filter_map(|(j, &other)| {
            let d = displacement(me, other, params.wrap);
            let dist_sq = d.length_squared();
            if dist_sq == 0.0 || dist_sq >= radius_sq {
                return None;
            }
            let coefficient = matrix.get(actor, particles.global_type(j));
            let (f, _) = pair_force(dist_sq.sqrt(), coefficient, params.radius);
            (f.abs() > INSPECT_THRESHOLD).then_some(Interaction {
                peer: j,
                displacement: d,
                force: f,
                is_repulsion: f < 0.0,
            })
        })
        .collect();

    Some(Inspection {
        index,
        position: me,
        net_force: particles.force[index],
        interactions,
    })
}
