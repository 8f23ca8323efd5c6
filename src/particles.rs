use glam::Vec2;

use crate::colony::{global_type, Colony};
use crate::util::ring::RingBuffer;

/// Past positions kept per particle for trail rendering.
pub const TRAIL_LENGTH: usize = 10;

pub type Trail = RingBuffer<Vec2, TRAIL_LENGTH>;

/// Struct-of-arrays particle storage. Index `i` identifies a particle across
/// every array. Capacity is fixed at construction; nothing reallocates
/// mid-match.
pub struct Particles {
    capacity: usize,
    pub(crate) pos: Vec<Vec2>,
    pub(crate) vel: Vec<Vec2>,
    /// Net force from the last force pass. Diagnostic only.
    pub(crate) force: Vec<Vec2>,
    /// 0 or 1, fixed at spawn.
    pub(crate) subtype: Vec<u8>,
    /// Mutable through capture.
    pub(crate) owner: Vec<Colony>,
    pub(crate) trails: Vec<Trail>,
}

impl Particles {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            pos: Vec::with_capacity(capacity),
            vel: Vec::with_capacity(capacity),
            force: Vec::with_capacity(capacity),
            subtype: Vec::with_capacity(capacity),
            owner: Vec::with_capacity(capacity),
            trails: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Drop every particle, keeping allocations.
    pub fn clear(&mut self) {
        self.pos.clear();
        self.vel.clear();
        self.force.clear();
        self.subtype.clear();
        self.owner.clear();
        self.trails.clear();
    }

    /// Add one particle at rest. Callers check capacity up front.
    pub fn push(&mut self, owner: Colony, subtype: u8, pos: Vec2) {
        debug_assert!(self.len() < self.capacity, "particle capacity exceeded");
        self.pos.push(pos);
        self.vel.push(Vec2::ZERO);
        self.force.push(Vec2::ZERO);
        self.subtype.push(subtype);
        self.owner.push(owner);
        self.trails.push(Trail::filled(pos));
    }

    /// Scatter `count` particles uniformly over `[min, max)`.
    pub fn spawn_batch(
        &mut self,
        rng: &mut fastrand::Rng,
        owner: Colony,
        subtype: u8,
        count: usize,
        min: Vec2,
        max: Vec2,
    ) {
        let span = max - min;
        for _ in 0..count {
            let pos = min + Vec2::new(rng.f32() * span.x, rng.f32() * span.y);
            self.push(owner, subtype, pos);
        }
    }

    pub fn position(&self, i: usize) -> Option<Vec2> {
        self.pos.get(i).copied()
    }

    pub fn owner(&self, i: usize) -> Option<Colony> {
        self.owner.get(i).copied()
    }

    pub fn subtype(&self, i: usize) -> Option<u8> {
        self.subtype.get(i).copied()
    }

    pub fn global_type(&self, i: usize) -> usize {
        global_type(self.owner[i], self.subtype[i])
    }

    /// Live counts per colony, `[first, second]`.
    pub fn counts(&self) -> [u32; 2] {
        let mut counts = [0u32; 2];
        for owner in &self.owner {
            counts[owner.index()] += 1;
        }
        counts
    }

    /// Record this step's positions into every trail.
    pub fn update_trails(&mut self) {
        for (trail, &pos) in self.trails.iter_mut().zip(&self.pos) {
            trail.push(pos);
        }
    }

    /// All positions, in index order.
    pub fn positions(&self) -> &[Vec2] {
        &self.pos
    }
}
