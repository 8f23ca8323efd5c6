use glam::Vec2;

use crate::particles::Particles;

/// Per-step counters for audio/visual consumers. Reset at the start of each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub collisions: u32,
    pub captures: u32,
}

/// Aggregate view of the simulation after a step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Live particles per colony, `[first, second]`.
    pub counts: [u32; 2],
    /// Distance between the two colonies' centroids; 0 when either is empty.
    pub centroid_separation: f32,
    /// Mean velocity magnitude over all particles.
    pub mean_speed: f32,
    pub events: FrameEvents,
}

impl Stats {
    pub fn count_a(&self) -> u32 {
        self.counts[0]
    }

    pub fn count_b(&self) -> u32 {
        self.counts[1]
    }

    pub fn total(&self) -> u32 {
        self.counts[0] + self.counts[1]
    }
}

pub fn compute(particles: &Particles, events: FrameEvents) -> Stats {
    let mut counts = [0u32; 2];
    let mut sums = [Vec2::ZERO; 2];
    let mut speed_sum = 0.0;

    for i in 0..particles.len() {
        let c = particles.owner[i].index();
        counts[c] += 1;
        sums[c] += particles.pos[i];
        speed_sum += particles.vel[i].length();
    }

    let centroid_separation = if counts[0] > 0 && counts[1] > 0 {
        let a = sums[0] / counts[0] as f32;
        let b = sums[1] / counts[1] as f32;
        a.distance(b)
    } else {
        0.0
    };
    let mean_speed = if particles.is_empty() {
        0.0
    } else {
        speed_sum / particles.len() as f32
    };

    Stats {
        counts,
        centroid_separation,
        mean_speed,
        events,
    }
}

/// Closest particle strictly within `radius` of `point` (pointer picking).
pub fn find_nearest(particles: &Particles, point: Vec2, radius: f32) -> Option<usize> {
    let mut best = None;
    let mut best_dist_sq = radius * radius;
    for (i, &pos) in particles.positions().iter().enumerate() {
        let dist_sq = pos.distance_squared(point);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(i);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colony::Colony;

    fn sample() -> Particles {
        let mut particles = Particles::with_capacity(4);
        particles.push(Colony::First, 0, Vec2::new(100.0, 100.0));
        particles.push(Colony::First, 1, Vec2::new(100.0, 200.0));
        particles.push(Colony::Second, 0, Vec2::new(400.0, 150.0));
        particles.vel[2] = Vec2::new(3.0, 4.0);
        particles
    }

    #[test]
    fn centroids_and_speed() {
        let stats = compute(&sample(), FrameEvents::default());
        assert_eq!(stats.counts, [2, 1]);
        assert_eq!(stats.total(), 3);
        assert!((stats.centroid_separation - 300.0).abs() < 1e-4);
        assert!((stats.mean_speed - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn empty_colony_has_no_separation() {
        let mut particles = Particles::with_capacity(1);
        particles.push(Colony::Second, 0, Vec2::new(10.0, 10.0));
        let stats = compute(&particles, FrameEvents::default());
        assert_eq!(stats.counts, [0, 1]);
        assert_eq!(stats.centroid_separation, 0.0);
    }

    #[test]
    fn nearest_pick() {
        let particles = sample();
        assert_eq!(find_nearest(&particles, Vec2::new(105.0, 190.0), 30.0), Some(1));
        assert_eq!(find_nearest(&particles, Vec2::new(250.0, 150.0), 30.0), None);
        // Boundary is exclusive
        assert_eq!(find_nearest(&particles, Vec2::new(130.0, 100.0), 30.0), None);
    }
}
