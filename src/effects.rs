use glam::Vec2;

/// Maximum concurrent sparks.
const MAX_SPARKS: usize = 2048;
/// Sparks per capture burst.
const SPARKS_PER_BURST: usize = 8;
/// Outward speed of a fresh spark (units/step).
const BURST_SPEED: f32 = 3.0;
/// Per-step velocity retention.
const SPARK_DRAG: f32 = 0.9;

/// One short-lived spark from a capture burst.
#[derive(Debug, Clone, Copy)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Steps remaining.
    pub lifetime: f32,
    pub max_lifetime: f32,
    /// RGBA packed as u32.
    pub color: u32,
}

impl Spark {
    /// RGBA with alpha faded by remaining life (ease out).
    pub fn faded_color(&self) -> u32 {
        let frac = (self.lifetime / self.max_lifetime).clamp(0.0, 1.0);
        let alpha = ((self.color & 0xFF) as f32 * frac * frac) as u32;
        (self.color & 0xFFFFFF00) | alpha
    }
}

/// Cosmetic capture bursts. Purely visual: nothing here feeds back into the
/// simulation.
pub struct BurstSystem {
    sparks: Vec<Spark>,
}

impl Default for BurstSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BurstSystem {
    pub fn new() -> Self {
        Self {
            sparks: Vec::with_capacity(MAX_SPARKS),
        }
    }

    /// Ring of sparks around `pos`. Silently drops sparks once full.
    pub fn spawn_burst(&mut self, pos: Vec2, color: u32, rng: &mut fastrand::Rng) {
        let offset = rng.f32() * std::f32::consts::TAU;
        for k in 0..SPARKS_PER_BURST {
            if self.sparks.len() >= MAX_SPARKS {
                return;
            }
            let angle = offset + k as f32 / SPARKS_PER_BURST as f32 * std::f32::consts::TAU;
            let speed = BURST_SPEED * (0.6 + rng.f32() * 0.8);
            let lifetime = 12.0 + rng.f32() * 12.0;
            self.sparks.push(Spark {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                lifetime,
                max_lifetime: lifetime,
                color,
            });
        }
    }

    /// Move, age, swap-remove dead sparks. One call per simulation step.
    pub fn update(&mut self) {
        let mut i = 0;
        while i < self.sparks.len() {
            let s = &mut self.sparks[i];
            s.pos += s.vel;
            s.vel *= SPARK_DRAG;
            s.lifetime -= 1.0;

            if s.lifetime <= 0.0 {
                self.sparks.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.sparks.clear();
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    /// Number of active sparks.
    pub fn count(&self) -> usize {
        self.sparks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_expire() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut fx = BurstSystem::new();
        fx.spawn_burst(Vec2::new(50.0, 50.0), 0xFF0000FF, &mut rng);
        assert_eq!(fx.count(), SPARKS_PER_BURST);

        fx.update();
        assert!(fx.sparks().iter().all(|s| s.pos != Vec2::new(50.0, 50.0)));

        for _ in 0..30 {
            fx.update();
        }
        assert_eq!(fx.count(), 0);
    }

    #[test]
    fn capacity_is_respected() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut fx = BurstSystem::new();
        for _ in 0..(MAX_SPARKS / SPARKS_PER_BURST + 10) {
            fx.spawn_burst(Vec2::ZERO, 0xFFFFFFFF, &mut rng);
        }
        assert_eq!(fx.count(), MAX_SPARKS);
    }

    #[test]
    fn fade_reduces_alpha_only() {
        let spark = Spark {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            lifetime: 5.0,
            max_lifetime: 10.0,
            color: 0x11223380,
        };
        assert_eq!(spark.faded_color(), 0x11223320);
    }
}
