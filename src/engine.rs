use glam::Vec2;

use crate::colony::Colony;
use crate::combat::{self, CaptureEvent};
use crate::config::{ArenaConfig, CombatRules, Perturbation};
use crate::dna::ColonyDna;
use crate::effects::BurstSystem;
use crate::error::SimError;
use crate::forces::{self, ForceParams, Inspection};
use crate::integrate::{self, Boundary, IntegrateParams};
use crate::matrix::ForceMatrix;
use crate::particles::Particles;
use crate::spatial::SpatialGrid;
use crate::stats::{self, FrameEvents, Stats};
use crate::tactics::{self, Stance};
use crate::timer::{StepPhase, StepTimers};

/// Arena spawn keeps this far from the side walls and from top/bottom.
const SPAWN_MARGIN: f32 = 100.0;
/// Each colony's spawn zone stops this far short of the centre line.
const SPAWN_GAP: f32 = 50.0;
/// Training-mode palette for the (absent) second colony.
const DUMMY_PALETTE: [u32; 2] = [0x333333FF, 0x333333FF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two colonies, reflective walls, combat enabled.
    Arena,
    /// One colony, toroidal world, no combat.
    Training,
}

/// Single-threaded particle battle simulation.
///
/// Owns all particle state exclusively. The caller drives it: one `step()`
/// per frame, optionally followed by `resolve_combat()`, then `stats()`.
pub struct Engine {
    extent: Vec2,
    mode: Mode,
    config: ArenaConfig,
    combat_rules: CombatRules,
    perturbation: Perturbation,

    particles: Particles,
    grid: SpatialGrid,
    /// Grid was rebuilt after the last position change.
    grid_fresh: bool,
    global_types: Vec<u8>,

    /// Matrix built from DNA; tactics never write to it.
    base_matrix: ForceMatrix,
    /// Matrix the force pass actually reads.
    matrix: ForceMatrix,
    stances: [Stance; 2],
    palettes: [[u32; 2]; 2],

    flow_time: f32,
    steps: u64,
    events: FrameEvents,
    captures: Vec<CaptureEvent>,
    bursts: BurstSystem,
    timers: StepTimers,
    rng: fastrand::Rng,
}

impl Engine {
    /// Engine with room for `capacity` particles over a `extent`-sized arena.
    pub fn new(capacity: usize, extent: Vec2) -> Result<Self, SimError> {
        Self::with_rng(capacity, extent, fastrand::Rng::new())
    }

    /// Same as `new`, with a fixed RNG seed for reproducible runs.
    pub fn with_seed(capacity: usize, extent: Vec2, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(capacity, extent, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(capacity: usize, extent: Vec2, rng: fastrand::Rng) -> Result<Self, SimError> {
        if !(extent.x.is_finite() && extent.y.is_finite() && extent.x > 0.0 && extent.y > 0.0) {
            return Err(SimError::InvalidBounds {
                width: extent.x,
                height: extent.y,
            });
        }
        let config = ArenaConfig::default();
        let combat_rules = CombatRules::default();
        let cell = cell_size(&config, &combat_rules);
        Ok(Self {
            extent,
            mode: Mode::Arena,
            config,
            combat_rules,
            perturbation: Perturbation::default(),
            particles: Particles::with_capacity(capacity),
            grid: SpatialGrid::new(cell, extent),
            grid_fresh: false,
            global_types: Vec::with_capacity(capacity),
            base_matrix: ForceMatrix::zero(),
            matrix: ForceMatrix::zero(),
            stances: [Stance::Neutral; 2],
            palettes: [DUMMY_PALETTE; 2],
            flow_time: 0.0,
            steps: 0,
            events: FrameEvents::default(),
            captures: Vec::with_capacity(64),
            bursts: BurstSystem::new(),
            timers: StepTimers::new(),
            rng,
        })
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    /// Two-colony bounded match. `count_a`/`count_b` are particles per subtype.
    pub fn init_arena(
        &mut self,
        colony_a: &ColonyDna,
        colony_b: &ColonyDna,
        count_a: u32,
        count_b: u32,
        config: ArenaConfig,
    ) -> Result<(), SimError> {
        let requested = 2 * (count_a as usize + count_b as usize);
        self.check_capacity(requested)?;
        self.set_config(config)?;

        self.reset(Mode::Arena);
        self.base_matrix = ForceMatrix::arena(colony_a, colony_b);
        self.matrix = self.base_matrix;
        self.palettes = [colony_a.palette, colony_b.palette];

        let (w, h) = (self.extent.x, self.extent.y);
        let zones = [
            (SPAWN_MARGIN, w * 0.5 - SPAWN_GAP),
            (w * 0.5 + SPAWN_GAP, w - SPAWN_MARGIN),
        ];
        for (colony, count) in [(Colony::First, count_a), (Colony::Second, count_b)] {
            let (x_min, x_max) = zones[colony.index()];
            for subtype in 0..2 {
                self.particles.spawn_batch(
                    &mut self.rng,
                    colony,
                    subtype,
                    count as usize,
                    Vec2::new(x_min, SPAWN_MARGIN),
                    Vec2::new(x_max, h - SPAWN_MARGIN),
                );
            }
        }

        log::debug!(
            "arena match: {} ({}x2) vs {} ({}x2) in {}",
            colony_a.name,
            count_a,
            colony_b.name,
            count_b,
            self.config.environment_name
        );
        Ok(())
    }

    /// Single colony on a toroidal field, no combat. Uses the current config.
    pub fn init_training(&mut self, colony: &ColonyDna, count_per_type: u32) -> Result<(), SimError> {
        self.check_capacity(2 * count_per_type as usize)?;

        self.reset(Mode::Training);
        self.base_matrix = ForceMatrix::training(colony);
        self.matrix = self.base_matrix;
        self.palettes = [colony.palette, DUMMY_PALETTE];

        for subtype in 0..2 {
            self.particles.spawn_batch(
                &mut self.rng,
                Colony::First,
                subtype,
                count_per_type as usize,
                Vec2::ZERO,
                self.extent,
            );
        }

        log::debug!("training: {} ({}x2)", colony.name, count_per_type);
        Ok(())
    }

    /// Hot-swap physical parameters. Rejected configs leave the old one in place.
    pub fn set_config(&mut self, config: ArenaConfig) -> Result<(), SimError> {
        config.validate()?;
        let cell = cell_size(&config, &self.combat_rules);
        if cell != self.grid.cell_size() {
            self.resize_grid(cell);
        }
        log::debug!(
            "config: {} friction={} force={} radius={}",
            config.environment_name,
            config.friction,
            config.force_multiplier,
            config.interaction_radius
        );
        self.config = config;
        Ok(())
    }

    pub fn set_combat_rules(&mut self, rules: CombatRules) {
        self.combat_rules = rules;
        let cell = cell_size(&self.config, &rules);
        if cell != self.grid.cell_size() {
            self.resize_grid(cell);
        }
    }

    pub fn set_perturbation(&mut self, perturbation: Perturbation) {
        self.perturbation = perturbation;
    }

    fn resize_grid(&mut self, cell: f32) {
        self.grid.resize(cell);
        self.grid_fresh = false;
        let (cols, rows) = self.grid.dims();
        log::debug!("grid: {cols}x{rows} cells for radius {cell}");
    }

    /// Drop a single particle at rest at `pos`, for hand-built scenarios.
    #[cfg(test)]
    fn place(&mut self, owner: Colony, subtype: u8, pos: Vec2) {
        self.particles.push(owner, subtype, pos);
    }

    fn check_capacity(&self, requested: usize) -> Result<(), SimError> {
        let capacity = self.particles.capacity();
        if requested > capacity {
            return Err(SimError::CapacityExceeded {
                requested,
                capacity,
            });
        }
        Ok(())
    }

    fn reset(&mut self, mode: Mode) {
        self.mode = mode;
        self.particles.clear();
        self.grid.clear();
        self.grid_fresh = false;
        self.stances = [Stance::Neutral; 2];
        self.flow_time = 0.0;
        self.steps = 0;
        self.events = FrameEvents::default();
        self.captures.clear();
        self.bursts.clear();
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Advance one tick: grid rebuild, force pass, integration, trails, effects.
    pub fn step(&mut self) {
        self.events = FrameEvents::default();
        self.captures.clear();

        self.timers.begin();
        self.rebuild_grid();
        self.timers.end(StepPhase::Grid);

        self.timers.begin();
        let params = self.force_params();
        self.events.collisions = forces::evaluate(
            &mut self.particles,
            &self.grid,
            &self.matrix,
            params,
            &mut self.global_types,
        );
        self.timers.end(StepPhase::Forces);

        self.timers.begin();
        let boundary = match self.mode {
            Mode::Arena => Boundary::Walls,
            Mode::Training => Boundary::Torus,
        };
        let integrate_params = IntegrateParams {
            friction: self.config.friction,
            extent: self.extent,
            boundary,
            perturbation: self.perturbation,
        };
        integrate::integrate(
            &mut self.particles,
            &integrate_params,
            self.flow_time,
            &mut self.rng,
        );
        self.grid_fresh = false;
        if self.mode == Mode::Arena {
            self.flow_time += self.perturbation.flow_time_step;
        }
        self.timers.end(StepPhase::Integrate);

        self.timers.begin();
        self.particles.update_trails();
        self.timers.end(StepPhase::Trails);

        self.timers.begin();
        self.bursts.update();
        self.timers.end(StepPhase::Effects);

        self.steps += 1;
    }

    /// Capture pass. Arena mode only; returns the number of captures.
    pub fn resolve_combat(&mut self) -> u32 {
        if self.mode != Mode::Arena {
            return 0;
        }
        self.timers.begin();
        if !self.grid_fresh {
            self.rebuild_grid();
        }
        let first_new = self.captures.len();
        let captured = combat::resolve(
            &mut self.particles,
            &self.grid,
            &self.combat_rules,
            &mut self.rng,
            &mut self.captures,
        );
        for i in first_new..self.captures.len() {
            let event = self.captures[i];
            let color = self.palettes[event.to.index()][self.particles.subtype[event.index] as usize];
            self.bursts.spawn_burst(event.position, color, &mut self.rng);
        }
        self.events.captures += captured;
        self.timers.end(StepPhase::Combat);
        captured
    }

    /// Flip one particle to the opposing colony directly.
    pub fn capture(&mut self, index: usize) -> Result<CaptureEvent, SimError> {
        let from = self
            .particles
            .owner(index)
            .ok_or(SimError::ParticleNotFound(index))?;
        let to = from.opponent();
        self.particles.owner[index] = to;
        let event = CaptureEvent {
            index,
            from,
            to,
            position: self.particles.pos[index],
        };
        let color = self.palettes[to.index()][self.particles.subtype[index] as usize];
        self.bursts.spawn_burst(event.position, color, &mut self.rng);
        self.captures.push(event);
        self.events.captures += 1;
        Ok(event)
    }

    fn rebuild_grid(&mut self) {
        let dropped = self.grid.rebuild(self.particles.positions());
        if dropped > 0 {
            log::warn!("{dropped} particles outside the arena skipped by the grid");
        }
        self.grid_fresh = true;
    }

    fn force_params(&self) -> ForceParams {
        ForceParams {
            radius: self.config.interaction_radius,
            multiplier: self.config.force_multiplier,
            wrap: (self.mode == Mode::Training).then_some(self.extent),
        }
    }

    // -----------------------------------------------------------------------
    // Tactics
    // -----------------------------------------------------------------------

    /// Recompute the live matrix from the base with the given stances.
    pub fn set_tactics(&mut self, first: Stance, second: Stance) {
        self.stances = [first, second];
        self.matrix = tactics::apply(&self.base_matrix, self.stances);
    }

    /// Flag form of `set_tactics`. Retreat and aggressive together is an error.
    pub fn set_tactics_flags(
        &mut self,
        p1_retreat: bool,
        p2_retreat: bool,
        p1_aggressive: bool,
        p2_aggressive: bool,
    ) -> Result<(), SimError> {
        let first = Stance::from_flags(p1_retreat, p1_aggressive)?;
        let second = Stance::from_flags(p2_retreat, p2_aggressive)?;
        self.set_tactics(first, second);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn stats(&self) -> Stats {
        stats::compute(&self.particles, self.events)
    }

    pub fn find_nearest(&self, point: Vec2, radius: f32) -> Option<usize> {
        stats::find_nearest(&self.particles, point, radius)
    }

    pub fn inspect(&self, index: usize) -> Result<Inspection, SimError> {
        forces::inspect(&self.particles, &self.matrix, self.force_params(), index)
            .ok_or(SimError::ParticleNotFound(index))
    }

    /// Trail positions, oldest first.
    pub fn trail(&self, index: usize) -> Result<impl Iterator<Item = Vec2> + '_, SimError> {
        self.particles
            .trails
            .get(index)
            .map(|t| t.iter().copied())
            .ok_or(SimError::ParticleNotFound(index))
    }

    /// Packed RGBA for the particle's colony and subtype.
    pub fn color(&self, index: usize) -> Option<u32> {
        let owner = self.particles.owner(index)?;
        let subtype = self.particles.subtype(index)?;
        Some(self.palettes[owner.index()][subtype as usize])
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn combat_rules(&self) -> &CombatRules {
        &self.combat_rules
    }

    pub fn matrix(&self) -> &ForceMatrix {
        &self.matrix
    }

    pub fn base_matrix(&self) -> &ForceMatrix {
        &self.base_matrix
    }

    pub fn stances(&self) -> [Stance; 2] {
        self.stances
    }

    pub fn events(&self) -> FrameEvents {
        self.events
    }

    /// Captures since the start of the current step.
    pub fn capture_events(&self) -> &[CaptureEvent] {
        &self.captures
    }

    pub fn bursts(&self) -> &BurstSystem {
        &self.bursts
    }

    pub fn timings(&self) -> &StepTimers {
        &self.timers
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Grid cells must cover both the force radius and the capture radius.
fn cell_size(config: &ArenaConfig, rules: &CombatRules) -> f32 {
    config.interaction_radius.max(rules.radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchRules, ARENA_HEIGHT, ARENA_WIDTH, MIN_RADIUS};
    use crate::match_state::{Match, MatchStatus, Outcome};

    const EXTENT: Vec2 = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);

    fn engine(seed: u64) -> Engine {
        Engine::with_seed(2500, EXTENT, seed).unwrap()
    }

    fn standard() -> ArenaConfig {
        ArenaConfig::default()
    }

    fn in_bounds(engine: &Engine) -> bool {
        engine
            .particles()
            .positions()
            .iter()
            .all(|p| (0.0..=ARENA_WIDTH).contains(&p.x) && (0.0..=ARENA_HEIGHT).contains(&p.y))
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(
            Engine::new(10, Vec2::new(0.0, 100.0)),
            Err(SimError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn capacity_exceeded_fails_fast() {
        let mut engine = Engine::with_seed(100, EXTENT, 1).unwrap();
        let err = engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                30,
                30,
                standard(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            SimError::CapacityExceeded {
                requested: 120,
                capacity: 100
            }
        );
        assert!(engine.is_empty());
        assert!(engine.init_training(&ColonyDna::cyan_swarm(), 51).is_err());
        assert!(engine.init_training(&ColonyDna::cyan_swarm(), 50).is_ok());
    }

    #[test]
    fn invalid_config_keeps_previous() {
        let mut engine = engine(1);
        let bad = ArenaConfig {
            interaction_radius: MIN_RADIUS,
            ..standard()
        };
        assert!(engine.set_config(bad).is_err());
        assert_eq!(engine.config(), &standard());

        let wide = ArenaConfig {
            interaction_radius: 120.0,
            ..standard()
        };
        engine.set_config(wide).unwrap();
        assert_eq!(engine.config().interaction_radius, 120.0);
    }

    #[test]
    fn wider_radius_reaches_past_default_cells() {
        let mut engine = engine(11);
        engine.set_perturbation(Perturbation::NONE);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                0,
                0,
                standard(),
            )
            .unwrap();
        engine
            .set_config(ArenaConfig {
                interaction_radius: 120.0,
                ..standard()
            })
            .unwrap();
        assert_eq!(engine.grid.dims(), (10, 6));

        // 110 apart: with 80-unit cells these sit in columns 3 and 5
        engine.place(Colony::First, 0, Vec2::new(300.0, 300.0));
        engine.place(Colony::First, 0, Vec2::new(410.0, 300.0));
        engine.step();

        let force = engine.particles().force[0];
        assert!(force.x > 0.0, "pair 110 apart did not interact: {force}");
        assert_eq!(engine.particles().force[1].x, -force.x);
        assert_eq!(engine.inspect(0).unwrap().interactions.len(), 1);
    }

    #[test]
    fn minimum_friction_stays_finite() {
        let mut engine = engine(12);
        let sticky = ArenaConfig {
            friction: crate::config::MIN_FRICTION,
            ..standard()
        };
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                100,
                100,
                sticky,
            )
            .unwrap();
        for _ in 0..20 {
            engine.step();
            engine.resolve_combat();
        }
        assert!(engine
            .particles()
            .positions()
            .iter()
            .all(|p| p.is_finite()));
        assert!(in_bounds(&engine));

        let below = ArenaConfig {
            friction: 1e-42,
            ..standard()
        };
        assert!(matches!(
            engine.set_config(below),
            Err(SimError::InvalidFriction(_))
        ));
    }

    #[test]
    fn arena_spawn_layout() {
        let mut engine = engine(2);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                40,
                60,
                standard(),
            )
            .unwrap();
        assert_eq!(engine.len(), 200);
        assert_eq!(engine.stats().counts, [80, 120]);

        let particles = engine.particles();
        for i in 0..engine.len() {
            let p = particles.position(i).unwrap();
            match particles.owner(i).unwrap() {
                Colony::First => assert!((100.0..550.0).contains(&p.x)),
                Colony::Second => assert!((650.0..1100.0).contains(&p.x)),
            }
            assert!((100.0..700.0).contains(&p.y));
        }
        assert_eq!(engine.color(0), Some(ColonyDna::cyan_swarm().palette[0]));
        assert_eq!(engine.color(199), Some(ColonyDna::crimson_legion().palette[1]));
    }

    #[test]
    fn conservation_and_containment() {
        let mut engine = engine(3);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                100,
                100,
                standard(),
            )
            .unwrap();
        let total = engine.stats().total();
        assert_eq!(total, 400);

        for step in 0..400 {
            engine.step();
            engine.resolve_combat();
            if step % 50 == 0 {
                let stance = if step % 100 == 0 {
                    Stance::Aggressive
                } else {
                    Stance::Retreat
                };
                engine.set_tactics(stance, Stance::Aggressive);
            }
            assert_eq!(engine.stats().total(), total);
            assert!(in_bounds(&engine), "escaped at step {step}");
        }
        assert_eq!(engine.steps(), 400);
    }

    #[test]
    fn neutral_dna_settles_without_captures() {
        let mut engine = engine(4);
        engine.set_perturbation(Perturbation::NONE);
        engine
            .init_arena(
                &ColonyDna::neutral("a"),
                &ColonyDna::neutral("b"),
                75,
                75,
                standard(),
            )
            .unwrap();

        let mut captures = 0;
        for _ in 0..600 {
            engine.step();
            captures += engine.resolve_combat();
        }
        let stats = engine.stats();
        assert_eq!(captures, 0);
        assert_eq!(stats.counts, [150, 150]);
        assert!(stats.mean_speed < 0.01, "still moving: {}", stats.mean_speed);
    }

    #[test]
    fn stalemate_config_ends_in_draw() {
        let mut engine = engine(5);
        engine
            .init_arena(
                &ColonyDna::neutral("a"),
                &ColonyDna::neutral("b"),
                75,
                75,
                standard(),
            )
            .unwrap();
        for _ in 0..1000 {
            engine.step();
            engine.resolve_combat();
        }
        let stats = engine.stats();
        assert_eq!(stats.counts, [150, 150]);

        let rules = MatchRules::default();
        let mut game = Match::new(rules);
        game.tick(rules.countdown_secs as f32);
        assert_eq!(game.status(), MatchStatus::Active);
        game.observe(&stats);
        game.tick(rules.duration_secs);
        assert_eq!(game.status(), MatchStatus::Finished(Outcome::Draw));
    }

    #[test]
    fn wipeout_is_an_immediate_win() {
        let mut engine = engine(6);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                10,
                75,
                standard(),
            )
            .unwrap();
        for i in 0..engine.len() {
            if engine.particles().owner(i) == Some(Colony::First) {
                engine.capture(i).unwrap();
            }
        }
        let stats = engine.stats();
        assert_eq!(stats.counts, [0, 170]);
        assert_eq!(engine.capture_events().len(), 20);

        let mut game = Match::new(MatchRules::default());
        game.tick(3.0);
        game.observe(&stats);
        assert_eq!(game.status(), MatchStatus::Finished(Outcome::Second));

        // An empty colony from the start is the same thing
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                0,
                75,
                standard(),
            )
            .unwrap();
        assert_eq!(engine.stats().counts, [0, 150]);
    }

    #[test]
    fn training_wraps_and_skips_combat() {
        let mut engine = engine(7);
        engine.init_training(&ColonyDna::cyan_swarm(), 100).unwrap();
        assert_eq!(engine.mode(), Mode::Training);
        assert_eq!(engine.stats().counts, [200, 0]);

        for _ in 0..200 {
            engine.step();
            assert_eq!(engine.resolve_combat(), 0);
            for p in engine.particles().positions() {
                assert!(p.x >= 0.0 && p.x <= ARENA_WIDTH && p.y >= 0.0 && p.y <= ARENA_HEIGHT);
            }
        }
        assert_eq!(engine.stats().counts, [200, 0]);
    }

    #[test]
    fn tactics_leave_base_untouched() {
        let mut engine = engine(8);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                5,
                5,
                standard(),
            )
            .unwrap();
        let base = *engine.base_matrix();
        engine.set_tactics_flags(true, false, false, true).unwrap();
        assert_eq!(engine.stances(), [Stance::Retreat, Stance::Aggressive]);
        assert_ne!(engine.matrix(), &base);
        assert_eq!(engine.base_matrix(), &base);

        assert_eq!(
            engine.set_tactics_flags(true, false, true, false),
            Err(SimError::ConflictingStance)
        );
        engine.set_tactics(Stance::Neutral, Stance::Neutral);
        assert_eq!(engine.matrix(), &base);
    }

    #[test]
    fn inspection_and_picking() {
        let mut engine = engine(9);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                50,
                50,
                standard(),
            )
            .unwrap();
        engine.step();

        assert_eq!(engine.inspect(200), Err(SimError::ParticleNotFound(200)));
        assert!(engine.trail(999).is_err());
        assert_eq!(engine.color(200), None);

        let info = engine.inspect(0).unwrap();
        let pos = engine.particles().position(0).unwrap();
        assert_eq!(info.position, pos);
        assert_eq!(engine.trail(0).unwrap().last(), Some(pos));
        assert_eq!(engine.trail(0).unwrap().count(), 10);

        assert_eq!(engine.find_nearest(pos, 0.5), Some(0));
        assert_eq!(engine.find_nearest(Vec2::new(600.0, 10.0), 5.0), None);
    }

    #[test]
    fn seeded_runs_replay() {
        let run = || {
            let mut engine = engine(42);
            engine
                .init_arena(
                    &ColonyDna::cyan_swarm(),
                    &ColonyDna::crimson_legion(),
                    40,
                    40,
                    standard(),
                )
                .unwrap();
            for _ in 0..100 {
                engine.step();
                engine.resolve_combat();
            }
            engine.particles().positions().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn captures_spawn_bursts() {
        let mut engine = engine(10);
        engine
            .init_arena(
                &ColonyDna::cyan_swarm(),
                &ColonyDna::crimson_legion(),
                1,
                1,
                standard(),
            )
            .unwrap();
        assert_eq!(engine.bursts().count(), 0);

        let event = engine.capture(0).unwrap();
        assert_eq!(event.from, Colony::First);
        assert_eq!(event.to, Colony::Second);
        assert_eq!(engine.bursts().count(), 8);
        assert_eq!(engine.events().captures, 1);
        assert_eq!(engine.capture(10), Err(SimError::ParticleNotFound(10)));

        // Events are scoped to one step
        engine.step();
        assert!(engine.capture_events().is_empty());
        assert_eq!(engine.events().captures, 0);
    }
}
