use instant::Instant;

use particle_arena::config::{
    Environment, MatchRules, StagnationRules, ARENA_HEIGHT, ARENA_WIDTH, DEFAULT_CAPACITY,
};
use particle_arena::dna::ColonyDna;
use particle_arena::engine::Engine;
use particle_arena::glam::Vec2;
use particle_arena::match_state::{Match, MatchStatus, StagnationDetector};
use particle_arena::tactics::{PlannerInput, TacticsPlanner, DECISION_INTERVAL_SECS};

/// Target simulation tick rate (seconds per tick).
const TICK_RATE: f32 = 1.0 / 60.0;
/// Simulated ticks between status reports and stagnation samples.
const TICKS_PER_SECOND: u64 = 60;
/// How often to log throughput (wall seconds).
const THROUGHPUT_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Step timing
// ---------------------------------------------------------------------------

struct StepStats {
    step_count: u64,
    last_log_time: Instant,
    step_time_sum: f64,
    step_time_min: f64,
    step_time_max: f64,
    steps_since_log: u32,
}

impl StepStats {
    fn new() -> Self {
        Self {
            step_count: 0,
            last_log_time: Instant::now(),
            step_time_sum: 0.0,
            step_time_min: f64::MAX,
            step_time_max: 0.0,
            steps_since_log: 0,
        }
    }

    fn record_step(&mut self, dt: f64) {
        self.step_count += 1;
        self.steps_since_log += 1;
        self.step_time_sum += dt;
        self.step_time_min = self.step_time_min.min(dt);
        self.step_time_max = self.step_time_max.max(dt);

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= THROUGHPUT_LOG_INTERVAL {
            let avg_ms = (self.step_time_sum / self.steps_since_log as f64) * 1000.0;
            let rate = self.steps_since_log as f64 / elapsed;
            log::info!(
                "steps/s: {:.0} | avg: {:.3}ms | min: {:.3}ms | max: {:.3}ms | total steps: {}",
                rate,
                avg_ms,
                self.step_time_min * 1000.0,
                self.step_time_max * 1000.0,
                self.step_count,
            );
            self.last_log_time = Instant::now();
            self.step_time_sum = 0.0;
            self.step_time_min = f64::MAX;
            self.step_time_max = 0.0;
            self.steps_since_log = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Match driver
// ---------------------------------------------------------------------------

struct App {
    engine: Engine,
    game: Match,
    stagnation: StagnationDetector,
    planner: TacticsPlanner,
    step_stats: StepStats,
    tick_count: u64,
}

impl App {
    fn new(environment: Environment, seed: Option<u64>) -> Result<Self, Box<dyn std::error::Error>> {
        let extent = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);
        let mut engine = match seed {
            Some(seed) => Engine::with_seed(DEFAULT_CAPACITY, extent, seed)?,
            None => Engine::new(DEFAULT_CAPACITY, extent)?,
        };

        let config = environment.config();
        let count = config.particle_count;
        let mut rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(1)),
            None => fastrand::Rng::new(),
        };
        let index = rng.usize(..64);
        let challenger = ColonyDna::random(&mut rng, index);
        let champion = ColonyDna::cyan_swarm();

        log::info!(
            "{} vs {} in {} ({} per subtype)",
            champion.name,
            challenger.name,
            environment.label(),
            count
        );
        engine.init_arena(&champion, &challenger, count, count, config)?;

        Ok(Self {
            engine,
            game: Match::new(MatchRules::default()),
            stagnation: StagnationDetector::new(StagnationRules::default()),
            planner: TacticsPlanner::new(1.0 / TICK_RATE),
            step_stats: StepStats::new(),
            tick_count: 0,
        })
    }

    /// One fixed-rate tick: match clock, simulation, tactics, verdict.
    fn tick(&mut self) {
        self.game.tick(TICK_RATE);
        if !self.game.is_active() {
            return;
        }

        let start = Instant::now();
        self.engine.step();
        self.engine.resolve_combat();
        self.step_stats.record_step(start.elapsed().as_secs_f64());

        self.tick_count += 1;
        self.planner.tick();

        let stats = self.engine.stats();
        let decision_ticks = (DECISION_INTERVAL_SECS / TICK_RATE).round() as u64;
        if self.tick_count % decision_ticks == 0 {
            let [p1, p2] = self.planner.decide(PlannerInput {
                counts: stats.counts,
                stuck: self.stagnation.is_stuck(),
                stagnated: self.stagnation.is_stagnated(),
            });
            self.engine.set_tactics(p1, p2);
        }

        if self.tick_count % TICKS_PER_SECOND == 0 {
            self.stagnation.observe(&stats, self.game.elapsed());
            log::info!(
                "t={:>2.0}s  p1={:<4} p2={:<4} sep={:>6.1} speed={:.2}{}",
                self.game.elapsed(),
                stats.count_a(),
                stats.count_b(),
                stats.centroid_separation,
                stats.mean_speed,
                if self.stagnation.is_stagnated() { "  [stagnant]" } else { "" },
            );
        }

        self.game.observe(&stats);
    }

    fn run_to_completion(&mut self) {
        while !self.game.is_finished() {
            self.tick();
        }
    }
}

/// Run one headless match. Args: `[environment] [seed]`.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let environment = match args.next() {
        Some(name) => Environment::from_name(&name)
            .ok_or_else(|| format!("unknown environment '{name}' (soup, vacuum, pits, standard)"))?,
        None => Environment::StandardArena,
    };
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?;

    let mut app = App::new(environment, seed)?;
    app.run_to_completion();

    let stats = app.engine.stats();
    if let MatchStatus::Finished(outcome) = app.game.status() {
        log::info!(
            "{} after {:.1}s: {} vs {}",
            outcome.label(),
            app.game.elapsed(),
            stats.count_a(),
            stats.count_b()
        );
    }

    let timings = app.engine.timings();
    for phase in particle_arena::timer::StepPhase::ALL {
        log::debug!("{:<10} {:>8.1}us", phase.label(), timings.get(phase));
    }
    log::debug!("{:<10} {:>8.1}us", "Total", timings.total_us());
    Ok(())
}
