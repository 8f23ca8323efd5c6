use crate::error::SimError;

/// Default arena width in world units (pixels).
pub const ARENA_WIDTH: f32 = 1200.0;
/// Default arena height in world units (pixels).
pub const ARENA_HEIGHT: f32 = 800.0;

/// Hard minimum separation. Closer than this, particles repel regardless of DNA.
pub const MIN_RADIUS: f32 = 10.0;

/// Lowest accepted friction. Jitter scales with `1 / friction`, so smaller
/// values blow velocities up to infinity within a step or two.
pub const MIN_FRICTION: f32 = 1e-3;

/// Safe pre-allocation for the particle arrays.
pub const DEFAULT_CAPACITY: usize = 2500;

/// Physical parameters of one arena. Read-only during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Velocity retained per step, in (0, 1].
    pub friction: f32,
    pub force_multiplier: f32,
    pub interaction_radius: f32,
    /// Particles per subtype per colony.
    pub particle_count: u32,
    pub environment_name: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            friction: 0.80,
            force_multiplier: 1.0,
            interaction_radius: 80.0,
            particle_count: 300,
            environment_name: "Standard Vacuum".to_string(),
        }
    }
}

impl ArenaConfig {
    /// Reject parameters that would divide by zero or feed NaN into the integrator.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(MIN_FRICTION..=1.0).contains(&self.friction) {
            return Err(SimError::InvalidFriction(self.friction));
        }
        if !self.force_multiplier.is_finite() {
            return Err(SimError::InvalidForceMultiplier(self.force_multiplier));
        }
        if !self.interaction_radius.is_finite() || self.interaction_radius <= MIN_RADIUS {
            return Err(SimError::InvalidRadius {
                radius: self.interaction_radius,
                min: MIN_RADIUS,
            });
        }
        Ok(())
    }
}

/// Named arena presets, rotated between matches of an evolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    HighViscositySoup,
    ZeroGVacuum,
    DenseSwarmPits,
    StandardArena,
}

const ALL_ENVIRONMENTS: [Environment; 4] = [
    Environment::HighViscositySoup,
    Environment::ZeroGVacuum,
    Environment::DenseSwarmPits,
    Environment::StandardArena,
];

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Environment::HighViscositySoup => "High Viscosity Soup",
            Environment::ZeroGVacuum => "Zero-G Vacuum",
            Environment::DenseSwarmPits => "Dense Swarm Pits",
            Environment::StandardArena => "Standard Arena",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Environment::HighViscositySoup => Environment::ZeroGVacuum,
            Environment::ZeroGVacuum => Environment::DenseSwarmPits,
            Environment::DenseSwarmPits => Environment::StandardArena,
            Environment::StandardArena => Environment::HighViscositySoup,
        }
    }

    pub fn all() -> &'static [Environment] {
        &ALL_ENVIRONMENTS
    }

    /// Uniform roll over the presets.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        ALL_ENVIRONMENTS[rng.usize(0..ALL_ENVIRONMENTS.len())]
    }

    /// Parse a short CLI name such as `soup` or `vacuum`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "soup" | "viscous" => Some(Environment::HighViscositySoup),
            "vacuum" | "zero-g" => Some(Environment::ZeroGVacuum),
            "pits" | "dense" => Some(Environment::DenseSwarmPits),
            "standard" => Some(Environment::StandardArena),
            _ => None,
        }
    }

    pub fn config(self) -> ArenaConfig {
        let (friction, force_multiplier, interaction_radius, particle_count) = match self {
            // Very high drag, stronger forces to compensate, short range
            Environment::HighViscositySoup => (0.60, 1.5, 60.0, 200),
            // Slippery, weak, long range
            Environment::ZeroGVacuum => (0.95, 0.8, 100.0, 120),
            Environment::DenseSwarmPits => (0.80, 1.0, 80.0, 250),
            Environment::StandardArena => (0.80, 1.0, 80.0, 150),
        };
        ArenaConfig {
            friction,
            force_multiplier,
            interaction_radius,
            particle_count,
            environment_name: self.label().to_string(),
        }
    }
}

/// Capture rule parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRules {
    /// Per-step probability that a particle re-evaluates its allegiance.
    pub sample_rate: f32,
    /// Pressure is counted within this distance.
    pub radius: f32,
    /// Enemy subtype-0 ("soldier") weight.
    pub soldier_weight: f32,
    /// Enemy subtype-1 weight.
    pub enemy_weight: f32,
    pub support_weight: f32,
    /// Hysteresis: enemy pressure must exceed support by more than this.
    pub margin: f32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            sample_rate: 0.05,
            radius: 20.0,
            soldier_weight: 1.5,
            enemy_weight: 1.0,
            support_weight: 1.0,
            margin: 2.0,
        }
    }
}

/// Win-condition thresholds for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRules {
    pub countdown_secs: u32,
    pub duration_secs: f32,
    /// Dominance is not checked before this much active time has passed.
    pub grace_period_secs: f32,
    /// Dominance is not checked when fewer particles than this remain in total.
    pub min_population: u32,
    pub dominance_ratio: f32,
    /// On timeout, a count gap within this fraction of the total is a draw.
    /// `None` disables the rule; strictly higher count always wins then.
    pub stalemate_margin: Option<f32>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            duration_secs: 90.0,
            grace_period_secs: 15.0,
            min_population: 50,
            dominance_ratio: 4.0,
            stalemate_margin: Some(0.0),
        }
    }
}

/// Stagnation detector tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagnationRules {
    /// Nothing is tracked during the first seconds of the match.
    pub warmup_secs: f32,
    /// Centroid separation samples kept.
    pub window: usize,
    /// Variance is only trusted with more samples than this.
    pub min_samples: usize,
    pub variance_threshold: f32,
    /// Colonies further apart than this with a flat separation are "not engaging".
    pub min_separation: f32,
    pub slow_speed: f32,
    /// Colony-1 count changes above this reset the trend.
    pub population_tolerance: u32,
    pub flag_above: f32,
    pub clear_below: f32,
    /// Counter level at which the tactics planner starts cycling stances.
    pub stuck_above: f32,
}

impl Default for StagnationRules {
    fn default() -> Self {
        Self {
            warmup_secs: 10.0,
            window: 20,
            min_samples: 5,
            variance_threshold: 50.0,
            min_separation: 100.0,
            slow_speed: 0.3,
            population_tolerance: 1,
            flag_above: 10.0,
            clear_below: 3.0,
            stuck_above: 6.0,
        }
    }
}

/// Anti-stagnation noise applied in arena mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Peak per-step velocity jitter at the reference friction.
    pub jitter: f32,
    pub flow: f32,
    /// Spatial frequency of the flow field.
    pub flow_scale: f32,
    pub flow_time_step: f32,
}

impl Perturbation {
    pub const NONE: Perturbation = Perturbation {
        jitter: 0.0,
        flow: 0.0,
        flow_scale: 0.0,
        flow_time_step: 0.0,
    };
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            jitter: 0.3,
            flow: 0.02,
            flow_scale: 0.01,
            flow_time_step: 0.01,
        }
    }
}
