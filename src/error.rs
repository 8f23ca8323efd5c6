/// Everything the engine can refuse to do.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("friction must be in [0.001, 1], got {0}")]
    InvalidFriction(f32),
    #[error("interaction radius {radius} must exceed the minimum separation {min}")]
    InvalidRadius { radius: f32, min: f32 },
    #[error("force multiplier must be finite, got {0}")]
    InvalidForceMultiplier(f32),
    #[error("arena bounds {width}x{height} must be positive and finite")]
    InvalidBounds { width: f32, height: f32 },
    #[error("requested {requested} particles but capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
    #[error("no particle at index {0}")]
    ParticleNotFound(usize),
    #[error("a colony cannot retreat and attack at the same time")]
    ConflictingStance,
}
