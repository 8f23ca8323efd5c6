//! Particle-life colony battles.
//!
//! Two colonies of typed particles attract and repel each other according to
//! their DNA, and convert outnumbered enemies on contact. [`engine::Engine`]
//! runs the simulation; [`match_state::Match`] turns its stats into a verdict.

pub mod colony;
pub mod combat;
pub mod config;
pub mod dna;
pub mod effects;
pub mod engine;
pub mod error;
pub mod forces;
pub mod integrate;
pub mod match_state;
pub mod matrix;
pub mod particles;
pub mod spatial;
pub mod stats;
pub mod tactics;
pub mod timer;
pub mod util;

pub use glam;

pub use colony::Colony;
pub use config::{ArenaConfig, CombatRules, Environment, MatchRules, Perturbation, StagnationRules};
pub use dna::ColonyDna;
pub use engine::{Engine, Mode};
pub use error::SimError;
pub use match_state::{Match, MatchStatus, Outcome, StagnationDetector};
pub use stats::{FrameEvents, Stats};
pub use tactics::Stance;
