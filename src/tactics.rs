use crate::colony::Colony;
use crate::error::SimError;
use crate::matrix::ForceMatrix;

/// Base coefficients above this are replaced when retreating.
const RETREAT_CUTOFF: f32 = -0.2;
/// Coefficient forced in when retreating. Strong flee.
const RETREAT_FORCE: f32 = -0.9;
/// Positive coefficients are scaled by this when aggressive.
const AGGRESSION_SCALE: f32 = 1.5;
const AGGRESSION_CAP: f32 = 1.0;
/// Non-positive coefficients become this when aggressive (passive subtypes chase).
const AGGRESSION_FLOOR: f32 = 0.5;

/// A colony's temporary posture toward the enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    #[default]
    Neutral,
    Aggressive,
    Retreat,
}

impl Stance {
    /// Build from the two independent flags a UI or AI driver tends to carry.
    pub fn from_flags(retreat: bool, aggressive: bool) -> Result<Self, SimError> {
        match (retreat, aggressive) {
            (true, true) => Err(SimError::ConflictingStance),
            (true, false) => Ok(Stance::Retreat),
            (false, true) => Ok(Stance::Aggressive),
            (false, false) => Ok(Stance::Neutral),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stance::Neutral => "neutral",
            Stance::Aggressive => "berserk",
            Stance::Retreat => "regrouping",
        }
    }

    fn modulate(self, base: f32) -> f32 {
        match self {
            Stance::Neutral => base,
            Stance::Retreat => {
                if base > RETREAT_CUTOFF {
                    RETREAT_FORCE
                } else {
                    base
                }
            }
            Stance::Aggressive => {
                if base > 0.0 {
                    (base * AGGRESSION_SCALE).min(AGGRESSION_CAP)
                } else {
                    AGGRESSION_FLOOR
                }
            }
        }
    }
}

/// Derive the live matrix from the immutable base. Only each colony's
/// outward-facing (external) block changes; the base is never written.
pub fn apply(base: &ForceMatrix, stances: [Stance; 2]) -> ForceMatrix {
    let mut live = *base;
    for colony in Colony::BOTH {
        let stance = stances[colony.index()];
        if stance == Stance::Neutral {
            continue;
        }
        live.block_mut(colony, colony.opponent(), |v| *v = stance.modulate(*v));
    }
    live
}

// ---------------------------------------------------------------------------
// Adaptive planner
// ---------------------------------------------------------------------------

/// Seconds between planner decisions.
pub const DECISION_INTERVAL_SECS: f32 = 0.5;
/// Ahead by this ratio: press the advantage.
const WINNING_RATIO: f32 = 1.25;
/// Behind by this ratio: alternate regrouping and counter-attacks.
const LOSING_RATIO: f32 = 0.75;

/// Inputs the planner needs for one decision.
#[derive(Debug, Clone, Copy)]
pub struct PlannerInput {
    pub counts: [u32; 2],
    /// Stagnation counter above the planner's "stuck" level.
    pub stuck: bool,
    /// Stagnation detector has flagged the match.
    pub stagnated: bool,
}

/// AI driver that picks stances for both colonies from live counts.
///
/// Oscillating stances use a phase counter advanced by the step clock, so a
/// seeded run replays identically.
pub struct TacticsPlanner {
    steps_per_sec: f32,
    step: u64,
    current: [Stance; 2],
}

impl TacticsPlanner {
    pub fn new(steps_per_sec: f32) -> Self {
        Self {
            steps_per_sec,
            step: 0,
            current: [Stance::Neutral; 2],
        }
    }

    /// Advance the phase clock by one simulation step.
    pub fn tick(&mut self) {
        self.step += 1;
    }

    pub fn current(&self) -> [Stance; 2] {
        self.current
    }

    /// Milliseconds into a repeating cycle of `period_ms`.
    fn phase_ms(&self, period_ms: u64) -> u64 {
        let elapsed_ms = (self.step as f64 * 1000.0 / self.steps_per_sec as f64) as u64;
        elapsed_ms % period_ms
    }

    fn decide_one(&self, mine: u32, enemy: u32, input: &PlannerInput) -> Stance {
        if input.stagnated {
            return Stance::Aggressive;
        }
        if input.stuck {
            return if self.phase_ms(5000) < 2000 {
                Stance::Retreat
            } else {
                Stance::Aggressive
            };
        }

        let ratio = mine as f32 / (enemy as f32 + 1.0);
        if ratio > WINNING_RATIO {
            Stance::Aggressive
        } else if ratio < LOSING_RATIO {
            if self.phase_ms(4000) < 2000 {
                Stance::Retreat
            } else {
                Stance::Aggressive
            }
        } else if self.phase_ms(3000) > 2000 {
            Stance::Aggressive
        } else {
            Stance::Neutral
        }
    }

    /// Pick stances for both colonies. Returns them and remembers them as current.
    pub fn decide(&mut self, input: PlannerInput) -> [Stance; 2] {
        let [p1, p2] = input.counts;
        let next = [
            self.decide_one(p1, p2, &input),
            self.decide_one(p2, p1, &input),
        ];
        if next != self.current {
            log::debug!(
                "tactics: p1 {} / p2 {} (counts {p1}/{p2})",
                next[0].label(),
                next[1].label()
            );
        }
        self.current = next;
        next
    }
}
