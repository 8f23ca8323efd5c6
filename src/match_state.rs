use std::collections::VecDeque;

use crate::config::{MatchRules, StagnationRules};
use crate::stats::Stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    First,
    Second,
    Draw,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::First => "P1 wins",
            Self::Second => "P2 wins",
            Self::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Countdown { remaining: u32 },
    Active,
    Finished(Outcome),
}

/// Countdown, active play and a terminal verdict for one match.
///
/// Driven by two inputs: `tick(dt)` for match time and `observe(stats)` after
/// each engine step. Finished is terminal; start a new `Match` for a rematch.
#[derive(Debug, Clone)]
pub struct Match {
    rules: MatchRules,
    status: MatchStatus,
    /// Sub-second remainder of the countdown.
    countdown_accum: f32,
    time_left: f32,
    last_counts: [u32; 2],
}

impl Match {
    pub fn new(rules: MatchRules) -> Self {
        let status = if rules.countdown_secs == 0 {
            MatchStatus::Active
        } else {
            MatchStatus::Countdown {
                remaining: rules.countdown_secs,
            }
        };
        Self {
            rules,
            status,
            countdown_accum: 0.0,
            time_left: rules.duration_secs,
            last_counts: [0, 0],
        }
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            MatchStatus::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Finished(_))
    }

    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    /// Seconds of active play so far.
    pub fn elapsed(&self) -> f32 {
        self.rules.duration_secs - self.time_left
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Advance match time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        match self.status {
            MatchStatus::Countdown { mut remaining } => {
                self.countdown_accum += dt;
                while self.countdown_accum >= 1.0 && remaining > 0 {
                    self.countdown_accum -= 1.0;
                    remaining -= 1;
                }
                self.status = if remaining == 0 {
                    log::debug!("match started");
                    MatchStatus::Active
                } else {
                    MatchStatus::Countdown { remaining }
                };
            }
            MatchStatus::Active => {
                self.time_left = (self.time_left - dt).max(0.0);
                if self.time_left <= 0.0 {
                    let outcome = self.timeout_verdict();
                    self.finish(outcome, "time");
                }
            }
            MatchStatus::Finished(_) => {}
        }
    }

    /// Check win conditions against the latest counts. Ignored unless active.
    pub fn observe(&mut self, stats: &Stats) {
        if self.status != MatchStatus::Active {
            return;
        }
        self.last_counts = stats.counts;
        let [p1, p2] = stats.counts;

        if p1 == 0 && p2 > 0 {
            self.finish(Outcome::Second, "wipeout");
            return;
        }
        if p2 == 0 && p1 > 0 {
            self.finish(Outcome::First, "wipeout");
            return;
        }

        let total = p1 + p2;
        if self.elapsed() > self.rules.grace_period_secs && total > self.rules.min_population {
            let ratio = self.rules.dominance_ratio;
            if p1 as f32 > p2 as f32 * ratio {
                self.finish(Outcome::First, "dominance");
            } else if p2 as f32 > p1 as f32 * ratio {
                self.finish(Outcome::Second, "dominance");
            }
        }
    }

    fn timeout_verdict(&self) -> Outcome {
        let [p1, p2] = self.last_counts;
        if let Some(margin) = self.rules.stalemate_margin {
            let gap = p1.abs_diff(p2) as f32;
            if gap <= margin * (p1 + p2) as f32 {
                return Outcome::Draw;
            }
        }
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => Outcome::First,
            std::cmp::Ordering::Less => Outcome::Second,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    fn finish(&mut self, outcome: Outcome, reason: &str) {
        log::debug!(
            "match over by {reason}: {} ({}/{}, {:.1}s)",
            outcome.label(),
            self.last_counts[0],
            self.last_counts[1],
            self.elapsed()
        );
        self.status = MatchStatus::Finished(outcome);
    }
}

// ---------------------------------------------------------------------------
// Stagnation
// ---------------------------------------------------------------------------

/// Flags matches where the colonies have stopped engaging.
///
/// Purely diagnostic: it feeds the tactics planner, never the verdict.
#[derive(Debug, Clone)]
pub struct StagnationDetector {
    rules: StagnationRules,
    history: VecDeque<f32>,
    counter: f32,
    stagnated: bool,
    last_count: Option<u32>,
}

impl StagnationDetector {
    pub fn new(rules: StagnationRules) -> Self {
        Self {
            rules,
            history: VecDeque::with_capacity(rules.window + 1),
            counter: 0.0,
            stagnated: false,
            last_count: None,
        }
    }

    pub fn is_stagnated(&self) -> bool {
        self.stagnated
    }

    pub fn counter(&self) -> f32 {
        self.counter
    }

    /// Counter is high enough that the planner should start cycling stances.
    pub fn is_stuck(&self) -> bool {
        self.counter > self.rules.stuck_above
    }

    /// Feed one stats sample taken `elapsed_secs` into active play.
    pub fn observe(&mut self, stats: &Stats, elapsed_secs: f32) {
        let count = stats.counts[0];
        let population_changed = self
            .last_count
            .is_some_and(|last| count.abs_diff(last) > self.rules.population_tolerance);
        self.last_count = Some(count);

        if elapsed_secs <= self.rules.warmup_secs {
            return;
        }

        if population_changed {
            self.counter = (self.counter - 1.0).max(0.0);
        } else {
            self.history.push_back(stats.centroid_separation);
            if self.history.len() > self.rules.window {
                self.history.pop_front();
            }

            let variance = self.variance();
            if variance < self.rules.variance_threshold
                && stats.centroid_separation > self.rules.min_separation
            {
                self.counter += 0.5;
            } else if stats.mean_speed < self.rules.slow_speed {
                self.counter += 0.2;
            } else {
                self.counter = (self.counter - 0.1).max(0.0);
            }
        }

        let was = self.stagnated;
        if self.counter > self.rules.flag_above {
            self.stagnated = true;
        } else if self.counter < self.rules.clear_below {
            self.stagnated = false;
        }
        if self.stagnated != was {
            let state = if self.stagnated { "flagged" } else { "cleared" };
            log::debug!("stagnation {state} (counter {:.1})", self.counter);
        }
    }

    /// Population variance of the separation window; 0 until enough samples.
    fn variance(&self) -> f32 {
        let n = self.history.len();
        if n <= self.rules.min_samples {
            return 0.0;
        }
        let mean = self.history.iter().sum::<f32>() / n as f32;
        self.history.iter().map(|d| (d - mean) * (d - mean)).sum::<f32>() / n as f32
    }
}
