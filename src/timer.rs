use instant::Instant;

/// Which phase of a simulation step is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StepPhase {
    Grid = 0,
    Forces = 1,
    Integrate = 2,
    Trails = 3,
    Combat = 4,
    Effects = 5,
}

const PHASE_COUNT: usize = 6;

impl StepPhase {
    pub const ALL: [StepPhase; PHASE_COUNT] = [
        Self::Grid,
        Self::Forces,
        Self::Integrate,
        Self::Trails,
        Self::Combat,
        Self::Effects,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Grid => "Grid",
            Self::Forces => "Forces",
            Self::Integrate => "Integrate",
            Self::Trails => "Trails",
            Self::Combat => "Combat",
            Self::Effects => "Effects",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct StepTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; PHASE_COUNT],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl Default for StepTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; PHASE_COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: StepPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: StepPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }
}
