use crate::colony::{Colony, GLOBAL_TYPES, SUBTYPES};
use crate::dna::{ColonyDna, Matrix2};

/// 4x4 force coefficients over global types, `get(actor, target)`.
///
/// Rows 0-1 belong to colony 1, rows 2-3 to colony 2. Not symmetric in
/// general: A chasing B while B flees A is the whole point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceMatrix {
    values: [f32; GLOBAL_TYPES * GLOBAL_TYPES],
}

impl ForceMatrix {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Interleave two colonies' DNA. Each colony's internal block lands on
    /// its own columns, its external block on the enemy's columns.
    pub fn arena(first: &ColonyDna, second: &ColonyDna) -> Self {
        let mut m = Self::zero();
        m.fill_block(Colony::First, Colony::First, &first.internal);
        m.fill_block(Colony::First, Colony::Second, &first.external);
        m.fill_block(Colony::Second, Colony::First, &second.external);
        m.fill_block(Colony::Second, Colony::Second, &second.internal);
        m
    }

    /// Single colony: only the top-left block is populated.
    pub fn training(colony: &ColonyDna) -> Self {
        let mut m = Self::zero();
        m.fill_block(Colony::First, Colony::First, &colony.internal);
        m
    }

    #[inline]
    pub fn get(&self, actor: usize, target: usize) -> f32 {
        self.values[actor * GLOBAL_TYPES + target]
    }

    #[inline]
    pub fn set(&mut self, actor: usize, target: usize, value: f32) {
        self.values[actor * GLOBAL_TYPES + target] = value;
    }

    /// Visit every entry `actor` colony applies toward `target` colony.
    pub fn block_mut(&mut self, actor: Colony, target: Colony, mut f: impl FnMut(&mut f32)) {
        for a in 0..SUBTYPES {
            for b in 0..SUBTYPES {
                let row = actor.index() * SUBTYPES + a;
                let col = target.index() * SUBTYPES + b;
                f(&mut self.values[row * GLOBAL_TYPES + col]);
            }
        }
    }

    fn fill_block(&mut self, actor: Colony, target: Colony, block: &Matrix2) {
        for (a, row) in block.iter().enumerate() {
            for (b, &value) in row.iter().enumerate() {
                self.set(
                    actor.index() * SUBTYPES + a,
                    target.index() * SUBTYPES + b,
                    value,
                );
            }
        }
    }
}
