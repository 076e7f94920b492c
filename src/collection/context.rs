use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::guard::duplicate::DuplicateGuard;

/// Mutable state of a run: the random source and the duplicate guard.
///
/// Passed explicitly to whoever needs it; there is no process-wide generator.
#[derive(Debug)]
pub struct GenerationContext {
    rng: StdRng,
    guard: DuplicateGuard,
}

impl GenerationContext {
    /// Context seeded with `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>, guard: DuplicateGuard) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng, guard }
    }

    /// Random source.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Duplicate guard.
    pub fn guard(&self) -> &DuplicateGuard {
        &self.guard
    }

    /// Duplicate guard, mutably.
    pub fn guard_mut(&mut self) -> &mut DuplicateGuard {
        &mut self.guard
    }

    /// Both halves at once, for callers that draw and check in one step.
    pub fn split(&mut self) -> (&mut StdRng, &mut DuplicateGuard) {
        (&mut self.rng, &mut self.guard)
    }
}
