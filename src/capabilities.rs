//==================================================
// File: capabilities.rs
//==================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Platform capabilities required by optional builtins
// Objective: Select randomness and formatting support at build or startup time
//==================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer source backing `randomNumber`.
pub trait UniformSource: Send {
    /// Uniform integer in `low..=high`. Callers guarantee `low <= high`.
    fn uniform_inclusive(&mut self, low: i64, high: i64) -> i64;
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl UniformSource for ThreadRngSource {
    fn uniform_inclusive(&mut self, low: i64, high: i64) -> i64 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Deterministic generator for reproducible hosts and tests.
#[derive(Debug, Clone)]
pub struct SeededSource(StdRng);

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl UniformSource for SeededSource {
    fn uniform_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.0.gen_range(low..=high)
    }
}

pub type SharedSource = Arc<Mutex<dyn UniformSource>>;

#[derive(Clone)]
pub enum RandomCapability {
    Available(SharedSource),
    Unavailable,
}

impl RandomCapability {
    pub fn thread_rng() -> Self {
        RandomCapability::Available(Arc::new(Mutex::new(ThreadRngSource)))
    }

    pub fn seeded(seed: u64) -> Self {
        RandomCapability::Available(Arc::new(Mutex::new(SeededSource::new(seed))))
    }

    pub fn from_source<S: UniformSource + 'static>(source: S) -> Self {
        RandomCapability::Available(Arc::new(Mutex::new(source)))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RandomCapability::Available(_))
    }
}

impl fmt::Debug for RandomCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandomCapability::Available(_) => f.write_str("Available"),
            RandomCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Variadic template formatting used by `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCapability {
    Available,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct Capabilities {
    pub random: RandomCapability,
    pub format: FormatCapability,
}

impl Capabilities {
    /// Everything this build was compiled with.
    pub fn native() -> Self {
        let random = if cfg!(feature = "random") {
            RandomCapability::thread_rng()
        } else {
            RandomCapability::Unavailable
        };
        let format = if cfg!(feature = "format") {
            FormatCapability::Available
        } else {
            FormatCapability::Unavailable
        };
        Self { random, format }
    }

    pub fn none() -> Self {
        Self {
            random: RandomCapability::Unavailable,
            format: FormatCapability::Unavailable,
        }
    }

    /// Swaps in a deterministic source if randomness is available at all.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        if self.random.is_available() {
            self.random = RandomCapability::seeded(seed);
        }
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::native()
    }
}
