//! Die sources.
//!
//! The engine draws one face per roll from a `DieSource`. Two sources exist:
//!
//! - **RandomDie**: uniform faces from a ChaCha8 stream, optionally seeded
//!   so that a whole game can be replayed.
//! - **ScriptedDie**: a fixed list of faces, for tests. Drawing past the end
//!   is an error, not a wrap-around.
//!
//! ```
//! use bank_dice::core::{DieSource, RandomDie, ScriptedDie};
//!
//! let mut a = RandomDie::seeded(7);
//! let mut b = RandomDie::seeded(7);
//! assert_eq!(a.draw().unwrap(), b.draw().unwrap());
//!
//! let mut script = ScriptedDie::new(vec![6, 1]).unwrap();
//! assert_eq!(script.draw().unwrap(), 6);
//! assert_eq!(script.draw().unwrap(), 1);
//! assert!(script.draw().is_err());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::error::{GameError, GameResult};

/// Lowest face of the die.
pub const MIN_FACE: u8 = 1;

/// Highest face of the die.
pub const MAX_FACE: u8 = 6;

/// Produces die faces in `1..=6`.
pub trait DieSource: Send {
    /// Draw the next face.
    fn draw(&mut self) -> GameResult<u8>;
}

impl<D: DieSource + ?Sized> DieSource for Box<D> {
    fn draw(&mut self) -> GameResult<u8> {
        (**self).draw()
    }
}

/// Uniform random die backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct RandomDie {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl RandomDie {
    /// Create a die seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    /// Create a reproducible die.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this die was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent die.
    ///
    /// Each fork produces a different but deterministic sequence, so a batch
    /// of games can be replayed from a single seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::seeded(fork_seed)
    }
}

impl Default for RandomDie {
    fn default() -> Self {
        Self::new()
    }
}

impl DieSource for RandomDie {
    fn draw(&mut self) -> GameResult<u8> {
        Ok(self.inner.gen_range(MIN_FACE..=MAX_FACE))
    }
}

/// A finite, pre-scripted sequence of faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedDie {
    faces: Vec<u8>,
    position: usize,
}

impl ScriptedDie {
    /// Create a scripted die. Every face must be in `1..=6`.
    pub fn new(faces: Vec<u8>) -> GameResult<Self> {
        if let Some(&bad) = faces.iter().find(|f| !(MIN_FACE..=MAX_FACE).contains(*f)) {
            return Err(GameError::InvalidDieValue(bad));
        }
        Ok(Self { faces, position: 0 })
    }

    /// A scripted die with no faces; any roll fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            faces: Vec::new(),
            position: 0,
        }
    }

    /// Faces not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len() - self.position
    }
}

impl DieSource for ScriptedDie {
    fn draw(&mut self) -> GameResult<u8> {
        let face = self
            .faces
            .get(self.position)
            .copied()
            .ok_or(GameError::ExhaustedSource {
                consumed: self.position,
            })?;
        self.position += 1;
        Ok(face)
    }
}
