//! RNG module - seeded shape source
//!
//! A plain LCG (the classic ANSI C constants, modulus 2^31) drives shape
//! selection. Each draw hashes the previous state, so a seed fixes the whole
//! shape sequence.

use serde::{Deserialize, Serialize};

use crate::types::Shape;

const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;
const MODULUS: u64 = 1 << 31;

/// Linear congruential generator over `[0, 2^31)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seeds are reduced modulo 2^31. Zero is a valid seed.
    pub fn new(seed: u32) -> Self {
        Self {
            state: (seed as u64 % MODULUS) as u32,
        }
    }

    /// `(a * x + c) mod m`
    pub fn hash(x: u32) -> u32 {
        ((MULTIPLIER * x as u64 + INCREMENT) % MODULUS) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return the new state.
    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::hash(self.state);
        self.state
    }

    /// Uniform-ish value in `[0, n)`, taken from the high bits.
    pub fn next_below(&mut self, n: u32) -> u32 {
        let x = self.next_u32() as u64;
        ((x * n as u64) / MODULUS) as u32
    }
}

/// Shape source owned by a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeSource {
    seed: u32,
    rng: Lcg,
    draws: u64,
}

impl ShapeSource {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            rng: Lcg::new(seed),
            draws: 0,
        }
    }

    /// Draw the next shape, advancing the cursor.
    pub fn draw(&mut self) -> Shape {
        self.draws += 1;
        let idx = self.rng.next_below(Shape::ALL.len() as u32) as usize;
        Shape::ALL[idx.min(Shape::ALL.len() - 1)]
    }

    /// Shape the next `draw` would return, without advancing.
    pub fn peek(&self) -> Shape {
        let mut ahead = *self;
        ahead.draw()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// How many shapes have been drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}
