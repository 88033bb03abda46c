use std::f64::consts::PI;

/// Source of uniform variates in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

/// Source of standard-normal variates.
pub trait NormalSampler {
    fn standard_normal(&mut self) -> f64;
}

/// xorshift64* generator seeded explicitly.
#[derive(Debug, Clone)]
pub struct SeededUniform {
    state: u64,
}

impl SeededUniform {
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            0xA5A5_A5A5_A5A5_A5A5
        } else {
            seed
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}

impl UniformSource for SeededUniform {
    fn next_uniform(&mut self) -> f64 {
        const DENOM: f64 = (1_u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 / DENOM
    }
}

/// Box-Muller transform over any uniform source. Only the cosine branch is
/// used, so each normal consumes exactly two uniforms (plus redraws).
#[derive(Debug, Clone)]
pub struct BoxMuller<U> {
    uniform: U,
}

impl<U: UniformSource> BoxMuller<U> {
    pub fn new(uniform: U) -> Self {
        Self { uniform }
    }
}

impl BoxMuller<SeededUniform> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededUniform::new(seed))
    }
}

impl<U: UniformSource> NormalSampler for BoxMuller<U> {
    fn standard_normal(&mut self) -> f64 {
        let mut u1 = self.uniform.next_uniform();
        while u1 <= 0.0 {
            u1 = self.uniform.next_uniform();
        }
        let u2 = self.uniform.next_uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

pub(crate) fn derive_seed(base_seed: u64, stream: u32, path_id: u32) -> u64 {
    let mixed = base_seed ^ ((stream as u64) << 32) ^ path_id as u64;
    splitmix64(mixed)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
