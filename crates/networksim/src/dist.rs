//! Seeded, reproducible inter-arrival time generation.
//!
//! Uses rand_distr-backed sampling from an explicit, named, seedable
//! generator rather than thread-local randomness, so that two simulator runs
//! with the same seeds produce byte-identical traces.

use rand_core::SeedableRng;
use rand_distr::{Distribution as _, Exp, Pareto};
use rand_xoshiro::Xoshiro256StarStar;

use crate::constants::Model;

/// Per-node seeded inter-arrival generator.
///
/// The algorithm is fixed to [`Xoshiro256StarStar`], seeded with
/// `seed_from_u64(seed)`: this choice, and the order in which `poisson`,
/// `pareto`, and `uniform` are called, is the documented wire-compatible
/// regression-test surface for this crate. Changing either is a breaking
/// change to recorded traces.
#[derive(Debug, Clone)]
pub struct Distribution {
    rng: Xoshiro256StarStar,
    sigma_pkt: f64,
    lambda_pkt: f64,
}

impl Distribution {
    /// Construct a generator seeded with `seed` (conventionally the node id).
    pub fn new(model: &Model, seed: u64) -> Self {
        Distribution {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            sigma_pkt: model.peak_packet_rate(),
            lambda_pkt: model.average_packet_rate(),
        }
    }

    /// One Poisson-traffic inter-arrival sample: `Exp(1/b) + a`, where `a =
    /// 1/sigma_pkt` and `b = (sigma_pkt * lambda_pkt) / (sigma_pkt -
    /// lambda_pkt)`.
    pub fn poisson(&mut self) -> f64 {
        let a = 1.0 / self.sigma_pkt;
        let b = (self.sigma_pkt * self.lambda_pkt) / (self.sigma_pkt - self.lambda_pkt);
        let exp = Exp::new(b).expect("b must be positive for a valid model");
        exp.sample(&mut self.rng) + a
    }

    /// One Pareto-traffic inter-arrival sample: `(Pareto(shape) + 1) * a`,
    /// where `shape = sigma_pkt / (sigma_pkt - lambda_pkt)` and `a =
    /// 1/sigma_pkt`.
    pub fn pareto(&mut self) -> f64 {
        let a = 1.0 / self.sigma_pkt;
        let shape = self.sigma_pkt / (self.sigma_pkt - self.lambda_pkt);
        // rand_distr::Pareto samples from [scale, inf); with scale = 1.0 this
        // is the standard Pareto variate already shifted up by 1 relative to
        // a Lomax-style variate, so the `+ 1` term is folded in here.
        let pareto = Pareto::new(1.0, shape).expect("shape must be positive for a valid model");
        pareto.sample(&mut self.rng) * a
    }

    /// An integer uniformly sampled from `[0, range)`.
    pub fn uniform(&mut self, range: usize) -> usize {
        use rand::Rng;
        self.rng.gen_range(0..range)
    }
}

/// The traffic generation method selected for a RAM's inter-arrival process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficMethod {
    /// Biased-exponential inter-arrival.
    Poisson,
    /// Heavy-tailed Pareto inter-arrival.
    Pareto,
}

impl TrafficMethod {
    /// Parse the `"poisson"` / `"pareto"` strings accepted in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "poisson" => Some(TrafficMethod::Poisson),
            "pareto" => Some(TrafficMethod::Pareto),
            _ => None,
        }
    }

    /// Sample the next inter-arrival using this method.
    pub fn sample(self, dist: &mut Distribution) -> f64 {
        match self {
            TrafficMethod::Poisson => dist.poisson(),
            TrafficMethod::Pareto => dist.pareto(),
        }
    }
}
