//! Defines a simple forward sampler for a `BayesianNetwork`
//!
//! Implementation of Koller & Friedman Algorithm 12.1 (pp 489)

use crate::network::BayesianNetwork;
use crate::util::Result;
use crate::variable::Value;
use super::Sampler;

use rand::Rng;

/// A `Sampler` that owns its source of randomness, so a seeded generator reproduces the same
/// sequence of joint samples.
pub struct ForwardSampler<'a, V: Value, R: Rng> {

    /// The `BayesianNetwork` to sample
    model: &'a BayesianNetwork<V>,

    rng: R
}


impl<'a, V: Value, R: Rng> ForwardSampler<'a, V, R> {

    pub fn new(model: &'a BayesianNetwork<V>, rng: R) -> Self {
        ForwardSampler { model, rng }
    }

    /// Give back the generator
    pub fn into_rng(self) -> R {
        self.rng
    }
}

impl<'a, V: Value, R: Rng> Sampler<V> for ForwardSampler<'a, V, R> {

    fn sample(&mut self) -> Result<Vec<V>> {
        self.model.sample(&mut self.rng)
    }

}


/// An endless stream of joint samples. Iteration yields `Err` if the network cannot be sampled.
impl<'a, V: Value, R: Rng> Iterator for ForwardSampler<'a, V, R> {

    type Item = Result<Vec<V>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.sample())
    }

}
