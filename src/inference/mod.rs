//! Defines the interface to inference engines

use crate::util::Result;
use crate::variable::Value;

use indexmap::IndexMap;
use rand::Rng;

mod rejection;

pub use self::rejection::RejectionSamplingEngine;


/// A `ConditionalInferenceEngine` is capable of answering Conditional Probability Queries of the form:
///     ```P(Y | E = e)```
pub trait ConditionalInferenceEngine<V: Value> {

    /// Infer the distribution ```P(query | evidence)```
    fn infer<R: Rng + ?Sized>(&self, query: &str, evidence: &[(&str, V)], rng: &mut R) -> Result<Estimate<V>>;

}


/// An approximate distribution over the values of a single variable
#[derive(Clone, Debug)]
pub struct Estimate<V: Value> {

    /// The estimated probability of each value, in domain order
    pub distribution: IndexMap<V, f64>,

    /// The number of samples the estimate is based on
    pub accepted: usize,

    /// The number of samples drawn in total
    pub drawn: usize

}

impl<V: Value> Estimate<V> {

    /// The estimated probability of `value`; zero for a value outside the domain
    pub fn probability(&self, value: &V) -> f64 {
        self.distribution.get(value).cloned().unwrap_or(0.0)
    }

    /// The fraction of drawn samples that agreed with the evidence
    pub fn acceptance_rate(&self) -> f64 {
        if self.drawn == 0 {
            0.0
        } else {
            self.accepted as f64 / self.drawn as f64
        }
    }

}
