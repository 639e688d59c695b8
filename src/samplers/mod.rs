//! Defines the `Sampler` trait - an object that can randomly sample from a `BayesianNetwork`.

use crate::util::Result;

pub mod forward;

pub use self::forward::ForwardSampler;

pub trait Sampler<V> {

    /// Draw one joint sample, one value per variable in topological order.
    fn sample(&mut self) -> Result<Vec<V>>;

}
