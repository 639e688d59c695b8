//! Discrete Bayesian Networks whose Conditional Probability Tables are learned from labeled
//! examples, and which draw joint samples by forward sampling.

pub mod cpt;
pub mod data;
pub mod inference;
pub mod network;
pub mod samplers;
pub mod util;
pub mod variable;

pub use util::{Result, BayesError};
pub use variable::{RandomVariable, Value};
pub use network::{BayesianNetwork, NetworkBuilder};
pub use samplers::{ForwardSampler, Sampler};
pub use inference::{ConditionalInferenceEngine, Estimate, RejectionSamplingEngine};
