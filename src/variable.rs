//! Definition of the variable module
//!
//! A `RandomVariable` represents a discrete random variable in a Bayesian Network, together with
//! its Conditional Probability Table.

use crate::cpt::Cpt;
use crate::util::{show, BayesError, Result};

use indexmap::IndexSet;
use log::debug;
use rand::Rng;

use std::fmt::Debug;
use std::hash::Hash;

/// The values a `RandomVariable` may take. Any type that can be cloned, compared and hashed
/// qualifies.
pub trait Value: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Value for T {}


/// The parent of a `RandomVariable`, as seen by its child. The child only needs to know the
/// name of the parent and which values it can take.
#[derive(Clone, Debug)]
pub struct Parent<V: Value> {
    name: String,
    domain: IndexSet<V>
}

impl<V: Value> Parent<V> {

    /// Get the name of the parent
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the values the parent may take
    pub fn domain(&self) -> &IndexSet<V> {
        &self.domain
    }

}


/// A discrete random variable and its Conditional Probability Table (CPT).
///
/// The structure of a `RandomVariable` (name, domain and parents) is fixed at construction. The
/// CPT starts out as all zeros over every conditioning context and is replaced wholesale by each
/// successful call to `train`.
#[derive(Clone, Debug)]
pub struct RandomVariable<V: Value> {

    /// The name of the `RandomVariable`
    name: String,

    /// The values of the `RandomVariable`, in declaration order
    domain: IndexSet<V>,

    /// The parents of the `RandomVariable`, in declaration order
    parents: Vec<Parent<V>>,

    /// The CPT, indexed by the positions of values within the domains
    cpt: Cpt,

    /// `true` once the `RandomVariable` has been trained
    trained: bool

}


impl<V: Value> RandomVariable<V> {

    /// Construct a new `RandomVariable` with no parents
    ///
    /// # Errors
    /// * `BayesError::EmptyDomain` if `domain` is empty
    /// * `BayesError::DuplicateValue` if a value appears in `domain` twice
    pub fn new(name: &str, domain: Vec<V>) -> Result<Self> {
        Self::with_parents(name, domain, &[])
    }


    /// Construct a new `RandomVariable` conditioned on `parents`.
    ///
    /// # Args
    /// * `name`: the name of the variable
    /// * `domain`: the values of the variable, in order
    /// * `parents`: the variables this one depends on. The order of `parents` is the order
    ///   in which parent values are expected by `train` and `sample`.
    ///
    /// # Errors
    /// * `BayesError::EmptyDomain` if `domain` is empty
    /// * `BayesError::DuplicateValue` if a value appears in `domain` twice
    /// * `BayesError::DuplicateVariable` if a parent is listed twice, or shares the name of the
    ///   variable
    pub fn with_parents(name: &str, domain: Vec<V>, parents: &[&RandomVariable<V>]) -> Result<Self> {
        if domain.is_empty() {
            return Err(BayesError::EmptyDomain(String::from(name)));
        }

        let mut set = IndexSet::with_capacity(domain.len());
        for v in domain {
            if set.contains(&v) {
                return Err(BayesError::DuplicateValue { variable: String::from(name), value: show(&v) });
            }
            set.insert(v);
        }

        let mut seen = vec![name];
        for p in parents {
            if seen.contains(&p.name()) {
                return Err(BayesError::DuplicateVariable(String::from(p.name())));
            }
            seen.push(p.name());
        }

        let parents: Vec<Parent<V>> = parents.iter()
                                             .map(|p| Parent { name: p.name.clone(), domain: p.domain.clone() })
                                             .collect();

        let cards: Vec<usize> = parents.iter().map(|p| p.domain.len()).collect();
        let cpt = Cpt::zeros(&cards, set.len());

        Ok(RandomVariable { name: String::from(name), domain: set, parents, cpt, trained: false })
    }


    /// Get the name of the `RandomVariable`
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Get the values of the `RandomVariable`, in declaration order
    pub fn domain(&self) -> &IndexSet<V> {
        &self.domain
    }


    /// Get the number of values of the `RandomVariable`
    pub fn cardinality(&self) -> usize {
        self.domain.len()
    }


    /// Get the parents of the `RandomVariable`
    pub fn parents(&self) -> &[Parent<V>] {
        &self.parents
    }


    /// `true` if the `RandomVariable` has no parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }


    /// `true` if the `RandomVariable` has been trained
    pub fn is_trained(&self) -> bool {
        self.trained
    }


    /// Get the number of conditioning contexts in the CPT
    pub fn num_contexts(&self) -> usize {
        self.cpt.num_contexts()
    }


    /// Enumerate every conditioning context of the CPT, whether or not it has been observed
    pub fn contexts(&self) -> Vec<Vec<V>> {
        self.cpt.contexts()
                .into_iter()
                .map(|ctx| {
                    ctx.iter()
                       .zip(self.parents.iter())
                       .map(|(&i, p)| p.domain[i].clone())
                       .collect::<Vec<V>>()
                })
                .collect()
    }


    /// Train a `RandomVariable` with no parents from a flat sequence of observed values.
    ///
    /// # Errors
    /// * `BayesError::RowLength` if the variable has parents
    /// * see `train`
    pub fn train_values(&mut self, values: &[V]) -> Result<()> {
        if ! self.is_root() {
            return Err(BayesError::RowLength { expected: self.parents.len() + 1, got: 1 });
        }

        let rows: Vec<&[V]> = values.iter().map(std::slice::from_ref).collect();
        self.train(&rows)
    }


    /// Train the CPT from examples.
    ///
    /// Each example is a row holding one value per parent, in parent order, followed by the
    /// value of this variable. Each conditioning context is normalized by the number of examples
    /// observed in it, so after training every observed context sums to 1 and every unobserved
    /// context is zero.
    ///
    /// Training starts from scratch: the previous CPT is discarded. Nothing is modified unless the
    /// whole example set is valid.
    ///
    /// # Errors
    /// * `BayesError::EmptyTrainingSet` if `examples` is empty
    /// * `BayesError::RowLength` if a row does not hold ```parents + 1``` values
    /// * `BayesError::UnknownValue` if a value is outside the domain of its variable
    pub fn train<R: AsRef<[V]>>(&mut self, examples: &[R]) -> Result<()> {
        let cpt = self.fit(examples)?;
        self.commit(cpt, examples.len());
        Ok(())
    }


    /// Estimate a CPT from `examples` without touching `self`
    pub(crate) fn fit<R: AsRef<[V]>>(&self, examples: &[R]) -> Result<Cpt> {
        if examples.is_empty() {
            return Err(BayesError::EmptyTrainingSet(self.name.clone()));
        }

        let width = self.parents.len() + 1;
        let mut observations = Vec::with_capacity(examples.len());

        for row in examples {
            let row = row.as_ref();
            if row.len() != width {
                return Err(BayesError::RowLength { expected: width, got: row.len() });
            }

            let mut idx = Vec::with_capacity(width);
            for (p, v) in self.parents.iter().zip(row.iter()) {
                match p.domain.get_index_of(v) {
                    Some(i) => idx.push(i),
                    None => return Err(BayesError::UnknownValue { variable: p.name.clone(), value: show(v) })
                }
            }

            let own = &row[width - 1];
            match self.domain.get_index_of(own) {
                Some(i) => idx.push(i),
                None => return Err(BayesError::UnknownValue { variable: self.name.clone(), value: show(own) })
            }

            observations.push(idx);
        }

        Ok(Cpt::fit(self.cpt.parent_cardinalities(), self.cardinality(), &observations))
    }


    /// Replace the CPT with one produced by `fit`
    pub(crate) fn commit(&mut self, cpt: Cpt, examples: usize) {
        debug!("trained `{}` on {} examples over {} contexts", self.name, examples, cpt.num_contexts());
        self.cpt = cpt;
        self.trained = true;
    }


    /// Draw a value of the `RandomVariable` given the values of its parents.
    ///
    /// A conditioning context that was never observed during training is sampled uniformly.
    ///
    /// # Args
    /// * `parent_values`: one value per parent, in parent order. Empty for a root variable.
    /// * `rng`: the source of randomness
    ///
    /// # Errors
    /// * `BayesError::Untrained` if the variable has never been trained
    /// * `BayesError::InvalidContext` if `parent_values` is not a conditioning context
    pub fn sample<R: Rng + ?Sized>(&self, parent_values: &[V], rng: &mut R) -> Result<V> {
        if ! self.trained {
            return Err(BayesError::Untrained(self.name.clone()));
        }

        let context = self.context(parent_values)?;
        let i = self.cpt.sample(&context, rng);
        Ok(self.domain[i].clone())
    }


    /// Get the distribution of the `RandomVariable` in a conditioning context, as one entry per
    /// value in domain order
    ///
    /// # Errors
    /// * `BayesError::InvalidContext` if `parent_values` is not a conditioning context
    pub fn distribution(&self, parent_values: &[V]) -> Result<Vec<f64>> {
        let context = self.context(parent_values)?;
        Ok(self.cpt.row(&context).iter().cloned().collect())
    }


    /// Get ```P(self = value | parents = parent_values)``` as held in the CPT
    ///
    /// # Errors
    /// * `BayesError::InvalidContext` if `parent_values` is not a conditioning context
    /// * `BayesError::UnknownValue` if `value` is not in the domain
    pub fn probability(&self, parent_values: &[V], value: &V) -> Result<f64> {
        let mut idx = self.context(parent_values)?;
        idx.push(self.position(value)?);
        Ok(self.cpt.value(&idx))
    }


    /// Get the position of `value` within the domain
    pub(crate) fn position(&self, value: &V) -> Result<usize> {
        self.domain.get_index_of(value).ok_or_else(|| {
            BayesError::UnknownValue { variable: self.name.clone(), value: show(value) }
        })
    }


    /// Translate parent values into a conditioning context of the CPT
    fn context(&self, parent_values: &[V]) -> Result<Vec<usize>> {
        let invalid = || BayesError::InvalidContext { variable: self.name.clone(), values: show(parent_values) };

        if parent_values.len() != self.parents.len() {
            return Err(invalid());
        }

        self.parents.iter()
                    .zip(parent_values.iter())
                    .map(|(p, v)| p.domain.get_index_of(v).ok_or_else(invalid))
                    .collect()
    }
}
