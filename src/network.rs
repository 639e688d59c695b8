//! Defines a `BayesianNetwork`, a directed model that learns the Conditional Probability Table of
//! each of its variables from data and draws joint samples from them.

use crate::cpt::Cpt;
use crate::util::{BayesError, Result};
use crate::variable::{RandomVariable, Value};

use indexmap::IndexMap;
use log::{debug, trace};
use rand::Rng;

use std::iter;


/// Represents a Bayesian Network - a Directed Probabilistic Graphical Model.
///
/// # Representation
/// The `RandomVariable`s are held in an arena in their topological order. Edges are not stored
/// on the variables themselves; each variable names its parents, and the names are resolved to
/// positions in the arena once, when the network is constructed. Every parent therefore sits at
/// a lower position than its children, which rules out cycles.
#[derive(Clone, Debug)]
pub struct BayesianNetwork<V: Value> {

    /// The `RandomVariable`s in topological order
    nodes: Vec<RandomVariable<V>>,

    /// For each `RandomVariable`, the positions of its parents in `nodes`, in parent order
    parents: Vec<Vec<usize>>,

    /// Name -> position in `nodes`
    index: IndexMap<String, usize>

}


impl<V: Value> BayesianNetwork<V> {

    /// Construct a `BayesianNetwork` from variables listed in topological order.
    ///
    /// # Errors
    /// * `BayesError::DuplicateVariable` if two variables share a name
    /// * `BayesError::MissingParent` if a parent is not listed before its child
    /// * `BayesError::ParentMismatch` if a variable was built against a parent whose domain
    ///   differs from the network's variable of the same name
    pub fn new(nodes: Vec<RandomVariable<V>>) -> Result<Self> {
        let mut index: IndexMap<String, usize> = IndexMap::with_capacity(nodes.len());
        let mut parents = Vec::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            if index.contains_key(node.name()) {
                return Err(BayesError::DuplicateVariable(String::from(node.name())));
            }

            let mut pa = Vec::with_capacity(node.parents().len());
            for p in node.parents() {
                let j = match index.get(p.name()) {
                    Some(&j) => j,
                    None => return Err(BayesError::MissingParent {
                        variable: String::from(node.name()),
                        parent: String::from(p.name())
                    })
                };

                // IndexSet equality ignores order, but the CPT does not
                if ! nodes[j].domain().iter().eq(p.domain().iter()) {
                    return Err(BayesError::ParentMismatch {
                        variable: String::from(node.name()),
                        parent: String::from(p.name())
                    });
                }

                pa.push(j);
            }

            index.insert(String::from(node.name()), i);
            parents.push(pa);
        }

        Ok(BayesianNetwork { nodes, parents, index })
    }


    /// Get the number of `RandomVariable`s in the `BayesianNetwork`
    pub fn len(&self) -> usize {
        self.nodes.len()
    }


    /// `true` if the `BayesianNetwork` holds no `RandomVariable`s
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }


    /// Get the `RandomVariable`s in topological order
    pub fn nodes(&self) -> &[RandomVariable<V>] {
        &self.nodes
    }


    /// Lookup a `RandomVariable` in the `BayesianNetwork` based on the name
    pub fn node(&self, name: &str) -> Option<&RandomVariable<V>> {
        self.index_of(name).map(|i| &self.nodes[i])
    }


    /// Lookup the position of a `RandomVariable` in the topological order, which is also its
    /// column in training rows and joint samples
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).cloned()
    }


    /// Get the names of the `RandomVariable`s in topological order
    pub fn topological_order(&self) -> Vec<&str> {
        self.index.keys().map(|k| k.as_str()).collect()
    }


    /// Get the positions of the parents of the `RandomVariable` at position `i`
    ///
    /// # Panics
    /// if `i` is out of bounds
    pub fn parents_of(&self, i: usize) -> &[usize] {
        &self.parents[i]
    }


    /// Train every `RandomVariable` from rows of observations.
    ///
    /// Column `i` of each row holds the value of the `i`th variable in topological order. Each
    /// variable is trained on its own column together with the columns of its parents. All
    /// variables are estimated before any is updated, so a failure leaves the network untouched.
    ///
    /// # Errors
    /// * `BayesError::RowLength` if a row does not have one value per variable
    /// * any error of `RandomVariable::train`
    pub fn train<R: AsRef<[V]>>(&mut self, rows: &[R]) -> Result<()> {
        let width = self.nodes.len();
        if let Some(row) = rows.iter().map(|r| r.as_ref()).find(|r| r.len() != width) {
            return Err(BayesError::RowLength { expected: width, got: row.len() });
        }

        let fitted: Vec<Cpt> = self.nodes
                                   .iter()
                                   .enumerate()
                                   .map(|(i, node)| node.fit(&self.examples(i, rows)))
                                   .collect::<Result<_>>()?;

        for (node, cpt) in self.nodes.iter_mut().zip(fitted.into_iter()) {
            node.commit(cpt, rows.len());
        }

        debug!("trained network of {} variables on {} rows", width, rows.len());
        Ok(())
    }


    /// Assemble the training examples of the `i`th variable: its parents' columns, in parent
    /// order, followed by its own column
    fn examples<R: AsRef<[V]>>(&self, i: usize, rows: &[R]) -> Vec<Vec<V>> {
        rows.iter()
            .map(|r| {
                let r = r.as_ref();
                self.parents[i].iter().chain(iter::once(&i)).map(|&j| r[j].clone()).collect::<Vec<V>>()
            })
            .collect()
    }


    /// Draw one joint sample from the `BayesianNetwork`.
    ///
    /// Implementation of forward sampling, Koller & Friedman Algorithm 12.1. Variables are
    /// sampled in topological order, each conditioned on the values already drawn for its parents
    /// in this same sample.
    ///
    /// # Returns
    /// one value per `RandomVariable`, in topological order
    ///
    /// # Errors
    /// * `BayesError::Untrained` if a variable has not been trained
    /// * `BayesError::MissingParent` if a parent has not been drawn before its child
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<V>> {
        let mut values: Vec<V> = Vec::with_capacity(self.nodes.len());

        for (node, parents) in self.nodes.iter().zip(self.parents.iter()) {
            let parent_values = parents.iter()
                                       .map(|&j| {
                                           values.get(j).cloned().ok_or_else(|| BayesError::MissingParent {
                                               variable: String::from(node.name()),
                                               parent: String::from(self.nodes[j].name())
                                           })
                                       })
                                       .collect::<Result<Vec<V>>>()?;

            let v = node.sample(&parent_values, rng)?;
            values.push(v);
        }

        trace!("drew {:?}", values);
        Ok(values)
    }


    /// Determine the probability of a full assignment according to the trained CPTs.
    ///
    /// Specifically, this computes ```P(x_1, ..., x_n) = prod_i P(x_i | Pa(x_i))```
    ///
    /// # Args
    /// * `assignment`: one value per `RandomVariable`, in topological order
    ///
    /// # Errors
    /// * `BayesError::RowLength` if `assignment` does not have one value per variable
    /// * `BayesError::UnknownValue` if a value is outside the domain of its variable
    pub fn probability(&self, assignment: &[V]) -> Result<f64> {
        if assignment.len() != self.nodes.len() {
            return Err(BayesError::RowLength { expected: self.nodes.len(), got: assignment.len() });
        }

        self.nodes
            .iter()
            .zip(self.parents.iter())
            .zip(assignment.iter())
            .map(|((node, parents), v)| {
                let parent_values: Vec<V> = parents.iter().map(|&j| assignment[j].clone()).collect();
                node.probability(&parent_values, v)
            })
            // multiply by the chain rule, short-circuiting on the first error
            .fold(Ok(1.0), |acc, p| acc.and_then(|acc| p.map(|p| acc * p)))
    }
}


/// An implementation of the [builder pattern] for creating a `BayesianNetwork`.
///
/// Variables must be added in topological order: parents are named, and must already have been
/// added. The first error encountered is kept and reported by `build`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct NetworkBuilder<V: Value> {

    /// The `RandomVariable`s added so far
    nodes: Vec<RandomVariable<V>>,

    /// The error state of the builder
    err: Option<BayesError>

}


impl<V: Value> Default for NetworkBuilder<V> {
    fn default() -> Self {
        NetworkBuilder::new()
    }
}


impl<V: Value> NetworkBuilder<V> {

    /// Construct a new `NetworkBuilder` representing an empty `BayesianNetwork`
    pub fn new() -> Self {
        NetworkBuilder { nodes: Vec::new(), err: None }
    }


    /// Add a `RandomVariable` to the `BayesianNetwork`.
    ///
    /// # Args
    /// * `name`: the name of the variable
    /// * `domain`: the values of the variable
    /// * `parents`: the names of the parent variables. The parents must already be in the model.
    pub fn with_variable(mut self, name: &str, domain: Vec<V>, parents: &[&str]) -> Self {
        if self.err.is_some() {
            return self;
        }

        let mut resolved = Vec::with_capacity(parents.len());
        for p in parents {
            match self.nodes.iter().find(|n| n.name() == *p) {
                Some(n) => resolved.push(n),
                None => {
                    self.err = Some(BayesError::MissingParent {
                        variable: String::from(name),
                        parent: String::from(*p)
                    });
                    return self;
                }
            }
        }

        match RandomVariable::with_parents(name, domain, &resolved) {
            Ok(node) => self.nodes.push(node),
            Err(e) => self.err = Some(e)
        }

        self
    }


    /// Add an already constructed `RandomVariable` to the `BayesianNetwork`
    pub fn with_node(mut self, node: RandomVariable<V>) -> Self {
        if self.err.is_none() {
            self.nodes.push(node);
        }

        self
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `BayesianNetwork`, or the first error generated during the building process
    pub fn build(self) -> Result<BayesianNetwork<V>> {
        match self.err {
            Some(e) => Err(e),
            None => BayesianNetwork::new(self.nodes)
        }
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    /// Cavity -> Toothache
    ///
    /// Cavity: 8 of 21 rows
    /// Toothache | Cavity=0: 2 of 8, Toothache | Cavity=1: 9 of 13
    fn cavity_rows() -> Vec<Vec<i32>> {
        let mut rows = Vec::new();
        rows.extend(iter::repeat(vec![0, 0]).take(6));
        rows.extend(iter::repeat(vec![0, 1]).take(2));
        rows.extend(iter::repeat(vec![1, 0]).take(4));
        rows.extend(iter::repeat(vec![1, 1]).take(9));
        rows
    }

    fn cavity() -> BayesianNetwork<i32> {
        NetworkBuilder::new().with_variable("Cavity", vec![0, 1], &[])
                             .with_variable("Toothache", vec![0, 1], &["Cavity"])
                             .build()
                             .unwrap()
    }

    /// Burglary, Earthquake -> Alarm -> JohnCalls -> MaryCalls
    fn alarm() -> BayesianNetwork<i32> {
        NetworkBuilder::new().with_variable("Burglary", vec![0, 1], &[])
                             .with_variable("Earthquake", vec![0, 1], &[])
                             .with_variable("Alarm", vec![0, 1], &["Burglary", "Earthquake"])
                             .with_variable("JohnCalls", vec![0, 1], &["Alarm"])
                             .with_variable("MaryCalls", vec![0, 1], &["JohnCalls"])
                             .build()
                             .unwrap()
    }

    #[test]
    fn build_empty() {
        let model: BayesianNetwork<i32> = NetworkBuilder::new().build().unwrap();
        assert!(model.is_empty());
        assert_eq!(0, model.len());

        let mut rng = StdRng::seed_from_u64(0);
        assert!(model.sample(&mut rng).unwrap().is_empty());
    }

    #[test]
    fn build_structure() {
        let model = alarm();
        assert_eq!(5, model.len());
        assert_eq!(vec!["Burglary", "Earthquake", "Alarm", "JohnCalls", "MaryCalls"], model.topological_order());
        assert_eq!(Some(2), model.index_of("Alarm"));
        assert_eq!(&[0, 1], model.parents_of(2));
        assert_eq!(&[3], model.parents_of(4));
        assert_eq!(4, model.node("Alarm").unwrap().num_contexts());
        assert!(model.node("Sprinkler").is_none());
    }

    #[test]
    fn build_errs() {
        let missing = NetworkBuilder::new().with_variable("Wet", vec![0, 1], &["Rain"])
                                           .with_variable("Rain", vec![0, 1], &[])
                                           .build();
        match missing {
            Err(BayesError::MissingParent { variable, parent }) => {
                assert_eq!("Wet", variable);
                assert_eq!("Rain", parent);
            },
            other => panic!("unexpected {:?}", other.map(|m| m.len()))
        }

        let duplicate = NetworkBuilder::new().with_variable("Rain", vec![0, 1], &[])
                                             .with_variable("Rain", vec![0, 1], &[])
                                             .build();
        assert!(duplicate.is_err());
    }

    #[test]
    /// Variables built outside the network must be listed after their parents, and against the
    /// same parent
    fn new_validates_order() {
        let rain = RandomVariable::new("Rain", vec![0, 1]).unwrap();
        let wet = RandomVariable::with_parents("Wet", vec![0, 1], &[&rain]).unwrap();

        assert!(BayesianNetwork::new(vec![wet.clone(), rain.clone()]).is_err());
        assert!(BayesianNetwork::new(vec![rain.clone(), wet.clone()]).is_ok());

        let other_rain = RandomVariable::new("Rain", vec![1, 0]).unwrap();
        match BayesianNetwork::new(vec![other_rain, wet]) {
            Err(BayesError::ParentMismatch { .. }) => (),
            other => panic!("unexpected {:?}", other.map(|m| m.len()))
        }
    }

    #[test]
    fn train() {
        let mut model = cavity();
        model.train(&cavity_rows()).unwrap();

        let cavity = model.node("Cavity").unwrap();
        assert!((cavity.probability(&[], &1).unwrap() - 13.0 / 21.0).abs() < EPS);

        let toothache = model.node("Toothache").unwrap();
        assert!((toothache.probability(&[0], &1).unwrap() - 2.0 / 8.0).abs() < EPS);
        assert!((toothache.probability(&[1], &1).unwrap() - 9.0 / 13.0).abs() < EPS);
    }

    #[test]
    fn train_errs() {
        let mut model = cavity();
        assert!(model.train(&[vec![0, 1, 1]]).is_err());

        let empty: Vec<Vec<i32>> = Vec::new();
        match model.train(&empty) {
            Err(BayesError::EmptyTrainingSet(_)) => (),
            other => panic!("unexpected {:?}", other)
        }

        // a bad value in the last column must not train the first variable
        assert!(model.train(&[vec![0, 0], vec![1, 5]]).is_err());
        assert!(model.nodes().iter().all(|n| ! n.is_trained()));
    }

    #[test]
    fn sample_untrained() {
        let model = cavity();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(model.sample(&mut rng).is_err());
    }

    #[test]
    /// The child is conditioned on the parent's value from the same draw
    fn sample_uses_same_draw() {
        let mut model = NetworkBuilder::new().with_variable("A", vec!["a0", "a1", "a2"], &[])
                                             .with_variable("B", vec!["b0", "b1", "b2"], &["A"])
                                             .build()
                                             .unwrap();

        // B copies A deterministically
        model.train(&[["a0", "b0"], ["a1", "b1"], ["a2", "b2"]]).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let s = model.sample(&mut rng).unwrap();
            assert_eq!(2, s.len());
            assert_eq!(s[0][1..], s[1][1..]);
        }
    }

    #[test]
    fn sample_frequencies() {
        let mut model = cavity();
        model.train(&cavity_rows()).unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        let n = 20_000;
        let samples: Vec<Vec<i32>> = (0..n).map(|_| model.sample(&mut rng).unwrap()).collect();

        let both = samples.iter().filter(|s| s[0] == 1 && s[1] == 1).count() as f64 / n as f64;
        assert!((both - 9.0 / 21.0).abs() < 0.03, "P(Cavity=1, Toothache=1) was {}", both);
    }

    #[test]
    fn probability() {
        let mut model = cavity();
        model.train(&cavity_rows()).unwrap();

        let p = model.probability(&[1, 1]).unwrap();
        assert!((p - 9.0 / 21.0).abs() < EPS);

        let total: f64 = [[0, 0], [0, 1], [1, 0], [1, 1]].iter()
                                                         .map(|a| model.probability(a).unwrap())
                                                         .sum();
        assert!((total - 1.0).abs() < EPS);

        assert!(model.probability(&[1]).is_err());
        assert!(model.probability(&[1, 3]).is_err());
    }

    #[test]
    fn alarm_shape() {
        let mut model = alarm();
        let rows = vec![
            vec![0, 0, 0, 0, 0],
            vec![1, 0, 1, 1, 1],
            vec![0, 1, 1, 1, 0],
            vec![0, 0, 0, 1, 1],
            vec![1, 1, 1, 0, 0]
        ];
        model.train(&rows).unwrap();

        let alarm = model.node("Alarm").unwrap();
        for ctx in alarm.contexts() {
            let total: f64 = alarm.distribution(&ctx).unwrap().iter().sum();
            assert!((total - 1.0).abs() < EPS);
        }

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let s = model.sample(&mut rng).unwrap();
            assert_eq!(5, s.len());
            assert!(s.iter().all(|&v| v == 0 || v == 1));
        }
    }
}
