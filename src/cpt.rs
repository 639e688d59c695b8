//! Definition of the cpt module
//!
//! A `Cpt` is the Conditional Probability Table of a single variable, stored densely over the
//! positions of the values in the domains of the variable and its parents.

use itertools::Itertools;
use log::trace;
use ndarray::prelude as nd;
use rand::Rng;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


/// A Conditional Probability Table.
///
/// # Representation
/// The table has one axis per parent, in parent order, followed by one axis for the variable
/// itself. An index into the leading axes is a conditioning context; the slice along the last
/// axis is the distribution of the variable in that context. Because the table is dense, every
/// context of the cross product of the parents' domains exists from construction onward.
#[derive(Clone, Debug)]
pub struct Cpt {

    /// The accumulators. Shape is ```[|Pa_1|, ..., |Pa_k|, |X|]```
    table: Table

}


impl Cpt {

    /// Construct a `Cpt` of zeros for a variable with `cardinality` values, conditioned on
    /// parents with the given cardinalities
    pub fn zeros(parents: &[usize], cardinality: usize) -> Self {
        let mut shape = parents.to_vec();
        shape.push(cardinality);

        Cpt { table: Table::zeros(shape) }
    }


    /// Estimate a `Cpt` from observations.
    ///
    /// Each observation is a full index into the table: the position of each parent's value
    /// followed by the position of the variable's value. Every context is normalized by the
    /// number of observations made in that context, so each observed context sums to 1 and an
    /// unobserved context is left at zero.
    ///
    /// # Panics
    /// if an observation is not a valid index into the table
    pub fn fit(parents: &[usize], cardinality: usize, observations: &[Vec<usize>]) -> Self {
        let mut cpt = Cpt::zeros(parents, cardinality);

        // count the number of instances of each configuration
        for idx in observations {
            cpt.table[nd::IxDyn(idx)] += 1.0;
        }

        //                  M[u, x]
        //      theta x|u = -------
        //                   M[u]    <-- sum along the last axis
        for context in cpt.contexts() {
            let mut row = cpt.row_mut(&context);
            let m_u = row.sum();
            if m_u > 0.0 {
                row.mapv_inplace(|ct| ct / m_u);
            }
        }

        cpt
    }


    /// The number of values of the variable
    pub fn cardinality(&self) -> usize {
        self.table.shape()[self.table.ndim() - 1]
    }


    /// The cardinality of each parent, in order
    pub fn parent_cardinalities(&self) -> &[usize] {
        &self.table.shape()[..self.table.ndim() - 1]
    }


    /// The number of conditioning contexts, i.e. the size of the cross product of the parents'
    /// domains. A variable with no parents has exactly one (empty) context.
    pub fn num_contexts(&self) -> usize {
        self.parent_cardinalities().iter().product()
    }


    /// Enumerate every conditioning context, with the last parent varying fastest
    pub fn contexts(&self) -> Vec<Vec<usize>> {
        let parents = self.parent_cardinalities();
        if parents.is_empty() {
            return vec![Vec::new()];
        }

        parents.iter().map(|&d| 0..d).multi_cartesian_product().collect()
    }


    /// View the distribution of the variable in the given context
    ///
    /// # Panics
    /// if the context is out of bounds
    pub fn row(&self, context: &[usize]) -> nd::ArrayViewD<f64> {
        let mut view = self.table.view();
        for &i in context {
            view = view.index_axis_move(nd::Axis(0), i);
        }

        view
    }


    fn row_mut(&mut self, context: &[usize]) -> nd::ArrayViewMutD<f64> {
        let mut view = self.table.view_mut();
        for &i in context {
            view = view.index_axis_move(nd::Axis(0), i);
        }

        view
    }


    /// The accumulated mass at a full index ```[context..., value]```
    pub fn value(&self, idx: &[usize]) -> f64 {
        self.table[nd::IxDyn(idx)]
    }


    /// Draw the position of a value from the distribution in `context`.
    ///
    /// Walks the values in order, accumulating their mass, and returns the first whose cumulative
    /// mass exceeds a uniform draw. A context with no mass is sampled uniformly.
    ///
    /// # Panics
    /// if the context is out of bounds
    pub fn sample<R: Rng + ?Sized>(&self, context: &[usize], rng: &mut R) -> usize {
        let row = self.row(context);
        let total = row.sum();

        if total <= 0.0 {
            trace!("context {:?} has no mass, sampling uniformly", context);
            return rng.gen_range(0..self.cardinality());
        }

        let draw = rng.gen::<f64>() * total;
        let mut upper = 0.0;
        let mut last = 0;
        for (i, &p) in row.iter().enumerate() {
            if p <= 0.0 {
                continue;
            }

            upper += p;
            last = i;
            if draw < upper {
                return i;
            }
        }

        // rounding left the draw past the final sum
        last
    }
}
