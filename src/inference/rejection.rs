//! Defines a rejection-sampling `ConditionalInferenceEngine`.
//!
//! Joint samples are drawn by forward sampling; samples that disagree with the evidence are
//! thrown away and the query variable is counted in the rest. Koller & Friedman Section 12.1.

use crate::network::BayesianNetwork;
use crate::util::{show, BayesError, Result};
use crate::variable::Value;
use super::{ConditionalInferenceEngine, Estimate};

use indexmap::IndexMap;
use log::{debug, warn};
use rand::Rng;


/// An inference engine for a trained `BayesianNetwork` using rejection sampling
pub struct RejectionSamplingEngine<'a, V: Value> {

    /// The model over which to perform inference
    model: &'a BayesianNetwork<V>,

    /// The number of samples to draw per query
    samples: usize
}

impl<'a, V: Value> RejectionSamplingEngine<'a, V> {

    pub fn new(model: &'a BayesianNetwork<V>, samples: usize) -> Self {
        RejectionSamplingEngine { model, samples }
    }

    /// Resolve evidence to ```(column, value)``` pairs
    fn resolve(&self, evidence: &[(&str, V)]) -> Result<Vec<(usize, V)>> {
        evidence.iter()
                .map(|(name, v)| {
                    let i = self.model.index_of(name).ok_or_else(|| BayesError::UnknownVariable(String::from(*name)))?;
                    if ! self.model.nodes()[i].domain().contains(v) {
                        return Err(BayesError::UnknownValue { variable: String::from(*name), value: show(v) });
                    }
                    Ok((i, v.clone()))
                })
                .collect()
    }
}

impl<'a, V: Value> ConditionalInferenceEngine<V> for RejectionSamplingEngine<'a, V> {

    fn infer<R: Rng + ?Sized>(&self, query: &str, evidence: &[(&str, V)], rng: &mut R) -> Result<Estimate<V>> {
        let q = self.model.index_of(query).ok_or_else(|| BayesError::UnknownVariable(String::from(query)))?;
        let evidence = self.resolve(evidence)?;
        let domain = self.model.nodes()[q].domain();

        let mut counts = vec![0usize; domain.len()];
        let mut accepted = 0;

        for _ in 0..self.samples {
            let s = self.model.sample(rng)?;
            if evidence.iter().all(|(i, v)| s[*i] == *v) {
                // the sample came from the network, so the value is in the domain
                if let Some(k) = domain.get_index_of(&s[q]) {
                    counts[k] += 1;
                    accepted += 1;
                }
            }
        }

        if accepted == 0 {
            warn!("no sample out of {} matched the evidence for `{}`", self.samples, query);
            return Err(BayesError::NoConsistentSamples(self.samples));
        }

        debug!("accepted {} of {} samples for `{}`", accepted, self.samples, query);

        let distribution: IndexMap<V, f64> = domain.iter()
                                                   .zip(counts.iter())
                                                   .map(|(v, &ct)| (v.clone(), ct as f64 / accepted as f64))
                                                   .collect();

        Ok(Estimate { distribution, accepted, drawn: self.samples })
    }

}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::network::NetworkBuilder;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use std::iter;

    /// Rain -> Wet
    ///
    /// P(Rain=1) = .4, P(Wet=1 | Rain=1) = .75, P(Wet=1 | Rain=0) = .25
    ///
    /// P(Rain=1 | Wet=1) = .3 / (.3 + .15) = 2/3
    fn sprinkler() -> BayesianNetwork<i32> {
        let mut model = NetworkBuilder::new().with_variable("Rain", vec![0, 1], &[])
                                             .with_variable("Wet", vec![0, 1], &["Rain"])
                                             .build()
                                             .unwrap();

        let mut rows = Vec::new();
        rows.extend(iter::repeat([1, 1]).take(30));
        rows.extend(iter::repeat([1, 0]).take(10));
        rows.extend(iter::repeat([0, 1]).take(15));
        rows.extend(iter::repeat([0, 0]).take(45));
        model.train(&rows).unwrap();

        model
    }

    #[test]
    fn posterior() {
        let model = sprinkler();
        let engine = RejectionSamplingEngine::new(&model, 20_000);
        let mut rng = StdRng::seed_from_u64(12);

        let estimate = engine.infer("Rain", &[("Wet", 1)], &mut rng).unwrap();
        assert!((estimate.probability(&1) - 2.0 / 3.0).abs() < 0.03, "estimate was {:?}", estimate);
        assert!(((estimate.probability(&0) + estimate.probability(&1)) - 1.0).abs() < 1e-9);
        assert!((estimate.acceptance_rate() - 0.45).abs() < 0.03);
    }

    #[test]
    fn marginal() {
        let model = sprinkler();
        let engine = RejectionSamplingEngine::new(&model, 20_000);
        let mut rng = StdRng::seed_from_u64(13);

        let estimate = engine.infer("Rain", &[], &mut rng).unwrap();
        assert_eq!(20_000, estimate.accepted);
        assert!((estimate.probability(&1) - 0.4).abs() < 0.03);
    }

    #[test]
    fn errs() {
        let model = sprinkler();
        let engine = RejectionSamplingEngine::new(&model, 100);
        let mut rng = StdRng::seed_from_u64(14);

        assert!(engine.infer("Snow", &[], &mut rng).is_err());
        assert!(engine.infer("Rain", &[("Snow", 1)], &mut rng).is_err());
        assert!(engine.infer("Rain", &[("Wet", 3)], &mut rng).is_err());

        // evidence that contradicts itself can never be satisfied
        match engine.infer("Rain", &[("Wet", 1), ("Wet", 0)], &mut rng) {
            Err(BayesError::NoConsistentSamples(100)) => (),
            other => panic!("unexpected {:?}", other)
        }
    }

}
