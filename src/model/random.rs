//! Random model synthesis for quick experiments and stress runs

use super::Model;
use crate::error::ModelBuildError;
use rand::Rng;
use tracing::debug;

impl Model {
    /// Synthesize a random explicit model
    ///
    /// Propositions are named `p0, p1, …` with uniform random valuations; programs are
    /// named `a0, a1, …` with uniform random 0/1 transition matrices. Random valuations
    /// routinely produce duplicate states, so this also exercises the uniqueness pass.
    pub fn random<R: Rng>(
        rng: &mut R,
        num_states: usize,
        num_props: usize,
        num_programs: usize,
    ) -> Result<Model, ModelBuildError> {
        let props: Vec<(String, Vec<u8>)> = (0..num_props)
            .map(|k| {
                let valuation = (0..num_states).map(|_| u8::from(rng.gen_bool(0.5))).collect();
                (format!("p{}", k), valuation)
            })
            .collect();

        let programs: Vec<(String, Vec<Vec<u8>>)> = (0..num_programs)
            .map(|k| {
                let matrix = (0..num_states)
                    .map(|_| (0..num_states).map(|_| u8::from(rng.gen_bool(0.5))).collect())
                    .collect();
                (format!("a{}", k), matrix)
            })
            .collect();

        debug!(num_states, num_props, num_programs, "synthesizing random model");
        Model::from_explicit(num_states, &props, &programs)
    }
}
