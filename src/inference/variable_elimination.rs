//! Defines a `VariableEliminationEngine` that uses exact inference by variable elimination to
//! answer conditional inference queries.
//!
//! Implementation of Koller & Friedman Algorithm 9.1 - Sum-Product-VE. The elimination order is
//! always supplied by the caller.

use crate::factor::Factor;
use crate::model::Model;
use crate::util::{MarginalError, Result};
use crate::variable::{Evidence, Label, Variable};

use tracing::{debug, debug_span, trace};

pub struct VariableEliminationEngine<'a> {

    /// the `Model` (a 'bag of factors'), conditioned on the provided evidence, to use for the
    /// inference task
    model: Model,

    /// the evidence the model was conditioned on
    evidence: Evidence,

    /// labels for diagnostics; the model's names are used when this is `None`
    labels: Option<&'a (dyn Label + Sync)>

}


impl<'a> VariableEliminationEngine<'a> {

    /// Build an engine answering queries about `model` given `evidence`.
    ///
    /// # Errors
    /// * `MarginalError::UnknownVariable` if `evidence` observes a `Variable` no `Factor` mentions
    /// * `MarginalError::OutOfRange` if an observed value is out of range
    pub fn new(model: &Model, evidence: &Evidence) -> Result<Self> {
        // restrict the provided model with the evidence - this is the model we will use for
        // variable elimination
        let conditioned = model.condition(evidence)?;

        for (var, val) in evidence.iter() {
            debug!(variable = %model.names().label(var), value = val, "applied evidence");
        }

        Ok(VariableEliminationEngine {
            model: conditioned,
            evidence: evidence.clone(),
            labels: None
        })
    }


    /// Label `Variable`s in the tracing output of this engine with `labels`
    pub fn with_labels(mut self, labels: &'a (dyn Label + Sync)) -> Self {
        self.labels = Some(labels);
        self
    }


    /// Infer the joint distribution ```P(query | evidence)```.
    ///
    /// # Args
    /// * `query`: the `Variable`s of the distribution
    /// * `order`: the order in which to eliminate the hidden `Variable`s. Every `Variable` that is
    ///   neither queried nor observed must appear. Observed `Variable`s may appear as well, and a
    ///   `Variable` that has already been eliminated is skipped.
    ///
    /// # Returns
    /// a normalized `Factor` whose scope is `query`, in ascending order
    ///
    /// # Errors
    /// * `MarginalError::UnknownVariable` if `query` or `order` names a `Variable` outside the model
    /// * `MarginalError::DuplicateVariable` if `query` names a `Variable` twice
    /// * `MarginalError::InvalidQuery` if a `Variable` is both queried and eliminated
    /// * `MarginalError::IncompleteElimination` if hidden `Variable`s are left after elimination
    /// * `MarginalError::DegenerateDistribution` if the evidence has zero probability
    pub fn infer(&self, query: &[Variable], order: &[Variable]) -> Result<Factor> {
        let labels = self.labels();
        let _span = debug_span!("variable_elimination", query = %labels.label_scope(query)).entered();

        // check input arguments
        let mut wanted = query.to_vec();
        wanted.sort();
        if let Some(w) = wanted.windows(2).find(|w| w[0] == w[1]) {
            return Err(MarginalError::DuplicateVariable(w[0]));
        }

        if let Some(&v) = query.iter().chain(order).find(|v| ! self.model.contains(v)) {
            return Err(MarginalError::UnknownVariable(v));
        }

        if let Some(v) = order.iter().find(|v| wanted.binary_search(v).is_ok()) {
            return Err(MarginalError::InvalidQuery(
                format!("{} is both queried and eliminated", labels.label(*v))
            ));
        }

        let mut phis = self.model.factors().to_vec();
        for var in order.iter() {
            // Time to get rid of var
            let (phi_1prime, phi_2prime): (Vec<Factor>, Vec<Factor>) = phis
                                           .into_iter()
                                           .partition(|f| f.contains(var));

            phis = phi_2prime;
            if phi_1prime.is_empty() {
                debug!(variable = %labels.label(*var), "no factor mentions variable, skipping");
                continue;
            }

            // product step - multiply factors with var
            let psi = product(phi_1prime)?;

            // sum step - marginalize psi over var
            let tau = psi.sumout(var)?;

            debug!(
                variable = %labels.label(*var),
                scope = %labels.label_scope(tau.scope()),
                "eliminated variable"
            );
            trace!(values = ?tau.values(), "intermediate factor");

            phis.push(tau);
        }

        // multiply together remaining phis
        let mut phi_star = product(phis)?;

        // observed variables are still in scope, but every entry that disagrees with the
        // observation is zero, so summing them out leaves exactly the consistent entries
        for (var, _) in self.evidence.iter() {
            if phi_star.contains(&var) && wanted.binary_search(&var).is_err() {
                phi_star = phi_star.sumout(&var)?;
            }
        }

        let mut found = phi_star.scope().to_vec();
        found.sort();
        if found != wanted {
            return Err(MarginalError::IncompleteElimination { expected: wanted, found });
        }

        // now we have an unnormalized distribution. We need the partition function to return a
        // conditional probability.
        let result = phi_star.permute(&wanted)?.normalize()?;
        trace!(scope = %labels.label_scope(result.scope()), values = ?result.values(), "result");

        Ok(result)
    }


    fn labels(&self) -> &dyn Label {
        match self.labels {
            Some(labels) => labels,
            None => self.model.names()
        }
    }

}


/// Multiply `factors` together, left to right
fn product(factors: Vec<Factor>) -> Result<Factor> {
    factors.into_iter()
           .try_fold(Factor::identity(), |acc, phi| acc.multiply(&phi))
}


/// Compute ```P(query | evidence)``` over the distribution factored by `factors`, eliminating the
/// hidden `Variable`s in `order`.
///
/// This is the one-shot form of `VariableEliminationEngine::infer`.
pub fn run(
    factors: Vec<Factor>,
    query: &[Variable],
    order: &[Variable],
    evidence: &Evidence
) -> Result<Factor> {
    let model = Model::new(factors)?;
    VariableEliminationEngine::new(&model, evidence)?.infer(query, order)
}
