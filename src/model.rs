//! Defines a `Model`, a Probabilistic Graphical Model viewed as the factorization of a
//! probability distribution P into a collection of `Factor`s.

use crate::factor::Factor;
use crate::util::{MarginalError, Result};
use crate::variable::{Evidence, Variable, VariableNames};

use indexmap::IndexMap;

/// Represents a graphical model as a 'bag of factors'.
///
/// # Representation
/// Although a network is typically represented as a graph, this representation does not
/// explicitly define the graph structure. Instead, it uses a logical view of the network as a
/// collection of `Factor`s. Bayesian networks fit the same view: each CPD is one `Factor`.
///
/// Every `Variable` of a `Model` has exactly one cardinality, shared by all of the `Factor`s that
/// mention it.
#[derive(Clone, Debug)]
pub struct Model {

    /// The `Factor`s that comprise the `Model`
    factors: Vec<Factor>,

    /// The cardinality of every `Variable` in the `Model`, in order of first appearance
    cardinalities: IndexMap<Variable, usize>,

    /// The user-defined names of the `Variable`s.
    names: VariableNames

}


impl Model {

    /// Build a `Model` over the given `Factor`s, with no names
    pub fn new(factors: Vec<Factor>) -> Result<Self> {
        factors.into_iter()
               .fold(ModelBuilder::new(), |builder, f| builder.with_factor(f))
               .build()
    }

    /// Get the `Factor`s of the model.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Get all `Variable`s in the model, in ascending order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars: Vec<Variable> = self.cardinalities.keys().cloned().collect();
        vars.sort();
        vars
    }

    /// Get the number of `Variable`s in the `Model`
    pub fn num_variables(&self) -> usize {
        self.cardinalities.len()
    }

    /// Get the cardinality of `var`, or `None` if no `Factor` mentions it.
    pub fn cardinality(&self, var: &Variable) -> Option<usize> {
        self.cardinalities.get(var).cloned()
    }

    /// Check if `var` is part of the `Model`
    pub fn contains(&self, var: &Variable) -> bool {
        self.cardinalities.contains_key(var)
    }

    /// Lookup a `Variable` in the `Model` based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.lookup_variable(name)
    }

    /// Lookup a `Variable`'s name in the `Model`.
    pub fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.lookup_name(var)
    }

    /// The names of the `Variable`s
    pub fn names(&self) -> &VariableNames {
        &self.names
    }

    /// Check that `evidence` only observes `Variable`s of the `Model`, with values in range.
    ///
    /// # Errors
    /// * `MarginalError::UnknownVariable` for an observed `Variable` the model does not contain
    /// * `MarginalError::OutOfRange` for an observed value outside of the `Variable`'s cardinality
    pub fn check_evidence(&self, evidence: &Evidence) -> Result<()> {
        for (var, val) in evidence.iter() {
            let card = self.cardinality(&var).ok_or(MarginalError::UnknownVariable(var))?;
            if val < 1 || val > card {
                return Err(MarginalError::OutOfRange(
                    format!("evidence {} = {} is not in 1..={}", var, val, card)
                ));
            }
        }
        Ok(())
    }

    /// Condition the `Model` given the evidence.
    ///
    /// Every `Factor` that mentions an observed `Variable` is restricted to the observed value.
    /// Scopes are unchanged, so the conditioned `Model` has the same `Variable`s; the mass of the
    /// assignments that contradict the evidence is zero.
    ///
    /// # Args
    /// * `evidence`: a partial assignment of the `Variable`s in this `Model`.
    pub fn condition(&self, evidence: &Evidence) -> Result<Self> {
        self.check_evidence(evidence)?;

        let mut factors = self.factors.clone();
        for (var, val) in evidence.iter() {
            for f in factors.iter_mut().filter(|f| f.contains(&var)) {
                *f = f.restrict(&var, val)?;
            }
        }

        Ok(Model {
            factors,
            cardinalities: self.cardinalities.clone(),
            names: self.names.clone()
        })
    }

    /// Determine the unnormalized measure of a full assignment to the `Variable`s in the `Model`:
    /// the product of the value of every `Factor`. For a Bayesian network this is ```P(zeta)```.
    ///
    /// # Errors
    /// * `MarginalError::IncompleteAssignment` if a `Variable` of the model is not assigned
    pub fn joint_value(&self, assignment: &Evidence) -> Result<f64> {
        // for every factor in the graph
        self.factors.iter()
                    // get the value of the assignment
                    .map(|f| f.value(assignment))
                    // and multiply those values together
                    // but if there are any errors, just return the error
                    .fold(Ok(1.0), |acc, val| acc.and_then(|p| val.map(|v| p * v)))
    }
}


/// An implementation of the [builder pattern] for creating a `Model`.
///
/// [builder pattern]: https://en.wikipedia.org/wiki/Builder_pattern
pub struct ModelBuilder {

    /// The `Factor`s added so far
    factors: Vec<Factor>,

    /// The cardinality of every `Variable` seen so far
    cardinalities: IndexMap<Variable, usize>,

    /// The names of each `Variable`
    names: VariableNames,

    /// The error state of the builder
    err: Option<MarginalError>

}


impl ModelBuilder {

    /// Construct a new `ModelBuilder` representing an empty `Model`
    pub fn new() -> Self {
        ModelBuilder {
            factors: Vec::new(),
            cardinalities: IndexMap::new(),
            names: VariableNames::new(),
            err: None
        }
    }


    /// Add a `Factor` to the `Model`. Every `Variable` it shares with a previously added `Factor`
    /// must have the same cardinality.
    pub fn with_factor(mut self, factor: Factor) -> Self {
        // if we are in an error state, do nothing
        if self.err.is_some() {
            return self;
        }

        for (&v, &card) in factor.scope().iter().zip(factor.cardinality()) {
            match self.cardinalities.get(&v) {
                Some(&known) if known != card => {
                    self.err = Some(MarginalError::CardinalityMismatch { variable: v, left: known, right: card });
                    return self;
                },
                Some(_) => (),
                None => {
                    self.cardinalities.insert(v, card);
                }
            }
        }

        self.factors.push(factor);
        self
    }


    /// Give `var` a human readable name. Names are used for lookups and diagnostics only.
    pub fn with_named_variable(mut self, var: Variable, name: &str) -> Self {
        if self.err.is_some() {
            return self;
        }

        if let Err(e) = self.names.insert(var, name) {
            self.err = Some(e);
        }

        self
    }


    /// Complete building the model.
    ///
    /// # Returns
    /// the `Model`, or the first error generated during the building process
    ///
    /// # Errors
    /// * `MarginalError::UnknownVariable` if a named `Variable` is not mentioned by any `Factor`
    pub fn build(self) -> Result<Model> {
        if let Some(e) = self.err {
            return Err(e);
        }

        if let Some(var) = self.names.variables().into_iter().find(|v| ! self.cardinalities.contains_key(v)) {
            return Err(MarginalError::UnknownVariable(var));
        }

        Ok(Model { factors: self.factors, cardinalities: self.cardinalities, names: self.names })
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder::new()
    }
}
