//! Definition of the variable module
//!
//! A `Variable` names a discrete random variable in a Probabilistic Graphical Model. It is only an
//! identifier: the number of values a `Variable` can take is recorded by the `Factor`s that
//! mention it.

use crate::util::{MarginalError, Result};

use bidir_map::BidirMap;
use indexmap::IndexMap;
use itertools::Itertools;

use std::fmt;
use std::iter::FromIterator;

/// A discrete random variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(u32);

impl Variable {

    /// Construct the `Variable` with the given identifier
    pub fn new(id: u32) -> Self {
        Variable(id)
    }

    /// The identifier of this `Variable`
    pub fn id(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Variable {
    fn from(id: u32) -> Self {
        Variable(id)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X{}", self.0)
    }
}


/// Observed values for a set of `Variable`s.
///
/// Values are 1-indexed, like the components of an assignment to a `Factor`. Iteration follows
/// insertion order, which keeps the tracing output of an inference run stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evidence {
    values: IndexMap<Variable, usize>
}

impl Evidence {

    /// Construct an empty `Evidence`
    pub fn new() -> Self {
        Evidence { values: IndexMap::new() }
    }

    /// Observe `var = val`. A second observation of the same `Variable` replaces the first.
    pub fn set(&mut self, var: &Variable, val: usize) {
        self.values.insert(*var, val);
    }

    /// The observed value of `var`, if any
    pub fn get(&self, var: &Variable) -> Option<usize> {
        self.values.get(var).cloned()
    }

    /// Check if `var` has been observed
    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    /// The observed `Variable`s, in insertion order
    pub fn variables(&self) -> Vec<Variable> {
        self.values.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, usize)> + '_ {
        self.values.iter().map(|(&v, &val)| (v, val))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Variable, usize)> for Evidence {
    fn from_iter<I: IntoIterator<Item = (Variable, usize)>>(iter: I) -> Self {
        Evidence { values: iter.into_iter().collect() }
    }
}


/// Produces human readable labels for `Variable`s. Labels are only used for diagnostics.
pub trait Label {

    fn label(&self, var: Variable) -> String;

    /// Label every `Variable` of a scope, comma separated
    fn label_scope(&self, scope: &[Variable]) -> String {
        scope.iter().map(|&v| self.label(v)).join(", ")
    }
}

impl<F> Label for F where F: Fn(Variable) -> String {
    fn label(&self, var: Variable) -> String {
        self(var)
    }
}


/// The user-defined names of `Variable`s. This is a two way lookup ```(`Variable`->Name)``` and
/// ```(Name->`Variable`)```.
pub struct VariableNames {
    names: BidirMap<Variable, String>
}

impl VariableNames {

    pub fn new() -> Self {
        VariableNames { names: BidirMap::new() }
    }

    /// Name `var`.
    ///
    /// # Errors
    /// * `MarginalError::DuplicateVariable` if `var` already has a name, or if `name` already
    ///   belongs to another `Variable`.
    pub fn insert(&mut self, var: Variable, name: &str) -> Result<()> {
        if self.names.get_by_first(&var).is_some() {
            return Err(MarginalError::DuplicateVariable(var));
        }

        if let Some(&other) = self.names.get_by_second(&String::from(name)) {
            return Err(MarginalError::DuplicateVariable(other));
        }

        self.names.insert(var, String::from(name));
        Ok(())
    }

    /// Lookup a `Variable` based on the name
    pub fn lookup_variable(&self, name: &str) -> Option<&Variable> {
        self.names.get_by_second(&String::from(name))
    }

    /// Lookup a `Variable`'s name
    pub fn lookup_name(&self, var: &Variable) -> Option<&String> {
        self.names.get_by_first(var)
    }

    /// The named `Variable`s
    pub fn variables(&self) -> Vec<Variable> {
        self.names.first_col().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.first_col().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VariableNames {
    fn default() -> Self {
        VariableNames::new()
    }
}

impl Clone for VariableNames {
    fn clone(&self) -> Self {
        let names = self.names.iter().map(|(&v, n)| (v, n.clone())).collect();
        VariableNames { names }
    }
}

impl fmt::Debug for VariableNames {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.names.iter()).finish()
    }
}

impl Label for VariableNames {
    fn label(&self, var: Variable) -> String {
        match self.lookup_name(&var) {
            Some(name) => name.clone(),
            None => var.to_string()
        }
    }
}
