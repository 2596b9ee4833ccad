//! Definition of the factor module
//!
//! A `Factor` represents a relationship between some set of `Variable`s.

mod index;

pub use self::index::{all_assignments, assignment_to_index, index_to_assignment, table_size, Assignment};

use crate::util::{MarginalError, Result};
use crate::variable::{Evidence, Variable};

use ndarray::prelude as nd;

use std::collections::HashSet;

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


/// A `Factor` over some scope of variables, represented as a dense table as described in Koller &
/// Friedman.
///
/// The table has one axis per `Variable` of the scope, in scope order, and the length of each
/// axis is the cardinality of that `Variable`. `Factor`s are immutable: every operation returns a
/// new `Factor`.
#[derive(Clone, Debug, PartialEq)]
pub struct Factor {
    /// The scope of the `Factor`
    scope: Vec<Variable>,

    /// The values of the `Factor` table.
    table: Table
}


impl Factor {

    /// Get the identity factor: the empty scope, with the single value `1.0`
    pub fn identity() -> Self {
        Factor { scope: vec![], table: Table::from_elem(nd::IxDyn(&[]), 1.0) }
    }


    /// Create a new `Factor` from a flat list of values.
    ///
    /// # Args
    /// * `scope`: the `Variable`s of the `Factor`, which defines the layout of `values`
    /// * `cardinality`: the number of values each `Variable` of `scope` may take
    /// * `values`: the table, in the order of `all_assignments(cardinality)`
    ///
    /// # Errors
    /// * `MarginalError::ShapeMismatch` if the three arguments do not describe the same table
    /// * `MarginalError::DuplicateVariable` if a `Variable` appears twice in `scope`
    /// * `MarginalError::InvalidValue` if any value is negative or not finite
    pub fn new(scope: Vec<Variable>, cardinality: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if scope.len() != cardinality.len() {
            return Err(MarginalError::ShapeMismatch(
                format!("{} variables but {} cardinalities", scope.len(), cardinality.len())
            ));
        }

        match table_size(&cardinality) {
            Some(size) if size == values.len() => (),
            Some(size) => {
                return Err(MarginalError::ShapeMismatch(
                    format!("cardinality {:?} requires {} values, got {}", cardinality, size, values.len())
                ));
            },
            None => {
                return Err(MarginalError::ShapeMismatch(
                    format!("cardinality {:?} has too many entries for a table", cardinality)
                ));
            }
        }

        let table = Table::from_shape_vec(nd::IxDyn(&cardinality), values)
            .map_err(|e| MarginalError::ShapeMismatch(e.to_string()))?;

        Factor::from_table(scope, table)
    }


    /// Create a new `Factor` from a table whose axes follow `scope`.
    pub fn from_table(scope: Vec<Variable>, table: Table) -> Result<Self> {
        if scope.len() != table.ndim() {
            return Err(MarginalError::ShapeMismatch(
                format!("{} variables but the table has {} dimensions", scope.len(), table.ndim())
            ));
        }

        if let Some(i) = table.shape().iter().position(|&card| card == 0) {
            return Err(MarginalError::ShapeMismatch(
                format!("variable {} has cardinality 0", scope[i])
            ));
        }

        let mut seen = HashSet::new();
        for &v in scope.iter() {
            if ! seen.insert(v) {
                return Err(MarginalError::DuplicateVariable(v));
            }
        }

        // factors may not have negative, infinite or NaN values
        if let Some(&v) = table.iter().find(|&&v| ! is_valid(v)) {
            return Err(MarginalError::InvalidValue(v));
        }

        Ok(Factor { scope, table })
    }


    /// Check if the `Factor` has the empty scope
    pub fn is_empty_scope(&self) -> bool {
        self.scope.is_empty()
    }


    /// Retrieve the scope of the `Factor`.
    pub fn scope(&self) -> &[Variable] {
        &self.scope
    }


    /// Retrieve the cardinality of each `Variable` of the scope, in scope order.
    pub fn cardinality(&self) -> &[usize] {
        self.table.shape()
    }


    /// Retrieve the cardinality of `var`, if it is in the scope of the `Factor`
    pub fn cardinality_of(&self, var: &Variable) -> Option<usize> {
        self.position(var).map(|i| self.table.shape()[i])
    }


    /// Check if `var` is in the scope of the `Factor`
    pub fn contains(&self, var: &Variable) -> bool {
        self.scope.contains(var)
    }


    /// The underlying table. Axis `i` belongs to `self.scope()[i]`.
    pub fn table(&self) -> &Table {
        &self.table
    }


    /// The values of the table in linear (mixed-radix) order
    pub fn values(&self) -> Vec<f64> {
        self.table.iter().cloned().collect()
    }


    /// The sum of all the values in the table
    pub fn total(&self) -> f64 {
        self.table.sum()
    }


    /// Retrieve the value of a complete assignment, given in scope order.
    ///
    /// # Errors
    /// * `MarginalError::OutOfRange` if the assignment does not have one value per `Variable` of
    ///   the scope, or if any value is out of range
    pub fn get(&self, assignment: &[usize]) -> Result<f64> {
        assignment_to_index(assignment, self.cardinality())?;
        Ok(self.table[zero_based(assignment)])
    }


    /// Return a copy of this `Factor` with the value for `assignment` replaced by `value`.
    pub fn set(&self, assignment: &[usize], value: f64) -> Result<Self> {
        assignment_to_index(assignment, self.cardinality())?;
        if ! is_valid(value) {
            return Err(MarginalError::InvalidValue(value));
        }

        let mut table = self.table.clone();
        table[zero_based(assignment)] = value;

        Ok(Factor { scope: self.scope.clone(), table })
    }


    /// Retrieve the value for an assignment given as a mapping from `Variable`s to values
    ///
    /// # Args
    /// * `assignment`: a full assignment to the scope of a `Factor`. The assignment's scope may be
    ///   a superset of the `Factor`s scope.
    ///
    /// # Errors
    /// * `MarginalError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    /// * `MarginalError::OutOfRange` if a value is out of range
    pub fn value(&self, assignment: &Evidence) -> Result<f64> {
        let missing: Vec<Variable> = self.scope.iter()
                                               .filter(|v| ! assignment.contains(v))
                                               .cloned()
                                               .collect();
        if ! missing.is_empty() {
            return Err(MarginalError::IncompleteAssignment(missing));
        }

        let values: Vec<usize> = self.scope.iter()
                                           .filter_map(|v| assignment.get(v))
                                           .collect();
        self.get(&values)
    }


    /// Clamp `var` to `value`: every entry of the table that disagrees with `var = value` is set
    /// to zero. The scope is unchanged.
    ///
    /// # Errors
    /// * `MarginalError::VariableNotInScope` if `var` is not in the scope of this `Factor`
    /// * `MarginalError::OutOfRange` if `value` is not a value of `var`
    pub fn restrict(&self, var: &Variable, value: usize) -> Result<Self> {
        let axis = self.axis_value(var, value)?;

        let mut table = self.table.clone();
        for (k, mut lane) in table.axis_iter_mut(nd::Axis(axis)).enumerate() {
            if k != value - 1 {
                lane.fill(0.);
            }
        }

        Ok(Factor { scope: self.scope.clone(), table })
    }


    /// Reduce the `Factor` to the given partial assignment. Unlike `restrict`, the observed
    /// `Variable`s are removed from the scope.
    ///
    /// Defined in Koller & Friedman 4.2.3
    ///
    /// # Args
    /// * `evidence`: a partial assignment. `Variable`s outside the scope of the `Factor` are
    ///   ignored.
    ///
    /// # Errors
    /// * `MarginalError::OutOfRange` if an observed value is out of range
    pub fn reduce(&self, evidence: &Evidence) -> Result<Self> {
        let mut view = self.table.view();
        let mut scope = Vec::new();

        // walk the axes from last to first so removing one does not shift the ones left to visit
        for (i, v) in self.scope.iter().enumerate().rev() {
            match evidence.get(v) {
                Some(value) => {
                    self.axis_value(v, value)?;
                    view = view.index_axis_move(nd::Axis(i), value - 1);
                },
                None => scope.push(*v)
            }
        }
        scope.reverse();

        Ok(Factor { scope, table: view.to_owned() })
    }


    /// Product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// # Returns
    /// A new `Factor` whose scope is the scope of `self` followed by the `Variable`s of `other`
    /// that are not in `self`.
    ///
    /// # Errors
    /// * `MarginalError::CardinalityMismatch`, if a shared `Variable` has a different
    ///   cardinality in each `Factor`
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        // We are computing a new factor Psi(X, Y, Z) = phi1(X, Y) * phi2(Y, Z).
        // See Koller & Friedman Definition 4.2
        let mut scope = self.scope.clone();
        let mut shape = self.cardinality().to_vec();

        // position of each of other's variables in the new scope
        let mut theirs = Vec::with_capacity(other.scope.len());

        for (&v, &card) in other.scope.iter().zip(other.cardinality()) {
            match self.position(&v) {
                Some(i) => {
                    if shape[i] != card {
                        return Err(MarginalError::CardinalityMismatch {
                            variable: v,
                            left: shape[i],
                            right: card
                        });
                    }
                    theirs.push(i);
                },
                None => {
                    theirs.push(scope.len());
                    scope.push(v);
                    shape.push(card);
                }
            }
        }

        let mine = self.scope.len();
        let table = Table::from_shape_fn(nd::IxDyn(&shape), |idx| {
            // project the assignment of the new scope onto each operand
            let a: Vec<usize> = (0..mine).map(|p| idx[p]).collect();
            let b: Vec<usize> = theirs.iter().map(|&p| idx[p]).collect();

            self.table[nd::IxDyn(&a)] * other.table[nd::IxDyn(&b)]
        });

        Ok(Factor { scope, table })
    }


    /// Marginalize the `Factor` over the given `Variable`
    ///
    /// Defined in Koller & Friedman 9.3.1
    ///
    /// # Errors
    /// * `MarginalError::VariableNotInScope` if `var` is not in the scope of this `Factor`
    pub fn sumout(&self, var: &Variable) -> Result<Self> {
        let idx = self.position(var).ok_or(MarginalError::VariableNotInScope(*var))?;

        let table = self.table.sum_axis(nd::Axis(idx));
        let scope = self.scope.iter().filter(|&v| v != var).cloned().collect();

        Ok(Factor { scope, table })
    }


    /// Divide every value by the sum of all values, producing a distribution over the scope.
    ///
    /// # Errors
    /// * `MarginalError::DegenerateDistribution` if the values sum to zero, or if the sum
    ///   overflows
    pub fn normalize(&self) -> Result<Self> {
        let z = self.total();
        if z == 0.0 || ! z.is_finite() {
            return Err(MarginalError::DegenerateDistribution);
        }

        Ok(Factor { scope: self.scope.clone(), table: self.table.mapv(|v| v / z) })
    }


    /// Reorder the scope (and the axes of the table) of this `Factor`.
    ///
    /// # Errors
    /// * `MarginalError::ShapeMismatch` if `order` is not a permutation of the scope
    /// * `MarginalError::VariableNotInScope` if `order` names a `Variable` outside of the scope
    pub fn permute(&self, order: &[Variable]) -> Result<Self> {
        if order.len() != self.scope.len() {
            return Err(MarginalError::ShapeMismatch(
                format!("{:?} is not a permutation of {:?}", order, self.scope)
            ));
        }

        let mut axes = Vec::with_capacity(order.len());
        for v in order.iter() {
            let axis = self.position(v).ok_or(MarginalError::VariableNotInScope(*v))?;
            if axes.contains(&axis) {
                return Err(MarginalError::DuplicateVariable(*v));
            }
            axes.push(axis);
        }

        let table = self.table.view().permuted_axes(nd::IxDyn(&axes)).to_owned();
        Ok(Factor { scope: order.to_vec(), table })
    }


    fn position(&self, var: &Variable) -> Option<usize> {
        self.scope.iter().position(|v| v == var)
    }

    // the axis of `var`, after checking `value` is one of its values
    fn axis_value(&self, var: &Variable, value: usize) -> Result<usize> {
        let axis = self.position(var).ok_or(MarginalError::VariableNotInScope(*var))?;
        let card = self.table.len_of(nd::Axis(axis));
        if value < 1 || value > card {
            return Err(MarginalError::OutOfRange(
                format!("value {} of variable {} is not in 1..={}", value, var, card)
            ));
        }
        Ok(axis)
    }

}

fn is_valid(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

// table coordinates of a (validated) 1-indexed assignment
fn zero_based(assignment: &[usize]) -> nd::IxDyn {
    let idx: Vec<usize> = assignment.iter().map(|&v| v - 1).collect();
    nd::IxDyn(&idx)
}
