//! Defines the `Error` type for the marginal library

use crate::variable::Variable;

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, MarginalError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum MarginalError {

    /// The scope, cardinality and values of a `Factor` do not describe the same table
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// An assignment component or a linear index fell outside of its declared bound
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// A `Factor` operation named a `Variable` that is not part of the `Factor`'s scope
    #[error("variable {0} is not in the scope of the factor")]
    VariableNotInScope(Variable),

    /// Two `Factor`s disagree on the cardinality of a shared `Variable`
    #[error("cardinality mismatch for variable {variable}: {left} != {right}")]
    CardinalityMismatch {
        variable: Variable,
        left: usize,
        right: usize
    },

    /// Normalization of a `Factor` whose entries sum to zero (or overflow). A zero sum is what
    /// impossible evidence looks like by the time it reaches the end of inference.
    #[error("cannot normalize a factor whose values sum to zero or overflow")]
    DegenerateDistribution,

    /// The scope left after elimination is not the requested query scope
    #[error("elimination left scope {found:?}, but the query is {expected:?}")]
    IncompleteElimination {
        expected: Vec<Variable>,
        found: Vec<Variable>
    },

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("variable {0} appears more than once")]
    DuplicateVariable(Variable),

    /// Factors are non-negative, finite functions
    #[error("encountered a negative or non-finite value: {0}")]
    InvalidValue(f64),

    /// A `Variable` that no `Factor` of the model mentions
    #[error("variable {0} is unknown to the model")]
    UnknownVariable(Variable),

    /// The roles given to the variables of a query are contradictory
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Represents an incomplete assignment where a complete assignment was required.
    /// The value is the set of variables that were missing from the assignment.
    #[error("missing assignments to the variables {0:?}")]
    IncompleteAssignment(Vec<Variable>),

    /// Represents an attempt to initialize a `Factor` with an incompatible `Initialization`
    #[error("invalid initialization: {0}")]
    InvalidInitialization(String)

}
