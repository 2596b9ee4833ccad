//! Discrete factors and exact inference by variable elimination.
//!
//! A `Factor` maps every joint assignment of a small set of discrete `Variable`s to a
//! non-negative real. A `Model` is a 'bag of factors' whose product is an (unnormalized) joint
//! distribution, and the `VariableEliminationEngine` answers conditional queries
//! ```P(query | evidence)``` over it by eliminating hidden variables in a caller supplied order.

pub mod variable;
pub mod factor;
pub mod init;
pub mod model;
pub mod inference;
pub mod util;

pub use crate::factor::{all_assignments, assignment_to_index, index_to_assignment, table_size, Assignment, Factor, Table};
pub use crate::inference::{run, VariableEliminationEngine};
pub use crate::init::Initialization;
pub use crate::model::{Model, ModelBuilder};
pub use crate::util::{MarginalError, Result};
pub use crate::variable::{Evidence, Label, Variable, VariableNames};
