//! Defines the exact inference engine: Sum-Product variable elimination over a `Model`.

mod variable_elimination;

pub use self::variable_elimination::{run, VariableEliminationEngine};
