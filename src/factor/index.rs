//! The bijection between assignments to a scope and linear positions in a `Factor`'s table.
//!
//! Assignments are 1-indexed (a variable with cardinality `k` takes the values `1..=k`) and the
//! linear order is mixed-radix with the last variable varying fastest, i.e. the row-major order
//! of an `ndarray` table whose shape is the cardinality.

use crate::util::{MarginalError, Result};

/// One value for every `Variable` of a scope, in scope order.
pub type Assignment = Vec<usize>;


/// Number of entries in a table with the given cardinality, or `None` if that number does not
/// fit in a `usize`.
pub fn table_size(cardinality: &[usize]) -> Option<usize> {
    cardinality.iter().try_fold(1usize, |size, &card| size.checked_mul(card))
}


fn checked_size(cardinality: &[usize]) -> Result<usize> {
    table_size(cardinality).ok_or_else(|| MarginalError::OutOfRange(
        format!("a table with cardinality {:?} has too many entries to index", cardinality)
    ))
}


/// Map an assignment to its zero-based position in a table with the given cardinality.
///
/// # Errors
/// * `MarginalError::OutOfRange` if the assignment and the cardinality differ in length, if
///   any component of the assignment is outside of `1..=cardinality[i]`, or if the table size
///   overflows a `usize`
pub fn assignment_to_index(assignment: &[usize], cardinality: &[usize]) -> Result<usize> {
    if assignment.len() != cardinality.len() {
        return Err(MarginalError::OutOfRange(
            format!("assignment {:?} does not match cardinality {:?}", assignment, cardinality)
        ));
    }

    // every index is below the table size, so the accumulation below cannot overflow
    checked_size(cardinality)?;

    let mut index = 0;
    for (i, (&val, &card)) in assignment.iter().zip(cardinality).enumerate() {
        if val < 1 || val > card {
            return Err(MarginalError::OutOfRange(
                format!("assignment[{}] = {} is not in 1..={}", i, val, card)
            ));
        }

        index = index * card + (val - 1);
    }

    Ok(index)
}


/// Map a zero-based table position back to its assignment.
///
/// # Errors
/// * `MarginalError::OutOfRange` if `index` is not in `0..table_size(cardinality)`, or if the
///   table size overflows a `usize`
pub fn index_to_assignment(index: usize, cardinality: &[usize]) -> Result<Assignment> {
    let size = checked_size(cardinality)?;
    if index >= size {
        return Err(MarginalError::OutOfRange(
            format!("index {} is not in 0..{} for cardinality {:?}", index, size, cardinality)
        ));
    }

    Ok(decode(index, cardinality))
}


/// Iterate over every assignment of a scope with the given cardinality, in index order.
///
/// A table too large to index is enumerated up to position `usize::MAX`.
pub fn all_assignments(cardinality: &[usize]) -> impl Iterator<Item = Assignment> {
    let cardinality = cardinality.to_vec();
    let size = table_size(&cardinality).unwrap_or(std::usize::MAX);
    (0..size).map(move |i| decode(i, &cardinality))
}


// the caller guarantees index < table_size(cardinality), or that the size overflows
fn decode(mut index: usize, cardinality: &[usize]) -> Assignment {
    let mut assignment = vec![0; cardinality.len()];
    for (slot, &card) in assignment.iter_mut().zip(cardinality).rev() {
        *slot = index % card + 1;
        index /= card;
    }
    assignment
}
