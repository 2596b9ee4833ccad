//! Module containing initialization routines for the tables of a model.
//!
//! `Variable`s do not know their own cardinality, so every scope handed to an `Initialization` is
//! a list of ```(Variable, cardinality)``` pairs.

use crate::factor::{Factor, Table};
use crate::util::{MarginalError, Result};
use crate::variable::Variable;

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tolerance used when checking that user supplied parameters form a distribution
const TOLERANCE: f64 = 0.001;

/// Defines possible ways to initialize a `Factor`'s table.
pub enum Initialization<'a> {
    /// A uniform distribution over all possibilities
    Uniform,

    /// Randomly initialize the weights of the table.
    Random,

    /// Randomly initialize the weights of the table from a seeded generator, so that the same
    /// seed always produces the same table.
    Seeded(u64),

    /// Initialize the table as a Binomial distribution with parameter ```p```.
    /// Note that this `Initialization` is valid only for a binary `Variable` with no parents.
    Binomial(f64),

    /// Initialize the table as a Multinomial distribution with parameters ```p_1, p_2...```.
    /// Note that this `Initialization` is valid only for a `Variable` with no parents.
    Multinomial(&'a [f64]),

    /// User defined table
    Table(Factor)
}


impl<'a> Initialization<'a> {

    /// Construct a conditional probability distribution ```P(var | parents)```
    ///
    /// # Args
    /// * `var`: the child `Variable` and its cardinality
    /// * `parents`: the parent `Variable`s and their cardinalities
    ///
    /// # Returns
    /// a `Factor` with scope ```parents ++ [var]```. For every assignment to the parents, the
    /// values over `var` sum to one.
    pub fn build_cpd(self, var: (Variable, usize), parents: &[(Variable, usize)]) -> Result<Factor> {
        let mut scope: Vec<(Variable, usize)> = parents.to_vec();
        scope.push(var);

        ///////////////////////////////////////////////////////////////////////////////
        // Trivial cases

        // if this is a user defined factor, it just needs to be verified and returned
        if let Initialization::Table(f) = self {
            let f = matching_table(f, &scope)?;
            let rows = f.table().lanes(nd::Axis(scope.len() - 1));
            if rows.into_iter().any(|row| (row.sum() - 1.0).abs() > TOLERANCE) {
                return Err(MarginalError::InvalidInitialization(
                    String::from("the table is not a conditional probability distribution")
                ));
            }
            return Ok(f);
        }

        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if ! parents.is_empty() {
            match self {

                // A binomial/multinomial on a non-unit scope
                Initialization::Binomial(_) | Initialization::Multinomial(_) => {
                    return Err(MarginalError::InvalidInitialization(
                        String::from("binomial and multinomial tables cannot have parents")
                    ));
                },

                _ => ()
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build the table and normalize every row over `var`
        let mut factor = self.build_factor(&scope)?;
        let ax = nd::Axis(scope.len() - 1);

        let mut tbl = factor.table().clone();
        for mut row in tbl.lanes_mut(ax) {
            let z = row.sum();
            row.mapv_inplace(|e| e / z);
        }
        factor = Factor::from_table(factor.scope().to_vec(), tbl)?;

        Ok(factor)
    }

    /// Construct a factor, initialized based on ```self```
    ///
    /// # Args
    /// * `scope`: the `Variable`s over which to build the `Factor`, and their cardinalities
    ///
    /// # Returns
    /// a `Factor` over `scope`, in the given order, whose values sum to one.
    pub fn build_factor(self, scope: &[(Variable, usize)]) -> Result<Factor> {
        ///////////////////////////////////////////////////////////////////////////////
        // Trivial cases

        if scope.is_empty() {
            return Err(MarginalError::ShapeMismatch(
                String::from("cannot initialize a factor with an empty scope")
            ));
        }

        // if this is a user defined factor, it just needs to be verified and returned
        if let Initialization::Table(f) = self {
            return matching_table(f, scope);
        }

        ///////////////////////////////////////////////////////////////////////////////
        // Check for errors
        if scope.len() == 1 {
            let (_, card) = scope[0];

            match self {

                // A binomial distribution on a non-binary variable
                Initialization::Binomial(_) if card != 2 => {
                    return Err(MarginalError::InvalidInitialization(
                        format!("a binomial needs a binary variable, not cardinality {}", card)
                    ));
                },

                Initialization::Binomial(p) if p < 0.0 || p > 1.0 => {
                    return Err(MarginalError::InvalidInitialization(
                        format!("{} is not a probability", p)
                    ));
                },

                // A multinomial distribution with an incorrect number of parameters
                Initialization::Multinomial(ps) if ps.len() != card => {
                    return Err(MarginalError::InvalidInitialization(
                        format!("{} parameters for a variable of cardinality {}", ps.len(), card)
                    ));
                },

                Initialization::Multinomial(ps) if (ps.iter().sum::<f64>() - 1.0).abs() > TOLERANCE => {
                    return Err(MarginalError::InvalidInitialization(
                        String::from("multinomial parameters must sum to one")
                    ));
                },

                _ => ()
            }
        } else {
            match self {

                // A binomial/multinomial on a non-unit scope
                Initialization::Binomial(_) | Initialization::Multinomial(_) => {
                    return Err(MarginalError::InvalidInitialization(
                        String::from("binomial and multinomial tables have a single variable")
                    ));
                },

                _ => ()
            }
        }

        ///////////////////////////////////////////////////////////////////////////////
        // now, build factor
        let vars: Vec<Variable> = scope.iter().map(|&(v, _)| v).collect();
        let shape: Vec<usize> = scope.iter().map(|&(_, c)| c).collect();

        let tbl: Table = match self {
            Initialization::Uniform => {
                // normalizing constant is just the number of elements
                let z: usize = shape.iter().product();
                let val = 1. / (z as f64);
                Table::from_elem(shape, val)
            },
            Initialization::Random => {
                let mut tbl = Table::random(shape, Uniform::new(1.0, 100.0));
                let z = tbl.sum();
                tbl.mapv_inplace(|e| e / z);
                tbl
            },
            Initialization::Seeded(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut tbl = Table::random_using(shape, Uniform::new(1.0, 100.0), &mut rng);
                let z = tbl.sum();
                tbl.mapv_inplace(|e| e / z);
                tbl
            },
            Initialization::Binomial(p) => {
                nd::arr1(&[p, 1.0 - p]).into_dyn()
            },
            Initialization::Multinomial(p) => {
                nd::Array1::from(p.to_vec()).into_dyn()
            },
            Initialization::Table(_) => {
                return Err(MarginalError::InvalidInitialization(
                    String::from("user tables are verified, not built")
                ));
            }
        };

        Factor::from_table(vars, tbl)
    }
}


// verify a user supplied factor covers exactly `scope`, and lay it out in the order of `scope`
fn matching_table(f: Factor, scope: &[(Variable, usize)]) -> Result<Factor> {
    if f.scope().len() != scope.len() {
        return Err(MarginalError::ShapeMismatch(
            format!("the table has scope {:?}, expected {} variables", f.scope(), scope.len())
        ));
    }

    for &(v, card) in scope.iter() {
        match f.cardinality_of(&v) {
            None => return Err(MarginalError::VariableNotInScope(v)),
            Some(c) if c != card => {
                return Err(MarginalError::CardinalityMismatch { variable: v, left: card, right: c });
            },
            _ => ()
        }
    }

    let order: Vec<Variable> = scope.iter().map(|&(v, _)| v).collect();
    f.permute(&order)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::all_assignments;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn scope(cards: &[usize]) -> Vec<(Variable, usize)> {
        cards.iter().enumerate().map(|(i, &c)| (Variable::new(i as u32), c)).collect()
    }

    #[test]
    fn empty_scope() {
        assert!(Initialization::Uniform.build_factor(&[]).is_err());
        assert!(Initialization::Random.build_factor(&[]).is_err());
        assert!(Initialization::Binomial(0.5).build_factor(&[]).is_err());
        assert!(Initialization::Multinomial(&[0.333, 0.333, 0.334]).build_factor(&[]).is_err());
    }


    #[test]
    fn invalid_scope_subset() {
        let s = scope(&[3, 2]);
        let tbl = array![[0.1, 0.2], [0.3, 0.1], [0.2, 0.1]].into_dyn();
        let f = Factor::from_table(vec![s[0].0, s[1].0], tbl).unwrap();

        assert!(Initialization::Table(f).build_factor(&s[..1]).is_err());
    }


    #[test]
    fn invalid_scope_superset() {
        let s = scope(&[3, 2, 2]);
        let tbl = array![[0.1, 0.2], [0.3, 0.1], [0.2, 0.1]].into_dyn();
        let f = Factor::from_table(vec![s[0].0, s[1].0], tbl).unwrap();

        assert!(Initialization::Table(f).build_factor(&s).is_err());
    }


    #[test]
    fn invalid_cardinality() {
        let s = scope(&[3, 3]);
        let tbl = array![[0.1, 0.2], [0.3, 0.1], [0.2, 0.1]].into_dyn();
        let f = Factor::from_table(vec![s[0].0, s[1].0], tbl).unwrap();

        match Initialization::Table(f).build_factor(&s) {
            Err(MarginalError::CardinalityMismatch { left, right, .. }) => assert_eq!((left, right), (3, 2)),
            _ => panic!("wrong error type")
        };
    }


    #[test]
    fn random_init() {
        let s = scope(&[2, 10, 3]);

        let factor = Initialization::Random.build_factor(&s).unwrap();
        assert_eq!(factor.cardinality(), &[2, 10, 3]);
        assert_abs_diff_eq!(factor.total(), 1.0, epsilon = 1e-9);
        assert!(factor.values().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn seeded_init() {
        let s = scope(&[2, 4]);

        let f1 = Initialization::Seeded(17).build_factor(&s).unwrap();
        let f2 = Initialization::Seeded(17).build_factor(&s).unwrap();
        let f3 = Initialization::Seeded(18).build_factor(&s).unwrap();

        assert_eq!(f1, f2);
        assert!(f1 != f3);
        assert_abs_diff_eq!(f1.total(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn uniform_init() {
        let s = scope(&[2, 10, 3]);

        let factor = Initialization::Uniform.build_factor(&s).unwrap();
        let expected = 1.0 / 60.0;
        for assn in all_assignments(factor.cardinality()) {
            assert_abs_diff_eq!(expected, factor.get(&assn).unwrap(), epsilon = std::f64::EPSILON);
        }
    }

    #[test]
    fn binomial_init() {
        let s = scope(&[2]);

        let factor = Initialization::Binomial(0.25).build_factor(&s).unwrap();
        assert_eq!(factor.values(), vec![0.25, 0.75]);

        assert!(Initialization::Binomial(0.25).build_factor(&scope(&[3])).is_err());
        assert!(Initialization::Binomial(1.25).build_factor(&s).is_err());
        assert!(Initialization::Binomial(0.25).build_factor(&scope(&[2, 2])).is_err());
    }

    #[test]
    fn multinomial_init() {
        let s = scope(&[3]);

        let factor = Initialization::Multinomial(&[ 0.1, 0.7, 0.2 ]).build_factor(&s).unwrap();
        assert_eq!(factor.values(), vec![0.1, 0.7, 0.2]);

        match Initialization::Multinomial(&[ 0.1, 0.9 ]).build_factor(&s) {
            Err(MarginalError::InvalidInitialization(_)) => (),
            _ => panic!("wrong error type")
        };
        assert!(Initialization::Multinomial(&[ 0.1, 0.1, 0.1 ]).build_factor(&s).is_err());
    }

    #[test]
    fn factor_init() {
        let s = scope(&[3, 2]);
        let tbl = array![[0.1, 0.2], [0.3, 0.1], [0.2, 0.1]].into_dyn();

        // the user table is laid out as (B, A); the result follows the requested scope (A, B)
        let f = Factor::from_table(vec![s[1].0, s[0].0], tbl.t().to_owned()).unwrap();
        let factor = Initialization::Table(f).build_factor(&s).unwrap();

        assert_eq!(factor.scope(), &[s[0].0, s[1].0]);
        assert_eq!(factor.values(), vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.1]);
    }

    #[test]
    fn cpd_uniform() {
        let s = scope(&[3, 2, 4]);
        let cpd = Initialization::Uniform.build_cpd(s[2], &s[..2]).unwrap();

        assert_eq!(cpd.scope(), &[s[0].0, s[1].0, s[2].0]);
        for v in cpd.values() {
            assert_abs_diff_eq!(v, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn cpd_random_rows() {
        let s = scope(&[3, 2]);
        let cpd = Initialization::Seeded(3).build_cpd(s[1], &s[..1]).unwrap();

        let values = cpd.values();
        for row in values.chunks(2) {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cpd_root() {
        let s = scope(&[2]);
        let cpd = Initialization::Binomial(0.2).build_cpd(s[0], &[]).unwrap();
        assert_eq!(cpd.values(), vec![0.2, 0.8]);

        let s = scope(&[2, 2]);
        assert!(Initialization::Binomial(0.2).build_cpd(s[1], &s[..1]).is_err());
    }

    #[test]
    fn cpd_table() {
        let s = scope(&[2, 2]);
        let f = Factor::new(vec![s[0].0, s[1].0], vec![2, 2], vec![0.9, 0.1, 0.3, 0.7]).unwrap();
        let cpd = Initialization::Table(f.clone()).build_cpd(s[1], &s[..1]).unwrap();
        assert_eq!(cpd, f);

        // rows over the child do not sum to one
        let f = Factor::new(vec![s[0].0, s[1].0], vec![2, 2], vec![0.9, 0.3, 0.1, 0.7]).unwrap();
        assert!(Initialization::Table(f.clone()).build_cpd(s[0], &s[1..]).is_ok());
        assert!(Initialization::Table(f).build_cpd(s[1], &s[..1]).is_err());
    }
}
