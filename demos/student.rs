//! Provides an example of how to use marginal to perform exact inference on a Bayesian Network.
//!
//! Run with `RUST_LOG=marginal=debug` to follow the elimination step by step.

use marginal as m;
use ndarray::array;
use tracing_subscriber::EnvFilter;

fn main() -> m::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let difficulty = m::Variable::new(0);
    let intelligence = m::Variable::new(1);
    let grade = m::Variable::new(2);
    let sat = m::Variable::new(3);
    let letter = m::Variable::new(4);

    let scope = StudentVariables(difficulty, intelligence, grade, sat, letter);

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let model = build_model(scope)?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut evidence = m::Evidence::new();
    evidence.set(&difficulty, 1);
    evidence.set(&letter, 2);
    evidence.set(&sat, 1);

    /////////////////////////////////////////////////////
    // Step 3: Build an inference engine
    let engine = m::VariableEliminationEngine::new(&model, &evidence)?;

    /////////////////////////////////////////////////////
    // Step 4: Run a Conditional Query
    let p = engine.infer(&[intelligence], &[grade])?;

    for assignment in m::all_assignments(p.cardinality()) {
        println!(
            "P(I = {} | D = 1, S = 1, L = 2) = {:.4}",
            assignment[0],
            p.get(&assignment)?
        );
    }

    Ok(())
}

struct StudentVariables(m::Variable, m::Variable, m::Variable, m::Variable, m::Variable);

fn build_model(vars: StudentVariables) -> m::Result<m::Model> {
    let StudentVariables(d, i, g, s, l) = vars;

    ///////////////////////////////////////////////////
    // Step 1: Build CPTs for variables with parents
    let cpt_g = m::Factor::from_table(
        vec![i, d, g],
        array![
            [[0.3, 0.4, 0.3], [0.05, 0.25, 0.7]],
            [[0.9, 0.08, 0.02], [0.5, 0.3, 0.2]]
        ].into_dyn()
    )?;

    let cpt_s = m::Factor::from_table(
        vec![i, s],
        array![
            [0.95, 0.05],
            [0.2, 0.8]
        ].into_dyn()
    )?;

    let cpt_l = m::Factor::from_table(
        vec![g, l],
        array![
            [0.1, 0.9],
            [0.4, 0.6],
            [0.99, 0.01]
        ].into_dyn()
    )?;

    ///////////////////////////////////////////////////
    // Step 2: Build the Model
    let builder = m::ModelBuilder::new()
        .with_factor(m::Initialization::Binomial(0.6).build_cpd((d, 2), &[])?)
        .with_factor(m::Initialization::Binomial(0.7).build_cpd((i, 2), &[])?)
        .with_factor(m::Initialization::Table(cpt_g).build_cpd((g, 3), &[(d, 2), (i, 2)])?)
        .with_factor(m::Initialization::Table(cpt_s).build_cpd((s, 2), &[(i, 2)])?)
        .with_factor(m::Initialization::Table(cpt_l).build_cpd((l, 2), &[(g, 3)])?);

    builder.with_named_variable(d, "D")
           .with_named_variable(i, "I")
           .with_named_variable(g, "G")
           .with_named_variable(s, "S")
           .with_named_variable(l, "L")
           .build()
}
