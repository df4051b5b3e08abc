//! Exact Bayesian inference of gene copy counts and trait presence within a pedigree.
//!
//! Every joint assignment ("world") of gene copies and trait presence over the pedigree is
//! enumerated, weighted by its probability under an inheritance model with mutation and incomplete
//! penetrance, and accumulated into per-individual posterior distributions.

use log::info;
use located_error::prelude::*;

pub mod pedigree;
pub mod tables;
pub mod world;
pub mod model;
pub mod posterior;
pub mod inference;
pub mod io;

pub use pedigree::{Pedigree, Person, PersonId};
pub use tables::{GeneCount, ProbabilityTables};
pub use world::{GeneSetMode, Pruning, World, WorldEnumerator};
pub use model::HeredityModel;
pub use posterior::{Posterior, Posteriors};
pub use inference::Inference;
pub use io::PosteriorWriter;

#[cfg(test)]
mod tests;

/// Load probability tables, either from a user-provided file or from defaults, and apply the
/// requested mutation rate override.
///
/// # Errors
/// - if the tables cannot be loaded, or if the mutation rate is not a probability.
pub fn load_tables(args: &parser::Infer) -> Result<ProbabilityTables> {
    let tables = match &args.tables {
        Some(path) => ProbabilityTables::from_yaml(path)?,
        None       => ProbabilityTables::default(),
    };
    match args.mutation_rate {
        Some(rate) => tables.with_mutation_rate(rate).loc("While applying --mutation-rate"),
        None       => Ok(tables),
    }
}

/// Run inference on the pedigree of `args.data`, and write posteriors to stdout or `--output-dir`.
///
/// # Errors
/// - if the pedigree or probability tables cannot be loaded.
/// - if inference fails.
/// - if results cannot be written.
pub fn run(args: &parser::Infer) -> Result<Posteriors> {
    // ---- Check the output location first, to fail early.
    let output_file = args.output_file()?;

    let tables = load_tables(args)?;
    info!("Parsing pedigree definition file {}", args.data.display());
    let pedigree = pedigree::parser::pedigree_parser(&args.data)?;

    let gene_sets = if args.disjoint_gene_sets {GeneSetMode::Disjoint} else {GeneSetMode::Independent};
    let pruning   = if args.no_pruning {Pruning::Disabled} else {Pruning::Evidence};
    let posteriors = Inference::new(&pedigree, &tables)
        .gene_sets(gene_sets)
        .pruning(pruning)
        .threads(args.threads)
        .progress(args.progress)
        .run()?;

    if let Some(path) = &output_file {
        info!("Writing posteriors to {}", path.display());
    }
    PosteriorWriter::new(output_file.as_ref())?.write(&posteriors, args.format)?;
    Ok(posteriors)
}
