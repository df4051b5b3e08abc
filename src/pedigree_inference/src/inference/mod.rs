use indicatif::{ProgressBar, ProgressStyle};
use located_error::prelude::*;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{
    model::HeredityModel,
    pedigree::Pedigree,
    posterior::Posteriors,
    tables::ProbabilityTables,
    world::{GeneSetMode, Pruning, Subset, World, WorldEnumerator},
};

mod error;
pub use error::InferenceError;

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} trait sets ({eta})";

/// Exact inference by enumeration, over every candidate world of a pedigree.
///
/// # Example
/// ```
/// use pedigree_inference::{Inference, Pedigree, ProbabilityTables};
/// # fn main() -> anyhow::Result<()> {
/// let mut pedigree = Pedigree::new();
/// pedigree.add_person("Carol", None, Some(true))?;
/// let tables = ProbabilityTables::default();
/// let posteriors = Inference::new(&pedigree, &tables).run()?;
/// assert_eq!(posteriors.get("Carol").map(|p| p.phenotype.present), Some(1.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Inference<'a> {
    pedigree: &'a Pedigree,
    tables  : &'a ProbabilityTables,
    mode    : GeneSetMode,
    pruning : Pruning,
    threads : usize,
    progress: bool,
}

impl<'a> Inference<'a> {
    /// Sequential inference, with independent gene sets, evidence pruning and no progress bar.
    pub fn new(pedigree: &'a Pedigree, tables: &'a ProbabilityTables) -> Self {
        Self{pedigree, tables, mode: GeneSetMode::default(), pruning: Pruning::default(), threads: 1, progress: false}
    }

    #[must_use]
    pub fn gene_sets(mut self, mode: GeneSetMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    /// Number of worker threads. `1` runs sequentially, `0` lets rayon pick.
    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Enumerate every world, accumulate their probability mass and return normalized posteriors.
    ///
    /// # Errors
    /// - if the pedigree is too large to be enumerated.
    /// - if the thread pool cannot be built.
    /// - if some distribution ends up with a null probability mass.
    pub fn run(&self) -> Result<Posteriors> {
        if self.pedigree.is_empty() {
            warn!("Pedigree is empty. Nothing to infer.");
        }
        let enumerator = WorldEnumerator::new(self.pedigree, self.mode, self.pruning)
            .loc("While preparing inference")?;

        let population = enumerator.population();
        let trait_sets = enumerator.count_trait_sets();
        info!("Population size: {population} ({} founders) | Surviving trait sets: {trait_sets} | Worlds: {}",
            self.pedigree.founders().count(), enumerator.count_worlds()
        );
        debug!("Pruned trait sets: {} | Gene set mode: {:?}", (1u64 << population) - trait_sets, self.mode);

        let progress = self.progress_bar(trait_sets)?;
        let model = HeredityModel::new(self.pedigree, self.tables);
        let mut posteriors = match self.threads {
            1 => self.accumulate(&enumerator, &model, &progress),
            _ => self.par_accumulate(&enumerator, &model, &progress)?,
        };
        progress.finish_and_clear();

        posteriors.normalize().loc("While finalizing inference")?;
        Ok(posteriors)
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.progress {
            return Ok(ProgressBar::hidden())
        }
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .map_err(InferenceError::ProgressTemplate)
            .loc("While preparing the progress bar")?
            .progress_chars("=> ");
        let progress = ProgressBar::new(len).with_style(style);
        Ok(match logger::Logger::multi() {
            Some(multi) => multi.add(progress),
            None        => progress,
        })
    }

    /// Single writer accumulation, over the lazy world sequence.
    fn accumulate(&self, enumerator: &WorldEnumerator, model: &HeredityModel, progress: &ProgressBar) -> Posteriors {
        let mut posteriors = Posteriors::new(self.pedigree);
        let mut have_trait: Option<Subset> = None;
        for world in enumerator.worlds() {
            if have_trait != Some(world.have_trait()) {
                have_trait = Some(world.have_trait());
                progress.inc(1);
            }
            posteriors.update(&world, model.joint_probability(&world));
        }
        posteriors
    }

    /// Parallel accumulation: each worker folds whole trait sets into its own partial `Posteriors`, which are
    /// then summed together.
    fn par_accumulate(&self, enumerator: &WorldEnumerator, model: &HeredityModel, progress: &ProgressBar) -> Result<Posteriors> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(InferenceError::BuildThreadPool)
            .loc("While preparing parallel inference")?;
        debug!("Running inference on {} threads", pool.current_num_threads());

        let trait_sets: Vec<Subset> = enumerator.trait_sets().collect();
        let posteriors = pool.install(|| {
            trait_sets.par_iter()
                .fold(|| Posteriors::new(self.pedigree), |mut partial, have_trait| {
                    for (one_gene, two_genes) in enumerator.gene_sets() {
                        let world = World::new(one_gene, two_genes, *have_trait);
                        partial.update(&world, model.joint_probability(&world));
                    }
                    progress.inc(1);
                    partial
                })
                .reduce(|| Posteriors::new(self.pedigree), Posteriors::merge)
        });
        Ok(posteriors)
    }
}
