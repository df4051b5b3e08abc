use located_error::prelude::*;

use super::{EnumeratorError, Evidence, Subset, World};
use crate::pedigree::Pedigree;

/// Largest supported population. `8^21 = 2^63` worlds still fit within a `u64` counter.
pub const MAX_POPULATION: usize = 21;

/// Strategy used to draw the `(one_gene, two_genes)` pairs of each world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneSetMode {
    /// Both sets are drawn independently from the powerset of the population (`4^n` pairs). Overlapping
    /// pairs are kept, and their shared individuals count as single-copy carriers.
    #[default]
    Independent,
    /// Only pairs of non-overlapping sets are drawn (`3^n` pairs): a proper partition into 0, 1 and 2 copies.
    Disjoint,
}

/// Whether trait sets contradicting observations are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pruning {
    #[default]
    Evidence,
    /// Enumerate every trait set. Contradicting worlds then carry a null mass.
    Disabled,
}

/// Lazy, restartable enumeration of every candidate world of a pedigree.
///
/// Trait sets form the outer loop, so that a contradicting trait set is discarded before any of
/// its nested gene set pairs is generated.
#[derive(Debug, Clone, Copy)]
pub struct WorldEnumerator {
    population: usize,
    evidence  : Evidence,
    mode      : GeneSetMode,
    pruning   : Pruning,
}

impl WorldEnumerator {
    /// # Errors
    /// - if the pedigree holds more than `MAX_POPULATION` individuals.
    pub fn new(pedigree: &Pedigree, mode: GeneSetMode, pruning: Pruning) -> Result<Self> {
        let population = pedigree.len();
        if population > MAX_POPULATION {
            return Err(EnumeratorError::PopulationTooLarge{population, max: MAX_POPULATION})
                .loc("While preparing world enumeration")
        }
        Ok(Self{population, evidence: Evidence::from_pedigree(pedigree), mode, pruning})
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    pub fn mode(&self) -> GeneSetMode {
        self.mode
    }

    pub fn pruning(&self) -> Pruning {
        self.pruning
    }

    /// Iterate over every trait set surviving pruning.
    pub fn trait_sets(&self) -> TraitSets {
        TraitSets{next: 0, end: 1 << self.population, evidence: self.evidence, pruning: self.pruning}
    }

    /// Iterate over every `(one_gene, two_genes)` pair.
    pub fn gene_sets(&self) -> GeneSets {
        GeneSets{next: 0, end: 1 << (2 * self.population), population: self.population, mode: self.mode}
    }

    /// Iterate over every world. Each call starts a fresh enumeration.
    pub fn worlds(&self) -> Worlds {
        Worlds{enumerator: *self, trait_sets: self.trait_sets(), have_trait: None, gene_sets: self.gene_sets()}
    }

    pub fn count_trait_sets(&self) -> u64 {
        let free = match self.pruning {
            Pruning::Evidence => self.population - self.evidence.observed().len() as usize,
            Pruning::Disabled => self.population,
        };
        1 << free
    }

    pub fn count_gene_sets(&self) -> u64 {
        let pairs_per_individual: u64 = match self.mode {
            GeneSetMode::Independent => 4,
            GeneSetMode::Disjoint    => 3,
        };
        pairs_per_individual.pow(self.population as u32)
    }

    /// Number of worlds `worlds()` yields, computed without enumerating them.
    pub fn count_worlds(&self) -> u64 {
        self.count_trait_sets() * self.count_gene_sets()
    }
}

/// Trait sets of a population, in increasing mask order.
#[derive(Debug, Clone)]
pub struct TraitSets {
    next    : u64,
    end     : u64,
    evidence: Evidence,
    pruning : Pruning,
}

impl Iterator for TraitSets {
    type Item = Subset;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let have_trait = Subset::from_bits(self.next);
            self.next += 1;
            if self.pruning == Pruning::Disabled || self.evidence.admits(have_trait) {
                return Some(have_trait)
            }
        }
        None
    }
}

/// `(one_gene, two_genes)` pairs of a population. A single counter over `4^n` values is split into
/// two `n`-bits masks: the lower half gives `one_gene`, the upper half `two_genes`.
#[derive(Debug, Clone)]
pub struct GeneSets {
    next      : u64,
    end       : u64,
    population: usize,
    mode      : GeneSetMode,
}

impl Iterator for GeneSets {
    type Item = (Subset, Subset);

    fn next(&mut self) -> Option<Self::Item> {
        let mask = (1u64 << self.population) - 1;
        while self.next < self.end {
            let (one_gene, two_genes) = (self.next & mask, self.next >> self.population);
            self.next += 1;
            if self.mode == GeneSetMode::Independent || one_gene & two_genes == 0 {
                return Some((Subset::from_bits(one_gene), Subset::from_bits(two_genes)))
            }
        }
        None
    }
}

/// Every world of a population: surviving trait sets, each crossed with every gene set pair.
#[derive(Debug, Clone)]
pub struct Worlds {
    enumerator: WorldEnumerator,
    trait_sets: TraitSets,
    have_trait: Option<Subset>,
    gene_sets : GeneSets,
}

impl Iterator for Worlds {
    type Item = World;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(have_trait) = self.have_trait {
                if let Some((one_gene, two_genes)) = self.gene_sets.next() {
                    return Some(World::new(one_gene, two_genes, have_trait))
                }
            }
            self.have_trait = Some(self.trait_sets.next()?);
            self.gene_sets  = self.enumerator.gene_sets();
        }
    }
}
