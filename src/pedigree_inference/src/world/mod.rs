use std::fmt::{self, Display, Formatter};

use crate::{pedigree::{Pedigree, PersonId}, tables::GeneCount};

mod subset;
pub use subset::Subset;

mod enumerator;
pub use enumerator::{GeneSetMode, GeneSets, Pruning, TraitSets, WorldEnumerator, Worlds, MAX_POPULATION};

mod error;
pub use error::EnumeratorError;

/// One complete hypothetical assignment of gene counts and trait presence over a population.
/// # Fields:
/// - `one_gene`  : individuals carrying a single copy.
/// - `two_genes` : individuals carrying two copies. Individuals within neither set carry none.
/// - `have_trait`: individuals expressing the trait.
///
/// Individuals belonging to both `one_gene` and `two_genes` are assigned a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct World {
    one_gene  : Subset,
    two_genes : Subset,
    have_trait: Subset,
}

impl World {
    pub fn new(one_gene: Subset, two_genes: Subset, have_trait: Subset) -> Self {
        Self{one_gene, two_genes, have_trait}
    }

    pub fn one_gene(&self) -> Subset {
        self.one_gene
    }

    pub fn two_genes(&self) -> Subset {
        self.two_genes
    }

    pub fn have_trait(&self) -> Subset {
        self.have_trait
    }

    /// Number of gene copies assumed for `id` within this world.
    #[inline]
    pub fn gene_count(&self, id: PersonId) -> GeneCount {
        if self.one_gene.contains(id) {
            GeneCount::One
        } else if self.two_genes.contains(id) {
            GeneCount::Two
        } else {
            GeneCount::Zero
        }
    }

    #[inline]
    pub fn has_trait(&self, id: PersonId) -> bool {
        self.have_trait.contains(id)
    }

    /// A world is degenerate when some individual is listed as carrying both one and two copies.
    pub fn is_degenerate(&self) -> bool {
        self.one_gene.intersects(self.two_genes)
    }
}

impl Display for World {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "one_gene: {} - two_genes: {} - have_trait: {}", self.one_gene, self.two_genes, self.have_trait)
    }
}

/// Observed trait values of a population.
/// # Fields:
/// - `observed`: individuals whose trait presence is known.
/// - `present` : individuals known to express the trait. Always a subset of `observed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evidence {
    observed: Subset,
    present : Subset,
}

impl Evidence {
    pub fn from_pedigree(pedigree: &Pedigree) -> Self {
        let mut evidence = Self::default();
        for (id, person) in pedigree.iter() {
            if let Some(has_trait) = person.observed_trait() {
                evidence.observed.insert(id);
                if has_trait {
                    evidence.present.insert(id);
                }
            }
        }
        evidence
    }

    pub fn observed(&self) -> Subset {
        self.observed
    }

    pub fn present(&self) -> Subset {
        self.present
    }

    /// Check that a candidate trait set agrees with every observation.
    #[inline]
    pub fn admits(&self, have_trait: Subset) -> bool {
        have_trait.intersection(self.observed) == self.present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common;

    #[test]
    fn gene_count_precedence() {
        let world = World::new(Subset::from_bits(0b011), Subset::from_bits(0b110), Subset::EMPTY);
        assert_eq!(world.gene_count(PersonId(0)), GeneCount::One);
        assert_eq!(world.gene_count(PersonId(1)), GeneCount::One);
        assert_eq!(world.gene_count(PersonId(2)), GeneCount::Two);
        assert_eq!(world.gene_count(PersonId(3)), GeneCount::Zero);
        assert!(world.is_degenerate());
        assert!(!World::new(Subset::from_bits(0b01), Subset::from_bits(0b10), Subset::EMPTY).is_degenerate());
    }

    #[test]
    fn evidence() {
        // Harry: unknown, James: present, Lily: absent.
        let evidence = Evidence::from_pedigree(&common::mock_family0());
        assert_eq!(evidence.observed(), Subset::from_bits(0b110));
        assert_eq!(evidence.present(), Subset::from_bits(0b010));

        assert!(evidence.admits(Subset::from_bits(0b010)));
        assert!(evidence.admits(Subset::from_bits(0b011)));
        assert!(!evidence.admits(Subset::from_bits(0b000)));
        assert!(!evidence.admits(Subset::from_bits(0b110)));
    }

    #[test]
    fn no_evidence_admits_everything() {
        let evidence = Evidence::from_pedigree(&common::mock_founders());
        assert!((0..4).map(Subset::from_bits).all(|traits| evidence.admits(traits)));
    }
}
