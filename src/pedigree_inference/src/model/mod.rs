use crate::{
    pedigree::{Pedigree, PersonId},
    tables::{GeneCount, ProbabilityTables},
    world::World,
};

/// Inheritance model of a pedigree: gene transmission with mutation, and incomplete penetrance.
#[derive(Debug, Clone, Copy)]
pub struct HeredityModel<'a> {
    pedigree: &'a Pedigree,
    tables  : &'a ProbabilityTables,
}

impl<'a> HeredityModel<'a> {
    pub fn new(pedigree: &'a Pedigree, tables: &'a ProbabilityTables) -> Self {
        Self{pedigree, tables}
    }

    pub fn pedigree(&self) -> &'a Pedigree {
        self.pedigree
    }

    pub fn tables(&self) -> &'a ProbabilityTables {
        self.tables
    }

    /// Probability that individual `id` carries `count` copies, given the gene counts of `world`.
    ///
    /// Founders follow the unconditional prior. Offspring receive one copy from each parent, independently,
    /// each parent passing a copy with probability `ProbabilityTables::transmission()`.
    ///
    /// Returns `0.0` if `id` is not part of the pedigree.
    pub fn gene_probability(&self, id: PersonId, count: GeneCount, world: &World) -> f64 {
        let Some(person) = self.pedigree.person(id) else {
            return 0.0
        };
        let Some(parents) = person.parents() else {
            return self.tables.gene[count]
        };

        let pm = self.tables.transmission(world.gene_count(parents.mother));
        let pf = self.tables.transmission(world.gene_count(parents.father));
        match count {
            GeneCount::Zero => (1.0 - pf) * (1.0 - pm),
            GeneCount::One  => pf * (1.0 - pm) + (1.0 - pf) * pm,
            GeneCount::Two  => pf * pm,
        }
    }

    /// Probability that individual `id` expresses (or not) the trait, given `count` copies.
    ///
    /// Returns `0.0` if `id` is not part of the pedigree, or if `has_trait` contradicts its observation.
    pub fn trait_probability(&self, id: PersonId, count: GeneCount, has_trait: bool) -> f64 {
        match self.pedigree.person(id) {
            Some(person) if person.observed_trait().is_some_and(|observed| observed != has_trait) => 0.0,
            Some(_) => self.tables.penetrance[count][has_trait],
            None    => 0.0,
        }
    }

    /// Probability mass of a complete world: the product, over every individual, of its gene and trait
    /// probabilities.
    pub fn joint_probability(&self, world: &World) -> f64 {
        self.pedigree.ids()
            .map(|id| {
                let count = world.gene_count(id);
                self.gene_probability(id, count, world) * self.trait_probability(id, count, world.has_trait(id))
            })
            .product()
    }
}
