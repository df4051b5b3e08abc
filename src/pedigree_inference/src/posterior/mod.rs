use std::fmt::{self, Display, Formatter};

use located_error::prelude::*;

use crate::{
    pedigree::{Pedigree, PersonId},
    tables::{GeneCount, GeneTable, TraitTable},
    world::World,
};

mod error;
pub use error::PosteriorError;

/// Accumulated probability mass of a single individual.
/// # Fields:
/// - `gene`     : mass per gene count.
/// - `phenotype`: mass per trait presence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Posterior {
    pub gene     : GeneTable<f64>,
    pub phenotype: TraitTable<f64>,
}

impl Posterior {
    fn add(&mut self, count: GeneCount, has_trait: bool, mass: f64) {
        self.gene[count] += mass;
        self.phenotype[has_trait] += mass;
    }

    fn merge(&mut self, other: &Posterior) {
        for count in GeneCount::ALL {
            self.gene[count] += other.gene[count];
        }
        for has_trait in [true, false] {
            self.phenotype[has_trait] += other.phenotype[has_trait];
        }
    }

    fn gene_mass(&self) -> f64 {
        self.gene.iter().map(|(_, mass)| mass).sum()
    }

    fn phenotype_mass(&self) -> f64 {
        self.phenotype.present + self.phenotype.absent
    }
}

/// Per-individual posterior distributions of a pedigree, indexed by `PersonId`.
///
/// Created empty for each inference run. Worlds are added through `update()`, partial accumulators are
/// combined with `merge()`, and `normalize()` turns the accumulated mass into distributions.
#[derive(Debug, Clone, PartialEq)]
pub struct Posteriors {
    names: Vec<String>,
    inner: Vec<Posterior>,
}

impl Posteriors {
    /// Instantiate a zeroed accumulator, for every individual of `pedigree`.
    pub fn new(pedigree: &Pedigree) -> Self {
        let names = pedigree.iter().map(|(_, person)| person.name().to_string()).collect::<Vec<_>>();
        let inner = vec![Posterior::default(); names.len()];
        Self{names, inner}
    }

    /// Add the probability `mass` of `world` to the gene count and trait bucket each individual takes within it.
    pub fn update(&mut self, world: &World, mass: f64) {
        for (i, posterior) in self.inner.iter_mut().enumerate() {
            let id = PersonId(i);
            posterior.add(world.gene_count(id), world.has_trait(id), mass);
        }
    }

    /// Sum two partial accumulators of the same pedigree.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (posterior, partial) in self.inner.iter_mut().zip(other.inner.iter()) {
            posterior.merge(partial);
        }
        self
    }

    /// Rescale each distribution of each individual, so that it sums to one.
    ///
    /// # Errors
    /// - if any distribution carries a null mass. Every divisor is checked beforehand, so that no distribution is
    ///   left normalized when this happens.
    pub fn normalize(&mut self) -> Result<()> {
        for (name, posterior) in self.names.iter().zip(self.inner.iter()) {
            for (field, mass) in [("gene", posterior.gene_mass()), ("trait", posterior.phenotype_mass())] {
                if mass == 0.0 {
                    return Err(PosteriorError::ZeroMass{person: name.clone(), field})
                        .loc("While normalizing posterior distributions")
                }
            }
        }

        for posterior in &mut self.inner {
            let gene_mass = posterior.gene_mass();
            for count in GeneCount::ALL {
                posterior.gene[count] /= gene_mass;
            }
            let phenotype_mass = posterior.phenotype_mass();
            posterior.phenotype.present /= phenotype_mass;
            posterior.phenotype.absent  /= phenotype_mass;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Posterior> {
        self.names.iter().position(|n| n == name).map(|i| &self.inner[i])
    }

    pub fn by_id(&self, id: PersonId) -> Option<&Posterior> {
        self.inner.get(id.index())
    }

    /// Iterate over `(name, posterior)` pairs, in pedigree order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Posterior)> {
        self.names.iter().map(String::as_str).zip(self.inner.iter())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Display for Posteriors {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (name, posterior) in self.iter() {
            writeln!(f, "{name}:")?;
            writeln!(f, "  Gene:")?;
            for count in GeneCount::ALL.iter().rev() {
                writeln!(f, "    {count}: {:.4}", posterior.gene[*count])?;
            }
            writeln!(f, "  Trait:")?;
            writeln!(f, "    True: {:.4}", posterior.phenotype.present)?;
            writeln!(f, "    False: {:.4}", posterior.phenotype.absent)?;
        }
        Ok(())
    }
}
