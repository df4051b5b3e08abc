use std::fmt::{self, Display, Formatter};

use crate::pedigree::PersonId;

/// Subset of a population, encoded as a membership mask over `PersonId` indices.
/// Only the first 64 individuals of a population are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Subset(u64);

impl Subset {
    pub const EMPTY: Subset = Subset(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Check whether `id` belongs to this subset. Ids beyond the capacity of the mask never do.
    #[inline]
    pub fn contains(self, id: PersonId) -> bool {
        1u64.checked_shl(id.index() as u32)
            .is_some_and(|bit| self.0 & bit != 0)
    }

    /// Add `id` to this subset. Returns `false` (and leaves the subset untouched) if `id` is not representable.
    pub fn insert(&mut self, id: PersonId) -> bool {
        match 1u64.checked_shl(id.index() as u32) {
            Some(bit) => {self.0 |= bit; true},
            None      => false,
        }
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersection(self, other: Subset) -> Subset {
        Subset(self.0 & other.0)
    }

    pub fn intersects(self, other: Subset) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Iterate over the members of this subset, in increasing index order.
    pub fn iter(self) -> impl Iterator<Item = PersonId> {
        (0..u64::BITS as usize).filter(move |i| self.0 >> i & 1 == 1).map(PersonId)
    }
}

impl FromIterator<PersonId> for Subset {
    fn from_iter<I: IntoIterator<Item = PersonId>>(iter: I) -> Self {
        let mut subset = Subset::EMPTY;
        for id in iter {
            subset.insert(id);
        }
        subset
    }
}

impl Display for Subset {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, id) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id.index())?;
        }
        write!(f, "}}")
    }
}
