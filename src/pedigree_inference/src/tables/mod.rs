use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    io::Read,
    ops::{Index, IndexMut},
    path::Path,
};

use located_error::prelude::*;
use serde::{Serialize, Deserialize};

mod error;
pub use error::TablesError;

/// Maximal absolute deviation from 1.0 tolerated when checking that a distribution sums to one.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Number of copies of the allele of interest carried by an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    /// All gene counts, in increasing order.
    pub const ALL: [GeneCount; 3] = [Self::Zero, Self::One, Self::Two];

    pub fn copies(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One  => 1,
            Self::Two  => 2,
        }
    }
}

impl Display for GeneCount {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.copies())
    }
}

/// One value of type `T` for each possible `GeneCount`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneTable<T> {
    pub zero: T,
    pub one : T,
    pub two : T,
}

impl<T> GeneTable<T> {
    pub fn new(zero: T, one: T, two: T) -> Self {
        Self{zero, one, two}
    }

    /// Iterate over `(GeneCount, value)` pairs, in increasing gene count order.
    pub fn iter(&self) -> impl Iterator<Item = (GeneCount, &T)> {
        GeneCount::ALL.into_iter().map(move |count| (count, &self[count]))
    }
}

impl<T> Index<GeneCount> for GeneTable<T> {
    type Output = T;
    fn index(&self, count: GeneCount) -> &Self::Output {
        match count {
            GeneCount::Zero => &self.zero,
            GeneCount::One  => &self.one,
            GeneCount::Two  => &self.two,
        }
    }
}

impl<T> IndexMut<GeneCount> for GeneTable<T> {
    fn index_mut(&mut self, count: GeneCount) -> &mut Self::Output {
        match count {
            GeneCount::Zero => &mut self.zero,
            GeneCount::One  => &mut self.one,
            GeneCount::Two  => &mut self.two,
        }
    }
}

/// One value of type `T` for each state of the trait. Indexed by trait presence (`bool`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitTable<T> {
    pub present: T,
    pub absent : T,
}

impl<T> TraitTable<T> {
    pub fn new(present: T, absent: T) -> Self {
        Self{present, absent}
    }
}

impl<T> Index<bool> for TraitTable<T> {
    type Output = T;
    fn index(&self, has_trait: bool) -> &Self::Output {
        match has_trait {
            true  => &self.present,
            false => &self.absent,
        }
    }
}

impl<T> IndexMut<bool> for TraitTable<T> {
    fn index_mut(&mut self, has_trait: bool) -> &mut Self::Output {
        match has_trait {
            true  => &mut self.present,
            false => &mut self.absent,
        }
    }
}

/// Static parameters of the inheritance model.
/// # Fields:
/// - `gene`      : unconditional prior distribution over gene copies. (founders)
/// - `penetrance`: distribution of trait presence, given the number of gene copies.
///                 Serialized under the `trait` key.
/// - `mutation`  : probability that a transmitted copy flips, from mutated to wild-type or vice-versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTables {
    pub gene: GeneTable<f64>,
    #[serde(rename = "trait")]
    pub penetrance: GeneTable<TraitTable<f64>>,
    pub mutation: f64,
}

impl Default for ProbabilityTables {
    fn default() -> Self {
        Self {
            gene: GeneTable::new(0.96, 0.03, 0.01),
            penetrance: GeneTable::new(
                TraitTable::new(0.01, 0.99),
                TraitTable::new(0.56, 0.44),
                TraitTable::new(0.65, 0.35),
            ),
            mutation: 0.01,
        }
    }
}

impl ProbabilityTables {
    /// Load and validate a set of probability tables from a `.yaml` file.
    ///
    /// # Errors
    /// - if `path` cannot be opened.
    /// - if the file contents cannot be deserialized, or describe invalid distributions.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let loc_msg = || format!("While loading probability tables from {}", path.display());
        let file = File::open(path).map_err(TablesError::OpenFile).with_loc(loc_msg)?;
        Self::from_reader(file).with_loc(loc_msg)
    }

    /// Deserialize and validate a set of probability tables from any yaml source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let tables: Self = serde_yaml::from_reader(reader)
            .map_err(TablesError::Deserialize)
            .loc("While parsing probability tables")?;
        tables.validate().loc("While validating probability tables")?;
        Ok(tables)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(TablesError::Serialize)
            .loc("While serializing probability tables")
    }

    /// Replace the mutation rate of these tables.
    ///
    /// # Errors
    /// - if `rate` does not lie within [0, 1]
    pub fn with_mutation_rate(mut self, rate: f64) -> Result<Self, TablesError> {
        self.mutation = Self::check_probability("mutation", rate)?;
        Ok(self)
    }

    /// Ensure every entry is a probability, and that the gene prior and each penetrance row sum to one.
    pub fn validate(&self) -> Result<(), TablesError> {
        Self::check_distribution("gene", self.gene.iter().map(|(count, p)| (format!("gene.{count}"), *p)))?;
        for (count, row) in self.penetrance.iter() {
            Self::check_distribution(&format!("trait.{count}"), [
                (format!("trait.{count}.present"), row.present),
                (format!("trait.{count}.absent"), row.absent),
            ])?;
        }
        Self::check_probability("mutation", self.mutation)?;
        Ok(())
    }

    fn check_probability(field: &str, value: f64) -> Result<f64, TablesError> {
        match (0.0..=1.0).contains(&value) {
            true  => Ok(value),
            false => Err(TablesError::NotAProbability{field: field.to_string(), value})
        }
    }

    fn check_distribution(field: &str, entries: impl IntoIterator<Item = (String, f64)>) -> Result<(), TablesError> {
        let mut sum = 0.0;
        for (entry, value) in entries {
            sum += Self::check_probability(&entry, value)?;
        }
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(TablesError::DoesNotSumToOne{field: field.to_string(), sum})
        }
        Ok(())
    }

    /// Probability that a parent carrying `parent` copies passes a copy of the allele to its offspring.
    /// - `0` copies: only through mutation.
    /// - `2` copies: unless mutated.
    /// - `1` copy  : either copy is inherited with equal odds, and mutations in both directions cancel out.
    pub fn transmission(&self, parent: GeneCount) -> f64 {
        match parent {
            GeneCount::Zero => self.mutation,
            GeneCount::One  => 0.5,
            GeneCount::Two  => 1.0 - self.mutation,
        }
    }
}
