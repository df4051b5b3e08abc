use std::fmt::{self, Display, Formatter};

/// Space padding of `Person::name` when displayed
const NAME_DISPLAY_LEN: usize = 10;

/// Index of an individual within its `Pedigree`. Follows the order of insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Both parents of a non-founder individual. Single-parent individuals are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub mother: PersonId,
    pub father: PersonId,
}

/// Pedigree individual.
/// # Fields:
/// - `name`          : unique name of the individual.
/// - `parents`       : `None` if the individual is a founder.
/// - `observed_trait`: `Some(presence)` if the trait was observed, `None` if unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    name          : String,
    parents       : Option<Parents>,
    observed_trait: Option<bool>,
}

impl Person {
    pub fn new(name: &str, parents: Option<Parents>, observed_trait: Option<bool>) -> Self {
        Self{name: name.to_string(), parents, observed_trait}
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> Option<&Parents> {
        self.parents.as_ref()
    }

    pub(crate) fn set_parents(&mut self, parents: Parents) {
        self.parents = Some(parents);
    }

    pub fn observed_trait(&self) -> Option<bool> {
        self.observed_trait
    }

    /// Check whether or not this individual is a founder. Returns `true` if `self.parents == None`
    #[inline(always)]
    pub fn is_founder(&self) -> bool {
        self.parents.is_none()
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let observed = match self.observed_trait {
            Some(true)  => "present",
            Some(false) => "absent",
            None        => "unknown",
        };
        write!(f, "name: {: <NAME_DISPLAY_LEN$} - trait: {observed}", self.name)
    }
}
