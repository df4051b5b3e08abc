use std::fmt::{self, Display, Formatter};

use ahash::AHashMap;
use located_error::prelude::*;

mod person;
pub use person::{Parents, Person, PersonId};

pub mod parser;

mod error;
pub use error::PedigreeError;

/// A family tree.
/// # Fields:
/// - `persons`: Every member of the pedigree (founders and offspring), in order of insertion.
///              A `PersonId` is an index within this vector.
/// - `index`  : Name -> `PersonId` lookup table.
#[derive(Debug, Clone, Default)]
pub struct Pedigree {
    persons: Vec<Person>,
    index  : AHashMap<String, PersonId>,
}

impl Pedigree {
    /// Instantiate a blank pedigree.
    pub fn new() -> Pedigree {
        Pedigree::default()
    }

    /// Instantiate and include a new individual within this pedigree.
    /// # Arguments:
    /// - `name`          : unique name of the individual.
    /// - `parents`       : Optional names of the parents, as `(mother, father)`. These must already be
    ///                     part of the pedigree. Use `set_parents()` to link parents defined afterwards.
    /// - `observed_trait`: Optional trait observation.
    ///
    /// # Errors
    /// - if `name` is already in use.
    /// - if any of the parents cannot be found.
    pub fn add_person(&mut self, name: &str, parents: Option<(&str, &str)>, observed_trait: Option<bool>) -> Result<PersonId> {
        if self.index.contains_key(name) {
            return Err(PedigreeError::DuplicatePerson(name.to_string())).loc("While adding an individual to the pedigree")
        }
        let parents = parents.map(|parents| self.resolve_parents(parents)).transpose()
            .with_loc(|| format!("While attempting to assign the parents of {name}"))?;

        let id = PersonId(self.persons.len());
        self.persons.push(Person::new(name, parents, observed_trait));
        self.index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Define the parents of a given individual.
    /// # Arguments:
    /// - `name`   : name of the target individual.
    /// - `parents`: names of the target individual's parents, as `(mother, father)`
    ///
    /// # Errors
    /// - if the target individual, or any of the parents cannot be found.
    pub fn set_parents(&mut self, name: &str, parents: (&str, &str)) -> Result<()> {
        let loc_msg = || format!("While attempting to assign the parents of {name}");
        let parents = self.resolve_parents(parents).with_loc(loc_msg)?;
        let id = self.id(name).with_loc(loc_msg)?;
        self.persons[id.0].set_parents(parents);
        Ok(())
    }

    fn resolve_parents(&self, (mother, father): (&str, &str)) -> Result<Parents, PedigreeError> {
        Ok(Parents{mother: self.id(mother)?, father: self.id(father)?})
    }

    /// Lookup the `PersonId` of an individual, using its name.
    pub fn id(&self, name: &str) -> Result<PersonId, PedigreeError> {
        self.index.get(name).copied().ok_or_else(|| PedigreeError::UnknownPerson(name.to_string()))
    }

    /// Access an individual. `None` if `id` is not part of this pedigree.
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(id.0)
    }

    /// Access an individual, using its name.
    pub fn get(&self, name: &str) -> Option<&Person> {
        self.index.get(name).and_then(|id| self.person(*id))
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Iterate over the ids of every individual, in order of insertion.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.persons.len()).map(PersonId)
    }

    /// Iterate over every individual, in order of insertion.
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.persons.iter().enumerate().map(|(i, person)| (PersonId(i), person))
    }

    pub fn founders(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| person.is_founder())
    }

    pub fn offsprings(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| !person.is_founder())
    }

    /// Name of an individual. Falls back to the `PersonId` representation for unknown ids.
    pub fn name(&self, id: PersonId) -> String {
        self.person(id).map_or_else(|| id.to_string(), |person| person.name().to_string())
    }
}

impl Display for Pedigree {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.persons.iter().try_for_each(|person| {
            let parents = match person.parents() {
                Some(parents) => format!("{} <-> {}", self.name(parents.mother), self.name(parents.father)),
                None          => "None".to_string(),
            };
            writeln!(f, "{person} - parents: {parents}")
        })
    }
}
