use thiserror::Error;

#[derive(Error, Debug)]
pub enum PedigreeError {
    #[error("Individual {0} is defined more than once")]
    DuplicatePerson(String),

    #[error("Individual {0} could not be found within the pedigree")]
    UnknownPerson(String),
}
