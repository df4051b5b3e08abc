use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnumeratorError {
    #[error("Cannot enumerate the worlds of a {population} individuals pedigree. At most {max} individuals are supported")]
    PopulationTooLarge{population: usize, max: usize},
}
