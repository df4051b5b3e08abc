use thiserror::Error;

#[derive(Debug, Error)]
pub enum PedigreeParserError {
    #[error("Failed to open pedigree definition file")]
    OpenFile(#[source] std::io::Error),

    #[error("Failed to read the pedigree definition file")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to read record at line n°{lineno} of the pedigree definition file")]
    ReadRecord{lineno: usize, #[source] source: csv::Error},

    #[error("Invalid trait value '{value}' for individual {name}. Expected '1', '0' or an empty field")]
    InvalidTrait{name: String, value: String},

    #[error("Individual {0} has a single parent defined. Either both or none of the parents must be provided")]
    IncompleteParents(String),

    #[error("Parent {parent} of {child} is not defined within the pedigree definition file")]
    UnknownParent{child: String, parent: String},

    #[error("Failed to add individual {0} while parsing line n°{1} in the pedigree definition file")]
    AddPerson(String, usize),

    #[error("Pedigree contains {population} individuals. At most {max} individuals are supported")]
    PopulationTooLarge{population: usize, max: usize},
}
