use thiserror::Error;
use crate::FileEntity;

#[derive(Error, Debug)]
pub enum ParserError{
    #[error("{0} {1} does not exist")]
    MissingFileEntity(FileEntity, String),

    #[error("{1} is not a {0}")]
    InvalidFileEntity(FileEntity, String),

    #[error("The provided value must lie between {0} and {1}. Got {2}")]
    ParseProbability(f64, f64, f64),

    #[error("Failed to generate an output file name. Note that output file names are generated from the input pedigree filestem")]
    ParseOutputPrefix,

    #[error("{0} already exists. Use --overwrite to force.")]
    CannotOverwrite(String),

    #[error("Failed to serialize command line arguments")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Failed to deserialize command line arguments from {0}")]
    Deserialize(String, #[source] serde_yaml::Error),

    #[error("Unable to write serialized arguments into {0}")]
    WriteArgs(String, #[source] std::io::Error),
}
