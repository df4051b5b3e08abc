use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosteriorError {
    #[error("Cannot normalize the {field} distribution of {person}: accumulated probability mass is zero")]
    ZeroMass{person: String, field: &'static str},
}
