use thiserror::Error;

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("{field} = {value} is not a valid probability. Value must lie within [0, 1]")]
    NotAProbability{field: String, value: f64},

    #[error("{field} is not a valid distribution: values sum to {sum}")]
    DoesNotSumToOne{field: String, sum: f64},

    #[error("Failed to open probability tables file")]
    OpenFile(#[source] std::io::Error),

    #[error("Failed to deserialize probability tables")]
    Deserialize(#[source] serde_yaml::Error),

    #[error("Failed to serialize probability tables")]
    Serialize(#[source] serde_yaml::Error),
}
