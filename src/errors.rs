use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLoadingError {
    #[error("cannot read model from file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("malformed model file: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("model file has invalid orders: {0}")]
    InvalidOrders(#[from] InvalidOrders),
    #[error("total count of k-gram {kgram:?} does not match its symbol counts")]
    InconsistentTotal { kgram: String },
}

#[derive(Error, Debug)]
pub enum ModelSavingError {
    #[error("cannot write model into file: {0}")]
    WriteFile(#[from] std::io::Error),
    #[error("can't serialize model: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOrders {
    #[error("at least one k-gram order is required")]
    Empty,
    #[error("k-gram orders must be positive")]
    Zero,
}
