use crate::infrastructure::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("agent did not finish within {cycles} model turns")]
    CycleLimit { cycles: usize },
    #[error("{0}")]
    Other(String),
}
