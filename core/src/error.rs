use crate::DocId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("pagerank did not converge after {iterations} iterations (residual {residual})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("duplicate document id {0}")]
    DuplicateId(DocId),
}

pub type Result<T> = std::result::Result<T, IndexError>;
