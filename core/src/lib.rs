pub mod error;
pub mod graph;
pub mod index;
pub mod pagerank;
pub mod persist;
pub mod pipeline;
pub mod query;
pub mod relevance;
pub mod tokenizer;

pub use error::IndexError;
pub use index::*;
pub use pagerank::PageRankParams;
pub use pipeline::{build_index, IndexSnapshot};
pub use query::{Hit, Querier, SearchOutcome};
