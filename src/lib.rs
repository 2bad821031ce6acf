
pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod pipeline;
pub mod ppmi;
pub mod tokenizer;

pub use config::{files_handling, Config, Params};
pub use cooccurrence::{CoocEdge, Counts};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, Stage};
pub use ppmi::{compute_ppmi, Ppmi, PpmiEdge, WeightedEdge};
