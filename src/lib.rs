pub mod alignment;
pub mod config;
pub mod corpus;
pub mod encoding;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod mapper;
pub mod pipeline;
pub mod types;

pub use config::{CorpusConfig, DivergencePolicy};
pub use error::CorpusError;
pub use mapper::SymbolMapper;
pub use pipeline::ManifestPipeline;
pub use types::{ManifestEntry, PartitionKind, PhonemeSequence, RunSummary, SkipCounts};
