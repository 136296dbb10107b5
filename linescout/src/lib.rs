pub mod chunk;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod printer;
pub mod results;
pub mod search;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use results::{ChunkResult, MatchSpan, SearchSummary};
pub use search::search_file;
