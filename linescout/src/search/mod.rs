pub mod aggregator;
pub mod engine;
pub mod matcher;
pub mod scanner;

pub use engine::search_file;
pub use matcher::LineMatcher;
pub use scanner::{ChunkScanner, ScanMode};
