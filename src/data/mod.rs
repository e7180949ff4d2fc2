mod loader;
mod pool;

pub use loader::{LoadError, load_questions_from_json, parse_questions};
pub use pool::{FallbackPool, PoolError, split_by_difficulty};
