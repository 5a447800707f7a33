pub mod config;
pub mod discovery;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;

pub use config::{CliOverrides, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use results::{RepoMatch, SearchSummary};
pub use search::search;
