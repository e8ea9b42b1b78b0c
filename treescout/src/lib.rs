pub mod cancel;
pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;
pub mod search;

pub use cancel::CancellationToken;
pub use config::{ErrorPolicy, SearchConfig};
pub use errors::{SearchError, SearchResult};
pub use results::{Directory, FileResult, Match, Node, SearchOutput};
pub use search::{find, find_with_cancel, MatchMode};
