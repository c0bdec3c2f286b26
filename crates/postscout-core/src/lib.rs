pub mod error;
pub mod query;
pub mod search;
pub mod session;
pub mod similarity;
pub mod status;

pub use error::{Error, Result};
pub use query::{MatchStrategy, SearchQuery};
pub use search::{Located, run_search};
pub use session::{BrowserSession, Candidate, WaitCondition};
pub use status::{PostId, extract_status_id, locate_post, resolve_status_id};
