pub mod cancel;
pub mod error;
pub mod model;
pub mod replicate;
pub mod session;
pub mod store;
pub mod tree;

pub use cancel::CancelToken;
pub use error::{MigrateError, RemoteOperationError};
pub use model::{CategoryNode, IdMapping, NodeHandle};
pub use replicate::{NodeFailure, ReplicationOutcome, replicate_tree};
pub use session::{RemoteSession, scrape_category_tree};
pub use tree::{build_category_tree, flatten_category_tree};
