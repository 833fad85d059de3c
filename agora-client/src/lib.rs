mod app;
pub use app::App;

mod cache;
pub use cache::{Entry, QueryCache, QueryKey, QueryState};

mod media;
pub use media::{object_path, sanitize_file_name, truncate_file_name, ImageUpload};

mod rest;
pub use rest::RestStore;

mod session;
pub use session::Session;

mod store;
pub use store::{Store, VoteOutcome};

mod tally;
pub use tally::VoteTally;

mod tree;
pub use tree::{CommentNode, CommentTree, DepthFirst};

pub mod api {
    pub use agora_api::*;
}
