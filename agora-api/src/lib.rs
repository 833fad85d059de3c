use chrono::Utc;

mod auth;
pub use auth::{AuthToken, NewSession};

mod comment;
pub use comment::{Comment, CommentId, NewComment};

mod community;
pub use community::{Community, CommunityId, NewCommunity};

mod error;
pub use error::Error;

mod post;
pub use post::{NewPost, Post, PostId};

mod user;
pub use user::{User, UserId};

mod vote;
pub use vote::{Vote, VoteId, VoteValue};

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Refuse strings the store cannot represent
pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(s.to_string()));
    }
    Ok(())
}

/// Like `validate_string`, but also refuse whitespace-only text
pub fn validate_text(s: &str) -> Result<(), Error> {
    validate_string(s)?;
    if s.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    Ok(())
}

pub fn validate_name(s: &str) -> Result<(), Error> {
    validate_text(s)?;
    if s.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidName(s.to_string()));
    }
    Ok(())
}
