use crate::{Error, PostId, Time, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub i64);

/// A comment as stored: flat, referencing its parent by id.
///
/// The nested form used for rendering is built client-side, see
/// `agora_client::CommentTree`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,

    /// `None` for a top-level comment
    pub parent_id: Option<CommentId>,

    pub content: String,

    pub author_id: UserId,
    /// Display name snapshotted at creation time, not a live reference
    pub author_name: String,

    pub created_at: Time,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub author_name: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_text(&self.content)?;
        crate::validate_name(&self.author_name)?;
        Ok(())
    }
}
