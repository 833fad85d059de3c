use crate::{PostId, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct VoteId(pub i64);

/// Stored as +1 / -1, like the votes table
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum VoteValue {
    Up,
    Down,
}

impl From<VoteValue> for i8 {
    fn from(v: VoteValue) -> i8 {
        match v {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i8> for VoteValue {
    type Error = String;

    fn try_from(v: i8) -> Result<VoteValue, String> {
        match v {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            v => Err(format!("invalid vote value {v}, expected 1 or -1")),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Vote {
    pub id: VoteId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub value: VoteValue,
}
