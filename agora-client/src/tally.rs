use crate::api::{UserId, Vote, VoteValue};

/// Client-side aggregation of one post's votes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct VoteTally {
    pub likes: usize,
    pub dislikes: usize,

    /// How the viewing user voted, if they did (and are signed in)
    pub own_vote: Option<VoteValue>,
}

impl VoteTally {
    pub fn of(votes: &[Vote], viewer: Option<UserId>) -> VoteTally {
        VoteTally {
            likes: votes.iter().filter(|v| v.value == VoteValue::Up).count(),
            dislikes: votes.iter().filter(|v| v.value == VoteValue::Down).count(),
            own_vote: viewer.and_then(|u| {
                votes.iter().find(|v| v.user_id == u).map(|v| v.value)
            }),
        }
    }

    pub fn score(&self) -> i64 {
        self.likes as i64 - self.dislikes as i64
    }
}
